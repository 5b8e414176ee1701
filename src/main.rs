/*
This code is part of the SceneLoaders geometry file-format library.
Authors: SceneLoaders developers
Created: 16/10/2026
Last Modified: 16/10/2026
License: MIT
*/

use scene_loaders::ascii::AscLoader;
use scene_loaders::configs::{get_configs, LoaderConfigs};
use scene_loaders::error::{Error, Result};
use scene_loaders::lidar::{convert_with, LasDecoder};
use scene_loaders::utils::get_formatted_elapsed_time;
use scene_loaders::vector::{DbfDecoder, ShpDecoder};
use serde_json::{json, Value};
use std::env;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Instant;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    match run().await {
        Ok(()) => {}
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    }
}

async fn run() -> Result<()> {
    let mut input_file = String::new();
    let mut settings_file = String::new();
    let mut verbose = false;
    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        help();
        return Ok(());
    }
    for arg in args {
        if arg.starts_with("-h") || arg.starts_with("--help") {
            help();
            return Ok(());
        } else if arg.starts_with("--version") {
            version();
            return Ok(());
        } else if arg.starts_with("-i") || arg.starts_with("--input") {
            input_file = arg_value(&arg);
        } else if arg.starts_with("--settings") {
            settings_file = arg_value(&arg);
        } else if arg == "-v" || arg == "--verbose" {
            verbose = true;
        }
    }
    if input_file.is_empty() {
        return Err(Error::Io(std::io::Error::new(
            ErrorKind::InvalidInput,
            "No input file was specified (--input=<file>).",
        )));
    }

    let mut configs = if settings_file.is_empty() {
        LoaderConfigs::new()
    } else {
        get_configs(&settings_file)?
    };
    configs.verbose_mode = configs.verbose_mode || verbose;

    if configs.verbose_mode {
        println!("****************************");
        println!("* Welcome to scene_loaders *");
        println!("****************************");
        println!("Reading data...");
    }
    let start = Instant::now();
    let summary = summarize(&input_file, &configs).await?;
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).map_err(Error::Config)?
    );
    if configs.verbose_mode {
        println!("Elapsed Time: {}", get_formatted_elapsed_time(start));
    }
    Ok(())
}

/// Decodes the input according to its extension.
async fn summarize(input_file: &str, configs: &LoaderConfigs) -> Result<Value> {
    let extension = Path::new(input_file)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    let verbose = configs.verbose_mode;
    let value = match extension.as_str() {
        "dbf" => {
            let dbf = DbfDecoder::read_file(input_file)?;
            json!({
                "format": "dbf",
                "header": dbf.header,
                "last_modified": dbf.header.last_modified().map(|d| d.to_string()),
                "num_records": dbf.num_records(),
                "num_deleted": dbf.records.iter().filter(|r| r.deleted).count(),
            })
        }
        "shp" => match ShpDecoder::read_file(input_file)? {
            Some(shp) => json!({
                "format": "shp",
                "header": shp.header,
                "num_records": shp.num_records(),
                "num_points": shp.get_total_num_points(),
                "num_shapes": shp.shapes().len(),
            }),
            None => json!({ "format": "shp", "valid": false }),
        },
        "las" => {
            let buffer = std::fs::read(input_file)?;
            let las = LasDecoder::parse_with_progress(&buffer, configs.progress_interval, |p| {
                if verbose {
                    println!("Reading points: {:.0}%", p.percent());
                }
            })?;
            let group = convert_with(
                &las,
                configs.max_points_per_batch,
                configs.progress_interval,
                |p| {
                    if verbose {
                        println!("Converting points: {:.0}%", p.percent());
                    }
                },
            );
            json!({
                "format": "las",
                "version": las.header.version(),
                "point_format": las.header.point_format,
                "num_points": las.point_data.len(),
                "num_vlrs": las.vlr_data.len(),
                "epsg": las.epsg_code(),
                "creation_date": las.header.creation_date().map(|d| d.to_string()),
                "group_position": group.position,
                "num_batches": group.batches.len(),
            })
        }
        "asc" | "xyz" | "txt" => {
            let loader = AscLoader::from_configs(configs);
            let summary = loader
                .load_path(
                    input_file,
                    |batch| {
                        if verbose {
                            println!("Loaded a batch of {} points", batch.len());
                        }
                    },
                    |p| {
                        if verbose {
                            println!("Reading: {:.0}%", p.percent());
                        }
                    },
                )
                .await?;
            json!({ "format": "ascii", "summary": summary })
        }
        _ => {
            return Err(Error::Io(std::io::Error::new(
                ErrorKind::InvalidInput,
                format!("Unrecognized file extension '{}'.", extension),
            )))
        }
    };
    Ok(value)
}

fn arg_value(arg: &str) -> String {
    let mut v = arg.replace("\"", "").replace("\'", "");
    if let Some(i) = v.find('=') {
        v = v[i + 1..].to_string();
    }
    v.trim().to_string()
}

fn help() {
    let s = "scene_loaders Help

Decodes a DBF, SHP, LAS or ASCII point file and prints a JSON summary.

The following commands are recognized:
-i, --input      Input file (.dbf, .shp, .las, .asc, .xyz or .txt).
--settings       Optional JSON settings file.
-v, --verbose    Prints progress information.
--version        Prints the version.
-h, --help       Prints help information.

Example Usage:
>> scene_loaders --input=points.las --settings=settings.json -v
";
    println!("{}", s);
}

fn version() {
    const VERSION: Option<&'static str> = option_env!("CARGO_PKG_VERSION");
    println!("scene_loaders v{}", VERSION.unwrap_or("unknown"));
}
