/*
This code is part of the SceneLoaders geometry file-format library.
Authors: SceneLoaders developers
Created: 16/10/2026
Last Modified: 16/10/2026
License: MIT
*/

use crate::error::Result;
use crate::point_cloud::{MAX_POINTS_PER_BATCH, PROGRESS_INTERVAL};
use serde_derive::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::io::prelude::*;
use std::io::ErrorKind;
use std::path::Path;

/// 128 MiB
pub const DEFAULT_ASC_CHUNK_SIZE: usize = 134_217_728;

/// Loader settings. Backed by a JSON settings file; missing keys take their
/// defaults.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LoaderConfigs {
    pub verbose_mode: bool,
    pub asc_chunk_size: usize,
    /// Percentage of ASCII lines kept.
    pub asc_sampling: f64,
    pub asc_auto_center: bool,
    pub max_points_per_batch: usize,
    pub progress_interval: usize,
}

impl LoaderConfigs {
    pub fn new() -> LoaderConfigs {
        LoaderConfigs {
            verbose_mode: false,
            asc_chunk_size: DEFAULT_ASC_CHUNK_SIZE,
            asc_sampling: 100f64,
            asc_auto_center: true,
            max_points_per_batch: MAX_POINTS_PER_BATCH,
            progress_interval: PROGRESS_INTERVAL,
        }
    }
}

impl Default for LoaderConfigs {
    fn default() -> LoaderConfigs {
        LoaderConfigs::new()
    }
}

/// Reads the settings file, falling back to the defaults when it does not
/// exist.
pub fn get_configs<P: AsRef<Path>>(config_file: P) -> Result<LoaderConfigs> {
    let configs = match fs::read_to_string(config_file) {
        Ok(contents) => serde_json::from_str(&contents)?,
        Err(e) if e.kind() == ErrorKind::NotFound => LoaderConfigs::new(),
        Err(e) => return Err(e.into()),
    };
    Ok(configs)
}

pub fn save_configs<P: AsRef<Path>>(config_file: P, configs: &LoaderConfigs) -> Result<()> {
    let configs_json = serde_json::to_string_pretty(configs)?;
    let mut file = File::create(config_file)?;
    file.write_all(configs_json.as_bytes())?;
    Ok(())
}
