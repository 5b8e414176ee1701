/*
This code is part of the SceneLoaders geometry file-format library.
Authors: SceneLoaders developers
Created: 16/10/2026
Last Modified: 16/10/2026
License: MIT
*/

use super::header::LasHeader;
use super::point_data::{PointData, POINT_READERS, POINT_RECORD_LENGTHS};
use super::vlr::{Vlr, VlrContent};
use crate::error::{Error, Result};
use crate::point_cloud::{Progress, PROGRESS_INTERVAL};
use crate::utils::{ByteOrderReader, Endianness};
use serde_derive::Serialize;
use std::fmt;
use std::fs;
use std::path::Path;

const PROJECTED_CS_TYPE_GEOKEY: u16 = 3072;
const GEOGRAPHIC_TYPE_GEOKEY: u16 = 2048;

#[derive(Default, Clone, Debug, PartialEq, Serialize)]
pub struct LasFile {
    pub header: LasHeader,
    pub vlr_data: Vec<Vlr>,
    pub point_data: Vec<PointData>,
}

impl LasFile {
    pub fn get_point_info(&self, index: usize) -> Option<&PointData> {
        self.point_data.get(index)
    }

    /// The scaled (but not offset) coordinates of a point.
    pub fn scaled_xyz(&self, p: &PointData) -> (f64, f64, f64) {
        (
            p.x as f64 * self.header.x_scale_factor,
            p.y as f64 * self.header.y_scale_factor,
            p.z as f64 * self.header.z_scale_factor,
        )
    }

    /// The EPSG code of the GeoTIFF key directory, preferring the projected
    /// coordinate system over the geographic one.
    pub fn epsg_code(&self) -> Option<u16> {
        let dir = self.vlr_data.iter().find_map(|vlr| match &vlr.content {
            Some(VlrContent::GeoKeyDirectory(dir)) => Some(dir),
            _ => None,
        })?;
        dir.short_value(PROJECTED_CS_TYPE_GEOKEY)
            .or_else(|| dir.short_value(GEOGRAPHIC_TYPE_GEOKEY))
    }

    pub fn wkt(&self) -> Option<&str> {
        self.vlr_data.iter().find_map(|vlr| match &vlr.content {
            Some(VlrContent::CoordinateSystemWkt(wkt)) => Some(wkt.as_str()),
            _ => None,
        })
    }
}

impl fmt::Display for LasFile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut s = format!("{}", self.header);
        for (i, vlr) in self.vlr_data.iter().enumerate() {
            s = s + &format!("\nVLR {}:\n{}", i, vlr);
        }
        write!(f, "{}", s)
    }
}

/// Decodes LAS 1.0 to 1.4 files held in memory.
pub struct LasDecoder;

impl LasDecoder {
    pub fn parse(buffer: &[u8]) -> Result<LasFile> {
        LasDecoder::parse_with_progress(buffer, PROGRESS_INTERVAL, |_| {})
    }

    pub fn read_file<P: AsRef<Path>>(path: P) -> Result<LasFile> {
        let buffer = fs::read(path)?;
        LasDecoder::parse(&buffer)
    }

    /// Decodes the file, reporting progress every `progress_interval` point
    /// records.
    pub fn parse_with_progress<F: FnMut(Progress)>(
        buffer: &[u8],
        progress_interval: usize,
        mut on_progress: F,
    ) -> Result<LasFile> {
        let mut bor = ByteOrderReader::new(buffer, Endianness::LittleEndian);
        let signature = bor.read_utf8(4.min(buffer.len()))?;
        if signature != "LASF" {
            return Err(Error::InvalidLasSignature(signature));
        }
        let header = LasHeader::read(&mut bor)?;

        ///////////////////////
        // Read the VLR data //
        ///////////////////////
        bor.seek(header.header_size as usize)?;
        let mut vlr_data = Vec::with_capacity(header.number_of_vlrs.min(1024) as usize);
        for _ in 0..header.number_of_vlrs {
            vlr_data.push(Vlr::read(&mut bor)?);
        }

        /////////////////////////
        // Read the point data //
        /////////////////////////
        bor.set_byte_order(Endianness::LittleEndian);
        if bor.pos() != header.offset_to_points as usize {
            log::error!(
                "The point data were expected at byte {} but the VLRs end at byte {}",
                header.offset_to_points,
                bor.pos()
            );
            bor.seek(header.offset_to_points as usize)?;
        }

        let format = header.point_format;
        if format as usize >= POINT_READERS.len() {
            return Err(Error::InvalidPointFormat(format));
        }
        let reader = POINT_READERS[format as usize];
        let layout_length = POINT_RECORD_LENGTHS[format as usize] as usize;
        let record_length = header.point_record_length as usize;
        // There may be extra bytes at the end of each point record.
        let skip_bytes = record_length.saturating_sub(layout_length);
        if record_length < layout_length {
            log::warn!(
                "Point record length {} is shorter than the {} bytes of point format {}",
                record_length,
                layout_length,
                format
            );
        }

        let total = header.point_count();
        let capacity = (total as usize).min(bor.remaining() / layout_length);
        let mut point_data = Vec::with_capacity(capacity);
        let interval = progress_interval.max(1) as u64;
        for i in 0..total {
            point_data.push(reader(&mut bor)?);
            if skip_bytes > 0 {
                bor.inc_pos(skip_bytes)?;
            }
            if (i + 1) % interval == 0 {
                on_progress(Progress {
                    loaded: i + 1,
                    total,
                });
            }
        }
        log::info!(
            "decoded {} point(s) of format {} from a LAS {} file",
            point_data.len(),
            format,
            header.version()
        );

        Ok(LasFile {
            header,
            vlr_data,
            point_data,
        })
    }
}
