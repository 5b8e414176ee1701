/*
This code is part of the SceneLoaders geometry file-format library.
Authors: SceneLoaders developers
Created: 16/10/2026
Last Modified: 16/10/2026
License: MIT
*/

//! Decoders for DBF attribute tables, ESRI Shapefile geometry, LAS point
//! clouds and ASCII point files.
//!
//! The binary decoders work on a buffer that is already in memory:
//!
//! ```no_run
//! use scene_loaders::lidar::{convert, LasDecoder};
//!
//! let las = LasDecoder::read_file("points.las").unwrap();
//! let group = convert(&las, |p| println!("{:.1}%", p.percent()));
//! println!("{} points", group.num_points());
//! ```

pub mod algorithms;
pub mod ascii;
pub mod configs;
pub mod error;
pub mod lidar;
pub mod point_cloud;
pub mod structures;
pub mod utils;
pub mod vector;

pub use crate::error::{Error, Result};
pub use crate::utils::{ByteOrderReader, Endianness};
