/*
This code is part of the SceneLoaders geometry file-format library.
Authors: SceneLoaders developers
Created: 16/10/2026
Last Modified: 16/10/2026
License: MIT
*/

// private sub-module defined in other files
pub mod dbf;
pub mod shapefile;

// exports identifiers from private sub-modules in the current module namespace
pub use self::dbf::{DbfDecoder, DbfFile, DbfHeader, DbfRecord, FieldData, FieldDataType};
pub use self::shapefile::{Shape, ShapeType, ShpDecoder, ShpFile, ShpHeader, ShpRecord};
