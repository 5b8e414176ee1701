/*
This code is part of the SceneLoaders geometry file-format library.
Authors: SceneLoaders developers
Created: 16/10/2026
Last Modified: 16/10/2026
License: MIT
*/

use std::io;
use thiserror::Error;

/// Fatal decoding failures. Structural warnings and per-record problems are
/// logged instead and never surface here.
#[derive(Debug, Error)]
pub enum Error {
    #[error("attempted to read {wanted} byte(s) at offset {offset} of a {len} byte buffer")]
    UnexpectedEof {
        offset: usize,
        wanted: usize,
        len: usize,
    },

    #[error("cannot seek to offset {offset} of a {len} byte buffer")]
    SeekOutOfBounds { offset: usize, len: usize },

    #[error("unrecognized dBase version byte 0x{0:02X}")]
    UnknownDbfVersion(u8),

    #[error("unrecognized dBase field type '{0}'")]
    UnknownDbfFieldType(char),

    #[error("Invalid las file signature: {0:?}")]
    InvalidLasSignature(String),

    #[error("unsupported LAS version {0}")]
    UnsupportedLasVersion(String),

    #[error("point data record format {0} is outside the supported range 0-10")]
    InvalidPointFormat(u8),

    #[error("ASCII line starting at byte {offset} does not fit in a {chunk_size} byte chunk")]
    AscLineTooLong { offset: u64, chunk_size: usize },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("malformed settings: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
