/*
This code is part of the SceneLoaders geometry file-format library.
Authors: SceneLoaders developers
Created: 16/10/2026
Last Modified: 16/10/2026
License: MIT

Notes: The version byte selects one of four header layouts. Single-byte values
are read in big-endian mode; record counts and byte lengths are stored
little-endian, so the reader is switched for those fields and switched back.
*/

use super::attributes::{AttributeField, FieldDataType, FieldExtras};
use crate::error::{Error, Result};
use crate::utils::{trim_fixed_width, ByteOrderReader, Endianness};
use chrono::NaiveDate;
use serde_derive::Serialize;
use std::fmt;

pub const FIELD_TERMINATOR: u8 = 0x0D;

/// The dBase family a version byte belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum DbfLevel {
    V2,
    V2_5,
    V3,
    V4,
}

type HeaderReader = fn(&mut ByteOrderReader, &mut DbfHeader) -> Result<()>;

/// Every recognized version byte, with the header layout it uses.
const VERSION_TABLE: [(&[u8], DbfLevel, HeaderReader); 4] = [
    (&[0x02, 0x30, 0x31, 0x32, 0xFB], DbfLevel::V2, read_v2_header),
    (&[0x03, 0x83], DbfLevel::V2_5, read_v2_5_header),
    (&[0x43, 0x63, 0x7B, 0x8B, 0xCB], DbfLevel::V3, read_v3_header),
    (&[0x04, 0xE5, 0xF5], DbfLevel::V4, read_v4_header),
];

impl DbfLevel {
    pub fn from_version(version: u8) -> Result<DbfLevel> {
        lookup(version).map(|(level, _)| level)
    }
}

fn lookup(version: u8) -> Result<(DbfLevel, HeaderReader)> {
    for (codes, level, reader) in VERSION_TABLE.iter() {
        if codes.contains(&version) {
            return Ok((*level, *reader));
        }
    }
    Err(Error::UnknownDbfVersion(version))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DbfHeader {
    pub version: u8,
    pub level: DbfLevel,
    pub year: u32,
    pub month: u8,
    pub day: u8,
    pub num_records: u32,
    /// Not stored by dBase II files.
    pub bytes_in_header: Option<u16>,
    pub bytes_in_record: u16,
    pub incomplete_transaction: u8,
    pub encryption_flag: u8,
    pub mdx_flag: u8,
    pub language_driver_id: u8,
    pub language_driver_name: Option<String>,
    pub fields: Vec<AttributeField>,
}

impl DbfHeader {
    fn new(version: u8, level: DbfLevel) -> DbfHeader {
        DbfHeader {
            version,
            level,
            year: 1900,
            month: 0,
            day: 0,
            num_records: 0,
            bytes_in_header: None,
            bytes_in_record: 0,
            incomplete_transaction: 0,
            encryption_flag: 0,
            mdx_flag: 0,
            language_driver_id: 0,
            language_driver_name: None,
            fields: vec![],
        }
    }

    /// Reads the header and its field descriptor array, leaving the reader at
    /// the first record.
    pub fn read(bor: &mut ByteOrderReader) -> Result<DbfHeader> {
        bor.set_byte_order(Endianness::BigEndian);
        let version = bor.read_u8()?;
        let (level, reader) = lookup(version)?;
        let mut header = DbfHeader::new(version, level);
        reader(bor, &mut header)?;

        // Checks for end of field descriptor array (0x0d). Valid .dbf files
        // will have this flag.
        let terminator = bor.read_u8()?;
        if terminator != FIELD_TERMINATOR {
            log::error!(
                "dBase field descriptor array ended with 0x{:02X} at offset {} instead of 0x0D",
                terminator,
                bor.pos() - 1
            );
        }
        if let Some(len) = header.bytes_in_header {
            if (len as usize) > bor.pos() {
                bor.seek(len as usize)?;
            }
        }
        Ok(header)
    }

    /// The date of the last update, if the stored bytes form a valid date.
    pub fn last_modified(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year as i32, self.month as u32, self.day as u32)
    }

    pub fn get_field_num(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

impl fmt::Display for DbfHeader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut s = format!("version: 0x{:02X} ({:?})", self.version, self.level);
        s = s + &format!("\nlast update: {}-{:02}-{:02}", self.year, self.month, self.day);
        s = s + &format!("\nnum. records: {}", self.num_records);
        s = s + &format!("\nbytes in record: {}", self.bytes_in_record);
        for field in &self.fields {
            s = s + &format!(
                "\nfield {} ({}, {}.{})",
                field.name,
                field.field_type.tag(),
                field.field_length,
                field.decimal_count
            );
        }
        write!(f, "{}", s)
    }
}

fn read_le<'a, T>(
    bor: &mut ByteOrderReader<'a>,
    read: fn(&mut ByteOrderReader<'a>) -> Result<T>,
) -> Result<T> {
    bor.set_byte_order(Endianness::LittleEndian);
    let val = read(bor);
    bor.set_byte_order(Endianness::BigEndian);
    val
}

fn read_name(bor: &mut ByteOrderReader, length: usize) -> Result<String> {
    let raw = bor.read_utf8(length)?;
    // names are NUL terminated; anything after the first NUL is garbage
    let name = raw.split('\0').next().unwrap_or("");
    Ok(trim_fixed_width(name))
}

/// Descriptors continue until the terminator, or until another descriptor
/// would run into the last byte of the declared header.
fn more_fields(bor: &ByteOrderReader, descriptor_size: usize, bytes_in_header: u16) -> Result<bool> {
    if bor.peek_u8()? == FIELD_TERMINATOR {
        return Ok(false);
    }
    Ok(bor.pos() + descriptor_size < bytes_in_header as usize)
}

/// dBase II: 16-byte descriptors, at most 32 of them.
fn read_v2_header(bor: &mut ByteOrderReader, header: &mut DbfHeader) -> Result<()> {
    header.num_records = read_le(bor, ByteOrderReader::read_u16)? as u32;
    header.month = bor.read_u8()?;
    header.day = bor.read_u8()?;
    header.year = 1900u32 + bor.read_u8()? as u32;
    header.bytes_in_record = read_le(bor, ByteOrderReader::read_u16)?;

    while header.fields.len() < 32 && bor.peek_u8()? != FIELD_TERMINATOR {
        let name = read_name(bor, 11)?;
        let field_type = FieldDataType::from_tag(bor.read_char()?)?;
        let field_length = bor.read_u8()?;
        let data_address = read_le(bor, ByteOrderReader::read_u16)?;
        let decimal_count = bor.read_u8()?;
        header.fields.push(AttributeField {
            name,
            field_type,
            field_length,
            decimal_count,
            extras: FieldExtras::V2 { data_address },
        });
    }
    Ok(())
}

/// The 31 bytes after the version byte shared by dBase III and dBase IV.
fn read_common_preamble(bor: &mut ByteOrderReader, header: &mut DbfHeader) -> Result<()> {
    header.year = 1900u32 + bor.read_u8()? as u32;
    header.month = bor.read_u8()?;
    header.day = bor.read_u8()?;
    header.num_records = read_le(bor, ByteOrderReader::read_u32)?;
    header.bytes_in_header = Some(read_le(bor, ByteOrderReader::read_u16)?);
    header.bytes_in_record = read_le(bor, ByteOrderReader::read_u16)?;
    // reserved bytes
    bor.inc_pos(2)?;
    header.incomplete_transaction = bor.read_u8()?;
    header.encryption_flag = bor.read_u8()?;
    // free record thread and the multi-user reserved area
    bor.inc_pos(12)?;
    header.mdx_flag = bor.read_u8()?;
    header.language_driver_id = bor.read_u8()?;
    // reserved bytes
    bor.inc_pos(2)?;
    Ok(())
}

/// dBase III: 32-byte descriptors with a little-endian data address.
fn read_v2_5_header(bor: &mut ByteOrderReader, header: &mut DbfHeader) -> Result<()> {
    read_common_preamble(bor, header)?;
    let bytes_in_header = header.bytes_in_header.unwrap_or(0);
    while more_fields(bor, 32, bytes_in_header)? {
        let name = read_name(bor, 11)?;
        let field_type = FieldDataType::from_tag(bor.read_char()?)?;
        let data_address = read_le(bor, ByteOrderReader::read_u32)?;
        let field_length = bor.read_u8()?;
        let decimal_count = bor.read_u8()?;
        // Skip reserved bytes multi-user dBASE.
        bor.inc_pos(2)?;
        let work_area_id = bor.read_u8()?;
        // Skip reserved bytes multi-user dBASE.
        bor.inc_pos(2)?;
        let set_fields_flag = bor.read_u8()?;
        // Skip reserved bytes.
        bor.inc_pos(7)?;
        let index_field_flag = bor.read_u8()?;
        header.fields.push(AttributeField {
            name,
            field_type,
            field_length,
            decimal_count,
            extras: FieldExtras::V2_5 {
                data_address,
                work_area_id,
                set_fields_flag,
                index_field_flag,
            },
        });
    }
    Ok(())
}

/// dBase IV: 32-byte descriptors with a production MDX flag.
fn read_v3_header(bor: &mut ByteOrderReader, header: &mut DbfHeader) -> Result<()> {
    read_common_preamble(bor, header)?;
    let bytes_in_header = header.bytes_in_header.unwrap_or(0);
    while more_fields(bor, 32, bytes_in_header)? {
        let name = read_name(bor, 11)?;
        let field_type = FieldDataType::from_tag(bor.read_char()?)?;
        bor.inc_pos(4)?;
        let field_length = bor.read_u8()?;
        let decimal_count = bor.read_u8()?;
        bor.inc_pos(2)?;
        let work_area_id = bor.read_u8()?;
        bor.inc_pos(10)?;
        let production_mdx_flag = bor.read_u8()?;
        header.fields.push(AttributeField {
            name,
            field_type,
            field_length,
            decimal_count,
            extras: FieldExtras::V3 {
                work_area_id,
                production_mdx_flag,
            },
        });
    }
    Ok(())
}

/// dBase 7: a 68-byte preamble carrying the language driver name, followed
/// by 48-byte descriptors.
fn read_v4_header(bor: &mut ByteOrderReader, header: &mut DbfHeader) -> Result<()> {
    read_common_preamble(bor, header)?;
    header.language_driver_name = Some(read_name(bor, 32)?);
    bor.inc_pos(4)?;
    let bytes_in_header = header.bytes_in_header.unwrap_or(0);
    while more_fields(bor, 48, bytes_in_header)? {
        let name = read_name(bor, 32)?;
        let field_type = FieldDataType::from_tag(bor.read_char()?)?;
        let field_length = bor.read_u8()?;
        let decimal_count = bor.read_u8()?;
        bor.inc_pos(2)?;
        let production_mdx_flag = bor.read_u8()?;
        bor.inc_pos(2)?;
        let next_autoincrement_value = read_le(bor, ByteOrderReader::read_u32)?;
        bor.inc_pos(4)?;
        header.fields.push(AttributeField {
            name,
            field_type,
            field_length,
            decimal_count,
            extras: FieldExtras::V4 {
                production_mdx_flag,
                next_autoincrement_value,
            },
        });
    }
    Ok(())
}
