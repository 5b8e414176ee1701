/*
This code is part of the SceneLoaders geometry file-format library.
Authors: SceneLoaders developers
Created: 16/10/2026
Last Modified: 16/10/2026
License: MIT
*/

pub mod attributes;
pub mod header;

pub use self::attributes::{
    AttributeField, DbfRecord, FieldData, FieldDataType, FieldExtras,
};
pub use self::header::{DbfHeader, DbfLevel};

use self::attributes::{parse_int_prefix, parse_logical};
use crate::error::Result;
use crate::utils::{trim_fixed_width, ByteOrderReader, Endianness};
use indexmap::IndexMap;
use serde_derive::Serialize;
use std::fs;
use std::path::Path;

/// Tombstone byte marking a deleted row.
pub const DELETED_MARKER: u8 = 0x1A;

/// A decoded dBase table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DbfFile {
    pub header: DbfHeader,
    pub records: Vec<DbfRecord>,
}

impl DbfFile {
    pub fn num_records(&self) -> usize {
        self.records.len()
    }

    pub fn get_record(&self, index: usize) -> Option<&DbfRecord> {
        self.records.get(index)
    }

    pub fn get_value(&self, index: usize, field_name: &str) -> Option<&FieldData> {
        self.records.get(index).and_then(|r| r.get(field_name))
    }
}

/// Decodes dBase II through dBase 7 tables.
pub struct DbfDecoder;

impl DbfDecoder {
    pub fn parse(buffer: &[u8]) -> Result<DbfFile> {
        let mut bor = ByteOrderReader::new(buffer, Endianness::BigEndian);
        let header = DbfHeader::read(&mut bor)?;
        let mut records = Vec::with_capacity((header.num_records as usize).min(bor.remaining()));
        for _ in 0..header.num_records {
            records.push(read_record(&mut bor, &header.fields)?);
        }
        log::debug!(
            "decoded {} dBase record(s) with {} field(s)",
            records.len(),
            header.fields.len()
        );
        Ok(DbfFile { header, records })
    }

    pub fn read_file<P: AsRef<Path>>(path: P) -> Result<DbfFile> {
        let buffer = fs::read(path)?;
        DbfDecoder::parse(&buffer)
    }
}

fn read_record(bor: &mut ByteOrderReader, fields: &[AttributeField]) -> Result<DbfRecord> {
    let deleted = bor.read_u8()? == DELETED_MARKER;
    let mut values = IndexMap::with_capacity(fields.len());
    for field in fields {
        if let Some(value) = read_value(bor, field)? {
            values.insert(field.name.clone(), value);
        }
    }
    Ok(DbfRecord { deleted, values })
}

/// Reads one field of a row. Timestamps are consumed but yield no value.
fn read_value(bor: &mut ByteOrderReader, field: &AttributeField) -> Result<Option<FieldData>> {
    let len = field.field_length as usize;
    let value = match field.field_type {
        FieldDataType::Character
        | FieldDataType::Date
        | FieldDataType::Memo
        | FieldDataType::Ole => FieldData::Text(trim_fixed_width(&bor.read_utf8(len)?)),
        // Float shares the integer conversion of Numeric.
        FieldDataType::Numeric | FieldDataType::Binary | FieldDataType::Float => {
            match parse_int_prefix(&bor.read_utf8(len)?) {
                Some(v) => FieldData::Int(v),
                None => FieldData::Null,
            }
        }
        FieldDataType::Logical => {
            let bytes = bor.read_bytes(len)?;
            match bytes.first() {
                Some(b) => parse_logical(char::from(*b)),
                None => FieldData::Null,
            }
        }
        FieldDataType::Long | FieldDataType::Autoincrement => {
            let v = bor.read_i32()?;
            skip_surplus(bor, len, 4)?;
            FieldData::Int(v as i64)
        }
        FieldDataType::Double => {
            let v = bor.read_f64()?;
            skip_surplus(bor, len, 8)?;
            FieldData::Real(v)
        }
        FieldDataType::Timestamp => {
            bor.inc_pos(len)?;
            return Ok(None);
        }
    };
    Ok(Some(value))
}

fn skip_surplus(bor: &mut ByteOrderReader, field_length: usize, read: usize) -> Result<()> {
    if field_length > read {
        bor.inc_pos(field_length - read)?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::{DbfDecoder, DbfLevel, FieldData, FieldExtras};
    use crate::error::Error;
    use byteorder::{BigEndian, LittleEndian, WriteBytesExt};

    struct Field<'a> {
        name: &'a str,
        tag: char,
        length: u8,
        decimals: u8,
    }

    fn field(name: &str, tag: char, length: u8) -> Field {
        Field {
            name,
            tag,
            length,
            decimals: 0,
        }
    }

    fn padded(text: &str, width: usize) -> Vec<u8> {
        let mut v = text.as_bytes().to_vec();
        v.resize(width, 0);
        v
    }

    /// Lays out a table with the header structure of the given version byte.
    fn build_dbf(version: u8, fields: &[Field], rows: &[Vec<u8>]) -> Vec<u8> {
        let level = DbfLevel::from_version(version).unwrap();
        let record_len: u16 = 1 + fields.iter().map(|f| f.length as u16).sum::<u16>();
        let mut buf: Vec<u8> = vec![];
        buf.push(version);
        if level == DbfLevel::V2 {
            buf.write_u16::<LittleEndian>(rows.len() as u16).unwrap();
            buf.extend_from_slice(&[7, 15, 96]);
            buf.write_u16::<LittleEndian>(record_len).unwrap();
            for f in fields {
                buf.extend(padded(f.name, 11));
                buf.push(f.tag as u8);
                buf.push(f.length);
                buf.write_u16::<LittleEndian>(0).unwrap();
                buf.push(f.decimals);
            }
        } else {
            let (preamble, descriptor) = if level == DbfLevel::V4 { (68, 48) } else { (32, 32) };
            let header_len = (preamble + descriptor * fields.len() + 1) as u16;
            buf.extend_from_slice(&[96, 7, 15]);
            buf.write_u32::<LittleEndian>(rows.len() as u32).unwrap();
            buf.write_u16::<LittleEndian>(header_len).unwrap();
            buf.write_u16::<LittleEndian>(record_len).unwrap();
            buf.extend_from_slice(&[0u8; 20]);
            if level == DbfLevel::V4 {
                buf.extend(padded("DB437US0", 32));
                buf.extend_from_slice(&[0u8; 4]);
            }
            for f in fields {
                match level {
                    DbfLevel::V2_5 => {
                        buf.extend(padded(f.name, 11));
                        buf.push(f.tag as u8);
                        buf.write_u32::<LittleEndian>(0).unwrap();
                        buf.push(f.length);
                        buf.push(f.decimals);
                        buf.extend_from_slice(&[0u8; 2]);
                        buf.push(1); // work area
                        buf.extend_from_slice(&[0u8; 2]);
                        buf.push(0);
                        buf.extend_from_slice(&[0u8; 7]);
                        buf.push(0);
                    }
                    DbfLevel::V3 => {
                        buf.extend(padded(f.name, 11));
                        buf.push(f.tag as u8);
                        buf.extend_from_slice(&[0u8; 4]);
                        buf.push(f.length);
                        buf.push(f.decimals);
                        buf.extend_from_slice(&[0u8; 2]);
                        buf.push(1);
                        buf.extend_from_slice(&[0u8; 10]);
                        buf.push(1); // production mdx
                    }
                    _ => {
                        buf.extend(padded(f.name, 32));
                        buf.push(f.tag as u8);
                        buf.push(f.length);
                        buf.push(f.decimals);
                        buf.extend_from_slice(&[0u8; 2]);
                        buf.push(0);
                        buf.extend_from_slice(&[0u8; 2]);
                        buf.write_u32::<LittleEndian>(42).unwrap();
                        buf.extend_from_slice(&[0u8; 4]);
                    }
                }
            }
        }
        buf.push(0x0D);
        for row in rows {
            buf.extend_from_slice(row);
        }
        buf
    }

    fn row(deleted: bool, body: &[u8]) -> Vec<u8> {
        let mut v = vec![if deleted { 0x1A } else { 0x20 }];
        v.extend_from_slice(body);
        v
    }

    #[test]
    fn test_values_by_field_type() {
        let fields = [
            field("NAME", 'C', 8),
            field("CREATED", 'D', 8),
            field("COUNT", 'N', 5),
            field("RATIO", 'F', 6),
            field("FLAG", 'L', 1),
            field("ID", 'I', 4),
            field("HEIGHT", 'O', 8),
            field("STAMP", '@', 8),
            field("NOTES", 'M', 10),
            field("PIC", 'G', 10),
            field("BLOCK", 'B', 10),
            field("SERIAL", '+', 4),
        ];
        let mut body: Vec<u8> = vec![];
        body.extend_from_slice(b"Oak tree");
        body.extend_from_slice(b"20260314");
        body.extend_from_slice(b"  -42");
        body.extend_from_slice(b"  7.25");
        body.push(b'Y');
        body.write_i32::<BigEndian>(-1234).unwrap();
        body.write_f64::<BigEndian>(12.5).unwrap();
        body.extend_from_slice(&[9u8; 8]);
        body.extend_from_slice(b"17        ");
        body.extend(padded("photo", 10));
        body.extend_from_slice(b"       305");
        body.write_i32::<BigEndian>(88).unwrap();
        let buffer = build_dbf(0x03, &fields, &[row(false, &body)]);

        let dbf = DbfDecoder::parse(&buffer).unwrap();
        assert_eq!(dbf.header.level, DbfLevel::V2_5);
        assert_eq!(dbf.header.fields.len(), 12);
        assert_eq!(dbf.num_records(), 1);
        let rec = dbf.get_record(0).unwrap();
        assert!(!rec.deleted);
        assert_eq!(rec.get("NAME"), Some(&FieldData::Text("Oak tree".to_string())));
        assert_eq!(rec.get("CREATED"), Some(&FieldData::Text("20260314".to_string())));
        assert_eq!(rec.get("COUNT"), Some(&FieldData::Int(-42)));
        assert_eq!(rec.get("RATIO"), Some(&FieldData::Int(7)));
        assert_eq!(rec.get("FLAG"), Some(&FieldData::Bool(true)));
        assert_eq!(rec.get("ID"), Some(&FieldData::Int(-1234)));
        assert_eq!(rec.get("HEIGHT"), Some(&FieldData::Real(12.5)));
        assert_eq!(rec.get("STAMP"), None);
        assert_eq!(rec.get("NOTES"), Some(&FieldData::Text("17".to_string())));
        assert_eq!(rec.get("PIC"), Some(&FieldData::Text("photo".to_string())));
        assert_eq!(rec.get("BLOCK"), Some(&FieldData::Int(305)));
        assert_eq!(rec.get("SERIAL"), Some(&FieldData::Int(88)));
        assert_eq!(rec.values.len(), 11);
    }

    #[test]
    fn test_missing_field_terminator_is_not_fatal() {
        let mut buffer = build_dbf(0x03, &[field("A", 'C', 3)], &[row(false, b"abc")]);
        assert_eq!(buffer[64], 0x0D);
        buffer[64] = 0x00;
        let dbf = DbfDecoder::parse(&buffer).unwrap();
        assert_eq!(dbf.header.fields.len(), 1);
        assert_eq!(dbf.num_records(), 1);
        assert_eq!(dbf.get_value(0, "A"), Some(&FieldData::Text("abc".to_string())));
    }

    #[test]
    fn test_logical_values() {
        let fields = [field("OK", 'L', 1)];
        let chars = b"tTyYfFnN? ";
        let rows: Vec<Vec<u8>> = chars.iter().map(|c| row(false, &[*c])).collect();
        let dbf = DbfDecoder::parse(&build_dbf(0x03, &fields, &rows)).unwrap();
        let got: Vec<FieldData> = dbf
            .records
            .iter()
            .map(|r| r.get("OK").unwrap().clone())
            .collect();
        let mut expected = vec![FieldData::Bool(true); 4];
        expected.extend(vec![FieldData::Bool(false); 4]);
        expected.extend(vec![FieldData::Null; 2]);
        assert_eq!(got, expected);
    }

    #[test]
    fn test_trailing_padding_and_blank_numbers() {
        let fields = [field("LABEL", 'C', 6), field("N", 'N', 4)];
        let dbf = DbfDecoder::parse(&build_dbf(
            0x83,
            &fields,
            &[row(true, b"ab  \0\0    ")],
        ))
        .unwrap();
        let rec = &dbf.records[0];
        assert!(rec.deleted);
        assert_eq!(rec.get("LABEL"), Some(&FieldData::Text("ab".to_string())));
        assert_eq!(rec.get("N"), Some(&FieldData::Null));
    }

    #[test]
    fn test_every_version_dispatches() {
        let versions = [
            0x02u8, 0x30, 0x31, 0x32, 0xFB, 0x03, 0x83, 0x43, 0x63, 0x7B, 0x8B, 0xCB, 0x04,
            0xE5, 0xF5,
        ];
        let fields = [field("CODE", 'C', 3), field("VAL", 'N', 3)];
        for version in versions.iter() {
            let buffer = build_dbf(*version, &fields, &[row(false, b"abc 12")]);
            let dbf = DbfDecoder::parse(&buffer).unwrap();
            assert_eq!(dbf.header.version, *version);
            assert_eq!(dbf.header.fields.len(), 2, "version 0x{:02X}", version);
            assert_eq!(dbf.header.num_records, 1);
            assert_eq!(dbf.get_value(0, "CODE"), Some(&FieldData::Text("abc".to_string())));
            assert_eq!(dbf.get_value(0, "VAL"), Some(&FieldData::Int(12)));
        }
    }

    #[test]
    fn test_version_specific_details() {
        let fields = [field("CODE", 'C', 3)];
        let v2 = DbfDecoder::parse(&build_dbf(0x02, &fields, &[row(false, b"xyz")])).unwrap();
        assert_eq!(v2.header.bytes_in_header, None);
        assert_eq!((v2.header.year, v2.header.month, v2.header.day), (1996, 7, 15));
        assert_eq!(v2.header.fields[0].extras, FieldExtras::V2 { data_address: 0 });

        let v3 = DbfDecoder::parse(&build_dbf(0x43, &fields, &[row(false, b"xyz")])).unwrap();
        assert_eq!(v3.header.year, 1996);
        assert_eq!(
            v3.header.last_modified(),
            chrono::NaiveDate::from_ymd_opt(1996, 7, 15)
        );
        assert_eq!(
            v3.header.fields[0].extras,
            FieldExtras::V3 {
                work_area_id: 1,
                production_mdx_flag: 1
            }
        );

        let v4 = DbfDecoder::parse(&build_dbf(0x04, &fields, &[row(false, b"xyz")])).unwrap();
        assert_eq!(v4.header.language_driver_name.as_deref(), Some("DB437US0"));
        assert_eq!(
            v4.header.fields[0].extras,
            FieldExtras::V4 {
                production_mdx_flag: 0,
                next_autoincrement_value: 42
            }
        );
    }

    #[test]
    fn test_unknown_version_and_field_type() {
        let fields = [field("CODE", 'C', 3)];
        let mut buffer = build_dbf(0x03, &fields, &[row(false, b"xyz")]);
        buffer[0] = 0x05;
        match DbfDecoder::parse(&buffer) {
            Err(Error::UnknownDbfVersion(0x05)) => {}
            other => panic!("unexpected result {:?}", other),
        }

        let buffer = build_dbf(0x03, &[field("CODE", 'X', 3)], &[row(false, b"xyz")]);
        match DbfDecoder::parse(&buffer) {
            Err(Error::UnknownDbfFieldType('X')) => {}
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_truncated_records_are_fatal() {
        let fields = [field("CODE", 'C', 3)];
        let mut buffer = build_dbf(0x03, &fields, &[row(false, b"xyz")]);
        buffer.truncate(buffer.len() - 2);
        assert!(matches!(
            DbfDecoder::parse(&buffer),
            Err(Error::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_fresh_parses_are_equal() {
        let fields = [field("NAME", 'C', 4), field("N", 'N', 2)];
        let buffer = build_dbf(0xF5, &fields, &[row(false, b"abcd12"), row(true, b"efgh34")]);
        let first = DbfDecoder::parse(&buffer).unwrap();
        let second = DbfDecoder::parse(&buffer).unwrap();
        assert_eq!(first, second);
    }
}
