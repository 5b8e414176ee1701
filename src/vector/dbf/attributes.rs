/*
This code is part of the SceneLoaders geometry file-format library.
Authors: SceneLoaders developers
Created: 16/10/2026
Last Modified: 16/10/2026
License: MIT

NOTE: Structures for the field descriptors and row values of a dBase (.dbf) table.
*/

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde_derive::Serialize;

/// The data type tag of a dBase field descriptor.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum FieldDataType {
    Character,
    Date,
    Memo,
    Ole,
    Numeric,
    Binary,
    Float,
    Logical,
    Long,
    Autoincrement,
    Double,
    Timestamp,
}

impl FieldDataType {
    pub fn from_tag(tag: char) -> Result<FieldDataType> {
        Ok(match tag {
            'C' => FieldDataType::Character,
            'D' => FieldDataType::Date,
            'M' => FieldDataType::Memo,
            'G' => FieldDataType::Ole,
            'N' => FieldDataType::Numeric,
            'B' => FieldDataType::Binary,
            'F' => FieldDataType::Float,
            'L' => FieldDataType::Logical,
            'I' => FieldDataType::Long,
            '+' => FieldDataType::Autoincrement,
            'O' => FieldDataType::Double,
            '@' => FieldDataType::Timestamp,
            _ => return Err(Error::UnknownDbfFieldType(tag)),
        })
    }

    pub fn tag(&self) -> char {
        match self {
            FieldDataType::Character => 'C',
            FieldDataType::Date => 'D',
            FieldDataType::Memo => 'M',
            FieldDataType::Ole => 'G',
            FieldDataType::Numeric => 'N',
            FieldDataType::Binary => 'B',
            FieldDataType::Float => 'F',
            FieldDataType::Logical => 'L',
            FieldDataType::Long => 'I',
            FieldDataType::Autoincrement => '+',
            FieldDataType::Double => 'O',
            FieldDataType::Timestamp => '@',
        }
    }
}

/// Attributes of a field descriptor that only some dBase levels store.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub enum FieldExtras {
    /// dBase II / FoxBASE
    V2 { data_address: u16 },
    /// dBase III
    V2_5 {
        data_address: u32,
        work_area_id: u8,
        set_fields_flag: u8,
        index_field_flag: u8,
    },
    /// dBase IV
    V3 {
        work_area_id: u8,
        production_mdx_flag: u8,
    },
    /// dBase 7
    V4 {
        production_mdx_flag: u8,
        next_autoincrement_value: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeField {
    pub name: String,
    pub field_type: FieldDataType,
    pub field_length: u8,
    pub decimal_count: u8,
    pub extras: FieldExtras,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldData {
    Int(i64),
    Real(f64),
    Text(String),
    Bool(bool),
    Null,
}

/// One table row, keyed by field name in declared field order.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct DbfRecord {
    pub deleted: bool,
    pub values: IndexMap<String, FieldData>,
}

impl DbfRecord {
    pub fn get(&self, field_name: &str) -> Option<&FieldData> {
        self.values.get(field_name)
    }
}

/// Integer conversion with the leniency of JavaScript's `parseInt`: leading
/// whitespace and an optional sign are accepted, parsing stops at the first
/// non-digit, and text without any leading digits yields `None`.
pub fn parse_int_prefix(val: &str) -> Option<i64> {
    let s = val.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let mut ret: Option<i64> = None;
    for c in digits.chars() {
        match c.to_digit(10) {
            Some(d) => {
                let acc = ret.unwrap_or(0);
                ret = Some(acc.checked_mul(10)?.checked_add(d as i64)?);
            }
            None => break,
        }
    }
    if negative {
        ret.map(|v| -v)
    } else {
        ret
    }
}

/// The dBase logical flag: T/t/Y/y are true, F/f/N/n are false and anything
/// else (commonly `?` or a space) is unknown.
pub fn parse_logical(c: char) -> FieldData {
    match c {
        't' | 'T' | 'y' | 'Y' => FieldData::Bool(true),
        'f' | 'F' | 'n' | 'N' => FieldData::Bool(false),
        _ => FieldData::Null,
    }
}

#[cfg(test)]
mod test {
    use super::{parse_int_prefix, parse_logical, FieldData, FieldDataType};

    #[test]
    fn test_parse_int_prefix() {
        assert_eq!(parse_int_prefix("   42"), Some(42));
        assert_eq!(parse_int_prefix("-17  "), Some(-17));
        assert_eq!(parse_int_prefix("12.75"), Some(12));
        assert_eq!(parse_int_prefix("+3"), Some(3));
        assert_eq!(parse_int_prefix("     "), None);
        assert_eq!(parse_int_prefix("abc"), None);
        assert_eq!(parse_int_prefix("-"), None);
    }

    #[test]
    fn test_parse_logical() {
        for c in ['t', 'T', 'y', 'Y'] {
            assert_eq!(parse_logical(c), FieldData::Bool(true));
        }
        for c in ['f', 'F', 'n', 'N'] {
            assert_eq!(parse_logical(c), FieldData::Bool(false));
        }
        assert_eq!(parse_logical('?'), FieldData::Null);
        assert_eq!(parse_logical(' '), FieldData::Null);
    }

    #[test]
    fn test_field_tags_round_trip() {
        for tag in ['C', 'D', 'M', 'G', 'N', 'B', 'F', 'L', 'I', '+', 'O', '@'] {
            assert_eq!(FieldDataType::from_tag(tag).unwrap().tag(), tag);
        }
        assert!(FieldDataType::from_tag('X').is_err());
    }
}
