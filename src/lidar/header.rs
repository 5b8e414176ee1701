/*
This code is part of the SceneLoaders geometry file-format library.
Authors: SceneLoaders developers
Created: 16/10/2026
Last Modified: 16/10/2026
License: MIT
*/
use crate::error::{Error, Result};
use crate::utils::{trim_fixed_width, ByteOrderReader, Endianness};
use chrono::NaiveDate;
use serde_derive::Serialize;
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum GpsTimeType {
    GpsWeekTime,
    SatelliteGpsTime,
}

impl Default for GpsTimeType {
    fn default() -> GpsTimeType {
        GpsTimeType::GpsWeekTime
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum CoordinateReferenceSystem {
    GeoTiff,
    WellKnownText,
}

/// The global encoding bit field. Flags that a file's version does not
/// define stay false.
#[derive(Default, Debug, Copy, Clone, PartialEq, Serialize)]
pub struct GlobalEncodingField {
    pub gps_time_type: GpsTimeType,
    pub waveform_data_internal: bool,
    pub waveform_data_external: bool,
    pub synthetic_return_numbers: bool,
    pub wkt: bool,
}

impl GlobalEncodingField {
    /// Returns the co-ordinate reference system method used within the file.
    pub fn coordinate_reference_system_method(&self) -> CoordinateReferenceSystem {
        if self.wkt {
            CoordinateReferenceSystem::WellKnownText
        } else {
            CoordinateReferenceSystem::GeoTiff
        }
    }

    fn read_gps_bit(bor: &mut ByteOrderReader) -> Result<GpsTimeType> {
        Ok(if bor.read_bit16()? {
            GpsTimeType::SatelliteGpsTime
        } else {
            GpsTimeType::GpsWeekTime
        })
    }

    fn read_1_2(bor: &mut ByteOrderReader) -> Result<GlobalEncodingField> {
        let ret = GlobalEncodingField {
            gps_time_type: GlobalEncodingField::read_gps_bit(bor)?,
            ..Default::default()
        };
        bor.read_bits16(15)?; // reserved
        Ok(ret)
    }

    fn read_1_3(bor: &mut ByteOrderReader) -> Result<GlobalEncodingField> {
        let ret = GlobalEncodingField {
            gps_time_type: GlobalEncodingField::read_gps_bit(bor)?,
            waveform_data_internal: bor.read_bit16()?,
            waveform_data_external: bor.read_bit16()?,
            synthetic_return_numbers: bor.read_bit16()?,
            wkt: false,
        };
        bor.read_bits16(12)?; // reserved
        Ok(ret)
    }

    fn read_1_4(bor: &mut ByteOrderReader) -> Result<GlobalEncodingField> {
        let ret = GlobalEncodingField {
            gps_time_type: GlobalEncodingField::read_gps_bit(bor)?,
            waveform_data_internal: bor.read_bit16()?,
            waveform_data_external: bor.read_bit16()?,
            synthetic_return_numbers: bor.read_bit16()?,
            wkt: bor.read_bit16()?,
        };
        bor.read_bits16(11)?; // reserved
        Ok(ret)
    }
}

impl fmt::Display for GlobalEncodingField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "    GPS time={:?},
    Waveform data internal={},
    Waveform data external={},
    Return data synthetic={},
    CRS method={:?}",
            self.gps_time_type,
            self.waveform_data_internal,
            self.waveform_data_external,
            self.synthetic_return_numbers,
            self.coordinate_reference_system_method()
        )
    }
}

#[derive(Default, Clone, Debug, PartialEq, Serialize)]
pub struct LasHeader {
    pub file_signature: String,
    /// Reserved in LAS 1.0.
    pub file_source_id: u16,
    /// Defined from LAS 1.2 on.
    pub global_encoding: Option<GlobalEncodingField>,
    pub project_id1: u32,
    pub project_id2: u16,
    pub project_id3: u16,
    pub project_id4: [u8; 8],
    pub version_major: u8,
    pub version_minor: u8,
    pub system_id: String,
    pub generating_software: String,
    pub file_creation_day: u16,
    pub file_creation_year: u16,
    pub header_size: u16,
    pub offset_to_points: u32,
    pub number_of_vlrs: u32,
    pub point_format: u8,
    pub point_record_length: u16,
    pub number_of_points_old: u32,
    pub number_of_points_by_return_old: [u32; 5],
    pub x_scale_factor: f64,
    pub y_scale_factor: f64,
    pub z_scale_factor: f64,
    pub x_offset: f64,
    pub y_offset: f64,
    pub z_offset: f64,
    pub max_x: f64,
    pub min_x: f64,
    pub max_y: f64,
    pub min_y: f64,
    pub max_z: f64,
    pub min_z: f64,
    /// LAS 1.3 and later.
    pub waveform_data_start: Option<u64>,
    /// The remaining fields are LAS 1.4 only.
    pub offset_to_ex_vlrs: Option<u64>,
    pub number_of_extended_vlrs: Option<u32>,
    pub number_of_points: Option<u64>,
    pub number_of_points_by_return: Option<[u64; 15]>,
}

type HeaderReader = fn(&mut ByteOrderReader) -> Result<LasHeader>;

const HEADER_READERS: [(&str, HeaderReader); 5] = [
    ("1.0", read_header_1_0),
    ("1.1", read_header_1_1),
    ("1.2", read_header_1_2),
    ("1.3", read_header_1_3),
    ("1.4", read_header_1_4),
];

impl LasHeader {
    /// Reads the public header block. The file signature must already have
    /// been checked; the version bytes are peeked first since they decide the
    /// layout.
    pub fn read(bor: &mut ByteOrderReader) -> Result<LasHeader> {
        bor.set_byte_order(Endianness::LittleEndian);
        bor.seek(24)?;
        let major = bor.read_u8()?;
        let minor = bor.read_u8()?;
        let version = format!("{}.{}", major, minor);
        bor.seek(0)?;
        let reader = match HEADER_READERS.iter().find(|(v, _)| *v == version) {
            Some((_, r)) => *r,
            None => return Err(Error::UnsupportedLasVersion(version)),
        };
        reader(bor)
    }

    pub fn version(&self) -> String {
        format!("{}.{}", self.version_major, self.version_minor)
    }

    /// The point count, from the 64-bit field in LAS 1.4 files.
    pub fn point_count(&self) -> u64 {
        match self.number_of_points {
            Some(n) => n,
            None => self.number_of_points_old as u64,
        }
    }

    pub fn creation_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_yo_opt(
            self.file_creation_year as i32,
            self.file_creation_day as u32,
        )
    }

    pub fn project_id(&self) -> String {
        format!(
            "{{{:08x}-{:04x}-{:04x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}}}",
            self.project_id1,
            self.project_id2,
            self.project_id3,
            self.project_id4[0],
            self.project_id4[1],
            self.project_id4[2],
            self.project_id4[3],
            self.project_id4[4],
            self.project_id4[5],
            self.project_id4[6],
            self.project_id4[7]
        )
    }
}

/// The GUID fields are stored big-endian.
fn read_project_id(bor: &mut ByteOrderReader, header: &mut LasHeader) -> Result<()> {
    bor.set_byte_order(Endianness::BigEndian);
    header.project_id1 = bor.read_u32()?;
    header.project_id2 = bor.read_u16()?;
    header.project_id3 = bor.read_u16()?;
    for i in 0..8 {
        header.project_id4[i] = bor.read_u8()?;
    }
    bor.set_byte_order(Endianness::LittleEndian);
    Ok(())
}

/// Everything from the version bytes to the minimum Z, common to all versions.
fn read_legacy_body(bor: &mut ByteOrderReader, header: &mut LasHeader) -> Result<()> {
    read_project_id(bor, header)?;
    header.version_major = bor.read_u8()?;
    header.version_minor = bor.read_u8()?;
    header.system_id = trim_fixed_width(&bor.read_utf8(32)?);
    header.generating_software = trim_fixed_width(&bor.read_utf8(32)?);
    header.file_creation_day = bor.read_u16()?;
    header.file_creation_year = bor.read_u16()?;
    header.header_size = bor.read_u16()?;
    header.offset_to_points = bor.read_u32()?;
    header.number_of_vlrs = bor.read_u32()?;
    header.point_format = bor.read_u8()?;
    header.point_record_length = bor.read_u16()?;
    header.number_of_points_old = bor.read_u32()?;
    for i in 0..5 {
        header.number_of_points_by_return_old[i] = bor.read_u32()?;
    }
    header.x_scale_factor = bor.read_f64()?;
    header.y_scale_factor = bor.read_f64()?;
    header.z_scale_factor = bor.read_f64()?;
    header.x_offset = bor.read_f64()?;
    header.y_offset = bor.read_f64()?;
    header.z_offset = bor.read_f64()?;
    header.max_x = bor.read_f64()?;
    header.min_x = bor.read_f64()?;
    header.max_y = bor.read_f64()?;
    header.min_y = bor.read_f64()?;
    header.max_z = bor.read_f64()?;
    header.min_z = bor.read_f64()?;
    Ok(())
}

fn read_signature(bor: &mut ByteOrderReader) -> Result<LasHeader> {
    Ok(LasHeader {
        file_signature: bor.read_utf8(4)?,
        ..Default::default()
    })
}

fn read_header_1_0(bor: &mut ByteOrderReader) -> Result<LasHeader> {
    let mut header = read_signature(bor)?;
    bor.read_u32()?; // reserved
    read_legacy_body(bor, &mut header)?;
    Ok(header)
}

fn read_header_1_1(bor: &mut ByteOrderReader) -> Result<LasHeader> {
    let mut header = read_signature(bor)?;
    header.file_source_id = bor.read_u16()?;
    bor.read_u16()?; // reserved
    read_legacy_body(bor, &mut header)?;
    Ok(header)
}

fn read_header_1_2(bor: &mut ByteOrderReader) -> Result<LasHeader> {
    let mut header = read_signature(bor)?;
    header.file_source_id = bor.read_u16()?;
    header.global_encoding = Some(GlobalEncodingField::read_1_2(bor)?);
    read_legacy_body(bor, &mut header)?;
    Ok(header)
}

fn read_header_1_3(bor: &mut ByteOrderReader) -> Result<LasHeader> {
    let mut header = read_signature(bor)?;
    header.file_source_id = bor.read_u16()?;
    header.global_encoding = Some(GlobalEncodingField::read_1_3(bor)?);
    read_legacy_body(bor, &mut header)?;
    header.waveform_data_start = Some(bor.read_u64()?);
    Ok(header)
}

fn read_header_1_4(bor: &mut ByteOrderReader) -> Result<LasHeader> {
    let mut header = read_signature(bor)?;
    header.file_source_id = bor.read_u16()?;
    header.global_encoding = Some(GlobalEncodingField::read_1_4(bor)?);
    read_legacy_body(bor, &mut header)?;
    header.waveform_data_start = Some(bor.read_u64()?);
    header.offset_to_ex_vlrs = Some(bor.read_u64()?);
    header.number_of_extended_vlrs = Some(bor.read_u32()?);
    header.number_of_points = Some(bor.read_u64()?);
    let mut by_return = [0u64; 15];
    for v in by_return.iter_mut() {
        *v = bor.read_u64()?;
    }
    header.number_of_points_by_return = Some(by_return);
    Ok(header)
}

impl fmt::Display for LasHeader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut s = format!("\nFile Signature: {}", self.file_signature);
        s = s + &format!("\nFile Source ID: {}", self.file_source_id);
        if let Some(ge) = &self.global_encoding {
            s = s + &format!("\nGlobal Encoding:\n{}", ge);
        }
        s = s + &format!("\nProject ID (GUID): {}", self.project_id());
        s = s + &format!("\nSystem ID: {}", self.system_id);
        s = s + &format!("\nGenerating Software: {}", self.generating_software);
        s = s + &format!("\nLas Version: {}", self.version());
        s = s + &format!(
            "\nFile Creation Day/Year: {}/{}",
            self.file_creation_day, self.file_creation_year
        );
        s = s + &format!("\nHeader Size: {}", self.header_size);
        s = s + &format!("\nOffset to Points: {}", self.offset_to_points);
        s = s + &format!("\nNumber of VLRs: {}", self.number_of_vlrs);
        s = s + &format!("\nPoint Format: {}", self.point_format);
        s = s + &format!("\nPoint Record Length: {}", self.point_record_length);
        s = s + &format!("\nNum. of Points: {}", self.point_count());
        s = s + &format!("\nX Scale Factor: {}", self.x_scale_factor);
        s = s + &format!("\nY Scale Factor: {}", self.y_scale_factor);
        s = s + &format!("\nZ Scale Factor: {}", self.z_scale_factor);
        s = s + &format!("\nX Offset: {}", self.x_offset);
        s = s + &format!("\nY Offset: {}", self.y_offset);
        s = s + &format!("\nZ Offset: {}", self.z_offset);
        s = s + &format!("\nMax X: {}", self.max_x);
        s = s + &format!("\nMin X: {}", self.min_x);
        s = s + &format!("\nMax Y: {}", self.max_y);
        s = s + &format!("\nMin Y: {}", self.min_y);
        s = s + &format!("\nMax Z: {}", self.max_z);
        s = s + &format!("\nMin Z: {}", self.min_z);
        if let Some(start) = self.waveform_data_start {
            s = s + &format!("\nWaveform Data Start: {}", start);
        }
        if let (Some(start), Some(num)) = (self.offset_to_ex_vlrs, self.number_of_extended_vlrs) {
            s = s + &format!("\nExtended VLR Start: {}", start);
            s = s + &format!("\nNum. Extended VLR: {}", num);
        }
        write!(f, "{}", s)
    }
}
