/*
This code is part of the SceneLoaders geometry file-format library.
Authors: SceneLoaders developers
Created: 16/10/2026
Last Modified: 16/10/2026
License: MIT
*/
use crate::error::Result;
use crate::utils::ByteOrderReader;
use serde_derive::Serialize;
use std::fmt;

/// The byte length of each point data record format's layout.
pub const POINT_RECORD_LENGTHS: [u16; 11] = [20, 28, 26, 34, 57, 63, 30, 36, 38, 59, 67];

/// Reads one point record of a given format.
pub type PointReader = fn(&mut ByteOrderReader) -> Result<PointData>;

/// The point reader of each point data record format.
pub const POINT_READERS: [PointReader; 11] = [
    read_format0,
    read_format1,
    read_format2,
    read_format3,
    read_format4,
    read_format5,
    read_format6,
    read_format7,
    read_format8,
    read_format9,
    read_format10,
];

/// Formats that store red, green and blue values.
pub fn format_has_rgb(point_format: u8) -> bool {
    matches!(point_format, 2 | 3 | 5 | 7 | 8 | 10)
}

/// The 5-bit class code and flags of the classification byte.
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Classification {
    pub class: u8,
    pub synthetic: bool,
    pub keypoint: bool,
    pub withheld: bool,
}

impl Classification {
    pub fn read(bor: &mut ByteOrderReader) -> Result<Classification> {
        Ok(Classification {
            class: bor.read_bits8(5)?,
            synthetic: bor.read_bit8()?,
            keypoint: bor.read_bit8()?,
            withheld: bor.read_bit8()?,
        })
    }

    /// Returns a string represenation of the classification type.
    pub fn name(&self) -> &'static str {
        convert_class_val_to_class_string(self.class)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "class={}, synthetic={}, keypoint={}, withheld={}",
            self.name(),
            self.synthetic,
            self.keypoint,
            self.withheld
        )
    }
}

/// Returns a string represenation of a classification numeric value.
pub fn convert_class_val_to_class_string(value: u8) -> &'static str {
    match value {
        0 => "Created, never classified",
        1 => "Unclassified",
        2 => "Ground",
        3 => "Low vegetation",
        4 => "Medium vegetation",
        5 => "High vegetation",
        6 => "Building",
        7 => "Low point (noise)",
        8 => "Model key-point",
        9 => "Water",
        10 => "Rail",
        11 => "Road surface",
        12 => "Overlap points",
        13 => "Wire - guard (shield)",
        14 => "Wire - conductor (phase)",
        15 => "Transmission tower",
        16 => "Wire-structure connector (e.g. insulator)",
        17 => "Bridge deck",
        18 => "High noise",
        19..=63 => "Reserved",
        _ => "User defined",
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RgbData {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WaveformPacket {
    pub packet_descriptor_index: u8,
    pub offset_to_waveform_data: u64,
    pub waveform_packet_size: u32,
    pub ret_point_waveform_loc: f32,
    pub xt: f32,
    pub yt: f32,
    pub zt: f32,
}

impl WaveformPacket {
    fn read(bor: &mut ByteOrderReader) -> Result<WaveformPacket> {
        Ok(WaveformPacket {
            packet_descriptor_index: bor.read_u8()?,
            offset_to_waveform_data: bor.read_u64()?,
            waveform_packet_size: bor.read_u32()?,
            ret_point_waveform_loc: bor.read_f32()?,
            xt: bor.read_f32()?,
            yt: bor.read_f32()?,
            zt: bor.read_f32()?,
        })
    }
}

/// A point data record. X, Y and Z are the raw integers of the file, to be
/// multiplied by the header's scale factors.
///
/// `classification_flags` and `scanner_channel` only exist in formats 6-10
/// and are zero for the legacy formats.
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointData {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub intensity: u16,
    pub return_number: u8,
    pub number_of_returns: u8,
    pub classification_flags: u8,
    pub scanner_channel: u8,
    pub scan_direction_flag: bool,
    pub edge_of_flightline: bool,
    pub classification: Classification,
    pub scan_angle: i16,
    pub user_data: u8,
    pub point_source_id: u16,
    pub gps_time: Option<f64>,
    pub rgb: Option<RgbData>,
    pub nir: Option<u16>,
    pub waveform: Option<WaveformPacket>,
}

impl PointData {
    pub fn class(&self) -> u8 {
        self.classification.class
    }
}

/// Fields common to formats 0-5.
fn read_legacy_core(bor: &mut ByteOrderReader) -> Result<PointData> {
    let mut p = PointData {
        x: bor.read_i32()?,
        y: bor.read_i32()?,
        z: bor.read_i32()?,
        intensity: bor.read_u16()?,
        ..Default::default()
    };
    p.return_number = bor.read_bits8(3)?;
    p.number_of_returns = bor.read_bits8(3)?;
    p.scan_direction_flag = bor.read_bit8()?;
    p.edge_of_flightline = bor.read_bit8()?;
    p.classification = Classification::read(bor)?;
    p.scan_angle = bor.read_i8()? as i16;
    p.user_data = bor.read_u8()?;
    p.point_source_id = bor.read_u16()?;
    Ok(p)
}

/// Fields common to formats 6-10, GPS time included.
fn read_extended_core(bor: &mut ByteOrderReader) -> Result<PointData> {
    let mut p = PointData {
        x: bor.read_i32()?,
        y: bor.read_i32()?,
        z: bor.read_i32()?,
        intensity: bor.read_u16()?,
        ..Default::default()
    };
    p.return_number = bor.read_bits16(4)? as u8;
    p.number_of_returns = bor.read_bits16(4)? as u8;
    p.classification_flags = bor.read_bits16(4)? as u8;
    p.scanner_channel = bor.read_bits16(2)? as u8;
    p.scan_direction_flag = bor.read_bit16()?;
    p.edge_of_flightline = bor.read_bit16()?;
    p.classification = Classification::read(bor)?;
    p.user_data = bor.read_u8()?;
    p.scan_angle = bor.read_i16()?;
    p.point_source_id = bor.read_u16()?;
    p.gps_time = Some(bor.read_f64()?);
    Ok(p)
}

fn read_rgb(bor: &mut ByteOrderReader) -> Result<RgbData> {
    Ok(RgbData {
        red: bor.read_u16()?,
        green: bor.read_u16()?,
        blue: bor.read_u16()?,
    })
}

fn read_format0(bor: &mut ByteOrderReader) -> Result<PointData> {
    read_legacy_core(bor)
}

fn read_format1(bor: &mut ByteOrderReader) -> Result<PointData> {
    let mut p = read_legacy_core(bor)?;
    p.gps_time = Some(bor.read_f64()?);
    Ok(p)
}

fn read_format2(bor: &mut ByteOrderReader) -> Result<PointData> {
    let mut p = read_legacy_core(bor)?;
    p.rgb = Some(read_rgb(bor)?);
    Ok(p)
}

fn read_format3(bor: &mut ByteOrderReader) -> Result<PointData> {
    let mut p = read_format1(bor)?;
    p.rgb = Some(read_rgb(bor)?);
    Ok(p)
}

fn read_format4(bor: &mut ByteOrderReader) -> Result<PointData> {
    let mut p = read_format1(bor)?;
    p.waveform = Some(WaveformPacket::read(bor)?);
    Ok(p)
}

fn read_format5(bor: &mut ByteOrderReader) -> Result<PointData> {
    let mut p = read_format3(bor)?;
    p.waveform = Some(WaveformPacket::read(bor)?);
    Ok(p)
}

fn read_format6(bor: &mut ByteOrderReader) -> Result<PointData> {
    read_extended_core(bor)
}

fn read_format7(bor: &mut ByteOrderReader) -> Result<PointData> {
    let mut p = read_extended_core(bor)?;
    p.rgb = Some(read_rgb(bor)?);
    Ok(p)
}

fn read_format8(bor: &mut ByteOrderReader) -> Result<PointData> {
    let mut p = read_format7(bor)?;
    p.nir = Some(bor.read_u16()?);
    Ok(p)
}

fn read_format9(bor: &mut ByteOrderReader) -> Result<PointData> {
    let mut p = read_extended_core(bor)?;
    p.waveform = Some(WaveformPacket::read(bor)?);
    Ok(p)
}

fn read_format10(bor: &mut ByteOrderReader) -> Result<PointData> {
    let mut p = read_format8(bor)?;
    p.waveform = Some(WaveformPacket::read(bor)?);
    Ok(p)
}

#[cfg(test)]
mod test {
    use super::{Classification, POINT_READERS, POINT_RECORD_LENGTHS};
    use crate::utils::{ByteOrderReader, Endianness};

    #[test]
    fn test_readers_consume_their_record_length() {
        let buffer = vec![0u8; 128];
        for (format, reader) in POINT_READERS.iter().enumerate() {
            let mut bor = ByteOrderReader::new(&buffer, Endianness::LittleEndian);
            reader(&mut bor).unwrap();
            assert_eq!(
                bor.pos(),
                POINT_RECORD_LENGTHS[format] as usize,
                "format {}",
                format
            );
        }
    }

    #[test]
    fn test_classification_byte() {
        // class 6, synthetic and withheld
        let buffer = [0b1010_0110u8];
        let mut bor = ByteOrderReader::new(&buffer, Endianness::LittleEndian);
        let c = Classification::read(&mut bor).unwrap();
        assert_eq!(c.class, 6);
        assert!(c.synthetic);
        assert!(!c.keypoint);
        assert!(c.withheld);
        assert_eq!(c.name(), "Building");
        assert_eq!(bor.pos(), 1);
    }
}
