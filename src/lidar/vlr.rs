/*
This code is part of the SceneLoaders geometry file-format library.
Authors: SceneLoaders developers
Created: 16/10/2026
Last Modified: 16/10/2026
License: MIT

Notes: Variable length records are dispatched on their (user id, record id)
pair. The LASF_Spec header lookup (1), histogram (2), superseded (7) and
waveform data packet (65535) records are recognized but their content is
not decoded.
*/
use crate::error::Result;
use crate::utils::{trim_fixed_width, ByteOrderReader, Endianness};
use serde_derive::Serialize;
use std::fmt;

#[derive(Default, Clone, Debug, PartialEq, Serialize)]
pub struct Vlr {
    pub reserved: u16,
    pub user_id: String,
    pub record_id: u16,
    pub record_length_after_header: u16,
    pub description: String,
    pub content: Option<VlrContent>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum VlrContent {
    /// OGC math transform WKT (2111).
    MathTransformWkt(String),
    /// OGC coordinate system WKT (2112).
    CoordinateSystemWkt(String),
    GeoKeyDirectory(GeoKeyDirectory),
    GeoDoubleParams(Vec<f64>),
    GeoAsciiParams(String),
    ClassificationLookup(Vec<ClassificationLookupEntry>),
    TextAreaDescription(String),
    ExtraBytes(Vec<ExtraBytesDescriptor>),
    WaveformPacketDescriptor(WaveformPacketDescriptor),
    Bytes(Vec<u8>),
}

#[derive(Default, Clone, Debug, PartialEq, Serialize)]
pub struct GeoKeyDirectory {
    pub key_directory_version: u16,
    pub key_revision: u16,
    pub minor_revision: u16,
    pub keys: Vec<GeoKeyEntry>,
}

impl GeoKeyDirectory {
    /// The value of a key stored directly in the directory.
    pub fn short_value(&self, key_id: u16) -> Option<u16> {
        self.keys
            .iter()
            .find(|k| k.key_id == key_id && k.tiff_tag_location == 0)
            .map(|k| k.value_offset)
    }
}

#[derive(Default, Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GeoKeyEntry {
    pub key_id: u16,
    pub tiff_tag_location: u16,
    pub count: u16,
    pub value_offset: u16,
}

#[derive(Default, Clone, Debug, PartialEq, Serialize)]
pub struct ClassificationLookupEntry {
    pub class_number: u8,
    pub description: String,
}

#[derive(Default, Clone, Debug, PartialEq, Serialize)]
pub struct ExtraBytesDescriptor {
    pub data_type: u8,
    pub options: u8,
    pub name: String,
    pub scale: [f64; 3],
    pub offset: [f64; 3],
    pub description: String,
}

#[derive(Default, Clone, Copy, Debug, PartialEq, Serialize)]
pub struct WaveformPacketDescriptor {
    pub bits_per_sample: u8,
    pub compression_type: u8,
    pub number_of_samples: u32,
    pub temporal_sample_spacing: u32,
    pub digitizer_gain: f64,
    pub digitizer_offset: f64,
}

type ContentParser = fn(&mut ByteOrderReader) -> Result<Option<VlrContent>>;

fn content_parser(user_id: &str, record_id: u16) -> ContentParser {
    match (user_id, record_id) {
        ("LASF_Projection", 2111) => read_math_transform_wkt,
        ("LASF_Projection", 2112) => read_coordinate_system_wkt,
        ("LASF_Projection", 34735) => read_geokey_directory,
        ("LASF_Projection", 34736) => read_geo_double_params,
        ("LASF_Projection", 34737) => read_geo_ascii_params,
        ("LASF_Spec", 0) => read_classification_lookup,
        ("LASF_Spec", 3) => read_text_area_description,
        ("LASF_Spec", 4) => read_extra_bytes,
        ("LASF_Spec", 100..=354) => read_waveform_packet_descriptor,
        ("LASF_Spec", 1) | ("LASF_Spec", 2) | ("LASF_Spec", 7) | ("LASF_Spec", 65535) => {
            read_undecoded
        }
        _ => read_bytes,
    }
}

impl Vlr {
    /// Reads one VLR and leaves the reader at the start of the next one.
    pub fn read(bor: &mut ByteOrderReader) -> Result<Vlr> {
        bor.set_byte_order(Endianness::LittleEndian);
        let reserved = bor.read_u16()?;
        let user_id = trim_fixed_width(&bor.read_utf8(16)?);
        let record_id = bor.read_u16()?;
        let record_length_after_header = bor.read_u16()?;
        let description = trim_fixed_width(&bor.read_utf8(32)?);
        let data = bor.read_bytes(record_length_after_header as usize)?;

        let mut sub = ByteOrderReader::new(data, Endianness::LittleEndian);
        let content = match content_parser(&user_id, record_id)(&mut sub) {
            Ok(c) => c,
            Err(e) => {
                log::warn!(
                    "Could not decode VLR {} {} ({}); keeping its raw bytes",
                    user_id,
                    record_id,
                    e
                );
                Some(VlrContent::Bytes(data.to_vec()))
            }
        };

        Ok(Vlr {
            reserved,
            user_id,
            record_id,
            record_length_after_header,
            description,
            content,
        })
    }
}

impl fmt::Display for Vlr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut s = format!("\tReserved: {}", self.reserved);
        s = s + &format!("\n\tUser ID: {}", self.user_id);
        s = s + &format!("\n\tRecord ID: {}", self.record_id);
        s = s + &format!("\n\tRecord After Length: {}", self.record_length_after_header);
        s = s + &format!("\n\tDescription: {}", self.description);
        let content = match &self.content {
            Some(VlrContent::GeoKeyDirectory(dir)) => format!("{} GeoKeys", dir.keys.len()),
            Some(VlrContent::GeoDoubleParams(v)) => format!("{:?}", v),
            Some(VlrContent::GeoAsciiParams(text))
            | Some(VlrContent::MathTransformWkt(text))
            | Some(VlrContent::CoordinateSystemWkt(text))
            | Some(VlrContent::TextAreaDescription(text)) => text.clone(),
            Some(VlrContent::ClassificationLookup(v)) => format!("{} classes", v.len()),
            Some(VlrContent::ExtraBytes(v)) => format!("{} extra bytes", v.len()),
            Some(VlrContent::WaveformPacketDescriptor(w)) => format!("{:?}", w),
            Some(VlrContent::Bytes(b)) => format!("{} bytes", b.len()),
            None => "uninterpreted data".to_string(),
        };
        s = s + &format!("\n\tVLR Data: [{}]", content);
        write!(f, "{}", s)
    }
}

fn read_string(bor: &mut ByteOrderReader) -> Result<String> {
    Ok(trim_fixed_width(&bor.read_utf8(bor.remaining())?))
}

fn read_math_transform_wkt(bor: &mut ByteOrderReader) -> Result<Option<VlrContent>> {
    Ok(Some(VlrContent::MathTransformWkt(read_string(bor)?)))
}

fn read_coordinate_system_wkt(bor: &mut ByteOrderReader) -> Result<Option<VlrContent>> {
    Ok(Some(VlrContent::CoordinateSystemWkt(read_string(bor)?)))
}

fn read_geo_ascii_params(bor: &mut ByteOrderReader) -> Result<Option<VlrContent>> {
    Ok(Some(VlrContent::GeoAsciiParams(read_string(bor)?)))
}

fn read_text_area_description(bor: &mut ByteOrderReader) -> Result<Option<VlrContent>> {
    Ok(Some(VlrContent::TextAreaDescription(read_string(bor)?)))
}

fn read_geokey_directory(bor: &mut ByteOrderReader) -> Result<Option<VlrContent>> {
    let mut dir = GeoKeyDirectory {
        key_directory_version: bor.read_u16()?,
        key_revision: bor.read_u16()?,
        minor_revision: bor.read_u16()?,
        keys: vec![],
    };
    let number_of_keys = bor.read_u16()?;
    for _ in 0..number_of_keys {
        dir.keys.push(GeoKeyEntry {
            key_id: bor.read_u16()?,
            tiff_tag_location: bor.read_u16()?,
            count: bor.read_u16()?,
            value_offset: bor.read_u16()?,
        });
    }
    Ok(Some(VlrContent::GeoKeyDirectory(dir)))
}

fn read_geo_double_params(bor: &mut ByteOrderReader) -> Result<Option<VlrContent>> {
    let mut params = Vec::with_capacity(bor.remaining() / 8);
    while bor.remaining() >= 8 {
        params.push(bor.read_f64()?);
    }
    Ok(Some(VlrContent::GeoDoubleParams(params)))
}

fn read_classification_lookup(bor: &mut ByteOrderReader) -> Result<Option<VlrContent>> {
    let mut entries = Vec::with_capacity(256);
    for _ in 0..256 {
        entries.push(ClassificationLookupEntry {
            class_number: bor.read_u8()?,
            description: trim_fixed_width(&bor.read_utf8(15)?),
        });
    }
    Ok(Some(VlrContent::ClassificationLookup(entries)))
}

fn read_extra_bytes(bor: &mut ByteOrderReader) -> Result<Option<VlrContent>> {
    let mut descriptors = vec![];
    while bor.remaining() >= 192 {
        bor.inc_pos(2)?;
        let data_type = bor.read_u8()?;
        let options = bor.read_u8()?;
        let name = trim_fixed_width(&bor.read_utf8(32)?);
        // unused bytes, then the no-data, min and max triples
        bor.inc_pos(4 + 72)?;
        let mut scale = [0f64; 3];
        for v in scale.iter_mut() {
            *v = bor.read_f64()?;
        }
        let mut offset = [0f64; 3];
        for v in offset.iter_mut() {
            *v = bor.read_f64()?;
        }
        let description = trim_fixed_width(&bor.read_utf8(32)?);
        descriptors.push(ExtraBytesDescriptor {
            data_type,
            options,
            name,
            scale,
            offset,
            description,
        });
    }
    Ok(Some(VlrContent::ExtraBytes(descriptors)))
}

fn read_waveform_packet_descriptor(bor: &mut ByteOrderReader) -> Result<Option<VlrContent>> {
    Ok(Some(VlrContent::WaveformPacketDescriptor(
        WaveformPacketDescriptor {
            bits_per_sample: bor.read_u8()?,
            compression_type: bor.read_u8()?,
            number_of_samples: bor.read_u32()?,
            temporal_sample_spacing: bor.read_u32()?,
            digitizer_gain: bor.read_f64()?,
            digitizer_offset: bor.read_f64()?,
        },
    )))
}

fn read_undecoded(_bor: &mut ByteOrderReader) -> Result<Option<VlrContent>> {
    Ok(None)
}

fn read_bytes(bor: &mut ByteOrderReader) -> Result<Option<VlrContent>> {
    Ok(Some(VlrContent::Bytes(bor.read_bytes(bor.remaining())?.to_vec())))
}

#[cfg(test)]
mod test {
    use super::{Vlr, VlrContent};
    use crate::utils::{ByteOrderReader, Endianness};
    use byteorder::{LittleEndian, WriteBytesExt};

    fn vlr_bytes(user_id: &str, record_id: u16, data: &[u8]) -> Vec<u8> {
        let mut buf = vec![];
        buf.write_u16::<LittleEndian>(0).unwrap();
        let mut uid = user_id.as_bytes().to_vec();
        uid.resize(16, 0);
        buf.extend(uid);
        buf.write_u16::<LittleEndian>(record_id).unwrap();
        buf.write_u16::<LittleEndian>(data.len() as u16).unwrap();
        buf.extend(vec![0u8; 32]);
        buf.extend_from_slice(data);
        buf
    }

    #[test]
    fn test_geokey_directory() {
        let mut data = vec![];
        for v in [1u16, 1, 0, 2, 1024, 0, 1, 1, 3072, 0, 1, 32617] {
            data.write_u16::<LittleEndian>(v).unwrap();
        }
        let mut buffer = vlr_bytes("LASF_Projection", 34735, &data);
        buffer.push(0xEE);
        let mut bor = ByteOrderReader::new(&buffer, Endianness::LittleEndian);
        let vlr = Vlr::read(&mut bor).unwrap();
        assert_eq!(bor.peek_u8().unwrap(), 0xEE);
        match vlr.content {
            Some(VlrContent::GeoKeyDirectory(dir)) => {
                assert_eq!(dir.keys.len(), 2);
                assert_eq!(dir.short_value(3072), Some(32617));
                assert_eq!(dir.short_value(2048), None);
            }
            other => panic!("unexpected content {:?}", other),
        }
    }

    #[test]
    fn test_spec_records() {
        let buffer = vlr_bytes("LASF_Spec", 2, &[1, 2, 3, 4]);
        let vlr = Vlr::read(&mut ByteOrderReader::new(&buffer, Endianness::LittleEndian)).unwrap();
        assert_eq!(vlr.content, None);

        let buffer = vlr_bytes("LASF_Spec", 3, b"survey notes\0\0");
        let vlr = Vlr::read(&mut ByteOrderReader::new(&buffer, Endianness::LittleEndian)).unwrap();
        assert_eq!(
            vlr.content,
            Some(VlrContent::TextAreaDescription("survey notes".to_string()))
        );

        // a short classification table is kept as raw bytes
        let buffer = vlr_bytes("LASF_Spec", 0, &[2; 20]);
        let vlr = Vlr::read(&mut ByteOrderReader::new(&buffer, Endianness::LittleEndian)).unwrap();
        assert_eq!(vlr.content, Some(VlrContent::Bytes(vec![2; 20])));
    }

    #[test]
    fn test_unknown_user_records_are_bytes() {
        let buffer = vlr_bytes("Vendor", 42, &[9, 8, 7]);
        let vlr = Vlr::read(&mut ByteOrderReader::new(&buffer, Endianness::LittleEndian)).unwrap();
        assert_eq!(vlr.user_id, "Vendor");
        assert_eq!(vlr.content, Some(VlrContent::Bytes(vec![9, 8, 7])));
    }
}
