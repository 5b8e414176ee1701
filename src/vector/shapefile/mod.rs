/*
This code is part of the SceneLoaders geometry file-format library.
Authors: SceneLoaders developers
Created: 16/10/2026
Last Modified: 16/10/2026
License: MIT

Notes: The Shapefile format mixes byte orders. The file code and file length
and every record header are big-endian, while the rest of the file header
and all record contents are little-endian, so the reader switches
frequently.
*/

pub mod geometry;
pub mod rings;

pub use self::geometry::{
    Measures, PatchType, PolyGeometry, Shape, ShapeType, ShapeTypeDimension, ShpRecord,
};
pub use self::rings::{assemble_rings, to_shapes};

use crate::error::Result;
use crate::structures::{BoundingBox, Point2D};
use crate::utils::{ByteOrderReader, Endianness};
use serde_derive::Serialize;
use std::fs;
use std::path::Path;

pub const FILE_CODE: i32 = 9994;
pub const HEADER_SIZE: usize = 100;

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ShpHeader {
    pub file_code: i32,
    /// In 16-bit words.
    pub file_length: i32,
    pub version: i32,
    pub shape_type: ShapeType,
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
    pub z_min: f64,
    pub z_max: f64,
    pub m_min: f64,
    pub m_max: f64,
}

impl ShpHeader {
    /// Reads the 100-byte file header. `None` means the header fails the
    /// validity checks; the reason is logged.
    fn read(bor: &mut ByteOrderReader) -> Result<Option<ShpHeader>> {
        bor.set_byte_order(Endianness::BigEndian);
        bor.seek(0)?;
        let file_code = bor.read_i32()?;
        bor.seek(24)?;
        let file_length = bor.read_i32()?;

        // the rest of the header is in LittleEndian format
        bor.set_byte_order(Endianness::LittleEndian);
        let version = bor.read_i32()?;
        let st = bor.read_i32()?;

        if file_code != FILE_CODE {
            log::error!("Invalid shapefile file code {} (expected {})", file_code, FILE_CODE);
            return Ok(None);
        }
        if file_length < HEADER_SIZE as i32 {
            log::error!("Invalid shapefile length of {}", file_length);
            return Ok(None);
        }
        let shape_type = match ShapeType::from_int(st) {
            Some(s) => s,
            None => {
                log::error!("Unrecognized shapefile shape type {}", st);
                return Ok(None);
            }
        };
        if version < 1000 {
            log::warn!("Unexpected shapefile version {}", version);
        }

        Ok(Some(ShpHeader {
            file_code,
            file_length,
            version,
            shape_type,
            x_min: bor.read_f64()?,
            y_min: bor.read_f64()?,
            x_max: bor.read_f64()?,
            y_max: bor.read_f64()?,
            z_min: bor.read_f64()?,
            z_max: bor.read_f64()?,
            m_min: bor.read_f64()?,
            m_max: bor.read_f64()?,
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShpFile {
    pub header: ShpHeader,
    pub records: Vec<ShpRecord>,
}

impl ShpFile {
    pub fn num_records(&self) -> usize {
        self.records.len()
    }

    pub fn get_total_num_points(&self) -> usize {
        self.records
            .iter()
            .map(|r| match r {
                ShpRecord::Point { .. } => 1,
                ShpRecord::PolyLine { geometry, .. }
                | ShpRecord::Polygon { geometry, .. }
                | ShpRecord::MultiPoint { geometry, .. }
                | ShpRecord::MultiPatch { geometry, .. } => geometry.points.len(),
            })
            .sum()
    }

    /// Materializes the polygon records as shapes. Records of the other
    /// families have no shape form.
    pub fn shapes(&self) -> Vec<Shape> {
        let mut ret = vec![];
        for record in &self.records {
            if let ShpRecord::Polygon { polygons, .. } = record {
                ret.extend(to_shapes(polygons));
            }
        }
        ret
    }
}

/// Reads one payload, starting at its shape type. `None` for null payloads.
type PayloadReader = fn(&mut ByteOrderReader, i32, usize) -> Result<Option<ShpRecord>>;

fn payload_reader(family: ShapeType) -> PayloadReader {
    match family.base_shape_type() {
        ShapeType::Point => read_point,
        ShapeType::PolyLine => read_polyline,
        ShapeType::Polygon => read_polygon,
        ShapeType::MultiPoint => read_multipoint,
        ShapeType::MultiPatch => read_multipatch,
        _ => read_null,
    }
}

/// Decodes ESRI Shapefile (.shp) geometry.
pub struct ShpDecoder;

impl ShpDecoder {
    /// Decodes the file into the polygon shapes it contains, or `None` when
    /// the file header is invalid.
    pub fn parse(buffer: &[u8]) -> Result<Option<Vec<Shape>>> {
        Ok(ShpDecoder::parse_records(buffer)?.map(|shp| shp.shapes()))
    }

    pub fn parse_records(buffer: &[u8]) -> Result<Option<ShpFile>> {
        let mut bor = ByteOrderReader::new(buffer, Endianness::BigEndian);
        let header = match ShpHeader::read(&mut bor)? {
            Some(h) => h,
            None => return Ok(None),
        };

        let reader = payload_reader(header.shape_type);
        let mut records = vec![];
        bor.seek(HEADER_SIZE)?;
        while !bor.is_end_of_file() {
            bor.set_byte_order(Endianness::BigEndian);
            let record_number = bor.read_i32()?;
            let content_length = bor.read_i32()?.max(0) as usize * 2; // in bytes
            let end_of_record = bor.pos() + content_length;
            bor.set_byte_order(Endianness::LittleEndian);
            while bor.pos() < end_of_record {
                if let Some(record) = reader(&mut bor, record_number, end_of_record)? {
                    records.push(record);
                }
            }
            if bor.pos() != end_of_record {
                log::warn!(
                    "Shapefile record {} ended at byte {} instead of {}",
                    record_number,
                    bor.pos(),
                    end_of_record
                );
                bor.seek(end_of_record.min(bor.len()))?;
            }
        }
        log::debug!("decoded {} {} record(s)", records.len(), header.shape_type);

        Ok(Some(ShpFile { header, records }))
    }

    pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Option<ShpFile>> {
        let buffer = fs::read(path)?;
        ShpDecoder::parse_records(&buffer)
    }
}

/// Reads the payload's shape type, or `None` for a null payload.
fn read_shape_type(bor: &mut ByteOrderReader, family: ShapeType) -> Result<Option<ShapeType>> {
    let st = bor.read_i32()?;
    if st == 0 {
        return Ok(None);
    }
    Ok(Some(match ShapeType::from_int(st) {
        Some(s) if s.base_shape_type() == family => s,
        _ => {
            log::warn!("Unexpected {} payload type {}", family, st);
            family
        }
    }))
}

fn read_bounding_box(bor: &mut ByteOrderReader) -> Result<BoundingBox> {
    let x_min = bor.read_f64()?;
    let y_min = bor.read_f64()?;
    let x_max = bor.read_f64()?;
    let y_max = bor.read_f64()?;
    Ok(BoundingBox::new(x_min, x_max, y_min, y_max))
}

fn read_points(bor: &mut ByteOrderReader, num_points: usize) -> Result<Vec<Point2D>> {
    let mut points = Vec::with_capacity(num_points.min(bor.remaining() / 16));
    for _ in 0..num_points {
        points.push(Point2D {
            x: bor.read_f64()?,
            y: bor.read_f64()?,
        });
    }
    Ok(points)
}

fn read_measures(bor: &mut ByteOrderReader, num_points: usize) -> Result<Measures> {
    let min = bor.read_f64()?;
    let max = bor.read_f64()?;
    let mut values = Vec::with_capacity(num_points.min(bor.remaining() / 8));
    for _ in 0..num_points {
        values.push(bor.read_f64()?);
    }
    Ok(Measures { min, max, values })
}

/// Reads the trailing Z and M sections. M data are optional in both Z and M
/// types; their presence is judged from the bytes left in the record.
fn read_z_and_m(
    bor: &mut ByteOrderReader,
    shape_type: ShapeType,
    num_points: usize,
    end_of_record: usize,
) -> Result<(Option<Measures>, Option<Measures>)> {
    let z = if shape_type.dimension() == ShapeTypeDimension::Z {
        Some(read_measures(bor, num_points)?)
    } else {
        None
    };
    let m_length = 16 + 8 * num_points;
    let m = if shape_type.dimension() != ShapeTypeDimension::XY
        && end_of_record.saturating_sub(bor.pos()) >= m_length
    {
        Some(read_measures(bor, num_points)?)
    } else {
        None
    };
    Ok((z, m))
}

fn read_null(
    bor: &mut ByteOrderReader,
    _record_number: i32,
    end_of_record: usize,
) -> Result<Option<ShpRecord>> {
    bor.read_i32()?;
    if bor.pos() < end_of_record {
        bor.seek(end_of_record.min(bor.len()))?;
    }
    Ok(None)
}

fn read_point(
    bor: &mut ByteOrderReader,
    record_number: i32,
    end_of_record: usize,
) -> Result<Option<ShpRecord>> {
    let shape_type = match read_shape_type(bor, ShapeType::Point)? {
        Some(s) => s,
        None => return Ok(None),
    };
    let point = Point2D {
        x: bor.read_f64()?,
        y: bor.read_f64()?,
    };
    let z = if shape_type == ShapeType::PointZ {
        Some(bor.read_f64()?)
    } else {
        None
    };
    let m = if shape_type != ShapeType::Point && end_of_record.saturating_sub(bor.pos()) >= 8 {
        Some(bor.read_f64()?)
    } else {
        None
    };
    Ok(Some(ShpRecord::Point {
        record_number,
        shape_type,
        point,
        z,
        m,
    }))
}

/// Reads the body shared by PolyLine and Polygon records.
fn read_parts_geometry(
    bor: &mut ByteOrderReader,
    shape_type: ShapeType,
    end_of_record: usize,
) -> Result<PolyGeometry> {
    let bounding_box = read_bounding_box(bor)?;
    let num_parts = bor.read_i32()?.max(0) as usize;
    let num_points = bor.read_i32()?.max(0) as usize;
    let mut parts = Vec::with_capacity(num_parts.min(bor.remaining() / 4));
    for _ in 0..num_parts {
        parts.push(bor.read_i32()?);
    }
    let points = read_points(bor, num_points)?;
    let (z, m) = read_z_and_m(bor, shape_type, num_points, end_of_record)?;
    Ok(PolyGeometry {
        shape_type,
        bounding_box,
        parts,
        points,
        z,
        m,
    })
}

fn read_polyline(
    bor: &mut ByteOrderReader,
    record_number: i32,
    end_of_record: usize,
) -> Result<Option<ShpRecord>> {
    let shape_type = match read_shape_type(bor, ShapeType::PolyLine)? {
        Some(s) => s,
        None => return Ok(None),
    };
    let geometry = read_parts_geometry(bor, shape_type, end_of_record)?;
    Ok(Some(ShpRecord::PolyLine {
        record_number,
        geometry,
    }))
}

fn read_polygon(
    bor: &mut ByteOrderReader,
    record_number: i32,
    end_of_record: usize,
) -> Result<Option<ShpRecord>> {
    let shape_type = match read_shape_type(bor, ShapeType::Polygon)? {
        Some(s) => s,
        None => return Ok(None),
    };
    let geometry = read_parts_geometry(bor, shape_type, end_of_record)?;
    let polygons = assemble_rings(&geometry.parts, &geometry.points);
    Ok(Some(ShpRecord::Polygon {
        record_number,
        geometry,
        polygons,
    }))
}

fn read_multipoint(
    bor: &mut ByteOrderReader,
    record_number: i32,
    end_of_record: usize,
) -> Result<Option<ShpRecord>> {
    let shape_type = match read_shape_type(bor, ShapeType::MultiPoint)? {
        Some(s) => s,
        None => return Ok(None),
    };
    let bounding_box = read_bounding_box(bor)?;
    let num_points = bor.read_i32()?.max(0) as usize;
    let points = read_points(bor, num_points)?;
    let (z, m) = read_z_and_m(bor, shape_type, num_points, end_of_record)?;
    Ok(Some(ShpRecord::MultiPoint {
        record_number,
        geometry: PolyGeometry {
            shape_type,
            bounding_box,
            parts: vec![],
            points,
            z,
            m,
        },
    }))
}

fn read_multipatch(
    bor: &mut ByteOrderReader,
    record_number: i32,
    end_of_record: usize,
) -> Result<Option<ShpRecord>> {
    let shape_type = match read_shape_type(bor, ShapeType::MultiPatch)? {
        Some(s) => s,
        None => return Ok(None),
    };
    let bounding_box = read_bounding_box(bor)?;
    let num_parts = bor.read_i32()?.max(0) as usize;
    let num_points = bor.read_i32()?.max(0) as usize;
    let mut parts = Vec::with_capacity(num_parts.min(bor.remaining() / 4));
    for _ in 0..num_parts {
        parts.push(bor.read_i32()?);
    }
    let mut part_types = Vec::with_capacity(parts.len());
    for _ in 0..num_parts {
        part_types.push(PatchType::from_int(bor.read_i32()?));
    }
    let points = read_points(bor, num_points)?;
    let (z, m) = read_z_and_m(bor, shape_type, num_points, end_of_record)?;
    Ok(Some(ShpRecord::MultiPatch {
        record_number,
        geometry: PolyGeometry {
            shape_type,
            bounding_box,
            parts,
            points,
            z,
            m,
        },
        part_types,
    }))
}
