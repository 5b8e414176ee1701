/*
This code is part of the SceneLoaders geometry file-format library.
Authors: SceneLoaders developers
Created: 16/10/2026
Last Modified: 16/10/2026
License: MIT
*/
use crate::structures::{BoundingBox, Point2D};
use serde_derive::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ShapeType {
    Null = 0,
    Point = 1,
    PolyLine = 3,
    Polygon = 5,
    MultiPoint = 8,
    PointZ = 11,
    PolyLineZ = 13,
    PolygonZ = 15,
    MultiPointZ = 18,
    PointM = 21,
    PolyLineM = 23,
    PolygonM = 25,
    MultiPointM = 28,
    MultiPatch = 31,
}

impl ShapeType {
    pub fn from_int(value: i32) -> Option<ShapeType> {
        Some(match value {
            0 => ShapeType::Null,
            1 => ShapeType::Point,
            3 => ShapeType::PolyLine,
            5 => ShapeType::Polygon,
            8 => ShapeType::MultiPoint,
            11 => ShapeType::PointZ,
            13 => ShapeType::PolyLineZ,
            15 => ShapeType::PolygonZ,
            18 => ShapeType::MultiPointZ,
            21 => ShapeType::PointM,
            23 => ShapeType::PolyLineM,
            25 => ShapeType::PolygonM,
            28 => ShapeType::MultiPointM,
            31 => ShapeType::MultiPatch,
            _ => return None,
        })
    }

    pub fn to_int(&self) -> i32 {
        *self as i32
    }

    /// The shape family, i.e. the type with its Z or M qualifier removed.
    pub fn base_shape_type(&self) -> ShapeType {
        match self {
            ShapeType::Null => ShapeType::Null,
            ShapeType::Point | ShapeType::PointZ | ShapeType::PointM => ShapeType::Point,
            ShapeType::PolyLine | ShapeType::PolyLineZ | ShapeType::PolyLineM => {
                ShapeType::PolyLine
            }
            ShapeType::Polygon | ShapeType::PolygonZ | ShapeType::PolygonM => ShapeType::Polygon,
            ShapeType::MultiPoint | ShapeType::MultiPointZ | ShapeType::MultiPointM => {
                ShapeType::MultiPoint
            }
            ShapeType::MultiPatch => ShapeType::MultiPatch,
        }
    }

    pub fn dimension(&self) -> ShapeTypeDimension {
        match self {
            ShapeType::Null
            | ShapeType::MultiPoint
            | ShapeType::Point
            | ShapeType::Polygon
            | ShapeType::PolyLine => ShapeTypeDimension::XY,
            ShapeType::MultiPointM
            | ShapeType::PointM
            | ShapeType::PolygonM
            | ShapeType::PolyLineM => ShapeTypeDimension::Measure,
            ShapeType::MultiPointZ
            | ShapeType::PointZ
            | ShapeType::PolygonZ
            | ShapeType::PolyLineZ
            | ShapeType::MultiPatch => ShapeTypeDimension::Z,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ShapeTypeDimension {
    XY,
    Measure,
    Z,
}

impl Default for ShapeType {
    fn default() -> ShapeType {
        ShapeType::Null
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let printable = match *self {
            ShapeType::Null => "Null",
            ShapeType::Point => "Point",
            ShapeType::PolyLine => "PolyLine",
            ShapeType::Polygon => "Polygon",
            ShapeType::MultiPoint => "MultiPoint",
            ShapeType::PointZ => "PointZ",
            ShapeType::PolyLineZ => "PolyLineZ",
            ShapeType::PolygonZ => "PolygonZ",
            ShapeType::MultiPointZ => "MultiPointZ",
            ShapeType::PointM => "PointM",
            ShapeType::PolyLineM => "PolyLineM",
            ShapeType::PolygonM => "PolygonM",
            ShapeType::MultiPointM => "MultiPointM",
            ShapeType::MultiPatch => "MultiPatch",
        };
        write!(f, "{}", printable)
    }
}

/// The surface kind of one MultiPatch part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PatchType {
    TriangleStrip,
    TriangleFan,
    OuterRing,
    InnerRing,
    FirstRing,
    Ring,
    Unknown(i32),
}

impl PatchType {
    pub fn from_int(value: i32) -> PatchType {
        match value {
            0 => PatchType::TriangleStrip,
            1 => PatchType::TriangleFan,
            2 => PatchType::OuterRing,
            3 => PatchType::InnerRing,
            4 => PatchType::FirstRing,
            5 => PatchType::Ring,
            v => PatchType::Unknown(v),
        }
    }
}

/// A value range followed by one value per point, as used for the Z and M
/// sections of a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Measures {
    pub min: f64,
    pub max: f64,
    pub values: Vec<f64>,
}

/// The part/point body shared by PolyLine, Polygon, MultiPoint and
/// MultiPatch records. MultiPoint records have no parts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PolyGeometry {
    pub shape_type: ShapeType,
    pub bounding_box: BoundingBox,
    pub parts: Vec<i32>,
    pub points: Vec<Point2D>,
    pub z: Option<Measures>,
    pub m: Option<Measures>,
}

impl PolyGeometry {
    /// The points of part `index`, clamped to the point array.
    pub fn part(&self, index: usize) -> &[Point2D] {
        part_slice(&self.parts, &self.points, index)
    }
}

pub(crate) fn part_slice<'a>(parts: &[i32], points: &'a [Point2D], index: usize) -> &'a [Point2D] {
    let n = points.len();
    let start = parts
        .get(index)
        .map(|s| (*s).max(0) as usize)
        .unwrap_or(n)
        .min(n);
    let end = parts
        .get(index + 1)
        .map(|e| (*e).max(0) as usize)
        .unwrap_or(n)
        .clamp(start, n);
    &points[start..end]
}

/// A decoded shape record. Null payloads never produce a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum ShpRecord {
    Point {
        record_number: i32,
        shape_type: ShapeType,
        point: Point2D,
        z: Option<f64>,
        m: Option<f64>,
    },
    PolyLine {
        record_number: i32,
        geometry: PolyGeometry,
    },
    /// `polygons[i][0]` is an outer ring and `polygons[i][1..]` its holes.
    Polygon {
        record_number: i32,
        geometry: PolyGeometry,
        polygons: Vec<Vec<Vec<Point2D>>>,
    },
    MultiPoint {
        record_number: i32,
        geometry: PolyGeometry,
    },
    MultiPatch {
        record_number: i32,
        geometry: PolyGeometry,
        part_types: Vec<PatchType>,
    },
}

impl ShpRecord {
    pub fn record_number(&self) -> i32 {
        match self {
            ShpRecord::Point { record_number, .. }
            | ShpRecord::PolyLine { record_number, .. }
            | ShpRecord::Polygon { record_number, .. }
            | ShpRecord::MultiPoint { record_number, .. }
            | ShpRecord::MultiPatch { record_number, .. } => *record_number,
        }
    }

    pub fn shape_type(&self) -> ShapeType {
        match self {
            ShpRecord::Point { shape_type, .. } => *shape_type,
            ShpRecord::PolyLine { geometry, .. }
            | ShpRecord::Polygon { geometry, .. }
            | ShpRecord::MultiPoint { geometry, .. }
            | ShpRecord::MultiPatch { geometry, .. } => geometry.shape_type,
        }
    }
}

/// A renderable planar shape: one outer boundary and any number of holes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shape {
    pub outer: Vec<Point2D>,
    pub holes: Vec<Vec<Point2D>>,
}

#[cfg(test)]
mod test {
    use super::{part_slice, PatchType, ShapeType, ShapeTypeDimension};
    use crate::structures::Point2D;

    #[test]
    fn test_shape_type_codes() {
        for code in [0, 1, 3, 5, 8, 11, 13, 15, 18, 21, 23, 25, 28, 31] {
            assert_eq!(ShapeType::from_int(code).unwrap().to_int(), code);
        }
        assert_eq!(ShapeType::from_int(2), None);
        assert_eq!(ShapeType::PolygonM.base_shape_type(), ShapeType::Polygon);
        assert_eq!(ShapeType::MultiPatch.dimension(), ShapeTypeDimension::Z);
        assert_eq!(PatchType::from_int(9), PatchType::Unknown(9));
    }

    #[test]
    fn test_part_slices_are_clamped() {
        let points: Vec<Point2D> = (0..5).map(|i| Point2D::new(i as f64, 0.0)).collect();
        assert_eq!(part_slice(&[0, 2], &points, 0).len(), 2);
        assert_eq!(part_slice(&[0, 2], &points, 1).len(), 3);
        assert_eq!(part_slice(&[0, 9], &points, 1).len(), 0);
        assert_eq!(part_slice(&[3, 1], &points, 0).len(), 0);
    }
}
