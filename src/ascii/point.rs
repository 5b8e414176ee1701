/*
This code is part of the SceneLoaders geometry file-format library.
Authors: SceneLoaders developers
Created: 16/10/2026
Last Modified: 16/10/2026
License: MIT
*/

use serde_derive::Serialize;

/// Column layouts of an ASCII point line, inferred from its token count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AscPointFormat {
    Xyz,
    Xyzi,
    XyzRgb,
    XyziRgb,
    XyzRgbNormals,
    XyziRgbNormals,
}

impl AscPointFormat {
    pub fn from_token_count(count: usize) -> Option<AscPointFormat> {
        match count {
            3 => Some(AscPointFormat::Xyz),
            4 => Some(AscPointFormat::Xyzi),
            6 => Some(AscPointFormat::XyzRgb),
            7 => Some(AscPointFormat::XyziRgb),
            9 => Some(AscPointFormat::XyzRgbNormals),
            10 => Some(AscPointFormat::XyziRgbNormals),
            _ => None,
        }
    }

    pub fn has_intensity(&self) -> bool {
        matches!(
            self,
            AscPointFormat::Xyzi | AscPointFormat::XyziRgb | AscPointFormat::XyziRgbNormals
        )
    }

    pub fn has_rgb(&self) -> bool {
        !matches!(self, AscPointFormat::Xyz | AscPointFormat::Xyzi)
    }

    pub fn has_normals(&self) -> bool {
        matches!(
            self,
            AscPointFormat::XyzRgbNormals | AscPointFormat::XyziRgbNormals
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AscPoint {
    pub format: AscPointFormat,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub intensity: Option<f64>,
    pub rgb: Option<[f64; 3]>,
    pub normal: Option<[f64; 3]>,
}

impl AscPoint {
    /// Parses one whitespace-delimited line. Lines with an unsupported
    /// number of columns, or a column that is not a number, are rejected
    /// with a description of the problem.
    pub fn parse(line: &str) -> Result<AscPoint, String> {
        let mut values = Vec::with_capacity(10);
        for token in line.split_whitespace() {
            match token.parse::<f64>() {
                Ok(v) => values.push(v),
                Err(_) => return Err(format!("'{}' is not a number", token)),
            }
        }
        let format = match AscPointFormat::from_token_count(values.len()) {
            Some(f) => f,
            None => return Err(format!("unsupported column count {}", values.len())),
        };

        let mut p = AscPoint {
            format,
            x: values[0],
            y: values[1],
            z: values[2],
            intensity: None,
            rgb: None,
            normal: None,
        };
        let mut i = 3;
        if format.has_intensity() {
            p.intensity = Some(values[i]);
            i += 1;
        }
        if format.has_rgb() {
            p.rgb = Some([values[i], values[i + 1], values[i + 2]]);
            i += 3;
        }
        if format.has_normals() {
            p.normal = Some([values[i], values[i + 1], values[i + 2]]);
        }
        Ok(p)
    }
}

#[cfg(test)]
mod test {
    use super::{AscPoint, AscPointFormat};

    #[test]
    fn test_format_detection() {
        let cases = [
            ("1 2 3", AscPointFormat::Xyz),
            ("1 2 3 40", AscPointFormat::Xyzi),
            ("1 2 3 255 128 0", AscPointFormat::XyzRgb),
            ("1 2 3 40 255 128 0", AscPointFormat::XyziRgb),
            ("1 2 3 255 128 0 0 0 1", AscPointFormat::XyzRgbNormals),
            ("1 2 3 40 255 128 0 0 0 1", AscPointFormat::XyziRgbNormals),
        ];
        for (line, format) in cases.iter() {
            let p = AscPoint::parse(line).unwrap();
            assert_eq!(p.format, *format, "line {:?}", line);
            assert_eq!((p.x, p.y, p.z), (1.0, 2.0, 3.0));
        }
    }

    #[test]
    fn test_columns_are_assigned() {
        let p = AscPoint::parse("\t-1.5  2e2 3 40 255 128 0 0.0 0.6 0.8 ").unwrap();
        assert_eq!(p.x, -1.5);
        assert_eq!(p.y, 200.0);
        assert_eq!(p.intensity, Some(40.0));
        assert_eq!(p.rgb, Some([255.0, 128.0, 0.0]));
        assert_eq!(p.normal, Some([0.0, 0.6, 0.8]));

        let p = AscPoint::parse("1 2 3 255 128 0").unwrap();
        assert_eq!(p.intensity, None);
        assert_eq!(p.rgb, Some([255.0, 128.0, 0.0]));
        assert_eq!(p.normal, None);
    }

    #[test]
    fn test_bad_lines() {
        assert!(AscPoint::parse("1 2 3 4 5").is_err());
        assert!(AscPoint::parse("1 2 3 4 5 6 7 8").is_err());
        assert!(AscPoint::parse("1 2").is_err());
        assert!(AscPoint::parse("1 2 z").is_err());
    }
}
