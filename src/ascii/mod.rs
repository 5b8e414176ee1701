/*
This code is part of the SceneLoaders geometry file-format library.
Authors: SceneLoaders developers
Created: 16/10/2026
Last Modified: 16/10/2026
License: MIT

Notes: ASCII point files can be far larger than memory, so they are read in
fixed-size chunks, one at a time and in file order. A line cut by the end of
a chunk is re-read at the start of the next one.
*/

// private sub-module defined in other files
mod point;

// exports identifiers from private sub-modules in the current module namespace
pub use self::point::AscPoint;
pub use self::point::AscPointFormat;

use crate::configs::{LoaderConfigs, DEFAULT_ASC_CHUNK_SIZE};
use crate::error::{Error, Result};
use crate::point_cloud::{PointBatch, Progress, MAX_POINTS_PER_BATCH};
use nalgebra::Vector3;
use serde_derive::Serialize;
use std::io::SeekFrom;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeek, AsyncSeekExt};

/// Colour of points that carry no RGB columns.
pub const DEFAULT_COLOR: [f32; 3] = [0.2, 0.2, 0.6];

#[derive(Debug, Clone, PartialEq)]
pub struct AscLoader {
    pub chunk_size: usize,
    /// Percentage of lines kept, 100 keeps every line.
    pub sampling: f64,
    pub auto_center: bool,
    pub max_points_per_batch: usize,
    /// Subtracted from every position. When unset and `auto_center` is on,
    /// the centre of the first batch's bounding box is used.
    pub offset: Option<Vector3<f64>>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize)]
pub struct AscSummary {
    pub bytes_read: u64,
    pub num_lines: u64,
    pub num_points: u64,
    pub num_dropped_lines: u64,
    pub num_batches: usize,
    pub offset: Option<Vector3<f64>>,
}

impl Default for AscLoader {
    fn default() -> AscLoader {
        AscLoader::new()
    }
}

/// Points waiting to be emitted as one batch.
#[derive(Default)]
struct PendingPoints {
    positions: Vec<Vector3<f64>>,
    colors: Vec<[f32; 3]>,
}

impl AscLoader {
    pub fn new() -> AscLoader {
        AscLoader {
            chunk_size: DEFAULT_ASC_CHUNK_SIZE,
            sampling: 100f64,
            auto_center: true,
            max_points_per_batch: MAX_POINTS_PER_BATCH,
            offset: None,
        }
    }

    pub fn from_configs(configs: &LoaderConfigs) -> AscLoader {
        AscLoader {
            chunk_size: configs.asc_chunk_size,
            sampling: configs.asc_sampling,
            auto_center: configs.asc_auto_center,
            max_points_per_batch: configs.max_points_per_batch,
            offset: None,
        }
    }

    /// Keep every n-th line.
    pub fn sampling_step(&self) -> u64 {
        if self.sampling <= 0f64 || !self.sampling.is_finite() {
            return 1;
        }
        ((100f64 / self.sampling).round() as u64).max(1)
    }

    pub async fn load_path<P, L, F>(&self, path: P, on_load: L, on_progress: F) -> Result<AscSummary>
    where
        P: AsRef<Path>,
        L: FnMut(PointBatch),
        F: FnMut(Progress),
    {
        let file = File::open(path).await?;
        self.load(file, on_load, on_progress).await
    }

    /// Streams `source` chunk by chunk, handing every completed batch to
    /// `on_load` and reporting the bytes consumed after each chunk.
    pub async fn load<R, L, F>(&self, mut source: R, mut on_load: L, mut on_progress: F) -> Result<AscSummary>
    where
        R: AsyncRead + AsyncSeek + Unpin,
        L: FnMut(PointBatch),
        F: FnMut(Progress),
    {
        let total = source.seek(SeekFrom::End(0)).await?;
        let chunk_size = self.chunk_size.max(1);
        let step = self.sampling_step();
        let max_points = self.max_points_per_batch.max(1);

        let mut summary = AscSummary {
            offset: self.offset,
            ..Default::default()
        };
        let mut pending = PendingPoints::default();
        let mut buf = vec![0u8; (chunk_size as u64).min(total) as usize];
        let mut pos = 0u64;
        while pos < total {
            let wanted = (chunk_size as u64).min(total - pos) as usize;
            source.seek(SeekFrom::Start(pos)).await?;
            source.read_exact(&mut buf[..wanted]).await?;
            let chunk = &buf[..wanted];
            let at_eof = pos + wanted as u64 >= total;

            // everything after the last newline is re-read with the next chunk
            let consumed = if at_eof {
                wanted
            } else {
                match chunk.iter().rposition(|&b| b == b'\n') {
                    Some(i) => i + 1,
                    None => {
                        return Err(Error::AscLineTooLong {
                            offset: pos,
                            chunk_size,
                        })
                    }
                }
            };

            let text = String::from_utf8_lossy(&chunk[..consumed]);
            for line in text.lines() {
                if line.trim().is_empty() {
                    continue;
                }
                summary.num_lines += 1;
                if (summary.num_lines - 1) % step != 0 {
                    continue;
                }
                match AscPoint::parse(line) {
                    Ok(p) => {
                        pending.push(&p);
                        summary.num_points += 1;
                    }
                    Err(msg) => {
                        log::error!("Skipping ASCII line {}: {}", summary.num_lines, msg);
                        summary.num_dropped_lines += 1;
                    }
                }
                if pending.positions.len() > max_points {
                    self.emit(&mut pending, &mut summary, &mut on_load);
                }
            }

            pos += consumed as u64;
            summary.bytes_read = pos;
            on_progress(Progress { loaded: pos, total });
        }

        if !pending.positions.is_empty() {
            self.emit(&mut pending, &mut summary, &mut on_load);
        }
        log::info!(
            "loaded {} point(s) in {} batch(es) from {} line(s)",
            summary.num_points,
            summary.num_batches,
            summary.num_lines
        );
        Ok(summary)
    }

    fn emit<L: FnMut(PointBatch)>(
        &self,
        pending: &mut PendingPoints,
        summary: &mut AscSummary,
        on_load: &mut L,
    ) {
        if summary.offset.is_none() && self.auto_center {
            summary.offset = pending.bounding_box_center();
        }
        let offset = summary.offset.unwrap_or_else(Vector3::zeros);

        let mut batch = PointBatch::with_capacity(pending.positions.len());
        for (p, color) in pending.positions.iter().zip(pending.colors.iter()) {
            let v = p - offset;
            batch.push([v.x as f32, v.y as f32, v.z as f32], *color);
        }
        pending.positions.clear();
        pending.colors.clear();
        summary.num_batches += 1;
        on_load(batch);
    }
}

impl PendingPoints {
    fn push(&mut self, p: &AscPoint) {
        self.positions.push(Vector3::new(p.x, p.y, p.z));
        let color = match p.rgb {
            Some(rgb) => [
                (rgb[0] / 255f64) as f32,
                (rgb[1] / 255f64) as f32,
                (rgb[2] / 255f64) as f32,
            ],
            None => DEFAULT_COLOR,
        };
        self.colors.push(color);
    }

    fn bounding_box_center(&self) -> Option<Vector3<f64>> {
        let first = self.positions.first()?;
        let (min, max) = self
            .positions
            .iter()
            .fold((*first, *first), |(min, max), p| (min.inf(p), max.sup(p)));
        Some((min + max) / 2f64)
    }
}

#[cfg(test)]
mod test {
    use super::{AscLoader, AscSummary, DEFAULT_COLOR};
    use crate::error::Error;
    use crate::point_cloud::PointBatch;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;
    use std::io::Cursor;

    const SAMPLE: &str = "0 0 0\n\
                          10 0 0 5\n\
                          0 10 0 255 0 51\n\
                          1 2 3 4 5\n\
                          10 10 10 7 255 255 255\n\
                          \n\
                          5 5 5 0 0 255 0 0 1\r\n\
                          2 4 6 1 0 0 255 0 1 0";

    async fn load(loader: &AscLoader, text: &str) -> (AscSummary, Vec<PointBatch>) {
        let mut batches = vec![];
        let summary = loader
            .load(Cursor::new(text.as_bytes().to_vec()), |b| batches.push(b), |_| {})
            .await
            .unwrap();
        (summary, batches)
    }

    fn uncentered() -> AscLoader {
        AscLoader {
            auto_center: false,
            ..AscLoader::new()
        }
    }

    #[tokio::test]
    async fn test_lines_are_parsed_and_bad_lines_dropped() {
        let (summary, batches) = load(&uncentered(), SAMPLE).await;
        assert_eq!(summary.num_lines, 7);
        assert_eq!(summary.num_points, 6);
        assert_eq!(summary.num_dropped_lines, 1);
        assert_eq!(summary.num_batches, 1);
        assert_eq!(summary.offset, None);
        let batch = &batches[0];
        assert_eq!(batch.len(), 6);
        assert_eq!(batch.position(3), Some([10.0, 10.0, 10.0]));
        assert_eq!(batch.color(0), Some(DEFAULT_COLOR));
        assert_eq!(batch.color(1), Some(DEFAULT_COLOR));
        let c = batch.color(2).unwrap();
        assert_relative_eq!(c[0], 1.0);
        assert_relative_eq!(c[2], 0.2);
        assert_eq!(batch.color(4), Some([0.0, 0.0, 1.0]));
        assert_eq!(batch.position(5), Some([2.0, 4.0, 6.0]));
    }

    #[tokio::test]
    async fn test_chunking_does_not_change_the_points() {
        let (_, whole) = load(&uncentered(), SAMPLE).await;
        for chunk_size in [24usize, 31, 40, 97] {
            let loader = AscLoader {
                chunk_size,
                ..uncentered()
            };
            let (summary, batches) = load(&loader, SAMPLE).await;
            assert_eq!(batches, whole, "chunk size {}", chunk_size);
            assert_eq!(summary.bytes_read, SAMPLE.len() as u64);
        }
    }

    #[tokio::test]
    async fn test_line_longer_than_chunk() {
        let loader = AscLoader {
            chunk_size: 4,
            ..uncentered()
        };
        let result = loader
            .load(Cursor::new(SAMPLE.as_bytes().to_vec()), |_| {}, |_| {})
            .await;
        assert!(matches!(
            result,
            Err(Error::AscLineTooLong {
                offset: 0,
                chunk_size: 4
            })
        ));
    }

    #[tokio::test]
    async fn test_auto_center_and_batching() {
        let text = "0 0 0\n2 2 2\n4 4 4\n6 6 6\n100 100 100\n";
        let loader = AscLoader {
            max_points_per_batch: 2,
            ..AscLoader::new()
        };
        let (summary, batches) = load(&loader, text).await;
        let sizes: Vec<usize> = batches.iter().map(|b| b.len()).collect();
        assert_eq!(sizes, vec![3, 2]);
        // centred on the first batch only
        assert_eq!(summary.offset, Some(Vector3::new(2.0, 2.0, 2.0)));
        assert_eq!(batches[0].position(0), Some([-2.0, -2.0, -2.0]));
        assert_eq!(batches[1].position(1), Some([98.0, 98.0, 98.0]));

        let fixed = AscLoader {
            offset: Some(Vector3::new(1.0, 0.0, 0.0)),
            ..AscLoader::new()
        };
        let (summary, batches) = load(&fixed, text).await;
        assert_eq!(summary.offset, Some(Vector3::new(1.0, 0.0, 0.0)));
        assert_eq!(batches[0].position(4), Some([99.0, 100.0, 100.0]));
    }

    #[tokio::test]
    async fn test_sampling_and_progress() {
        let text: String = (0..10).map(|i| format!("{} 0 0\n", i)).collect();
        let loader = AscLoader {
            sampling: 25.0,
            chunk_size: 16,
            ..uncentered()
        };
        assert_eq!(loader.sampling_step(), 4);
        let mut batches = vec![];
        let mut progress = vec![];
        let summary = loader
            .load(
                Cursor::new(text.clone().into_bytes()),
                |b| batches.push(b),
                |p| progress.push(p),
            )
            .await
            .unwrap();
        assert_eq!(summary.num_lines, 10);
        assert_eq!(summary.num_points, 3);
        let xs: Vec<f32> = (0..3).map(|i| batches[0].position(i).unwrap()[0]).collect();
        assert_eq!(xs, vec![0.0, 4.0, 8.0]);
        let last = progress.last().unwrap();
        assert_eq!(last.loaded, text.len() as u64);
        assert_eq!(last.percent(), 100.0);
        assert!(progress.windows(2).all(|w| w[0].loaded < w[1].loaded));
    }

    #[tokio::test]
    async fn test_empty_source() {
        let (summary, batches) = load(&AscLoader::new(), "").await;
        assert!(batches.is_empty());
        assert_eq!(summary, AscSummary::default());
    }
}
