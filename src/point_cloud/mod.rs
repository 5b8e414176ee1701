/*
This code is part of the SceneLoaders geometry file-format library.
Authors: SceneLoaders developers
Created: 16/10/2026
Last Modified: 16/10/2026
License: MIT

Notes: Value types handed to the scene layer by the point-cloud loaders.
*/
use nalgebra::Vector3;
use serde_derive::Serialize;

/// The largest number of points placed in one batch.
pub const MAX_POINTS_PER_BATCH: usize = 1_000_000;

/// How many points are processed between two progress notifications.
pub const PROGRESS_INTERVAL: usize = 100_000;

/// Interleaved x/y/z positions and r/g/b colors, ready for upload as
/// 32-bit float buffers. Colors are in the 0-1 range.
#[derive(Default, Debug, Clone, PartialEq, Serialize)]
pub struct PointBatch {
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
}

impl PointBatch {
    pub fn with_capacity(num_points: usize) -> PointBatch {
        PointBatch {
            positions: Vec::with_capacity(num_points * 3),
            colors: Vec::with_capacity(num_points * 3),
        }
    }

    pub fn push(&mut self, position: [f32; 3], color: [f32; 3]) {
        self.positions.extend_from_slice(&position);
        self.colors.extend_from_slice(&color);
    }

    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn position(&self, index: usize) -> Option<[f32; 3]> {
        let p = self.positions.get(index * 3..index * 3 + 3)?;
        Some([p[0], p[1], p[2]])
    }

    pub fn color(&self, index: usize) -> Option<[f32; 3]> {
        let c = self.colors.get(index * 3..index * 3 + 3)?;
        Some([c[0], c[1], c[2]])
    }
}

/// A container node placed at `position`; the batch positions are relative
/// to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointCloudGroup {
    pub position: Vector3<f64>,
    pub batches: Vec<PointBatch>,
}

impl PointCloudGroup {
    pub fn num_points(&self) -> usize {
        self.batches.iter().map(|b| b.len()).sum()
    }

    /// The world position of a point of a batch.
    pub fn world_position(&self, batch: usize, index: usize) -> Option<Vector3<f64>> {
        let p = self.batches.get(batch)?.position(index)?;
        Some(self.position + Vector3::new(p[0] as f64, p[1] as f64, p[2] as f64))
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub loaded: u64,
    pub total: u64,
}

impl Progress {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100f64;
        }
        100f64 * self.loaded as f64 / self.total as f64
    }
}

#[cfg(test)]
mod test {
    use super::{PointBatch, PointCloudGroup, Progress};
    use nalgebra::Vector3;

    #[test]
    fn test_batch_layout() {
        let mut batch = PointBatch::with_capacity(2);
        batch.push([1.0, 2.0, 3.0], [0.1, 0.2, 0.3]);
        batch.push([4.0, 5.0, 6.0], [0.4, 0.5, 0.6]);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.position(1), Some([4.0, 5.0, 6.0]));
        assert_eq!(batch.color(0), Some([0.1, 0.2, 0.3]));
        assert_eq!(batch.position(2), None);

        let group = PointCloudGroup {
            position: Vector3::new(100.0, 0.0, -1.0),
            batches: vec![batch],
        };
        assert_eq!(group.num_points(), 2);
        assert_eq!(
            group.world_position(0, 0),
            Some(Vector3::new(101.0, 2.0, 2.0))
        );
    }

    #[test]
    fn test_progress_percent() {
        let p = Progress {
            loaded: 25,
            total: 200,
        };
        assert_eq!(p.percent(), 12.5);
        assert_eq!(Progress::default().percent(), 100.0);
    }
}
