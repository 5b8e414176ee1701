/*
This code is part of the SceneLoaders geometry file-format library.
Authors: SceneLoaders developers
Created: 16/10/2026
Last Modified: 16/10/2026
License: MIT
*/

use super::las::LasFile;
use super::point_data::{format_has_rgb, PointData};
use crate::point_cloud::{PointBatch, PointCloudGroup, Progress};
use crate::point_cloud::{MAX_POINTS_PER_BATCH, PROGRESS_INTERVAL};
use nalgebra::Vector3;

/// Display colours of the standard classification codes.
const CLASS_COLORS: [(u8, [f32; 3]); 11] = [
    (0, [0.75, 0.75, 0.75]), // created, never classified
    (1, [0.6, 0.6, 0.6]),    // unclassified
    (2, [0.63, 0.45, 0.26]), // ground
    (3, [0.55, 0.78, 0.35]), // low vegetation
    (4, [0.3, 0.65, 0.2]),   // medium vegetation
    (5, [0.1, 0.45, 0.1]),   // high vegetation
    (6, [0.85, 0.3, 0.25]),  // building
    (7, [1.0, 0.0, 1.0]),    // low point (noise)
    (8, [1.0, 1.0, 0.0]),    // model key-point
    (9, [0.2, 0.4, 0.9]),    // water
    (12, [0.9, 0.6, 0.1]),   // overlap points
];

pub fn class_color(class: u8) -> Option<[f32; 3]> {
    CLASS_COLORS
        .iter()
        .find(|(c, _)| *c == class)
        .map(|(_, color)| *color)
}

/// Converts decoded points into coloured batches of at most one million
/// points, placed in a group positioned at the header offsets.
pub fn convert<F: FnMut(Progress)>(las: &LasFile, on_progress: F) -> PointCloudGroup {
    convert_with(las, MAX_POINTS_PER_BATCH, PROGRESS_INTERVAL, on_progress)
}

pub fn convert_with<F: FnMut(Progress)>(
    las: &LasFile,
    max_points_per_batch: usize,
    progress_interval: usize,
    mut on_progress: F,
) -> PointCloudGroup {
    let header = &las.header;
    let has_rgb = format_has_rgb(header.point_format);
    let max_intensity = las
        .point_data
        .iter()
        .map(|p| p.intensity)
        .max()
        .unwrap_or(0);

    let max_points_per_batch = max_points_per_batch.max(1);
    let interval = progress_interval.max(1);
    let total = las.point_data.len() as u64;
    let mut batches = vec![];
    for (chunk_num, chunk) in las.point_data.chunks(max_points_per_batch).enumerate() {
        let mut batch = PointBatch::with_capacity(chunk.len());
        for (i, p) in chunk.iter().enumerate() {
            let position = [
                (p.x as f64 * header.x_scale_factor) as f32,
                (p.y as f64 * header.y_scale_factor) as f32,
                (p.z as f64 * header.z_scale_factor) as f32,
            ];
            batch.push(position, point_color(p, has_rgb, max_intensity));

            let n = chunk_num * max_points_per_batch + i + 1;
            if n % interval == 0 {
                on_progress(Progress {
                    loaded: n as u64,
                    total,
                });
            }
        }
        batches.push(batch);
    }

    PointCloudGroup {
        position: Vector3::new(header.x_offset, header.y_offset, header.z_offset),
        batches,
    }
}

fn point_color(p: &PointData, has_rgb: bool, max_intensity: u16) -> [f32; 3] {
    if has_rgb {
        if let Some(rgb) = p.rgb {
            return [
                rgb.red as f32 / 65535f32,
                rgb.green as f32 / 65535f32,
                rgb.blue as f32 / 65535f32,
            ];
        }
    }
    if let Some(color) = class_color(p.class()) {
        return color;
    }
    let v = if max_intensity > 0 {
        p.intensity as f32 / max_intensity as f32
    } else {
        0f32
    };
    [v, v, v]
}
