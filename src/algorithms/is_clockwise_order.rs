/*
This code is part of the SceneLoaders geometry file-format library.
Authors: SceneLoaders developers
Created: 16/10/2026
Last Modified: 16/10/2026
License: MIT
*/
use crate::structures::Point2D;

/// Checks whether a ring of Point2Ds is in clockwise order (y axis up).
///
/// The ring may or may not repeat its first point at the end. Rings with
/// fewer than three vertices are reported as counter-clockwise, while a
/// zero-area ring of three or more vertices counts as clockwise.
pub fn is_clockwise_order(points: &[Point2D]) -> bool {
    if points.is_empty() {
        return false;
    }
    let end_point = if points.len() > 1 && points[0] == points[points.len() - 1] {
        // The last point is the same as the first...it's not a legitemate point.
        points.len() - 1
    } else {
        points.len()
    };
    if end_point < 3 {
        return false;
    }

    // Shoelace sum; a non-positive area indicates clockwise order.
    let mut area = 0f64;
    for j in 0..end_point {
        let n1 = j;
        let n2 = if j < end_point - 1 { j + 1 } else { 0 };
        area += (points[n1].x * points[n2].y) - (points[n2].x * points[n1].y);
    }
    area <= 0f64
}
