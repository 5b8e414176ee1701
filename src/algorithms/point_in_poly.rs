/*
This code is part of the SceneLoaders geometry file-format library.
Authors: SceneLoaders developers
Created: 16/10/2026
Last Modified: 16/10/2026
License: MIT
*/

use crate::structures::Point2D;

/// Where a point lies relative to a ring.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum RingPosition {
    Inside,
    Outside,
    Boundary,
}

/// Tests if a point is Left|On|Right of an infinite line,
/// based on http://geomalgorithms.com/a03-_inclusion.html.
///
/// Input:  three points P0, P1, and P2
///
/// Return: >0 for P2 left of the line through P0 and P1
///         =0 for P2  on the line
///         <0 for P2  right of the line
fn is_left(p0: &Point2D, p1: &Point2D, p2: &Point2D) -> f64 {
    (p1.x - p0.x) * (p2.y - p0.y) - (p2.x - p0.x) * (p1.y - p0.y)
}

fn on_segment(a: &Point2D, b: &Point2D, p: &Point2D) -> bool {
    is_left(a, b, p) == 0f64
        && p.x >= a.x.min(b.x)
        && p.x <= a.x.max(b.x)
        && p.y >= a.y.min(b.y)
        && p.y <= a.y.max(b.y)
}

/// Classifies a point against a ring using the winding number. The ring is
/// treated as closed whether or not it repeats its first vertex.
pub fn ring_position(p: &Point2D, ring: &[Point2D]) -> RingPosition {
    let n = ring.len();
    if n == 0 {
        return RingPosition::Outside;
    }
    let mut wn = 0i32;
    // loop through all edges of the ring, including the closing edge
    for i in 0..n {
        let a = &ring[i];
        let b = &ring[(i + 1) % n];
        if on_segment(a, b, p) {
            return RingPosition::Boundary;
        }
        if a.y <= p.y {
            // an upward crossing
            if b.y > p.y && is_left(a, b, p) > 0f64 {
                wn += 1i32;
            }
        } else if b.y <= p.y && is_left(a, b, p) < 0f64 {
            // a downward crossing
            wn -= 1i32;
        }
    }
    if wn != 0 {
        RingPosition::Inside
    } else {
        RingPosition::Outside
    }
}

/// Calculates the Winding number test for a point in a polygon operation.
/// Points on the boundary are deemed outside.
pub fn point_in_poly(p: &Point2D, v: &[Point2D]) -> bool {
    ring_position(p, v) == RingPosition::Inside
}

/// Decides whether `ring` encloses `other` by the first vertex of `other`
/// that is not on the boundary of `ring`. A ring lying entirely on the
/// boundary is not enclosed.
pub fn ring_contains_some(ring: &[Point2D], other: &[Point2D]) -> bool {
    for p in other {
        match ring_position(p, ring) {
            RingPosition::Inside => return true,
            RingPosition::Outside => return false,
            RingPosition::Boundary => {}
        }
    }
    false
}
