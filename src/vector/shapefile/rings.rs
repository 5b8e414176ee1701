/*
This code is part of the SceneLoaders geometry file-format library.
Authors: SceneLoaders developers
Created: 16/10/2026
Last Modified: 16/10/2026
License: MIT
*/
use super::geometry::{part_slice, Shape};
use crate::algorithms::{is_clockwise_order, ring_contains_some};
use crate::structures::Point2D;

/// Groups the rings of a polygon record into polygons.
///
/// Clockwise rings are outer boundaries and each one starts a new group.
/// Counter-clockwise rings are holes and join the first outer ring that
/// encloses them; a hole that no outer ring encloses becomes a group of its
/// own. A hole whose vertices all lie on an outer ring's boundary is not
/// enclosed by it.
pub fn assemble_rings(parts: &[i32], points: &[Point2D]) -> Vec<Vec<Vec<Point2D>>> {
    let mut polygons: Vec<Vec<Vec<Point2D>>> = vec![];
    let mut holes: Vec<Vec<Point2D>> = vec![];
    for i in 0..parts.len() {
        let ring = part_slice(parts, points, i).to_vec();
        if is_clockwise_order(&ring) {
            polygons.push(vec![ring]);
        } else {
            holes.push(ring);
        }
    }

    let num_outer = polygons.len();
    for hole in holes {
        match polygons[..num_outer]
            .iter()
            .position(|p| ring_contains_some(&p[0], &hole))
        {
            Some(idx) => polygons[idx].push(hole),
            None => polygons.push(vec![hole]),
        }
    }
    polygons
}

/// Converts ring groups into shapes, one per group.
pub fn to_shapes(polygons: &[Vec<Vec<Point2D>>]) -> Vec<Shape> {
    polygons
        .iter()
        .filter_map(|group| {
            let (outer, holes) = group.split_first()?;
            Some(Shape {
                outer: outer.clone(),
                holes: holes.to_vec(),
            })
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::{assemble_rings, to_shapes};
    use crate::structures::Point2D;

    fn ring(coords: &[(f64, f64)]) -> Vec<Point2D> {
        coords.iter().map(|(x, y)| Point2D::new(*x, *y)).collect()
    }

    fn flatten(rings: &[Vec<Point2D>]) -> (Vec<i32>, Vec<Point2D>) {
        let mut parts = vec![];
        let mut points = vec![];
        for r in rings {
            parts.push(points.len() as i32);
            points.extend_from_slice(r);
        }
        (parts, points)
    }

    #[test]
    fn test_hole_joins_enclosing_outer_ring() {
        let outer = ring(&[(0.0, 0.0), (0.0, 4.0), (4.0, 4.0), (4.0, 0.0), (0.0, 0.0)]);
        let hole = ring(&[(1.0, 1.0), (2.0, 1.0), (2.0, 2.0), (1.0, 2.0), (1.0, 1.0)]);
        let (parts, points) = flatten(&[outer.clone(), hole.clone()]);
        let polygons = assemble_rings(&parts, &points);
        assert_eq!(polygons, vec![vec![outer.clone(), hole.clone()]]);

        let shapes = to_shapes(&polygons);
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].outer, outer);
        assert_eq!(shapes[0].holes, vec![hole]);
    }

    #[test]
    fn test_orphan_hole_becomes_own_group() {
        let a = ring(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]);
        let b = ring(&[(10.0, 0.0), (10.0, 1.0), (11.0, 1.0), (11.0, 0.0)]);
        let hole = ring(&[(5.0, 5.0), (6.0, 5.0), (6.0, 6.0), (5.0, 6.0)]);
        let (parts, points) = flatten(&[a.clone(), hole.clone(), b.clone()]);
        let polygons = assemble_rings(&parts, &points);
        assert_eq!(polygons, vec![vec![a], vec![b], vec![hole]]);
    }

    #[test]
    fn test_hole_goes_to_first_enclosing_ring() {
        let big = ring(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)]);
        let small = ring(&[(1.0, 1.0), (1.0, 5.0), (5.0, 5.0), (5.0, 1.0)]);
        let hole = ring(&[(2.0, 2.0), (3.0, 2.0), (3.0, 3.0), (2.0, 3.0)]);
        let (parts, points) = flatten(&[big, small, hole]);
        let polygons = assemble_rings(&parts, &points);
        assert_eq!(polygons.len(), 2);
        assert_eq!(polygons[0].len(), 2);
        assert_eq!(polygons[1].len(), 1);
    }

    #[test]
    fn test_hole_starting_on_boundary() {
        let outer = ring(&[(0.0, 0.0), (0.0, 4.0), (4.0, 4.0), (4.0, 0.0)]);
        // first vertex touches the outer ring; the second one decides
        let hole = ring(&[(0.0, 2.0), (2.0, 1.0), (2.0, 3.0)]);
        let (parts, points) = flatten(&[outer, hole]);
        let polygons = assemble_rings(&parts, &points);
        assert_eq!(polygons.len(), 1);
        assert_eq!(polygons[0].len(), 2);
    }
}
