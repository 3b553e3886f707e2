//! Ear-clipping triangulation of planar shapes with holes
//!
//! Holes are merged into the outer contour through bridge edges (cut from the
//! hole's rightmost vertex to a visible contour vertex), turning the shape
//! into a single weakly simple polygon that is then clipped ear by ear.

use cgmath::Vector2;

const EPSILON: f32 = 1e-9;

/// Twice the signed area, positive for counter-clockwise rings (y up)
fn double_area(points: &[Vector2<f32>]) -> f32 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let p = points[i];
            let q = points[(i + 1) % n];
            p.x * q.y - q.x * p.y
        })
        .sum()
}

/// Signed area of a closed ring, positive for counter-clockwise winding
pub fn signed_area(points: &[Vector2<f32>]) -> f32 {
    double_area(points) * 0.5
}

/// True when the ring winds clockwise in a y-up coordinate system
pub fn is_clockwise(points: &[Vector2<f32>]) -> bool {
    signed_area(points) < 0.0
}

/// Even-odd point in polygon test
pub fn point_in_polygon(point: Vector2<f32>, polygon: &[Vector2<f32>]) -> bool {
    let n = polygon.len();
    let mut inside = false;
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[j];
        if (a.y > point.y) != (b.y > point.y) {
            let x = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
            if point.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

fn cross(o: Vector2<f32>, a: Vector2<f32>, b: Vector2<f32>) -> f32 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

fn in_triangle(p: Vector2<f32>, a: Vector2<f32>, b: Vector2<f32>, c: Vector2<f32>) -> bool {
    cross(a, b, p) >= -EPSILON && cross(b, c, p) >= -EPSILON && cross(c, a, p) >= -EPSILON
}

/// Triangulates `contour` with `holes` cut out of it
///
/// Returned indices address the concatenation of `contour` followed by every
/// hole in order. Triangles are counter-clockwise regardless of the input
/// winding.
pub fn triangulate_shape(contour: &[Vector2<f32>], holes: &[Vec<Vector2<f32>>]) -> Vec<[usize; 3]> {
    if contour.len() < 3 {
        return Vec::new();
    }

    let mut points: Vec<Vector2<f32>> = contour.to_vec();
    let mut outer: Vec<usize> = (0..contour.len()).collect();
    if is_clockwise(contour) {
        outer.reverse();
    }

    let mut rings = Vec::with_capacity(holes.len());
    for hole in holes.iter().filter(|h| h.len() >= 3) {
        let start = points.len();
        points.extend_from_slice(hole);
        let mut ring: Vec<usize> = (start..points.len()).collect();
        if !is_clockwise(hole) {
            ring.reverse();
        }
        rings.push(ring);
    }

    // Rightmost holes first so later bridges never cross earlier ones
    let max_x = |ring: &Vec<usize>| {
        ring.iter()
            .map(|&i| points[i].x)
            .fold(f32::NEG_INFINITY, f32::max)
    };
    rings.sort_by(|a, b| max_x(b).total_cmp(&max_x(a)));

    for ring in &rings {
        outer = bridge_hole(&points, outer, ring);
    }

    clip_ears(&points, outer)
}

/// Splices `hole` into `outer` through a bridge from the hole's rightmost vertex
fn bridge_hole(points: &[Vector2<f32>], outer: Vec<usize>, hole: &[usize]) -> Vec<usize> {
    let Some((hole_start, &m)) = hole
        .iter()
        .enumerate()
        .max_by(|a, b| points[*a.1].x.total_cmp(&points[*b.1].x))
    else {
        return outer;
    };
    let mp = points[m];

    // Closest contour edge hit by a ray from M towards +x
    let n = outer.len();
    let mut best: Option<(usize, f32)> = None;
    for i in 0..n {
        let a = points[outer[i]];
        let b = points[outer[(i + 1) % n]];
        if (a.y > mp.y) == (b.y > mp.y) && a.y != mp.y && b.y != mp.y {
            continue;
        }
        if (a.y - b.y).abs() < EPSILON {
            continue;
        }
        let t = (mp.y - a.y) / (b.y - a.y);
        if !(0.0..=1.0).contains(&t) {
            continue;
        }
        let x = a.x + t * (b.x - a.x);
        if x >= mp.x && best.map_or(true, |(_, bx)| x < bx) {
            best = Some((i, x));
        }
    }

    let visible = match best {
        None => {
            // Hole outside the contour; bridge to the nearest vertex instead
            (0..n)
                .min_by(|&a, &b| {
                    let da = (points[outer[a]] - mp).x.powi(2) + (points[outer[a]] - mp).y.powi(2);
                    let db = (points[outer[b]] - mp).x.powi(2) + (points[outer[b]] - mp).y.powi(2);
                    da.total_cmp(&db)
                })
                .unwrap_or(0)
        }
        Some((edge, x)) => {
            let i = Vector2::new(x, mp.y);
            let a_pos = edge;
            let b_pos = (edge + 1) % n;
            if points[outer[a_pos]] == i {
                return splice(&outer, a_pos, hole, hole_start, m);
            }
            if points[outer[b_pos]] == i {
                return splice(&outer, b_pos, hole, hole_start, m);
            }
            let p_pos = if points[outer[a_pos]].x > points[outer[b_pos]].x {
                a_pos
            } else {
                b_pos
            };
            let p = points[outer[p_pos]];

            // Reflex contour vertices inside (M, I, P) would block the bridge
            let mut candidate = p_pos;
            let mut best_angle = f32::INFINITY;
            let mut best_dist = f32::INFINITY;
            for k in 0..n {
                if k == p_pos {
                    continue;
                }
                let r = points[outer[k]];
                let prev = points[outer[(k + n - 1) % n]];
                let next = points[outer[(k + 1) % n]];
                let reflex = cross(prev, r, next) <= 0.0;
                let (t0, t1, t2) = if cross(mp, i, p) >= 0.0 {
                    (mp, i, p)
                } else {
                    (mp, p, i)
                };
                if reflex && in_triangle(r, t0, t1, t2) {
                    let d = r - mp;
                    let angle = d.y.abs().atan2(d.x);
                    let dist = d.x * d.x + d.y * d.y;
                    if angle < best_angle || (angle == best_angle && dist < best_dist) {
                        candidate = k;
                        best_angle = angle;
                        best_dist = dist;
                    }
                }
            }
            candidate
        }
    };

    splice(&outer, visible, hole, hole_start, m)
}

/// `outer[..=visible]`, the hole starting at `hole_start`, then back across the bridge
fn splice(outer: &[usize], visible: usize, hole: &[usize], hole_start: usize, m: usize) -> Vec<usize> {
    let mut merged = Vec::with_capacity(outer.len() + hole.len() + 2);
    merged.extend_from_slice(&outer[..=visible]);
    for k in 0..hole.len() {
        merged.push(hole[(hole_start + k) % hole.len()]);
    }
    merged.push(m);
    merged.push(outer[visible]);
    merged.extend_from_slice(&outer[visible + 1..]);
    merged
}

fn clip_ears(points: &[Vector2<f32>], mut polygon: Vec<usize>) -> Vec<[usize; 3]> {
    let mut triangles = Vec::with_capacity(polygon.len().saturating_sub(2));

    while polygon.len() > 3 {
        let n = polygon.len();
        let ear = (0..n).find(|&i| is_ear(points, &polygon, i));

        match ear {
            Some(i) => {
                triangles.push([polygon[(i + n - 1) % n], polygon[i], polygon[(i + 1) % n]]);
                polygon.remove(i);
            }
            None => {
                // Degenerate input: drop a zero-area vertex if there is one,
                // otherwise force progress on the first corner.
                let flat = (0..n).find(|&i| {
                    let prev = points[polygon[(i + n - 1) % n]];
                    let next = points[polygon[(i + 1) % n]];
                    cross(prev, points[polygon[i]], next).abs() <= EPSILON
                });
                match flat {
                    Some(i) => {
                        polygon.remove(i);
                    }
                    None => {
                        triangles.push([polygon[n - 1], polygon[0], polygon[1]]);
                        polygon.remove(0);
                    }
                }
            }
        }
    }

    if polygon.len() == 3 {
        let (a, b, c) = (polygon[0], polygon[1], polygon[2]);
        if cross(points[a], points[b], points[c]).abs() > EPSILON {
            triangles.push([a, b, c]);
        }
    }

    triangles
}

fn is_ear(points: &[Vector2<f32>], polygon: &[usize], i: usize) -> bool {
    let n = polygon.len();
    let ia = polygon[(i + n - 1) % n];
    let ib = polygon[i];
    let ic = polygon[(i + 1) % n];
    let (a, b, c) = (points[ia], points[ib], points[ic]);

    if cross(a, b, c) <= EPSILON {
        return false;
    }

    polygon.iter().all(|&k| {
        if k == ia || k == ib || k == ic {
            return true;
        }
        let p = points[k];
        if p == a || p == b || p == c {
            return true;
        }
        !in_triangle(p, a, b, c)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, y: f32) -> Vector2<f32> {
        Vector2::new(x, y)
    }

    fn area_of(points: &[Vector2<f32>], triangles: &[[usize; 3]]) -> f32 {
        triangles
            .iter()
            .map(|t| cross(points[t[0]], points[t[1]], points[t[2]]) * 0.5)
            .sum()
    }

    #[test]
    fn test_winding_helpers() {
        let ccw = [v(0.0, 0.0), v(1.0, 0.0), v(1.0, 1.0), v(0.0, 1.0)];
        assert!((signed_area(&ccw) - 1.0).abs() < 1e-6);
        assert!(!is_clockwise(&ccw));

        let cw: Vec<_> = ccw.iter().rev().copied().collect();
        assert!(is_clockwise(&cw));
        assert!(point_in_polygon(v(0.5, 0.5), &cw));
        assert!(!point_in_polygon(v(1.5, 0.5), &cw));
    }

    #[test]
    fn test_square_becomes_two_ccw_triangles() {
        let square = [v(0.0, 0.0), v(0.0, 1.0), v(1.0, 1.0), v(1.0, 0.0)];
        let triangles = triangulate_shape(&square, &[]);

        assert_eq!(triangles.len(), 2);
        for t in &triangles {
            assert!(cross(square[t[0]], square[t[1]], square[t[2]]) > 0.0);
        }
        assert!((area_of(&square, &triangles) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_concave_polygon() {
        // L shape, clockwise
        let l = [
            v(0.0, 0.0),
            v(0.0, 2.0),
            v(1.0, 2.0),
            v(1.0, 1.0),
            v(2.0, 1.0),
            v(2.0, 0.0),
        ];
        let triangles = triangulate_shape(&l, &[]);
        assert_eq!(triangles.len(), 4);
        assert!((area_of(&l, &triangles) - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_square_with_hole() {
        let outer = [v(0.0, 0.0), v(0.0, 4.0), v(4.0, 4.0), v(4.0, 0.0)];
        let hole = vec![v(1.0, 1.0), v(3.0, 1.0), v(3.0, 3.0), v(1.0, 3.0)];
        let triangles = triangulate_shape(&outer, &[hole.clone()]);

        let mut all = outer.to_vec();
        all.extend_from_slice(&hole);

        assert_eq!(triangles.len(), 8);
        assert!((area_of(&all, &triangles) - 12.0).abs() < 1e-4);
        for t in &triangles {
            assert!(t.iter().all(|&i| i < all.len()));
        }
    }

    #[test]
    fn test_two_holes() {
        let outer = [v(0.0, 0.0), v(10.0, 0.0), v(10.0, 4.0), v(0.0, 4.0)];
        let left = vec![v(1.0, 1.0), v(1.0, 3.0), v(3.0, 3.0), v(3.0, 1.0)];
        let right = vec![v(6.0, 1.0), v(6.0, 3.0), v(9.0, 3.0), v(9.0, 1.0)];
        let triangles = triangulate_shape(&outer, &[left.clone(), right.clone()]);

        let mut all = outer.to_vec();
        all.extend_from_slice(&left);
        all.extend_from_slice(&right);

        assert!((area_of(&all, &triangles) - (40.0 - 4.0 - 6.0)).abs() < 1e-3);
    }

    #[test]
    fn test_degenerate_input() {
        assert!(triangulate_shape(&[v(0.0, 0.0), v(1.0, 1.0)], &[]).is_empty());

        let line = [v(0.0, 0.0), v(1.0, 0.0), v(2.0, 0.0), v(3.0, 0.0)];
        let triangles = triangulate_shape(&line, &[]);
        assert!(area_of(&line, &triangles).abs() < 1e-6);
    }
}
