//! # Extruded Text
//!
//! Turns typeface outlines into a closed 3D mesh: the glyph rings are grouped
//! into solids with holes, capped front and back, and joined by side walls
//! with an optional rounded bevel.

use std::f32::consts::{FRAC_PI_2, SQRT_2};

use cgmath::{InnerSpace, Vector2, Vector3};

use super::{
    triangulate::{is_clockwise, point_in_polygon, signed_area, triangulate_shape},
    GeometryData,
};
use crate::{assets::Font, config::TextConfig};

/// A filled outline with zero or more holes
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub contour: Vec<Vector2<f32>>,
    pub holes: Vec<Vec<Vector2<f32>>>,
}

/// Extrusion parameters, in scene units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtrudeOptions {
    pub depth: f32,
    /// Subdivisions of the straight side walls
    pub steps: u32,
    pub bevel_enabled: bool,
    pub bevel_thickness: f32,
    pub bevel_size: f32,
    pub bevel_offset: f32,
    pub bevel_segments: u32,
}

impl Default for ExtrudeOptions {
    fn default() -> Self {
        Self {
            depth: 1.0,
            steps: 1,
            bevel_enabled: true,
            bevel_thickness: 0.2,
            bevel_size: 0.1,
            bevel_offset: 0.0,
            bevel_segments: 3,
        }
    }
}

impl From<&TextConfig> for ExtrudeOptions {
    fn from(text: &TextConfig) -> Self {
        Self {
            depth: text.depth,
            steps: 1,
            bevel_enabled: text.bevel_enabled,
            bevel_thickness: text.bevel_thickness,
            bevel_size: text.bevel_size,
            bevel_offset: text.bevel_offset,
            bevel_segments: text.bevel_segments,
        }
    }
}

/// Builds the centered text mesh for `text` in `font`
pub struct TextGeometry;

impl TextGeometry {
    pub fn build(font: &Font, text: &TextConfig) -> GeometryData {
        let paths = font.text_paths(&text.content, text.size, text.curve_segments);
        let shapes = shapes_from_paths(paths);
        let mut geometry = extrude(&shapes, &ExtrudeOptions::from(text));
        geometry.center();

        log::debug!(
            "Text geometry for {:?}: {} shapes, {} triangles",
            text.content,
            shapes.len(),
            geometry.triangle_count()
        );
        geometry
    }
}

/// Groups outline rings into solids and holes
///
/// Clockwise rings are solids and counter-clockwise rings are holes. Fonts
/// that use the opposite convention (no clockwise ring at all) are read the
/// other way around. A hole belongs to the most recent solid when that solid
/// contains its first point, otherwise to the smallest solid that does. With
/// no containing solid it stays with the most recent one.
pub fn shapes_from_paths(paths: Vec<Vec<Vector2<f32>>>) -> Vec<Shape> {
    let paths: Vec<_> = paths.into_iter().filter(|p| p.len() >= 3).collect();
    if paths.is_empty() {
        return Vec::new();
    }

    let solid_winding = paths.iter().any(|p| is_clockwise(p));

    let mut shapes: Vec<Shape> = Vec::new();
    let mut holes: Vec<(usize, Vec<Vector2<f32>>)> = Vec::new();

    for path in paths {
        if is_clockwise(&path) == solid_winding {
            shapes.push(Shape {
                contour: path,
                holes: Vec::new(),
            });
        } else {
            holes.push((shapes.len(), path));
        }
    }

    for (solids_before, hole) in holes {
        let Some(&first) = hole.first() else {
            continue;
        };
        let latest = solids_before.saturating_sub(1);
        let owner = match shapes.get(latest) {
            Some(shape) if point_in_polygon(first, &shape.contour) => latest,
            _ => shapes
                .iter()
                .enumerate()
                .filter(|(_, shape)| point_in_polygon(first, &shape.contour))
                .min_by(|(_, a), (_, b)| {
                    signed_area(&a.contour)
                        .abs()
                        .total_cmp(&signed_area(&b.contour).abs())
                })
                .map_or(latest, |(index, _)| index),
        };
        if let Some(shape) = shapes.get_mut(owner) {
            shape.holes.push(hole);
        }
    }

    shapes
}

/// Extrudes every shape along +z and merges the results
///
/// Every triangle gets its own three vertices so each face keeps a flat normal.
pub fn extrude(shapes: &[Shape], options: &ExtrudeOptions) -> GeometryData {
    let mut data = GeometryData::new();
    for shape in shapes {
        extrude_shape(shape, options, &mut data);
    }
    data
}

/// Inset and depth of one ring copy along the extrusion
#[derive(Debug, Clone, Copy)]
struct Layer {
    inset: f32,
    z: f32,
}

fn layers(options: &ExtrudeOptions) -> Vec<Layer> {
    let (segments, thickness, size, offset) = if options.bevel_enabled {
        (
            options.bevel_segments,
            options.bevel_thickness,
            options.bevel_size,
            options.bevel_offset,
        )
    } else {
        (0, 0.0, 0.0, 0.0)
    };
    let steps = options.steps.max(1);

    let bevel = |b: u32| {
        let t = b as f32 / segments as f32;
        let angle = t * FRAC_PI_2;
        (thickness * angle.cos(), size * angle.sin() + offset)
    };

    let mut layers = Vec::with_capacity((segments * 2 + steps + 1) as usize);
    for b in 0..segments {
        let (z, inset) = bevel(b);
        layers.push(Layer { inset, z: -z });
    }
    for s in 0..=steps {
        layers.push(Layer {
            inset: size + offset,
            z: options.depth * s as f32 / steps as f32,
        });
    }
    for b in (0..segments).rev() {
        let (z, inset) = bevel(b);
        layers.push(Layer {
            inset,
            z: options.depth + z,
        });
    }
    layers
}

/// Direction a ring vertex moves when the outline grows
///
/// Miter of the two adjacent edge normals, limited to length `sqrt(2)`.
fn bevel_vector(prev: Vector2<f32>, point: Vector2<f32>, next: Vector2<f32>) -> Vector2<f32> {
    let d_prev = point - prev;
    let d_next = next - point;
    let (len_prev, len_next) = (d_prev.magnitude(), d_next.magnitude());
    if len_prev < f32::EPSILON || len_next < f32::EPSILON {
        return Vector2::new(0.0, 0.0);
    }

    let n_prev = Vector2::new(-d_prev.y, d_prev.x) / len_prev;
    let n_next = Vector2::new(-d_next.y, d_next.x) / len_next;
    let denom = 1.0 + n_prev.dot(n_next);

    // The outline folds back on itself here
    if denom < 1e-6 {
        return d_prev / len_prev * SQRT_2;
    }

    let miter = (n_prev + n_next) / denom;
    let len_sq = miter.magnitude2();
    if len_sq > 2.0 {
        miter / (len_sq / 2.0).sqrt()
    } else {
        miter
    }
}

fn ring_bevel_vectors(ring: &[Vector2<f32>]) -> Vec<Vector2<f32>> {
    let n = ring.len();
    (0..n)
        .map(|i| bevel_vector(ring[(i + n - 1) % n], ring[i], ring[(i + 1) % n]))
        .collect()
}

fn extrude_shape(shape: &Shape, options: &ExtrudeOptions, data: &mut GeometryData) {
    if shape.contour.len() < 3 {
        return;
    }

    // Walls face outward when the contour is clockwise and holes are not
    let mut contour = shape.contour.clone();
    if !is_clockwise(&contour) {
        contour.reverse();
    }
    let holes: Vec<Vec<Vector2<f32>>> = shape
        .holes
        .iter()
        .filter(|hole| hole.len() >= 3)
        .map(|hole| {
            let mut hole = hole.clone();
            if is_clockwise(&hole) {
                hole.reverse();
            }
            hole
        })
        .collect();

    let faces = triangulate_shape(&contour, &holes);

    let mut points = contour.clone();
    let mut bevels = ring_bevel_vectors(&contour);
    let mut rings = vec![(0, contour.len())];
    for hole in &holes {
        rings.push((points.len(), hole.len()));
        points.extend_from_slice(hole);
        bevels.extend(ring_bevel_vectors(hole));
    }

    let layers = layers(options);
    let last = layers.len() - 1;
    let vertex = |layer: usize, index: usize| {
        let Layer { inset, z } = layers[layer];
        let p = points[index] + bevels[index] * inset;
        Vector3::new(p.x, p.y, z)
    };

    for face in &faces {
        // Back cap looks down -z
        push_cap_triangle(data, vertex(0, face[0]), vertex(0, face[2]), vertex(0, face[1]));
        push_cap_triangle(
            data,
            vertex(last, face[0]),
            vertex(last, face[1]),
            vertex(last, face[2]),
        );
    }

    for &(start, len) in &rings {
        for i in 0..len {
            let a = start + i;
            let b = start + (i + 1) % len;
            for layer in 0..last {
                let a0 = vertex(layer, a);
                let b0 = vertex(layer, b);
                let a1 = vertex(layer + 1, a);
                let b1 = vertex(layer + 1, b);
                push_wall_triangle(data, a0, a1, b0);
                push_wall_triangle(data, b0, a1, b1);
            }
        }
    }
}

fn face_normal(a: Vector3<f32>, b: Vector3<f32>, c: Vector3<f32>) -> [f32; 3] {
    let n = (b - a).cross(c - a);
    let len = n.magnitude();
    if len > f32::EPSILON {
        (n / len).into()
    } else {
        [0.0, 0.0, 1.0]
    }
}

fn push_triangle(data: &mut GeometryData, corners: [Vector3<f32>; 3], uvs: [[f32; 2]; 3]) {
    let normal = face_normal(corners[0], corners[1], corners[2]);
    for (corner, uv) in corners.into_iter().zip(uvs) {
        data.indices.push(data.vertices.len() as u32);
        data.vertices.push(corner.into());
        data.normals.push(normal);
        data.tex_coords.push(uv);
    }
}

fn push_cap_triangle(data: &mut GeometryData, a: Vector3<f32>, b: Vector3<f32>, c: Vector3<f32>) {
    push_triangle(data, [a, b, c], [[a.x, a.y], [b.x, b.y], [c.x, c.y]]);
}

/// Side wall UVs run along whichever horizontal axis the wall follows
fn push_wall_triangle(data: &mut GeometryData, a: Vector3<f32>, b: Vector3<f32>, c: Vector3<f32>) {
    let along_x = (a.y - c.y).abs() < (a.x - c.x).abs();
    let uv = |p: Vector3<f32>| {
        if along_x {
            [p.x, 1.0 - p.z]
        } else {
            [p.y, 1.0 - p.z]
        }
    };
    push_triangle(data, [a, b, c], [uv(a), uv(b), uv(c)]);
}
