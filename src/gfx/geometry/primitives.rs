//! # Primitive Shape Generation
//!
//! All shapes are generated with proper normals and texture coordinates.

use super::GeometryData;
use std::f32::consts::PI;

/// Generate a torus lying in the XY plane
///
/// # Arguments
/// * `radius` - Distance from the torus center to the center of the tube
/// * `tube` - Radius of the tube
/// * `radial_segments` - Segments around the tube cross-section
/// * `tubular_segments` - Segments along the ring
///
/// Segment counts are clamped to at least 3 so the mesh never degenerates.
pub fn generate_torus(
    radius: f32,
    tube: f32,
    radial_segments: u32,
    tubular_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let radial = radial_segments.max(3);
    let tubular = tubular_segments.max(3);

    for j in 0..=radial {
        let v = j as f32 / radial as f32 * 2.0 * PI;
        let (sin_v, cos_v) = v.sin_cos();

        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * 2.0 * PI;
            let (sin_u, cos_u) = u.sin_cos();

            let x = (radius + tube * cos_v) * cos_u;
            let y = (radius + tube * cos_v) * sin_u;
            let z = tube * sin_v;
            data.vertices.push([x, y, z]);

            // Normal points from the ring center line out through the vertex
            data.normals.push([cos_v * cos_u, cos_v * sin_u, sin_v]);

            data.tex_coords
                .push([i as f32 / tubular as f32, j as f32 / radial as f32]);
        }
    }

    let row = tubular + 1;
    for j in 1..=radial {
        for i in 1..=tubular {
            let a = row * j + i - 1;
            let b = row * (j - 1) + i - 1;
            let c = row * (j - 1) + i;
            let d = row * j + i;

            data.indices.extend_from_slice(&[a, b, d]);
            data.indices.extend_from_slice(&[b, c, d]);
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_torus_generation() {
        let torus = generate_torus(0.3, 0.2, 20, 48);
        assert_eq!(torus.vertex_count(), 21 * 49);
        assert_eq!(torus.triangle_count(), 20 * 48 * 2);
        assert_eq!(torus.vertices.len(), torus.normals.len());
        assert_eq!(torus.vertices.len(), torus.tex_coords.len());

        let max_index = *torus.indices.iter().max().unwrap() as usize;
        assert!(max_index < torus.vertex_count());
    }

    #[test]
    fn test_torus_extent_and_normals() {
        let torus = generate_torus(0.3, 0.2, 8, 16);
        let bounds = torus.bounding_box().unwrap();

        assert!((bounds.max.x - 0.5).abs() < 1e-5);
        assert!((bounds.max.z - 0.2).abs() < 1e-5);
        assert!((bounds.min.z + 0.2).abs() < 1e-5);

        for n in &torus.normals {
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            assert!((len - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_degenerate_segment_counts_are_clamped() {
        let torus = generate_torus(1.0, 0.5, 0, 1);
        assert_eq!(torus.triangle_count(), 3 * 3 * 2);
    }
}
