//! # Procedural Geometry Generation
//!
//! CPU-side mesh generation for the two shapes the scene needs: the torus
//! shared by every falling donut, and the extruded text built from typeface
//! glyph outlines.
//!
//! ## Usage
//!
//! ```rust
//! use torus_rain::gfx::geometry::generate_torus;
//!
//! let mut torus = generate_torus(0.3, 0.2, 20, 48);
//! torus.center();
//! assert_eq!(torus.triangle_count(), 20 * 48 * 2);
//! ```

pub mod primitives;
pub mod text;
pub mod triangulate;

pub use primitives::*;
pub use text::{ExtrudeOptions, TextGeometry};

use cgmath::Vector3;

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

/// Axis-aligned bounding box of a [`GeometryData`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl BoundingBox {
    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            tex_coords: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Bounding box of all vertices, `None` for empty geometry
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let first = self.vertices.first()?;
        let mut min = Vector3::from(*first);
        let mut max = min;
        for v in &self.vertices[1..] {
            min.x = min.x.min(v[0]);
            min.y = min.y.min(v[1]);
            min.z = min.z.min(v[2]);
            max.x = max.x.max(v[0]);
            max.y = max.y.max(v[1]);
            max.z = max.z.max(v[2]);
        }
        Some(BoundingBox { min, max })
    }

    /// Moves every vertex by `offset`
    pub fn translate(&mut self, offset: Vector3<f32>) {
        for v in &mut self.vertices {
            v[0] += offset.x;
            v[1] += offset.y;
            v[2] += offset.z;
        }
    }

    /// Moves the geometry so its bounding box is centered on the origin
    ///
    /// Returns the applied offset.
    pub fn center(&mut self) -> Vector3<f32> {
        match self.bounding_box() {
            Some(bounds) => {
                let offset = -bounds.center();
                self.translate(offset);
                offset
            }
            None => Vector3::new(0.0, 0.0, 0.0),
        }
    }

    /// Interleaves positions and normals into the renderer's vertex format
    pub fn to_scene_format(&self) -> (Vec<crate::gfx::scene::vertex::Vertex3D>, Vec<u32>) {
        use crate::gfx::scene::vertex::Vertex3D;

        let vertices: Vec<Vertex3D> = (0..self.vertices.len())
            .map(|i| Vertex3D {
                position: self.vertices[i],
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
            })
            .collect();

        (vertices, self.indices.clone())
    }
}

impl Default for GeometryData {
    fn default() -> Self {
        Self::new()
    }
}
