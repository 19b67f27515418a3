//! # Procedural Geometry Generation
//!
//! Every shape the studio can show is generated procedurally at startup, so no
//! model files are needed.
//!
//! ## Modules
//!
//! - [`primitives`] - parametric surfaces (box, sphere, torus, cylinder, ...)
//! - [`polyhedra`] - the platonic solids
//! - [`shape2d`] - 2D outlines, flat shape fills and extrusions
//! - [`catalog`] - the closed set of selectable shapes
//!
//! ## Usage
//!
//! ```rust
//! use shape_studio::gfx::geometry::{GeometryCatalog, ShapeKind};
//!
//! let catalog = GeometryCatalog::new();
//! let knot = catalog.get(ShapeKind::TorusKnot);
//! assert!(knot.triangle_count() > 0);
//! ```

pub mod catalog;
pub mod polyhedra;
pub mod primitives;
pub mod shape2d;

pub use catalog::{GeometryCatalog, ShapeKind};
pub use polyhedra::*;
pub use primitives::*;
pub use shape2d::{generate_extrude, generate_shape, ExtrudeOptions, Path2D};

use std::collections::HashSet;

use crate::gfx::scene::vertex::Vertex3D;

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone, PartialEq)]
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

    /// Appends one vertex and returns its index
    pub(crate) fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        self.normals.push(normal);
        self.tex_coords.push(uv);
        index
    }

    pub(crate) fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Line-list indices covering every triangle edge exactly once
    ///
    /// Used for wireframe drawing. Edges are emitted in order of first appearance.
    pub fn edge_indices(&self) -> Vec<u32> {
        let mut seen = HashSet::with_capacity(self.indices.len());
        let mut edges = Vec::with_capacity(self.indices.len() * 2);

        for triangle in self.indices.chunks_exact(3) {
            for (a, b) in [
                (triangle[0], triangle[1]),
                (triangle[1], triangle[2]),
                (triangle[2], triangle[0]),
            ] {
                let key = (a.min(b), a.max(b));
                if seen.insert(key) {
                    edges.push(key.0);
                    edges.push(key.1);
                }
            }
        }

        edges
    }

    /// Interleaves the attribute streams into the renderer's vertex format
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        (0..self.vertices.len())
            .map(|i| Vertex3D {
                position: self.vertices[i],
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                tex_coords: self.tex_coords.get(i).copied().unwrap_or([0.0, 0.0]),
            })
            .collect()
    }

    /// Axis-aligned bounds as `(min, max)`; `None` for empty geometry
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(mut lo, mut hi), v| {
            for axis in 0..3 {
                lo[axis] = lo[axis].min(v[axis]);
                hi[axis] = hi[axis].max(v[axis]);
            }
            (lo, hi)
        }))
    }
}

impl Default for GeometryData {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len <= f32::EPSILON {
        return [0.0, 0.0, 0.0];
    }
    [v[0] / len, v[1] / len, v[2] / len]
}

pub(crate) fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub(crate) fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

pub(crate) fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_are_deduplicated() {
        let quad = generate_plane(1.0, 1.0, 1, 1);
        // 4 outline edges + 1 shared diagonal
        assert_eq!(quad.edge_indices().len(), 5 * 2);
    }

    #[test]
    fn bounds_of_unit_cube() {
        let (lo, hi) = generate_box(1.0, 1.0, 1.0).bounds().unwrap();
        assert_eq!(lo, [-0.5, -0.5, -0.5]);
        assert_eq!(hi, [0.5, 0.5, 0.5]);
        assert!(GeometryData::new().bounds().is_none());
    }

    #[test]
    fn vertex_conversion_keeps_attributes() {
        let plane = generate_plane(2.0, 2.0, 1, 1);
        let vertices = plane.to_vertices();
        assert_eq!(vertices.len(), plane.vertex_count());
        assert_eq!(vertices[0].position, plane.vertices[0]);
        assert_eq!(vertices[0].tex_coords, plane.tex_coords[0]);
    }
}
