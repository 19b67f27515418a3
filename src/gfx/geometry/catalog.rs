//! The closed set of selectable shapes
//!
//! [`GeometryCatalog`] builds every shape once and hands out shared
//! references, so switching shapes never regenerates geometry.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::shape2d::{generate_extrude, generate_shape, ExtrudeOptions, Path2D};
use super::*;
use crate::error::ViewerError;

/// Identifier of a catalog shape, in panel order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Box,
    Sphere,
    Torus,
    TorusKnot,
    Cone,
    Cylinder,
    Dodecahedron,
    Icosahedron,
    Octahedron,
    Tetrahedron,
    Plane,
    Capsule,
    Ring,
    Extrude,
    CustomHeart,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 15] = [
        ShapeKind::Box,
        ShapeKind::Sphere,
        ShapeKind::Torus,
        ShapeKind::TorusKnot,
        ShapeKind::Cone,
        ShapeKind::Cylinder,
        ShapeKind::Dodecahedron,
        ShapeKind::Icosahedron,
        ShapeKind::Octahedron,
        ShapeKind::Tetrahedron,
        ShapeKind::Plane,
        ShapeKind::Capsule,
        ShapeKind::Ring,
        ShapeKind::Extrude,
        ShapeKind::CustomHeart,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Box => "Box",
            ShapeKind::Sphere => "Sphere",
            ShapeKind::Torus => "Torus",
            ShapeKind::TorusKnot => "TorusKnot",
            ShapeKind::Cone => "Cone",
            ShapeKind::Cylinder => "Cylinder",
            ShapeKind::Dodecahedron => "Dodecahedron",
            ShapeKind::Icosahedron => "Icosahedron",
            ShapeKind::Octahedron => "Octahedron",
            ShapeKind::Tetrahedron => "Tetrahedron",
            ShapeKind::Plane => "Plane",
            ShapeKind::Capsule => "Capsule",
            ShapeKind::Ring => "Ring",
            ShapeKind::Extrude => "Extrude",
            ShapeKind::CustomHeart => "CustomHeart",
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    /// Generates the geometry for this shape from scratch
    pub fn build(self) -> GeometryData {
        match self {
            ShapeKind::Box => generate_box(1.0, 1.0, 1.0),
            ShapeKind::Sphere => generate_sphere(1.0, 32, 32),
            ShapeKind::Torus => generate_torus(1.0, 0.4, 16, 100),
            ShapeKind::TorusKnot => generate_torus_knot(0.7, 0.3, 100, 16, 2, 3),
            ShapeKind::Cone => generate_cone(1.0, 2.0, 32),
            ShapeKind::Cylinder => generate_cylinder(1.0, 1.0, 2.0, 32),
            ShapeKind::Dodecahedron => generate_dodecahedron(1.0),
            ShapeKind::Icosahedron => generate_icosahedron(1.0),
            ShapeKind::Octahedron => generate_octahedron(1.0),
            ShapeKind::Tetrahedron => generate_tetrahedron(1.0),
            ShapeKind::Plane => generate_plane(3.0, 3.0, 1, 1),
            ShapeKind::Capsule => generate_capsule(0.5, 2.0, 4, 8),
            ShapeKind::Ring => generate_ring(0.5, 1.0, 32, 1),
            ShapeKind::Extrude => {
                let outline = Path2D::new()
                    .move_to(0.0, 0.0)
                    .line_to(1.0, 0.0)
                    .line_to(0.5, 1.0)
                    .line_to(0.0, 0.0);
                generate_extrude(&outline, &ExtrudeOptions::new(0.5).with_bevel_thickness(0.1))
            }
            ShapeKind::CustomHeart => generate_shape(&heart_outline(), 12),
        }
    }
}

fn heart_outline() -> Path2D {
    Path2D::new()
        .move_to(0.0, 0.5)
        .bezier_curve_to(-0.25, 0.75, -0.5, 0.5, -0.5, 0.2)
        .bezier_curve_to(-0.5, -0.1, 0.0, -0.4, 0.0, -0.5)
        .bezier_curve_to(0.0, -0.4, 0.5, -0.1, 0.5, 0.2)
        .bezier_curve_to(0.5, 0.5, 0.25, 0.75, 0.0, 0.5)
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShapeKind {
    type Err = ViewerError;

    /// Case-insensitive match on the display name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShapeKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ViewerError::UnknownShape(s.to_string()))
    }
}

/// Immutable geometry for every [`ShapeKind`], built once
#[derive(Debug, Clone)]
pub struct GeometryCatalog {
    entries: Vec<Arc<GeometryData>>,
}

impl GeometryCatalog {
    pub fn new() -> Self {
        let entries = ShapeKind::ALL
            .iter()
            .map(|kind| Arc::new(kind.build()))
            .collect::<Vec<_>>();

        log::debug!(
            "geometry catalog ready: {} shapes, {} triangles total",
            entries.len(),
            entries.iter().map(|g| g.triangle_count()).sum::<usize>()
        );

        Self { entries }
    }

    pub fn get(&self, kind: ShapeKind) -> &Arc<GeometryData> {
        &self.entries[kind.index()]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for GeometryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_shape_has_geometry() {
        let catalog = GeometryCatalog::new();
        assert_eq!(catalog.len(), ShapeKind::ALL.len());
        for kind in ShapeKind::ALL {
            let geometry = catalog.get(kind);
            assert!(geometry.triangle_count() > 0, "{kind} is empty");
            assert_eq!(geometry.vertices.len(), geometry.normals.len());
            assert_eq!(geometry.vertices.len(), geometry.tex_coords.len());
            let count = geometry.vertex_count() as u32;
            assert!(geometry.indices.iter().all(|&i| i < count), "{kind} index out of range");
        }
    }

    #[test]
    fn lookups_share_the_same_geometry() {
        let catalog = GeometryCatalog::new();
        let a = Arc::clone(catalog.get(ShapeKind::Torus));
        let b = Arc::clone(catalog.get(ShapeKind::Torus));
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn names_round_trip_and_unknown_names_fail() {
        for kind in ShapeKind::ALL {
            assert_eq!(kind.name().parse::<ShapeKind>().unwrap(), kind);
        }
        assert_eq!("torusknot".parse::<ShapeKind>().unwrap(), ShapeKind::TorusKnot);
        assert!(matches!(
            "Teapot".parse::<ShapeKind>(),
            Err(ViewerError::UnknownShape(name)) if name == "Teapot"
        ));
    }

    #[test]
    fn heart_is_a_flat_fill() {
        let heart = ShapeKind::CustomHeart.build();
        // 4 curves x 12 samples, closing point dropped
        assert_eq!(heart.vertex_count(), 48);
        assert_eq!(heart.triangle_count(), 46);
        assert!(heart.vertices.iter().all(|v| v[2] == 0.0));
    }
}
