//! Platonic solids
//!
//! Each solid is projected onto a sphere of the requested radius and emitted with
//! flat per-face normals (three unshared vertices per triangle).

use super::{cross, dot, normalize, sub, GeometryData};
use std::f32::consts::PI;

#[rustfmt::skip]
const TETRAHEDRON_VERTICES: [[f32; 3]; 4] = [
    [1.0, 1.0, 1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, -1.0], [1.0, -1.0, -1.0],
];

#[rustfmt::skip]
const TETRAHEDRON_FACES: [[usize; 3]; 4] = [
    [2, 1, 0], [0, 3, 2], [1, 3, 0], [2, 3, 1],
];

#[rustfmt::skip]
const OCTAHEDRON_VERTICES: [[f32; 3]; 6] = [
    [1.0, 0.0, 0.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0],
    [0.0, -1.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0, -1.0],
];

#[rustfmt::skip]
const OCTAHEDRON_FACES: [[usize; 3]; 8] = [
    [0, 2, 4], [0, 4, 3], [0, 3, 5], [0, 5, 2],
    [1, 2, 5], [1, 5, 3], [1, 3, 4], [1, 4, 2],
];

#[rustfmt::skip]
const ICOSAHEDRON_FACES: [[usize; 3]; 20] = [
    [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
    [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
    [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
    [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
];

#[rustfmt::skip]
const DODECAHEDRON_FACES: [[usize; 3]; 36] = [
    [3, 11, 7], [3, 7, 15], [3, 15, 13],
    [7, 19, 17], [7, 17, 6], [7, 6, 15],
    [17, 4, 8], [17, 8, 10], [17, 10, 6],
    [8, 0, 16], [8, 16, 2], [8, 2, 10],
    [0, 12, 1], [0, 1, 18], [0, 18, 16],
    [6, 10, 2], [6, 2, 13], [6, 13, 15],
    [2, 16, 18], [2, 18, 3], [2, 3, 13],
    [18, 1, 9], [18, 9, 11], [18, 11, 3],
    [4, 14, 12], [4, 12, 0], [4, 0, 8],
    [11, 9, 5], [11, 5, 19], [11, 19, 7],
    [19, 5, 14], [19, 14, 4], [19, 4, 17],
    [1, 12, 14], [1, 14, 5], [1, 5, 9],
];

fn golden_ratio() -> f32 {
    (1.0 + 5.0f32.sqrt()) / 2.0
}

fn icosahedron_vertices() -> [[f32; 3]; 12] {
    let t = golden_ratio();
    [
        [-1.0, t, 0.0], [1.0, t, 0.0], [-1.0, -t, 0.0], [1.0, -t, 0.0],
        [0.0, -1.0, t], [0.0, 1.0, t], [0.0, -1.0, -t], [0.0, 1.0, -t],
        [t, 0.0, -1.0], [t, 0.0, 1.0], [-t, 0.0, -1.0], [-t, 0.0, 1.0],
    ]
}

fn dodecahedron_vertices() -> [[f32; 3]; 20] {
    let t = golden_ratio();
    let r = 1.0 / t;
    [
        // (±1, ±1, ±1)
        [-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, -1.0], [-1.0, 1.0, 1.0],
        [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0],
        // (0, ±1/φ, ±φ)
        [0.0, -r, -t], [0.0, -r, t], [0.0, r, -t], [0.0, r, t],
        // (±1/φ, ±φ, 0)
        [-r, -t, 0.0], [-r, t, 0.0], [r, -t, 0.0], [r, t, 0.0],
        // (±φ, 0, ±1/φ)
        [-t, 0.0, -r], [t, 0.0, -r], [-t, 0.0, r], [t, 0.0, r],
    ]
}

pub fn generate_tetrahedron(radius: f32) -> GeometryData {
    generate_polyhedron(&TETRAHEDRON_VERTICES, &TETRAHEDRON_FACES, radius)
}

pub fn generate_octahedron(radius: f32) -> GeometryData {
    generate_polyhedron(&OCTAHEDRON_VERTICES, &OCTAHEDRON_FACES, radius)
}

pub fn generate_icosahedron(radius: f32) -> GeometryData {
    generate_polyhedron(&icosahedron_vertices(), &ICOSAHEDRON_FACES, radius)
}

pub fn generate_dodecahedron(radius: f32) -> GeometryData {
    generate_polyhedron(&dodecahedron_vertices(), &DODECAHEDRON_FACES, radius)
}

/// Builds a flat-shaded polyhedron from a vertex table and triangle list
///
/// Vertices are pushed onto the sphere of `radius`; faces are re-wound if needed
/// so every normal points away from the origin.
pub fn generate_polyhedron(vertices: &[[f32; 3]], faces: &[[usize; 3]], radius: f32) -> GeometryData {
    let mut data = GeometryData::new();

    let project = |v: [f32; 3]| {
        let n = normalize(v);
        [n[0] * radius, n[1] * radius, n[2] * radius]
    };

    for face in faces {
        let mut corners = [project(vertices[face[0]]), project(vertices[face[1]]), project(vertices[face[2]])];

        let mut normal = normalize(cross(sub(corners[1], corners[0]), sub(corners[2], corners[0])));
        let centroid = [
            (corners[0][0] + corners[1][0] + corners[2][0]) / 3.0,
            (corners[0][1] + corners[1][1] + corners[2][1]) / 3.0,
            (corners[0][2] + corners[1][2] + corners[2][2]) / 3.0,
        ];
        if dot(normal, centroid) < 0.0 {
            corners.swap(1, 2);
            normal = [-normal[0], -normal[1], -normal[2]];
        }

        let a = data.push_vertex(corners[0], normal, spherical_uv(corners[0]));
        let b = data.push_vertex(corners[1], normal, spherical_uv(corners[1]));
        let c = data.push_vertex(corners[2], normal, spherical_uv(corners[2]));
        data.push_triangle(a, b, c);
    }

    data
}

fn spherical_uv(v: [f32; 3]) -> [f32; 2] {
    let azimuth = v[2].atan2(-v[0]);
    let inclination = (-v[1]).atan2((v[0] * v[0] + v[2] * v[2]).sqrt());
    [azimuth / 2.0 / PI + 0.5, inclination / PI + 0.5]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_outward(data: &GeometryData) {
        for tri in data.indices.chunks_exact(3) {
            let a = data.vertices[tri[0] as usize];
            let b = data.vertices[tri[1] as usize];
            let c = data.vertices[tri[2] as usize];
            let n = cross(sub(b, a), sub(c, a));
            assert!(dot(n, a) > 0.0, "face winds inward");
        }
    }

    #[test]
    fn face_counts() {
        assert_eq!(generate_tetrahedron(1.0).triangle_count(), 4);
        assert_eq!(generate_octahedron(1.0).triangle_count(), 8);
        assert_eq!(generate_icosahedron(1.0).triangle_count(), 20);
        assert_eq!(generate_dodecahedron(1.0).triangle_count(), 36);
    }

    #[test]
    fn vertices_lie_on_sphere_and_faces_point_out() {
        for data in [
            generate_tetrahedron(1.0),
            generate_octahedron(1.0),
            generate_icosahedron(1.0),
            generate_dodecahedron(1.0),
        ] {
            for v in &data.vertices {
                let r = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
                assert!((r - 1.0).abs() < 1e-5);
            }
            assert_outward(&data);
        }
    }
}
