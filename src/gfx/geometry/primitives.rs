//! # Primitive Shape Generation
//!
//! Parametric surfaces. All shapes use a Y-up coordinate system, are centered at
//! the origin and carry outward normals plus UV coordinates in `[0, 1]`.

use super::{normalize, GeometryData};
use std::f32::consts::{FRAC_PI_2, PI, TAU};

/// Generate an axis-aligned box centered at the origin
///
/// Each face has its own four vertices so normals stay flat.
pub fn generate_box(width: f32, height: f32, depth: f32) -> GeometryData {
    let mut data = GeometryData::new();

    let positions = [
        // Front face
        [-0.5, -0.5,  0.5], [ 0.5, -0.5,  0.5], [ 0.5,  0.5,  0.5], [-0.5,  0.5,  0.5],
        // Back face
        [-0.5, -0.5, -0.5], [-0.5,  0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5, -0.5, -0.5],
        // Left face
        [-0.5, -0.5, -0.5], [-0.5, -0.5,  0.5], [-0.5,  0.5,  0.5], [-0.5,  0.5, -0.5],
        // Right face
        [ 0.5, -0.5,  0.5], [ 0.5, -0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5,  0.5,  0.5],
        // Top face
        [-0.5,  0.5,  0.5], [ 0.5,  0.5,  0.5], [ 0.5,  0.5, -0.5], [-0.5,  0.5, -0.5],
        // Bottom face
        [-0.5, -0.5, -0.5], [ 0.5, -0.5, -0.5], [ 0.5, -0.5,  0.5], [-0.5, -0.5,  0.5],
    ];

    let tex_coords = [
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
        [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0],
        [1.0, 0.0], [0.0, 0.0], [0.0, 1.0], [1.0, 1.0],
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
        [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0],
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
    ];

    let face_normals = [
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
        [-1.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
    ];

    for (i, p) in positions.iter().enumerate() {
        data.push_vertex(
            [p[0] * width, p[1] * height, p[2] * depth],
            face_normals[i / 4],
            tex_coords[i],
        );
    }

    for face in 0..6u32 {
        let base = face * 4;
        data.push_triangle(base, base + 1, base + 2);
        data.push_triangle(base + 2, base + 3, base);
    }

    data
}

/// Generate a UV sphere
///
/// # Arguments
/// * `radius` - Sphere radius
/// * `width_segments` - Number of vertical segments (longitude lines)
/// * `height_segments` - Number of horizontal segments (latitude lines)
///
/// Pole rows emit a single triangle per segment so no degenerate faces exist.
pub fn generate_sphere(radius: f32, width_segments: u32, height_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let w_segs = width_segments.max(3);
    let h_segs = height_segments.max(2);

    for iy in 0..=h_segs {
        let v = iy as f32 / h_segs as f32;
        let theta = v * PI;

        for ix in 0..=w_segs {
            let u = ix as f32 / w_segs as f32;
            let phi = u * TAU;

            let x = -radius * phi.cos() * theta.sin();
            let y = radius * theta.cos();
            let z = radius * phi.sin() * theta.sin();

            data.push_vertex([x, y, z], normalize([x, y, z]), [u, 1.0 - v]);
        }
    }

    let row = w_segs + 1;
    for iy in 0..h_segs {
        for ix in 0..w_segs {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;

            if iy != 0 {
                data.push_triangle(a, b, d);
            }
            if iy != h_segs - 1 {
                data.push_triangle(b, c, d);
            }
        }
    }

    data
}

/// Generate a plane in the XY plane facing +Z
///
/// # Arguments
/// * `width` - Width of the plane (X direction)
/// * `height` - Height of the plane (Y direction)
/// * `width_segments` - Number of subdivisions along width
/// * `height_segments` - Number of subdivisions along height
pub fn generate_plane(width: f32, height: f32, width_segments: u32, height_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let w_segs = width_segments.max(1);
    let h_segs = height_segments.max(1);

    for iy in 0..=h_segs {
        let v = iy as f32 / h_segs as f32;
        let pos_y = (0.5 - v) * height;

        for ix in 0..=w_segs {
            let u = ix as f32 / w_segs as f32;
            let pos_x = (u - 0.5) * width;

            data.push_vertex([pos_x, pos_y, 0.0], [0.0, 0.0, 1.0], [u, 1.0 - v]);
        }
    }

    let row = w_segs + 1;
    for iy in 0..h_segs {
        for ix in 0..w_segs {
            let a = ix + row * iy;
            let b = ix + row * (iy + 1);
            let c = ix + 1 + row * (iy + 1);
            let d = ix + 1 + row * iy;

            data.push_triangle(a, b, d);
            data.push_triangle(b, c, d);
        }
    }

    data
}

/// Generate a (possibly tapered) cylinder along the Y axis
///
/// A radius of zero skips that cap, which is how cones are built.
pub fn generate_cylinder(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let segs = radial_segments.max(3);
    let half_height = height * 0.5;
    let slope = (radius_bottom - radius_top) / height;

    // Side wall: two rings, top then bottom
    for (row, v) in [0.0f32, 1.0].into_iter().enumerate() {
        let radius = v * (radius_bottom - radius_top) + radius_top;
        let y = half_height - v * height;
        for ix in 0..=segs {
            let u = ix as f32 / segs as f32;
            let theta = u * TAU;
            let (sin_t, cos_t) = theta.sin_cos();
            data.push_vertex(
                [radius * sin_t, y, radius * cos_t],
                normalize([sin_t, slope, cos_t]),
                [u, 1.0 - row as f32],
            );
        }
    }

    let row = segs + 1;
    for ix in 0..segs {
        let a = ix;
        let b = row + ix;
        let c = row + ix + 1;
        let d = ix + 1;
        data.push_triangle(a, b, d);
        data.push_triangle(b, c, d);
    }

    if radius_top > 0.0 {
        push_cylinder_cap(&mut data, radius_top, half_height, segs, true);
    }
    if radius_bottom > 0.0 {
        push_cylinder_cap(&mut data, radius_bottom, half_height, segs, false);
    }

    data
}

fn push_cylinder_cap(data: &mut GeometryData, radius: f32, half_height: f32, segs: u32, top: bool) {
    let sign = if top { 1.0 } else { -1.0 };
    let y = half_height * sign;
    let normal = [0.0, sign, 0.0];

    // One center vertex per segment keeps the UV seam clean
    let center_start = data.vertices.len() as u32;
    for _ in 0..segs {
        data.push_vertex([0.0, y, 0.0], normal, [0.5, 0.5]);
    }

    let rim_start = data.vertices.len() as u32;
    for ix in 0..=segs {
        let theta = ix as f32 / segs as f32 * TAU;
        let (sin_t, cos_t) = theta.sin_cos();
        data.push_vertex(
            [radius * sin_t, y, radius * cos_t],
            normal,
            [cos_t * 0.5 + 0.5, sin_t * 0.5 * sign + 0.5],
        );
    }

    for ix in 0..segs {
        let center = center_start + ix;
        let rim = rim_start + ix;
        if top {
            data.push_triangle(rim, rim + 1, center);
        } else {
            data.push_triangle(rim + 1, rim, center);
        }
    }
}

/// Generate a cone with its apex on +Y
pub fn generate_cone(radius: f32, height: f32, radial_segments: u32) -> GeometryData {
    generate_cylinder(0.0, radius, height, radial_segments)
}

/// Generate a torus lying in the XY plane
///
/// # Arguments
/// * `radius` - Distance from the center to the middle of the tube
/// * `tube` - Tube radius
/// * `radial_segments` - Segments around the tube
/// * `tubular_segments` - Segments around the ring
pub fn generate_torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let radial = radial_segments.max(3);
    let tubular = tubular_segments.max(3);

    for j in 0..=radial {
        let v = j as f32 / radial as f32 * TAU;
        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * TAU;

            let x = (radius + tube * v.cos()) * u.cos();
            let y = (radius + tube * v.cos()) * u.sin();
            let z = tube * v.sin();

            let center = [radius * u.cos(), radius * u.sin(), 0.0];
            let normal = normalize([x - center[0], y - center[1], z - center[2]]);

            data.push_vertex(
                [x, y, z],
                normal,
                [i as f32 / tubular as f32, j as f32 / radial as f32],
            );
        }
    }

    push_grid_indices(&mut data, radial, tubular);
    data
}

/// Generate a (p, q) torus knot
///
/// The tube follows a curve wrapping `p` times around the axis of rotational
/// symmetry and `q` times around a circle in the interior of the torus.
pub fn generate_torus_knot(
    radius: f32,
    tube: f32,
    tubular_segments: u32,
    radial_segments: u32,
    p: u32,
    q: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let tubular = tubular_segments.max(3);
    let radial = radial_segments.max(3);
    let (p, q) = (p as f32, q as f32);

    let curve = |u: f32| -> [f32; 3] {
        let q_over_p = q / p * u;
        let cs = q_over_p.cos();
        [
            radius * (2.0 + cs) * 0.5 * u.cos(),
            radius * (2.0 + cs) * 0.5 * u.sin(),
            radius * q_over_p.sin() * 0.5,
        ]
    };

    for i in 0..=tubular {
        let u = i as f32 / tubular as f32 * p * TAU;

        let p1 = curve(u);
        let p2 = curve(u + 0.01);

        // Frenet-like frame along the curve
        let t = super::sub(p2, p1);
        let n = [p2[0] + p1[0], p2[1] + p1[1], p2[2] + p1[2]];
        let b = normalize(super::cross(t, n));
        let n = normalize(super::cross(b, t));

        for j in 0..=radial {
            let v = j as f32 / radial as f32 * TAU;
            let cx = -tube * v.cos();
            let cy = tube * v.sin();

            let vertex = [
                p1[0] + cx * n[0] + cy * b[0],
                p1[1] + cx * n[1] + cy * b[1],
                p1[2] + cx * n[2] + cy * b[2],
            ];
            let normal = normalize(super::sub(vertex, p1));

            data.push_vertex(
                vertex,
                normal,
                [i as f32 / tubular as f32, j as f32 / radial as f32],
            );
        }
    }

    push_grid_indices(&mut data, tubular, radial);
    data
}

/// Generate a capsule: a cylinder of `length` capped by two hemispheres
///
/// # Arguments
/// * `radius` - Radius of the capsule
/// * `length` - Length of the straight middle section
/// * `cap_segments` - Rings per hemisphere
/// * `radial_segments` - Segments around the Y axis
pub fn generate_capsule(radius: f32, length: f32, cap_segments: u32, radial_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let caps = cap_segments.max(1);
    let radial = radial_segments.max(3);
    let half_length = length * 0.5;

    // Profile rows from the top pole to the bottom pole: (angle from +Y, y offset)
    let mut rows: Vec<(f32, f32)> = Vec::with_capacity(2 * (caps as usize + 1));
    for k in 0..=caps {
        rows.push((k as f32 / caps as f32 * FRAC_PI_2, half_length));
    }
    for k in 0..=caps {
        rows.push((FRAC_PI_2 + k as f32 / caps as f32 * FRAC_PI_2, -half_length));
    }

    // Arc length along the profile drives the V coordinate
    let cap_arc = radius * FRAC_PI_2;
    let total = 2.0 * cap_arc + length;
    let mut travelled = 0.0;

    for (r, &(angle, offset)) in rows.iter().enumerate() {
        if r > 0 {
            let (prev_angle, prev_offset) = rows[r - 1];
            travelled += if prev_offset != offset {
                length
            } else {
                radius * (angle - prev_angle)
            };
        }
        let v = if total > 0.0 { travelled / total } else { 0.0 };

        let ring_radius = radius * angle.sin();
        let y = offset + radius * angle.cos();

        for ix in 0..=radial {
            let u = ix as f32 / radial as f32;
            let theta = u * TAU;
            let (sin_t, cos_t) = theta.sin_cos();
            data.push_vertex(
                [ring_radius * sin_t, y, ring_radius * cos_t],
                normalize([angle.sin() * sin_t, angle.cos(), angle.sin() * cos_t]),
                [u, 1.0 - v],
            );
        }
    }

    let row = radial + 1;
    for r in 0..(rows.len() as u32 - 1) {
        for ix in 0..radial {
            let a = r * row + ix;
            let b = (r + 1) * row + ix;
            let c = (r + 1) * row + ix + 1;
            let d = r * row + ix + 1;
            // Skip the zero-area triangles touching the poles
            if r != 0 {
                data.push_triangle(a, b, d);
            }
            if r + 1 != rows.len() as u32 - 1 {
                data.push_triangle(b, c, d);
            }
        }
    }

    data
}

/// Generate a flat ring (annulus) in the XY plane facing +Z
pub fn generate_ring(inner_radius: f32, outer_radius: f32, theta_segments: u32, phi_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let theta_segs = theta_segments.max(3);
    let phi_segs = phi_segments.max(1);
    let step = (outer_radius - inner_radius) / phi_segs as f32;

    for j in 0..=phi_segs {
        let radius = inner_radius + j as f32 * step;
        for i in 0..=theta_segs {
            let segment = i as f32 / theta_segs as f32 * TAU;
            let x = radius * segment.cos();
            let y = radius * segment.sin();
            data.push_vertex(
                [x, y, 0.0],
                [0.0, 0.0, 1.0],
                [(x / outer_radius + 1.0) / 2.0, (y / outer_radius + 1.0) / 2.0],
            );
        }
    }

    let row = theta_segs + 1;
    for j in 0..phi_segs {
        for i in 0..theta_segs {
            let segment = i + j * row;
            let a = segment;
            let b = segment + row;
            let c = segment + row + 1;
            let d = segment + 1;
            data.push_triangle(a, b, d);
            data.push_triangle(b, c, d);
        }
    }

    data
}

/// Indices for a `(rows + 1) x (cols + 1)` vertex grid, wrapping nothing
fn push_grid_indices(data: &mut GeometryData, rows: u32, cols: u32) {
    let stride = cols + 1;
    for j in 1..=rows {
        for i in 1..=cols {
            let a = stride * j + i - 1;
            let b = stride * (j - 1) + i - 1;
            let c = stride * (j - 1) + i;
            let d = stride * j + i;
            data.push_triangle(a, b, d);
            data.push_triangle(b, c, d);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_consistent(data: &GeometryData) {
        assert_eq!(data.vertices.len(), data.normals.len());
        assert_eq!(data.vertices.len(), data.tex_coords.len());
        assert_eq!(data.indices.len() % 3, 0);
        let count = data.vertex_count() as u32;
        assert!(data.indices.iter().all(|&i| i < count));
    }

    #[test]
    fn test_box_generation() {
        let cube = generate_box(1.0, 1.0, 1.0);
        assert_eq!(cube.vertex_count(), 24); // 6 faces * 4 vertices
        assert_eq!(cube.triangle_count(), 12);
        assert_consistent(&cube);

        let slab = generate_box(2.0, 0.5, 1.0);
        let (lo, hi) = slab.bounds().unwrap();
        assert_eq!(hi[0] - lo[0], 2.0);
        assert_eq!(hi[1] - lo[1], 0.5);
    }

    #[test]
    fn test_sphere_generation() {
        let sphere = generate_sphere(1.0, 32, 32);
        assert_eq!(sphere.vertex_count(), 33 * 33);
        // Pole rows contribute one triangle per segment instead of two
        assert_eq!(sphere.triangle_count(), 32 * 32 * 2 - 2 * 32);
        assert_consistent(&sphere);
        for v in &sphere.vertices {
            let r = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
            assert!((r - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_plane_generation() {
        let plane = generate_plane(3.0, 3.0, 1, 1);
        assert_eq!(plane.vertex_count(), 4);
        assert_eq!(plane.triangle_count(), 2);
        let (lo, hi) = plane.bounds().unwrap();
        assert_eq!(lo, [-1.5, -1.5, 0.0]);
        assert_eq!(hi, [1.5, 1.5, 0.0]);

        let grid = generate_plane(2.0, 2.0, 2, 2);
        assert_eq!(grid.vertex_count(), 9); // 3x3 grid
        assert_eq!(grid.indices.len(), 24); // 4 quads * 2 triangles * 3 indices
    }

    #[test]
    fn cone_has_no_top_cap() {
        let cone = generate_cone(1.0, 2.0, 32);
        let cylinder = generate_cylinder(1.0, 1.0, 2.0, 32);
        assert_consistent(&cone);
        assert_consistent(&cylinder);
        assert_eq!(cylinder.triangle_count(), 32 * 2 + 32 * 2);
        assert_eq!(cone.triangle_count(), 32 * 2 + 32);

        let (lo, hi) = cone.bounds().unwrap();
        assert!((hi[1] - 1.0).abs() < 1e-6);
        assert!((lo[1] + 1.0).abs() < 1e-6);
    }

    #[test]
    fn torus_spans_outer_radius() {
        let torus = generate_torus(1.0, 0.4, 16, 100);
        assert_consistent(&torus);
        assert_eq!(torus.vertex_count(), 17 * 101);
        assert_eq!(torus.triangle_count(), 16 * 100 * 2);
        let (lo, hi) = torus.bounds().unwrap();
        assert!((hi[0] - 1.4).abs() < 1e-4);
        assert!((lo[2] + 0.4).abs() < 1e-3);
    }

    #[test]
    fn torus_knot_normals_are_unit_length() {
        let knot = generate_torus_knot(0.7, 0.3, 100, 16, 2, 3);
        assert_consistent(&knot);
        assert_eq!(knot.triangle_count(), 100 * 16 * 2);
        for n in &knot.normals {
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            assert!((len - 1.0).abs() < 1e-3);
        }
    }

    #[test]
    fn capsule_height_includes_caps() {
        let capsule = generate_capsule(0.5, 2.0, 4, 8);
        assert_consistent(&capsule);
        let (lo, hi) = capsule.bounds().unwrap();
        assert!((hi[1] - 1.5).abs() < 1e-5);
        assert!((lo[1] + 1.5).abs() < 1e-5);
        assert!(hi[0] <= 0.5 + 1e-5);
    }

    #[test]
    fn ring_stays_between_radii() {
        let ring = generate_ring(0.5, 1.0, 32, 1);
        assert_consistent(&ring);
        assert_eq!(ring.triangle_count(), 64);
        for v in &ring.vertices {
            let r = (v[0] * v[0] + v[1] * v[1]).sqrt();
            assert!(r > 0.5 - 1e-5 && r < 1.0 + 1e-5);
        }
    }
}
