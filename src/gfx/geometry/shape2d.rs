//! # 2D Outlines
//!
//! A small path builder for closed outlines made of straight segments and cubic
//! Bezier curves, plus the two ways the studio turns outlines into meshes:
//!
//! - [`generate_shape`] - a flat fill in the XY plane facing +Z
//! - [`generate_extrude`] - a solid extruded along +Z with optional bevel layers
//!
//! Outlines are triangulated with ear clipping, which is exact for the simple
//! (non self-intersecting, hole-free) polygons used here.

use super::{cross, normalize, sub, GeometryData};
use std::f32::consts::FRAC_PI_2;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Segment {
    Line { to: [f32; 2] },
    Cubic { c1: [f32; 2], c2: [f32; 2], to: [f32; 2] },
}

/// A closed 2D outline
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path2D {
    start: [f32; 2],
    segments: Vec<Segment>,
}

impl Path2D {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the outline at `(x, y)`, discarding anything drawn so far
    pub fn move_to(mut self, x: f32, y: f32) -> Self {
        self.start = [x, y];
        self.segments.clear();
        self
    }

    pub fn line_to(mut self, x: f32, y: f32) -> Self {
        self.segments.push(Segment::Line { to: [x, y] });
        self
    }

    /// Cubic Bezier from the current point through two control points
    pub fn bezier_curve_to(mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) -> Self {
        self.segments.push(Segment::Cubic {
            c1: [c1x, c1y],
            c2: [c2x, c2y],
            to: [x, y],
        });
        self
    }

    /// Samples the outline into a polygon
    ///
    /// Straight segments contribute their end point, curves `divisions` evenly
    /// spaced points. A closing point equal to the start is dropped.
    pub fn points(&self, divisions: u32) -> Vec<[f32; 2]> {
        let divisions = divisions.max(1);
        let mut points = vec![self.start];
        let mut current = self.start;

        for segment in &self.segments {
            match *segment {
                Segment::Line { to } => {
                    points.push(to);
                    current = to;
                }
                Segment::Cubic { c1, c2, to } => {
                    for step in 1..=divisions {
                        let t = step as f32 / divisions as f32;
                        points.push(cubic_bezier(current, c1, c2, to, t));
                    }
                    current = to;
                }
            }
        }

        points.dedup_by(|b, a| same_point(*a, *b));
        if points.len() > 1 && same_point(points[0], points[points.len() - 1]) {
            points.pop();
        }
        points
    }
}

fn cubic_bezier(p0: [f32; 2], p1: [f32; 2], p2: [f32; 2], p3: [f32; 2], t: f32) -> [f32; 2] {
    let k = 1.0 - t;
    let b0 = k * k * k;
    let b1 = 3.0 * k * k * t;
    let b2 = 3.0 * k * t * t;
    let b3 = t * t * t;
    [
        b0 * p0[0] + b1 * p1[0] + b2 * p2[0] + b3 * p3[0],
        b0 * p0[1] + b1 * p1[1] + b2 * p2[1] + b3 * p3[1],
    ]
}

fn same_point(a: [f32; 2], b: [f32; 2]) -> bool {
    (a[0] - b[0]).abs() < 1e-6 && (a[1] - b[1]).abs() < 1e-6
}

/// Twice the signed area; positive for counter-clockwise outlines
pub fn signed_area(points: &[[f32; 2]]) -> f32 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let p = points[i];
            let q = points[(i + 1) % n];
            p[0] * q[1] - q[0] * p[1]
        })
        .sum()
}

fn cross2(o: [f32; 2], a: [f32; 2], b: [f32; 2]) -> f32 {
    (a[0] - o[0]) * (b[1] - o[1]) - (a[1] - o[1]) * (b[0] - o[0])
}

fn inside_triangle(p: [f32; 2], a: [f32; 2], b: [f32; 2], c: [f32; 2]) -> bool {
    cross2(a, b, p) >= 0.0 && cross2(b, c, p) >= 0.0 && cross2(c, a, p) >= 0.0
}

/// Ear-clipping triangulation of a simple polygon
///
/// Returns counter-clockwise triangles as indices into `points`, whatever the
/// winding of the input.
pub fn triangulate(points: &[[f32; 2]]) -> Vec<[usize; 3]> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }

    let mut ring: Vec<usize> = (0..n).collect();
    if signed_area(points) < 0.0 {
        ring.reverse();
    }

    let mut triangles = Vec::with_capacity(n - 2);

    while ring.len() > 3 {
        let m = ring.len();
        let ear = (0..m).find(|&i| {
            let prev = ring[(i + m - 1) % m];
            let cur = ring[i];
            let next = ring[(i + 1) % m];
            let (a, b, c) = (points[prev], points[cur], points[next]);

            if cross2(a, b, c) <= f32::EPSILON {
                return false;
            }

            ring.iter()
                .filter(|&&j| j != prev && j != cur && j != next)
                .all(|&j| !inside_triangle(points[j], a, b, c))
        });

        match ear {
            Some(i) => {
                let m = ring.len();
                triangles.push([ring[(i + m - 1) % m], ring[i], ring[(i + 1) % m]]);
                ring.remove(i);
            }
            // Degenerate remainder (collinear runs): fan what is left
            None => break,
        }
    }

    for k in 1..ring.len().saturating_sub(1) {
        triangles.push([ring[0], ring[k], ring[k + 1]]);
    }

    triangles
}

/// Flat fill of an outline in the XY plane facing +Z
///
/// UVs are the raw XY coordinates of each vertex.
pub fn generate_shape(path: &Path2D, curve_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();
    let points = path.points(curve_segments);

    for p in &points {
        data.push_vertex([p[0], p[1], 0.0], [0.0, 0.0, 1.0], *p);
    }
    for [a, b, c] in triangulate(&points) {
        data.push_triangle(a as u32, b as u32, c as u32);
    }

    data
}

/// Parameters for [`generate_extrude`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtrudeOptions {
    pub depth: f32,
    pub steps: u32,
    pub bevel_enabled: bool,
    pub bevel_thickness: f32,
    pub bevel_size: f32,
    pub bevel_offset: f32,
    pub bevel_segments: u32,
    pub curve_segments: u32,
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
            curve_segments: 12,
        }
    }
}

impl ExtrudeOptions {
    pub fn new(depth: f32) -> Self {
        Self {
            depth,
            ..Default::default()
        }
    }

    /// Sets the bevel thickness; the bevel size follows as `thickness - 0.1`
    pub fn with_bevel_thickness(mut self, thickness: f32) -> Self {
        self.bevel_enabled = true;
        self.bevel_thickness = thickness;
        self.bevel_size = thickness - 0.1;
        self
    }

    pub fn without_bevel(mut self) -> Self {
        self.bevel_enabled = false;
        self
    }
}

/// Extrudes an outline along +Z from `z = 0` to `z = depth`
///
/// With bevels enabled the solid grows by `bevel_thickness` on both ends and the
/// outline is inset/outset along its vertex normals across `bevel_segments`
/// layers per side. Caps and side walls use flat normals.
pub fn generate_extrude(path: &Path2D, options: &ExtrudeOptions) -> GeometryData {
    let mut data = GeometryData::new();

    let mut contour = path.points(options.curve_segments);
    if contour.len() < 3 {
        return data;
    }
    if signed_area(&contour) < 0.0 {
        contour.reverse();
    }

    let bevel_vectors = contour_bevel_vectors(&contour);
    let layer = |offset: f32, z: f32| -> Vec<[f32; 3]> {
        contour
            .iter()
            .zip(&bevel_vectors)
            .map(|(p, v)| [p[0] + v[0] * offset, p[1] + v[1] * offset, z])
            .collect()
    };

    let (bevel_segments, thickness, size, offset) = if options.bevel_enabled {
        (
            options.bevel_segments.max(1),
            options.bevel_thickness,
            options.bevel_size,
            options.bevel_offset,
        )
    } else {
        (0, 0.0, 0.0, 0.0)
    };
    let steps = options.steps.max(1);

    let mut layers: Vec<Vec<[f32; 3]>> = Vec::new();

    for b in 0..bevel_segments {
        let t = b as f32 / bevel_segments as f32;
        let z = thickness * (t * FRAC_PI_2).cos();
        let bs = size * (t * FRAC_PI_2).sin() + offset;
        layers.push(layer(bs, -z));
    }

    let full = size + offset;
    for s in 0..=steps {
        layers.push(layer(full, options.depth / steps as f32 * s as f32));
    }

    for b in (0..bevel_segments).rev() {
        let t = b as f32 / bevel_segments as f32;
        let z = thickness * (t * FRAC_PI_2).cos();
        let bs = size * (t * FRAC_PI_2).sin() + offset;
        layers.push(layer(bs, options.depth + z));
    }

    let triangles = triangulate(&contour);

    // Back cap faces -Z
    let back = &layers[0];
    let base = data.vertices.len() as u32;
    for p in back {
        data.push_vertex(*p, [0.0, 0.0, -1.0], [p[0], p[1]]);
    }
    for [a, b, c] in &triangles {
        data.push_triangle(base + *c as u32, base + *b as u32, base + *a as u32);
    }

    // Front cap faces +Z
    let front = &layers[layers.len() - 1];
    let base = data.vertices.len() as u32;
    for p in front {
        data.push_vertex(*p, [0.0, 0.0, 1.0], [p[0], p[1]]);
    }
    for [a, b, c] in &triangles {
        data.push_triangle(base + *a as u32, base + *b as u32, base + *c as u32);
    }

    push_side_walls(&mut data, &contour, &layers);

    data
}

/// Outward offset direction per contour vertex, scaled so edges move by one unit
fn contour_bevel_vectors(contour: &[[f32; 2]]) -> Vec<[f32; 2]> {
    let n = contour.len();
    let edge_normal = |a: [f32; 2], b: [f32; 2]| {
        let (dx, dy) = (b[0] - a[0], b[1] - a[1]);
        let len = (dx * dx + dy * dy).sqrt().max(f32::EPSILON);
        [dy / len, -dx / len]
    };

    (0..n)
        .map(|i| {
            let prev = contour[(i + n - 1) % n];
            let cur = contour[i];
            let next = contour[(i + 1) % n];

            let n1 = edge_normal(prev, cur);
            let n2 = edge_normal(cur, next);
            let sum = [n1[0] + n2[0], n1[1] + n2[1]];
            let len = (sum[0] * sum[0] + sum[1] * sum[1]).sqrt();
            if len <= f32::EPSILON {
                return n1;
            }
            let dir = [sum[0] / len, sum[1] / len];
            let cos_half = (dir[0] * n1[0] + dir[1] * n1[1]).max(0.1);
            [dir[0] / cos_half, dir[1] / cos_half]
        })
        .collect()
}

fn push_side_walls(data: &mut GeometryData, contour: &[[f32; 2]], layers: &[Vec<[f32; 3]>]) {
    let n = contour.len();

    let mut perimeter = vec![0.0f32; n + 1];
    for i in 0..n {
        let a = contour[i];
        let b = contour[(i + 1) % n];
        perimeter[i + 1] = perimeter[i] + ((b[0] - a[0]).powi(2) + (b[1] - a[1]).powi(2)).sqrt();
    }
    let total_length = perimeter[n].max(f32::EPSILON);

    let z_min = layers[0][0][2];
    let z_max = layers[layers.len() - 1][0][2];
    let z_span = (z_max - z_min).max(f32::EPSILON);
    let v_of = |p: [f32; 3]| (p[2] - z_min) / z_span;

    for pair in layers.windows(2) {
        let (lower, upper) = (&pair[0], &pair[1]);
        for i in 0..n {
            let j = (i + 1) % n;
            let p0 = lower[i];
            let p1 = lower[j];
            let p2 = upper[j];
            let p3 = upper[i];

            let normal = normalize(cross(sub(p1, p0), sub(p2, p0)));
            if normal == [0.0, 0.0, 0.0] {
                continue;
            }

            let u0 = perimeter[i] / total_length;
            let u1 = perimeter[i + 1] / total_length;

            let a = data.push_vertex(p0, normal, [u0, v_of(p0)]);
            let b = data.push_vertex(p1, normal, [u1, v_of(p1)]);
            let c = data.push_vertex(p2, normal, [u1, v_of(p2)]);
            let d = data.push_vertex(p3, normal, [u0, v_of(p3)]);
            data.push_triangle(a, b, c);
            data.push_triangle(a, c, d);
        }
    }
}
