//! # Primitive Shape Generation
//!
//! All shapes are generated with outward normals, texture coordinates and
//! counter-clockwise front faces.

use super::GeometryData;
use std::f32::consts::PI;

/// Generate a unit cube centered at the origin
///
/// Returns a cube with vertices from -0.5 to 0.5 on all axes.
/// Each face has its own four vertices so normals stay flat.
#[rustfmt::skip]
pub fn generate_cube() -> GeometryData {
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
        [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0],
        [1.0, 1.0], [1.0, 0.0], [0.0, 0.0], [0.0, 1.0],
        [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0],
        [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0],
        [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0],
        [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0],
    ];

    let face_normals: [[f32; 3]; 6] = [
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
        [-1.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
    ];

    let mut data = GeometryData::new();
    data.vertices = positions.to_vec();
    data.tex_coords = tex_coords.to_vec();
    data.normals = face_normals.iter().flat_map(|n| [*n; 4]).collect();

    for face in 0..6u32 {
        let base = face * 4;
        data.indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    data
}

/// Generate a plane in the XY plane
///
/// # Arguments
/// * `width` - Width of the plane (X direction)
/// * `height` - Height of the plane (Y direction)
/// * `width_segments` - Number of subdivisions along width
/// * `height_segments` - Number of subdivisions along height
///
/// Returns a plane centered at the origin facing +Z.
pub fn generate_plane(
    width: f32,
    height: f32,
    width_segments: u32,
    height_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let w_segs = width_segments.max(1);
    let h_segs = height_segments.max(1);

    for y in 0..=h_segs {
        let v = y as f32 / h_segs as f32;
        let pos_y = (v - 0.5) * height;

        for x in 0..=w_segs {
            let u = x as f32 / w_segs as f32;
            let pos_x = (u - 0.5) * width;

            data.vertices.push([pos_x, pos_y, 0.0]);
            data.normals.push([0.0, 0.0, 1.0]);
            // Image rows run top to bottom
            data.tex_coords.push([u, 1.0 - v]);
        }
    }

    for y in 0..h_segs {
        for x in 0..w_segs {
            let i = y * (w_segs + 1) + x;
            let next_row = i + w_segs + 1;

            data.indices.extend_from_slice(&[i, i + 1, next_row]);
            data.indices.extend_from_slice(&[i + 1, next_row + 1, next_row]);
        }
    }

    data
}

/// Parameters of a (p, q) torus knot tube
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorusKnot {
    pub radius: f32,
    pub tube: f32,
    pub tubular_segments: u32,
    pub radial_segments: u32,
    /// Windings around the axis of rotational symmetry
    pub p: u32,
    /// Windings around the interior circle of the torus
    pub q: u32,
}

impl Default for TorusKnot {
    fn default() -> Self {
        Self {
            radius: 1.0,
            tube: 0.4,
            tubular_segments: 64,
            radial_segments: 8,
            p: 2,
            q: 3,
        }
    }
}

/// Generate a torus knot tube centered at the origin
pub fn generate_torus_knot(knot: &TorusKnot) -> GeometryData {
    let mut data = GeometryData::new();

    let tubular = knot.tubular_segments.max(3);
    let radial = knot.radial_segments.max(3);
    let p = knot.p.max(1) as f32;
    let q = knot.q as f32;

    let curve = |u: f32| -> [f32; 3] {
        let q_over_p = q / p * u;
        let cs = q_over_p.cos();
        [
            knot.radius * (2.0 + cs) * 0.5 * u.cos(),
            knot.radius * (2.0 + cs) * 0.5 * u.sin(),
            knot.radius * q_over_p.sin() * 0.5,
        ]
    };

    for i in 0..=tubular {
        let u = i as f32 / tubular as f32 * p * PI * 2.0;

        let p1 = curve(u);
        let p2 = curve(u + 0.01);

        // Frenet-like frame along the curve
        let tangent = sub(p2, p1);
        let mut normal = add(p2, p1);
        let binormal = normalize(cross(tangent, normal));
        normal = normalize(cross(binormal, tangent));

        for j in 0..=radial {
            let v = j as f32 / radial as f32 * PI * 2.0;
            let cx = -knot.tube * v.cos();
            let cy = knot.tube * v.sin();

            let position = [
                p1[0] + cx * normal[0] + cy * binormal[0],
                p1[1] + cx * normal[1] + cy * binormal[1],
                p1[2] + cx * normal[2] + cy * binormal[2],
            ];

            data.vertices.push(position);
            data.normals.push(normalize(sub(position, p1)));
            data.tex_coords
                .push([i as f32 / tubular as f32, j as f32 / radial as f32]);
        }
    }

    let stride = radial + 1;
    for j in 1..=tubular {
        for i in 1..=radial {
            let a = stride * (j - 1) + (i - 1);
            let b = stride * j + (i - 1);
            let c = stride * j + i;
            let d = stride * (j - 1) + i;

            data.indices.extend_from_slice(&[a, b, d]);
            data.indices.extend_from_slice(&[b, c, d]);
        }
    }

    data
}

fn add(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let length = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if length > 0.0 {
        [v[0] / length, v[1] / length, v[2] / length]
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    /// Every triangle's geometric normal must agree with its vertex normals
    fn assert_front_faces_outward(data: &GeometryData) {
        for tri in data.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| i as usize);
            let face = cross(
                sub(data.vertices[b], data.vertices[a]),
                sub(data.vertices[c], data.vertices[a]),
            );
            let normal = add(add(data.normals[a], data.normals[b]), data.normals[c]);
            assert!(dot(face, normal) > 0.0, "triangle {tri:?} winds clockwise");
        }
    }

    #[test]
    fn test_cube_generation() {
        let cube = generate_cube();
        assert_eq!(cube.vertices.len(), 24); // 6 faces * 4 vertices
        assert_eq!(cube.indices.len(), 36); // 6 faces * 2 triangles * 3 indices
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.triangle_count(), 12);
        assert_front_faces_outward(&cube);
    }

    #[test]
    fn test_plane_generation() {
        let plane = generate_plane(2.0, 2.0, 2, 2);
        assert_eq!(plane.vertices.len(), 9); // 3x3 grid
        assert_eq!(plane.indices.len(), 24); // 4 quads * 2 triangles * 3 indices
        assert_front_faces_outward(&plane);
    }

    #[test]
    fn test_plane_extent_and_uvs() {
        let plane = generate_plane(6.0, 6.0, 1, 1);
        assert_eq!(plane.vertices[0], [-3.0, -3.0, 0.0]);
        assert_eq!(plane.vertices[3], [3.0, 3.0, 0.0]);
        // Bottom-left corner samples the bottom-left of the image
        assert_eq!(plane.tex_coords[0], [0.0, 1.0]);
        assert_eq!(plane.tex_coords[3], [1.0, 0.0]);
    }

    #[test]
    fn test_torus_knot_generation() {
        let knot = TorusKnot {
            radius: 0.75,
            tube: 0.25,
            tubular_segments: 100,
            radial_segments: 16,
            p: 2,
            q: 3,
        };
        let data = generate_torus_knot(&knot);

        assert_eq!(data.vertex_count(), 101 * 17);
        assert_eq!(data.triangle_count(), 100 * 16 * 2);
        assert_eq!(data.vertices.len(), data.normals.len());
        assert_eq!(data.vertices.len(), data.tex_coords.len());
        assert!(data
            .indices
            .iter()
            .all(|&i| (i as usize) < data.vertex_count()));
        assert_front_faces_outward(&data);
    }

    #[test]
    fn test_torus_knot_normals_are_unit_length() {
        let data = generate_torus_knot(&TorusKnot::default());
        for n in &data.normals {
            assert!((dot(*n, *n) - 1.0).abs() < 1e-4);
        }
    }
}
