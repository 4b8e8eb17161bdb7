//! # Procedural Geometry Generation
//!
//! Every mesh in the demos is generated in code, so no model files are needed.
//!
//! ## Supported Primitives
//!
//! - **Cube**: unit cube with per-face normals
//! - **Plane**: flat rectangle in the XY plane facing +Z
//! - **Torus knot**: (p, q) torus knot tube
//!
//! ## Usage
//!
//! ```rust
//! use vitrine::gfx::geometry::{generate_cube, generate_plane, generate_torus_knot, TorusKnot};
//!
//! let cube = generate_cube();
//! let floor = generate_plane(6.0, 6.0, 1, 1);
//! let knot = generate_torus_knot(&TorusKnot::default());
//! assert!(knot.triangle_count() > cube.triangle_count());
//! ```

pub mod primitives;

pub use primitives::*;

use crate::gfx::scene::vertex::Vertex3D;

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v), v pointing down the image
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Interleaves the attribute streams into GPU vertices
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, &position)| Vertex3D {
                position,
                normal: self.normals.get(i).copied().unwrap_or([0.0, 0.0, 1.0]),
                tex_coords: self.tex_coords.get(i).copied().unwrap_or([0.0, 0.0]),
            })
            .collect()
    }
}
