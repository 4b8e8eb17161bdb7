//! # Graphics Module
//!
//! Everything between a demo's scene description and pixels on screen.
//!
//! - **Camera** ([`camera`]) - orbit camera with mouse controls
//! - **Geometry** ([`geometry`]) - procedural meshes
//! - **Scene** ([`scene`]) - objects, lights and the material registry
//! - **Resources** ([`resources`]) - materials, textures and shared uniforms
//! - **Rendering** ([`rendering`]) - shadow pass, physical and shader pipelines
//!
//! The renderer is created by [`VitrineApp`](crate::app::VitrineApp) once a
//! window exists; scenes are plain data and can be built and inspected
//! without a GPU.

pub mod camera;
pub mod color;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

pub use camera::OrbitCamera;
pub use rendering::RenderEngine;
