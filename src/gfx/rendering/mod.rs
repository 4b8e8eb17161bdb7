//! Frame rendering on wgpu
//!
//! Named pipelines, the built-in WGSL sources and the engine that draws a
//! [`Scene`](crate::gfx::scene::Scene) into a window surface or an offscreen
//! snapshot target.

pub mod pipeline_manager;
pub mod render_engine;
pub mod shaders;
pub mod surface;

pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::{RenderEngine, RenderOptions};
pub use surface::RenderSurface;
