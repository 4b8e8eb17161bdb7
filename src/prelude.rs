//! Common imports for writing a demo
//!
//! ```rust
//! use vitrine::prelude::*;
//!
//! let mut scene = Scene::new_screen();
//! scene.add_light(Light::ambient("ambient", Color::from_hex(0x404040), 1.0));
//! assert_eq!(scene.lights().count(), 1);
//! ```

pub use crate::config::{DemoConfig, LoadPolicy};
pub use crate::controls::{
    ControlPanel, ControlValue, Conversion, LightField, MaterialField, Property,
};
pub use crate::demos::{BasicDemo, Demo, DemoSetup, PhysicalDemo, ShaderDemo};
pub use crate::error::{Result, VitrineError};
pub use crate::gfx::color::Color;
pub use crate::gfx::geometry::{
    generate_cube, generate_plane, generate_torus_knot, GeometryData, TorusKnot,
};
pub use crate::gfx::resources::{PhysicalMaterial, ShaderMaterial};
pub use crate::gfx::scene::{Light, Object, Scene, ShadowConfig};
pub use crate::runtime::AnimationRules;
pub use crate::session::DemoSession;
pub use crate::viewport::{PixelRatio, ResizeTarget};

pub use cgmath::Vector3;
