//! GPU resources shared across draws: global uniforms, materials and textures

pub mod global_bindings;
pub mod material;
pub mod texture_resource;

pub use global_bindings::{GlobalBindings, GlobalUniform};
pub use material::{
    Material, MaterialId, MaterialLayouts, MaterialManager, PhysicalMaterial, ShaderMaterial,
    TextureMaps,
};
pub use texture_resource::{MapKind, TextureImage, TextureResource};
