//! WGSL sources compiled into the crate

pub const PBR: &str = include_str!("shaders/pbr.wgsl");
pub const SHADOW_PASS: &str = include_str!("shaders/shadow_pass.wgsl");
pub const SHADER_PLANE: &str = include_str!("shaders/shader_plane.wgsl");
