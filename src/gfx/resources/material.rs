//! Materials referenced by name from scene objects
//!
//! Two kinds exist: [`PhysicalMaterial`] for lit, shadowed surfaces and
//! [`ShaderMaterial`] for a user supplied WGSL program fed with time,
//! resolution and mouse uniforms. Both own their GPU resources, which are
//! created on first use and refreshed from the CPU-side fields every frame.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use wgpu::Device;

use crate::config::LoadPolicy;
use crate::error::{ResourceKind, ResourceLoadError, Result, VitrineError};
use crate::gfx::color::Color;
use crate::gfx::rendering::shaders;
use crate::wgpu_utils::{
    binding_types, BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc,
    UniformBuffer,
};

use super::texture_resource::{MapKind, TextureImage, TextureResource};

/// Materials are addressed by their unique name
pub type MaterialId = String;

/// Must match `MaterialUniform` in `pbr.wgsl`
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PhysicalUniform {
    /// Linear base color, alpha 1
    pub base_color: [f32; 4],
    pub roughness: f32,
    pub metalness: f32,
    pub reflectivity: f32,
    pub clearcoat: f32,
    pub clearcoat_roughness: f32,
    pub bump_scale: f32,
    pub normal_scale: f32,
    /// Bit per present map, in [`TextureMaps`] field order
    pub map_flags: u32,
}

/// Optional surface maps of a physical material
#[derive(Debug, Clone, Default)]
pub struct TextureMaps {
    pub base_color: Option<TextureImage>,
    pub bump: Option<TextureImage>,
    pub normal: Option<TextureImage>,
    pub roughness: Option<TextureImage>,
    pub ambient_occlusion: Option<TextureImage>,
}

impl TextureMaps {
    pub const BASE_COLOR: u32 = 1;
    pub const BUMP: u32 = 1 << 1;
    pub const NORMAL: u32 = 1 << 2;
    pub const ROUGHNESS: u32 = 1 << 3;
    pub const AMBIENT_OCCLUSION: u32 = 1 << 4;

    fn slots(&self) -> [(MapKind, Option<&TextureImage>); 5] {
        [
            (MapKind::BaseColor, self.base_color.as_ref()),
            (MapKind::Bump, self.bump.as_ref()),
            (MapKind::Normal, self.normal.as_ref()),
            (MapKind::Roughness, self.roughness.as_ref()),
            (MapKind::AmbientOcclusion, self.ambient_occlusion.as_ref()),
        ]
    }

    pub fn flags(&self) -> u32 {
        self.slots()
            .iter()
            .enumerate()
            .filter(|(_, (_, map))| map.is_some())
            .fold(0, |flags, (bit, _)| flags | (1 << bit))
    }
}

struct PhysicalGpuResources {
    ubo: UniformBuffer<PhysicalUniform>,
    // Kept alive for the bind group
    _textures: Vec<TextureResource>,
    bind_group: wgpu::BindGroup,
}

/// Physically based surface: GGX specular with an optional clearcoat layer
pub struct PhysicalMaterial {
    pub name: String,
    /// Authored sRGB color
    pub color: Color,
    pub roughness: f32,
    pub metalness: f32,
    pub reflectivity: f32,
    pub clearcoat: f32,
    pub clearcoat_roughness: f32,
    pub bump_scale: f32,
    pub normal_scale: f32,
    pub maps: TextureMaps,
    gpu: Option<PhysicalGpuResources>,
}

impl PhysicalMaterial {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: Color::WHITE,
            roughness: 1.0,
            metalness: 0.0,
            reflectivity: 0.5,
            clearcoat: 0.0,
            clearcoat_roughness: 0.0,
            bump_scale: 1.0,
            normal_scale: 1.0,
            maps: TextureMaps::default(),
            gpu: None,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    pub fn with_metalness(mut self, metalness: f32) -> Self {
        self.metalness = metalness.clamp(0.0, 1.0);
        self
    }

    pub fn with_reflectivity(mut self, reflectivity: f32) -> Self {
        self.reflectivity = reflectivity.clamp(0.0, 1.0);
        self
    }

    pub fn with_clearcoat(mut self, clearcoat: f32, roughness: f32) -> Self {
        self.clearcoat = clearcoat.clamp(0.0, 1.0);
        self.clearcoat_roughness = roughness.clamp(0.0, 1.0);
        self
    }

    pub fn with_maps(mut self, maps: TextureMaps) -> Self {
        self.maps = maps;
        self
    }

    pub fn uniform(&self) -> PhysicalUniform {
        PhysicalUniform {
            base_color: self.color.to_linear_scaled(1.0),
            roughness: self.roughness,
            metalness: self.metalness,
            reflectivity: self.reflectivity,
            clearcoat: self.clearcoat,
            clearcoat_roughness: self.clearcoat_roughness,
            bump_scale: self.bump_scale,
            normal_scale: self.normal_scale,
            map_flags: self.maps.flags(),
        }
    }

    /// Uniform buffer, one texture per map slot, then a shared sampler
    pub fn bind_group_layout(device: &Device) -> BindGroupLayoutWithDesc {
        BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::uniform())
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Filtering))
            .create(device, "Physical Material Layout")
    }

    fn init_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        layout: &BindGroupLayoutWithDesc,
    ) {
        let ubo = UniformBuffer::new_with_data(device, &self.uniform());
        let textures: Vec<TextureResource> = self
            .maps
            .slots()
            .into_iter()
            .map(|(kind, map)| match map {
                Some(image) => TextureResource::from_image(device, queue, image),
                None => TextureResource::from_image(
                    device,
                    queue,
                    &TextureImage::neutral(kind, format!("{} {:?} (none)", self.name, kind)),
                ),
            })
            .collect();

        let bind_group = textures
            .iter()
            .fold(
                BindGroupBuilder::new(layout).resource(ubo.binding_resource()),
                |builder, texture| builder.texture(&texture.view),
            )
            .sampler(&textures[0].sampler)
            .create(device, &format!("{} Material", self.name));

        self.gpu = Some(PhysicalGpuResources {
            ubo,
            _textures: textures,
            bind_group,
        });
    }
}

/// Uniforms every shader material receives. Must match `ShaderUniforms` in WGSL.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShaderUniforms {
    /// Seconds, starting at 1.0
    pub time: f32,
    _pad0: f32,
    /// Drawable size in pixels
    pub resolution: [f32; 2],
    /// Cursor position in pixels, origin top left
    pub mouse: [f32; 2],
    _pad1: [f32; 2],
}

impl Default for ShaderUniforms {
    fn default() -> Self {
        Self {
            time: 1.0,
            _pad0: 0.0,
            resolution: [0.0; 2],
            mouse: [0.0; 2],
            _pad1: [0.0; 2],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShaderSource {
    /// The animated gradient shipped with the crate
    Builtin,
    /// WGSL read from a file at startup
    File { path: PathBuf, code: String },
}

struct ShaderGpuResources {
    ubo: UniformBuffer<ShaderUniforms>,
    bind_group: wgpu::BindGroup,
}

/// Custom WGSL program drawn with `vs_main`/`fs_main`, uniforms at group 0
pub struct ShaderMaterial {
    pub name: String,
    pub uniforms: ShaderUniforms,
    pub source: ShaderSource,
    gpu: Option<ShaderGpuResources>,
}

impl ShaderMaterial {
    pub fn builtin(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uniforms: ShaderUniforms::default(),
            source: ShaderSource::Builtin,
            gpu: None,
        }
    }

    /// Reads WGSL from `path`. Under [`LoadPolicy::Fallback`] an unreadable
    /// file falls back to the built-in shader with a warning.
    pub fn from_file(
        name: impl Into<String>,
        path: &Path,
        policy: LoadPolicy,
    ) -> std::result::Result<Self, ResourceLoadError> {
        let name = name.into();
        match std::fs::read_to_string(path) {
            Ok(code) => {
                log::info!("using shader {}", path.display());
                Ok(Self {
                    source: ShaderSource::File {
                        path: path.to_path_buf(),
                        code,
                    },
                    ..Self::builtin(name)
                })
            }
            Err(err) => {
                let err = ResourceLoadError::new(ResourceKind::Shader, path, err);
                match policy {
                    LoadPolicy::FailFast => Err(err),
                    LoadPolicy::Fallback => {
                        log::warn!("{err}; using the built-in shader");
                        Ok(Self::builtin(name))
                    }
                }
            }
        }
    }

    pub fn code(&self) -> &str {
        match &self.source {
            ShaderSource::Builtin => shaders::SHADER_PLANE,
            ShaderSource::File { code, .. } => code,
        }
    }

    pub fn bind_group_layout(device: &Device) -> BindGroupLayoutWithDesc {
        BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Shader Material Layout")
    }

    fn init_gpu_resources(&mut self, device: &Device, layout: &BindGroupLayoutWithDesc) {
        let ubo = UniformBuffer::new_with_data(device, &self.uniforms);
        let bind_group = BindGroupBuilder::new(layout)
            .resource(ubo.binding_resource())
            .create(device, &format!("{} Shader Uniforms", self.name));
        self.gpu = Some(ShaderGpuResources { ubo, bind_group });
    }
}

pub enum Material {
    Physical(PhysicalMaterial),
    Shader(ShaderMaterial),
}

impl Material {
    pub fn name(&self) -> &str {
        match self {
            Material::Physical(material) => &material.name,
            Material::Shader(material) => &material.name,
        }
    }

    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        match self {
            Material::Physical(material) => material.gpu.as_ref().map(|gpu| &gpu.bind_group),
            Material::Shader(material) => material.gpu.as_ref().map(|gpu| &gpu.bind_group),
        }
    }
}

/// Layouts shared by all materials of each kind
pub struct MaterialLayouts {
    pub physical: BindGroupLayoutWithDesc,
    pub shader: BindGroupLayoutWithDesc,
}

impl MaterialLayouts {
    pub fn new(device: &Device) -> Self {
        Self {
            physical: PhysicalMaterial::bind_group_layout(device),
            shader: ShaderMaterial::bind_group_layout(device),
        }
    }
}

/// Central material storage keyed by name
#[derive(Default)]
pub struct MaterialManager {
    materials: HashMap<MaterialId, Material>,
}

impl MaterialManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a physical material
    pub fn add_physical(&mut self, material: PhysicalMaterial) -> MaterialId {
        let id = material.name.clone();
        self.materials.insert(id.clone(), Material::Physical(material));
        id
    }

    /// Adds or replaces a shader material
    pub fn add_shader(&mut self, material: ShaderMaterial) -> MaterialId {
        let id = material.name.clone();
        self.materials.insert(id.clone(), Material::Shader(material));
        id
    }

    pub fn get(&self, id: &str) -> Option<&Material> {
        self.materials.get(id)
    }

    pub fn physical(&self, id: &str) -> Result<&PhysicalMaterial> {
        match self.materials.get(id) {
            Some(Material::Physical(material)) => Ok(material),
            _ => Err(VitrineError::UnknownMaterial(id.to_string())),
        }
    }

    pub fn physical_mut(&mut self, id: &str) -> Result<&mut PhysicalMaterial> {
        match self.materials.get_mut(id) {
            Some(Material::Physical(material)) => Ok(material),
            _ => Err(VitrineError::UnknownMaterial(id.to_string())),
        }
    }

    pub fn shader(&self, id: &str) -> Result<&ShaderMaterial> {
        match self.materials.get(id) {
            Some(Material::Shader(material)) => Ok(material),
            _ => Err(VitrineError::UnknownMaterial(id.to_string())),
        }
    }

    pub fn shader_mut(&mut self, id: &str) -> Result<&mut ShaderMaterial> {
        match self.materials.get_mut(id) {
            Some(Material::Shader(material)) => Ok(material),
            _ => Err(VitrineError::UnknownMaterial(id.to_string())),
        }
    }

    /// Names of all materials, sorted
    pub fn list(&self) -> Vec<&MaterialId> {
        let mut ids: Vec<_> = self.materials.keys().collect();
        ids.sort();
        ids
    }

    pub fn shader_materials(&self) -> impl Iterator<Item = &ShaderMaterial> {
        self.materials.values().filter_map(|material| match material {
            Material::Shader(shader) => Some(shader),
            Material::Physical(_) => None,
        })
    }

    /// Creates missing GPU resources and uploads changed uniforms
    pub fn update_all_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        layouts: &MaterialLayouts,
    ) {
        for material in self.materials.values_mut() {
            match material {
                Material::Physical(physical) => {
                    if physical.gpu.is_none() {
                        physical.init_gpu_resources(device, queue, &layouts.physical);
                    }
                    let uniform = physical.uniform();
                    if let Some(gpu) = physical.gpu.as_mut() {
                        gpu.ubo.update_content(queue, uniform);
                    }
                }
                Material::Shader(shader) => {
                    if shader.gpu.is_none() {
                        shader.init_gpu_resources(device, &layouts.shader);
                    }
                    let uniforms = shader.uniforms;
                    if let Some(gpu) = shader.gpu.as_mut() {
                        gpu.ubo.update_content(queue, uniforms);
                    }
                }
            }
        }
    }
}
