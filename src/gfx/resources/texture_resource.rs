//! Textures: decoded images on the CPU side, GPU textures on the other
//!
//! Images are decoded with the `image` crate while the scene is built, before
//! any GPU exists, so missing or broken files surface at startup. Uploading
//! happens lazily when the renderer first sees the material.

use std::path::Path;

use image::RgbaImage;
use wgpu::util::DeviceExt;

use crate::config::LoadPolicy;
use crate::error::{ResourceKind, ResourceLoadError};

/// Role of a texture in a physical material
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapKind {
    BaseColor,
    Bump,
    Normal,
    Roughness,
    AmbientOcclusion,
}

impl MapKind {
    /// Texel that leaves shading unchanged when sampled
    pub fn neutral_texel(self) -> [u8; 4] {
        match self {
            MapKind::Normal => [128, 128, 255, 255],
            MapKind::Bump => [128, 128, 128, 255],
            MapKind::BaseColor | MapKind::Roughness | MapKind::AmbientOcclusion => {
                [255, 255, 255, 255]
            }
        }
    }

    /// Only color maps are stored in sRGB
    pub fn format(self) -> wgpu::TextureFormat {
        match self {
            MapKind::BaseColor => wgpu::TextureFormat::Rgba8UnormSrgb,
            _ => wgpu::TextureFormat::Rgba8Unorm,
        }
    }
}

/// A decoded RGBA8 image waiting to be uploaded
#[derive(Debug, Clone)]
pub struct TextureImage {
    pub label: String,
    pub kind: MapKind,
    pub image: RgbaImage,
}

impl TextureImage {
    /// 1x1 image of the neutral texel for `kind`
    pub fn neutral(kind: MapKind, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind,
            image: RgbaImage::from_pixel(1, 1, image::Rgba(kind.neutral_texel())),
        }
    }

    /// Reads and decodes `path`, failing with a [`ResourceLoadError`]
    pub fn load(path: &Path, kind: MapKind) -> Result<Self, ResourceLoadError> {
        let image = image::open(path)
            .map_err(|err| ResourceLoadError::new(ResourceKind::Texture, path, err))?
            .to_rgba8();
        log::debug!(
            "decoded {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        Ok(Self {
            label: path.display().to_string(),
            kind,
            image,
        })
    }

    /// Loads `path`, substituting a neutral texel under [`LoadPolicy::Fallback`]
    pub fn load_with_policy(
        path: &Path,
        kind: MapKind,
        policy: LoadPolicy,
    ) -> Result<Self, ResourceLoadError> {
        match (Self::load(path, kind), policy) {
            (Ok(texture), _) => Ok(texture),
            (Err(err), LoadPolicy::Fallback) => {
                log::warn!("{err}; using a neutral placeholder");
                Ok(Self::neutral(kind, path.display().to_string()))
            }
            (Err(err), LoadPolicy::FailFast) => Err(err),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// GPU texture with its view and sampler
pub struct TextureResource {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl TextureResource {
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Depth attachment for the main pass
    pub fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32, label: &str) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Square depth map sampled with a comparison sampler for PCF
    pub fn create_shadow_map(device: &wgpu::Device, size: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Shadow Map"),
            size: wgpu::Extent3d {
                width: size,
                height: size,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Shadow Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Uploads a decoded image in the format its map kind calls for
    pub fn from_image(device: &wgpu::Device, queue: &wgpu::Queue, image: &TextureImage) -> Self {
        let (width, height) = image.dimensions();
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(&image.label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: image.kind.format(),
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            image.image.as_raw(),
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", image.label)),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }
}
