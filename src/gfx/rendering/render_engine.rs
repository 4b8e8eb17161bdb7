//! wgpu renderer for vitrine scenes
//!
//! A frame is a shadow pass from the casting point light followed by one main
//! pass drawing every visible object with the pipeline its material needs:
//! the shared physical pipeline or a per-material shader pipeline. The same
//! passes can be encoded into an offscreen target and read back for
//! snapshots.

use image::RgbaImage;
use wgpu::TextureFormat;

use crate::error::{Result, VitrineError};
use crate::gfx::{
    resources::{GlobalBindings, Material, MaterialLayouts, TextureResource},
    scene::{DrawObject, Scene},
};
use crate::wgpu_utils::{binding_types, BindGroupLayoutBuilder, BindGroupLayoutWithDesc};

use super::pipeline_manager::{PipelineConfig, PipelineManager};
use super::shaders;
use super::surface::RenderSurface;

const PBR_PIPELINE: &str = "pbr";
const SHADOW_PIPELINE: &str = "shadow";

/// Surface settings chosen per demo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub vsync: bool,
    /// Present through an sRGB surface so linear shader output is encoded
    pub srgb: bool,
    pub shadow_map_size: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            vsync: true,
            srgb: true,
            shadow_map_size: 512,
        }
    }
}

pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    format: TextureFormat,
    depth_texture: TextureResource,
    shadow_map: TextureResource,
    pipeline_manager: PipelineManager,
    global_bindings: GlobalBindings,
    transform_layout: BindGroupLayoutWithDesc,
    material_layouts: MaterialLayouts,
}

impl RenderEngine {
    /// Creates the device, configures the surface and builds the fixed pipelines
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        options: RenderOptions,
    ) -> Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .map_err(|err| VitrineError::Surface(err.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|err| VitrineError::AdapterNotFound(err.to_string()))?;
        log::info!("using adapter {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("vitrine device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|err| VitrineError::DeviceCreation(err.to_string()))?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = choose_surface_format(&surface_capabilities.formats, options.srgb)
            .ok_or_else(|| VitrineError::Surface("surface reports no formats".into()))?;
        log::debug!("surface format {:?}", format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: present_mode(options.vsync),
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, config.width, config.height, "Depth");
        let shadow_map = TextureResource::create_shadow_map(&device, options.shadow_map_size);
        let global_bindings = GlobalBindings::new(&device, &shadow_map);
        let transform_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(&device, "Transform Layout");
        let material_layouts = MaterialLayouts::new(&device);

        let mut pipeline_manager = PipelineManager::new(device.clone());
        pipeline_manager.load_shader(PBR_PIPELINE, shaders::PBR)?;
        pipeline_manager.load_shader(SHADOW_PIPELINE, shaders::SHADOW_PASS)?;

        pipeline_manager.register_pipeline(
            SHADOW_PIPELINE,
            PipelineConfig::default_with_shader(SHADOW_PIPELINE)
                .with_vertex_only()
                .with_depth_format(TextureResource::DEPTH_FORMAT)
                .with_depth_bias(2, 2.0)
                .with_cull_mode(None)
                .with_bind_group_layouts(vec![
                    global_bindings.shadow_layout().clone(),
                    transform_layout.layout.clone(),
                ]),
        );
        pipeline_manager.register_pipeline(
            PBR_PIPELINE,
            PipelineConfig::default_with_shader(PBR_PIPELINE)
                .with_color_format(format)
                .with_depth_format(TextureResource::DEPTH_FORMAT)
                .with_bind_group_layouts(vec![
                    global_bindings.layout().clone(),
                    transform_layout.layout.clone(),
                    material_layouts.physical.layout.clone(),
                ]),
        );
        pipeline_manager.ensure_pipeline(SHADOW_PIPELINE)?;
        pipeline_manager.ensure_pipeline(PBR_PIPELINE)?;

        Ok(RenderEngine {
            surface,
            device,
            queue,
            config,
            format,
            depth_texture,
            shadow_map,
            pipeline_manager,
            global_bindings,
            transform_layout,
            material_layouts,
        })
    }

    /// Creates missing GPU resources and uploads this frame's uniforms
    ///
    /// Shader materials get their pipeline here, so a custom shader that does
    /// not validate is reported the first time the scene is prepared.
    pub fn prepare(&mut self, scene: &mut Scene) -> Result<()> {
        scene.update();

        for object in scene.objects_mut() {
            if !object.has_gpu_resources() {
                object.init_gpu_resources(&self.device, &self.transform_layout);
            }
            object.update_transform(&self.queue);
        }

        scene.material_manager.update_all_gpu_resources(
            &self.device,
            &self.queue,
            &self.material_layouts,
        );

        for shader in scene.material_manager.shader_materials() {
            let key = shader_pipeline_name(&shader.name);
            if self.pipeline_manager.has_pipeline(&key) {
                continue;
            }
            self.pipeline_manager.load_shader(&key, shader.code())?;
            self.pipeline_manager.register_pipeline(
                &key,
                PipelineConfig::default_with_shader(&key)
                    .with_color_format(self.format)
                    .with_depth_format(TextureResource::DEPTH_FORMAT)
                    .with_cull_mode(None)
                    .with_bind_group_layouts(vec![
                        self.material_layouts.shader.layout.clone(),
                        self.transform_layout.layout.clone(),
                    ]),
            );
            self.pipeline_manager.ensure_pipeline(&key)?;
        }

        self.global_bindings.update(&self.queue, scene);
        Ok(())
    }

    /// Renders one frame to the surface, then lets `ui_callback` draw on top
    pub fn render_frame<F>(&mut self, scene: &mut Scene, ui_callback: F) -> Result<()>
    where
        F: FnOnce(
            &wgpu::Device,
            &wgpu::Queue,
            &mut wgpu::CommandEncoder,
            &wgpu::TextureView,
        ) -> Result<()>,
    {
        self.prepare(scene)?;

        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Err(VitrineError::Surface(
                    "surface lost, reconfigured for the next frame".into(),
                ));
            }
            Err(err) => return Err(VitrineError::Surface(err.to_string())),
        };
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });
        self.encode_scene(&mut encoder, scene, &view, &self.depth_texture.view);
        ui_callback(&self.device, &self.queue, &mut encoder, &view)?;

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    fn encode_scene(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        scene: &Scene,
        color_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
    ) {
        let casts_shadow = scene.lights().any(|light| light.shadow().is_some());
        if casts_shadow {
            let mut shadow_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shadow Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.shadow_map.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some(pipeline) = self.pipeline_manager.pipeline(SHADOW_PIPELINE) {
                shadow_pass.set_pipeline(pipeline);
                shadow_pass.set_bind_group(0, self.global_bindings.shadow_bind_group(), &[]);
                for (_, object) in scene.objects() {
                    if object.visible && object.cast_shadow {
                        shadow_pass.draw_object(object);
                    }
                }
            }
        }

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Main Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(scene.background.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        for (_, object) in scene.objects() {
            if !object.visible {
                continue;
            }
            let Some(material) = scene.material_manager.get(&object.material) else {
                log::debug!("'{}' has no material '{}'", object.name, object.material);
                continue;
            };
            let Some(material_bind_group) = material.bind_group() else {
                continue;
            };

            match material {
                Material::Physical(_) => {
                    let Some(pipeline) = self.pipeline_manager.pipeline(PBR_PIPELINE) else {
                        continue;
                    };
                    render_pass.set_pipeline(pipeline);
                    render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);
                    render_pass.set_bind_group(2, material_bind_group, &[]);
                }
                Material::Shader(shader) => {
                    let key = shader_pipeline_name(&shader.name);
                    let Some(pipeline) = self.pipeline_manager.pipeline(&key) else {
                        continue;
                    };
                    render_pass.set_pipeline(pipeline);
                    render_pass.set_bind_group(0, material_bind_group, &[]);
                }
            }
            render_pass.draw_object(object);
        }
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> TextureFormat {
        self.format
    }

    pub fn pipeline_manager(&self) -> &PipelineManager {
        &self.pipeline_manager
    }
}

impl RenderSurface for RenderEngine {
    /// Reconfigures the surface and depth buffer; zero sizes are ignored
    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture = TextureResource::create_depth_texture(&self.device, width, height, "Depth");
    }

    fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Renders the scene offscreen at surface size and reads the pixels back
    fn capture(&mut self, scene: &mut Scene) -> Result<RgbaImage> {
        self.prepare(scene)?;

        let (width, height) = self.size();
        let swap_red_blue = match self.format {
            TextureFormat::Bgra8Unorm | TextureFormat::Bgra8UnormSrgb => true,
            TextureFormat::Rgba8Unorm | TextureFormat::Rgba8UnormSrgb => false,
            other => {
                return Err(VitrineError::Readback(format!(
                    "cannot read back {:?} surfaces",
                    other
                )))
            }
        };

        let extent = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let target = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Snapshot Target"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = target.create_view(&wgpu::TextureViewDescriptor::default());

        let unpadded_row = width * 4;
        let padded_row = padded_bytes_per_row(width);
        let readback = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Snapshot Readback"),
            size: padded_row as u64 * height as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Snapshot Encoder"),
            });
        self.encode_scene(&mut encoder, scene, &view, &self.depth_texture.view);
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &target,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &readback,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row),
                    rows_per_image: Some(height),
                },
            },
            extent,
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        let slice = readback.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        self.device
            .poll(wgpu::PollType::Wait)
            .map_err(|err| VitrineError::Readback(err.to_string()))?;
        rx.recv()
            .map_err(|err| VitrineError::Readback(err.to_string()))?
            .map_err(|err| VitrineError::Readback(err.to_string()))?;

        let pixels = {
            let mapped = slice.get_mapped_range();
            unpad_rows(&mapped, unpadded_row, padded_row, swap_red_blue)
        };
        readback.unmap();

        RgbaImage::from_raw(width, height, pixels)
            .ok_or_else(|| VitrineError::Readback("pixel buffer size mismatch".into()))
    }
}

fn shader_pipeline_name(material: &str) -> String {
    format!("shader:{}", material)
}

fn present_mode(vsync: bool) -> wgpu::PresentMode {
    if vsync {
        wgpu::PresentMode::AutoVsync
    } else {
        wgpu::PresentMode::AutoNoVsync
    }
}

/// Prefers 8-bit RGBA/BGRA formats with the requested sRGB-ness
fn choose_surface_format(formats: &[TextureFormat], srgb: bool) -> Option<TextureFormat> {
    let eight_bit = |format: &&TextureFormat| {
        matches!(
            format,
            TextureFormat::Bgra8Unorm
                | TextureFormat::Bgra8UnormSrgb
                | TextureFormat::Rgba8Unorm
                | TextureFormat::Rgba8UnormSrgb
        )
    };
    formats
        .iter()
        .filter(eight_bit)
        .find(|format| format.is_srgb() == srgb)
        .or_else(|| formats.iter().find(|format| format.is_srgb() == srgb))
        .or_else(|| formats.first())
        .copied()
}

fn padded_bytes_per_row(width: u32) -> u32 {
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    (width * 4).div_ceil(align) * align
}

/// Strips row padding and converts BGRA to RGBA when asked
fn unpad_rows(data: &[u8], unpadded_row: u32, padded_row: u32, swap_red_blue: bool) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(data.len());
    for row in data.chunks(padded_row as usize) {
        pixels.extend_from_slice(&row[..unpadded_row as usize]);
    }
    if swap_red_blue {
        for pixel in pixels.chunks_exact_mut(4) {
            pixel.swap(0, 2);
        }
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_are_padded_to_alignment() {
        assert_eq!(padded_bytes_per_row(64), 256);
        assert_eq!(padded_bytes_per_row(65), 512);
        assert_eq!(padded_bytes_per_row(1), 256);
    }

    #[test]
    fn test_unpad_and_swizzle() {
        // 1x2 image with 8 bytes of padding per row
        let mut data = vec![1, 2, 3, 4, 0, 0, 0, 0];
        data.extend([5, 6, 7, 8, 0, 0, 0, 0]);
        assert_eq!(unpad_rows(&data, 4, 8, false), vec![1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(unpad_rows(&data, 4, 8, true), vec![3, 2, 1, 4, 7, 6, 5, 8]);
    }

    #[test]
    fn test_surface_format_choice() {
        let formats = [
            TextureFormat::Rgba16Float,
            TextureFormat::Bgra8Unorm,
            TextureFormat::Bgra8UnormSrgb,
        ];
        assert_eq!(
            choose_surface_format(&formats, true),
            Some(TextureFormat::Bgra8UnormSrgb)
        );
        assert_eq!(
            choose_surface_format(&formats, false),
            Some(TextureFormat::Bgra8Unorm)
        );
        assert_eq!(
            choose_surface_format(&[TextureFormat::Rgba16Float], true),
            Some(TextureFormat::Rgba16Float)
        );
        assert_eq!(choose_surface_format(&[], true), None);
    }

    #[test]
    fn test_present_mode() {
        assert_eq!(present_mode(true), wgpu::PresentMode::AutoVsync);
        assert_eq!(present_mode(false), wgpu::PresentMode::AutoNoVsync);
    }
}
