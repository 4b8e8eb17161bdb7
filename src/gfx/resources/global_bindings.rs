//! Per-frame uniforms shared by every lit object: camera, lights and the
//! shadow camera. Bound at group 0 of the physical and shadow pipelines.

use cgmath::{perspective, Deg, InnerSpace, Matrix4, Point3, SquareMatrix, Vector3};

use crate::{
    gfx::{
        camera::{orbit_camera::OPENGL_TO_WGPU_MATRIX, CameraUniform},
        scene::{LightKind, Scene, ShadowConfig},
    },
    wgpu_utils::{
        binding_types, BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc,
        UniformBuffer,
    },
};

use super::texture_resource::TextureResource;

/// Point lights beyond this count are ignored
pub const MAX_POINT_LIGHTS: usize = 4;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointLightUniform {
    pub position: [f32; 4],
    /// Linear color premultiplied by intensity
    pub color: [f32; 4],
}

/// Must match `GlobalUniform` in `pbr.wgsl` and `shadow_pass.wgsl`
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUniform {
    pub view_position: [f32; 4],
    pub view_proj: [[f32; 4]; 4],
    pub shadow_view_proj: [[f32; 4]; 4],
    /// Linear ambient color premultiplied by intensity
    pub ambient: [f32; 4],
    /// x: shadows enabled, y: depth bias, z: shadow texel size, w: index of the casting light
    pub shadow_params: [f32; 4],
    pub point_lights: [PointLightUniform; MAX_POINT_LIGHTS],
    /// x: number of point lights in use
    pub light_count: [u32; 4],
}

impl GlobalUniform {
    pub fn from_scene(scene: &Scene) -> Self {
        Self::new(scene.camera_uniform(), scene)
    }

    fn new(camera: CameraUniform, scene: &Scene) -> Self {
        let mut ambient = [0.0, 0.0, 0.0, 1.0];
        let mut point_lights = [PointLightUniform::default(); MAX_POINT_LIGHTS];
        let mut count = 0;
        let mut shadow_view_proj = Matrix4::identity();
        let mut shadow_params = [0.0; 4];
        let mut has_shadow = false;

        for light in scene.lights() {
            match &light.kind {
                LightKind::Ambient => {
                    let [r, g, b, _] = light.color.to_linear_scaled(light.intensity);
                    ambient[0] += r;
                    ambient[1] += g;
                    ambient[2] += b;
                }
                LightKind::Point { position, shadow } => {
                    if count == MAX_POINT_LIGHTS {
                        log::debug!("ignoring point light '{}'", light.name);
                        continue;
                    }
                    point_lights[count] = PointLightUniform {
                        position: [position.x, position.y, position.z, 1.0],
                        color: light.color.to_linear_scaled(light.intensity),
                    };
                    // Only the first casting light gets a shadow map
                    if let (Some(config), false) = (shadow, has_shadow) {
                        shadow_view_proj = shadow_view_projection(*position, config);
                        shadow_params = [1.0, 0.002, 1.0 / config.map_size as f32, count as f32];
                        has_shadow = true;
                    }
                    count += 1;
                }
            }
        }

        Self {
            view_position: camera.view_position,
            view_proj: camera.view_proj,
            shadow_view_proj: shadow_view_proj.into(),
            ambient,
            shadow_params,
            point_lights,
            light_count: [count as u32, 0, 0, 0],
        }
    }
}

/// Perspective shadow camera placed at the light, looking at the origin
pub fn shadow_view_projection(position: Vector3<f32>, config: &ShadowConfig) -> Matrix4<f32> {
    let direction = -position;
    let up = if direction.magnitude2() > 0.0
        && direction.normalize().cross(Vector3::unit_y()).magnitude2() < 1e-6
    {
        Vector3::unit_z()
    } else {
        Vector3::unit_y()
    };
    let view = Matrix4::look_at_rh(
        Point3::new(position.x, position.y, position.z),
        Point3::new(0.0, 0.0, 0.0),
        up,
    );
    let proj = OPENGL_TO_WGPU_MATRIX * perspective(Deg(90.0), 1.0, config.near, config.far);
    proj * view
}

pub type GlobalUBO = UniformBuffer<GlobalUniform>;

/// Layouts, buffer and bind groups for the global uniforms
///
/// The main pass binds the uniforms together with the shadow map. The shadow
/// pass renders into that map, so it gets a second group without it.
pub struct GlobalBindings {
    layout: BindGroupLayoutWithDesc,
    shadow_layout: BindGroupLayoutWithDesc,
    ubo: GlobalUBO,
    bind_group: wgpu::BindGroup,
    shadow_bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device, shadow_map: &TextureResource) -> Self {
        let layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .next_binding_fragment(binding_types::depth_texture_2d())
            .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Comparison))
            .create(device, "Globals Layout");
        let shadow_layout = BindGroupLayoutBuilder::new()
            .next_binding_vertex(binding_types::uniform())
            .create(device, "Shadow Globals Layout");

        let ubo = GlobalUBO::new(device);
        let bind_group = BindGroupBuilder::new(&layout)
            .resource(ubo.binding_resource())
            .texture(&shadow_map.view)
            .sampler(&shadow_map.sampler)
            .create(device, "Globals");
        let shadow_bind_group = BindGroupBuilder::new(&shadow_layout)
            .resource(ubo.binding_resource())
            .create(device, "Shadow Globals");

        Self {
            layout,
            shadow_layout,
            ubo,
            bind_group,
            shadow_bind_group,
        }
    }

    pub fn update(&mut self, queue: &wgpu::Queue, scene: &Scene) {
        self.ubo.update_content(queue, GlobalUniform::from_scene(scene));
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout.layout
    }

    pub fn shadow_layout(&self) -> &wgpu::BindGroupLayout {
        &self.shadow_layout.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    pub fn shadow_bind_group(&self) -> &wgpu::BindGroup {
        &self.shadow_bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::color::Color;
    use crate::gfx::scene::Light;
    use cgmath::Vector4;

    fn lit_scene() -> Scene {
        let mut scene = Scene::new_screen();
        scene.add_light(Light::ambient("ambient", Color::from_hex(0x404040), 1.0));
        let key = Light::point("key", Color::WHITE, 0.25, Vector3::new(-0.5, 0.5, 4.0))
            .with_shadow(ShadowConfig::default());
        let fill = key.clone_as("fill");
        scene.add_light(key);
        let fill_id = scene.add_light(fill);
        scene.light_mut(fill_id).unwrap().intensity = 0.75;
        scene
    }

    #[test]
    fn test_uniform_size() {
        assert_eq!(std::mem::size_of::<GlobalUniform>(), 320);
    }

    #[test]
    fn test_lights_are_packed() {
        let uniform = GlobalUniform::from_scene(&lit_scene());
        assert_eq!(uniform.light_count[0], 2);
        assert_eq!(uniform.point_lights[0].color[0], 0.25);
        assert_eq!(uniform.point_lights[1].color[0], 0.75);
        assert_eq!(uniform.point_lights[1].position, [-0.5, 0.5, 4.0, 1.0]);
        assert!((uniform.ambient[0] - 0.0513).abs() < 1e-3);
    }

    #[test]
    fn test_only_key_light_casts_shadow() {
        let uniform = GlobalUniform::from_scene(&lit_scene());
        assert_eq!(uniform.shadow_params[0], 1.0);
        assert_eq!(uniform.shadow_params[3], 0.0);
        assert!((uniform.shadow_params[2] - 1.0 / 512.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_shadow_without_caster() {
        let mut scene = Scene::new_screen();
        scene.add_light(Light::point("p", Color::WHITE, 1.0, Vector3::new(0.0, 2.0, 2.0)));
        let uniform = GlobalUniform::from_scene(&scene);
        assert_eq!(uniform.shadow_params, [0.0; 4]);
    }

    #[test]
    fn test_shadow_camera_sees_origin() {
        let config = ShadowConfig::default();
        let clip = shadow_view_projection(Vector3::new(-0.5, 0.5, 4.0), &config)
            * Vector4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
        assert!((0.0..=1.0).contains(&ndc.z));
    }
}
