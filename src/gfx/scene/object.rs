//! Scene objects: a mesh, a material reference and a transform

use cgmath::{Matrix, Matrix4, Rad, SquareMatrix, Vector3};
use wgpu::util::DeviceExt;

use crate::gfx::geometry::GeometryData;
use crate::gfx::resources::material::MaterialId;
use crate::wgpu_utils::{BindGroupBuilder, BindGroupLayoutWithDesc, UniformBuffer};

use super::vertex::Vertex3D;

/// Position, Euler rotation (radians, applied X then Y then Z) and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Model matrix: T * Rx * Ry * Rz * S
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z))
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

/// Per-object uniform data. Must match `ObjectUniform` in the shaders.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformUniform {
    pub model: [[f32; 4]; 4],
    /// Inverse transpose of the model matrix
    pub normal: [[f32; 4]; 4],
    /// x: receives shadows
    pub flags: [f32; 4],
}

pub struct Mesh {
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
}

impl Mesh {
    pub fn from_geometry(geometry: &GeometryData) -> Self {
        Self {
            vertices: geometry.to_vertices(),
            indices: geometry.indices.clone(),
            vertex_buffer: None,
            index_buffer: None,
        }
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    fn init_gpu_resources(&mut self, device: &wgpu::Device, name: &str) {
        self.vertex_buffer = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name} Vertex Buffer")),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.index_buffer = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name} Index Buffer")),
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }
}

pub struct ObjectGpuResources {
    transform_ubo: UniformBuffer<TransformUniform>,
    transform_bind_group: wgpu::BindGroup,
}

pub struct Object {
    pub name: String,
    pub mesh: Mesh,
    pub material: MaterialId,
    pub transform: Transform,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    pub visible: bool,
    gpu_resources: Option<ObjectGpuResources>,
}

impl Object {
    pub fn from_geometry(
        name: impl Into<String>,
        geometry: &GeometryData,
        material: impl Into<MaterialId>,
    ) -> Self {
        Self {
            name: name.into(),
            mesh: Mesh::from_geometry(geometry),
            material: material.into(),
            transform: Transform::default(),
            cast_shadow: false,
            receive_shadow: false,
            visible: true,
            gpu_resources: None,
        }
    }

    pub fn with_position(mut self, position: Vector3<f32>) -> Self {
        self.transform.position = position;
        self
    }

    pub fn with_cast_shadow(mut self, cast: bool) -> Self {
        self.cast_shadow = cast;
        self
    }

    pub fn with_receive_shadow(mut self, receive: bool) -> Self {
        self.receive_shadow = receive;
        self
    }

    pub fn transform_uniform(&self) -> TransformUniform {
        let model = self.transform.matrix();
        let normal = model
            .invert()
            .map(|inverse| inverse.transpose())
            .unwrap_or_else(Matrix4::identity);
        TransformUniform {
            model: model.into(),
            normal: normal.into(),
            flags: [if self.receive_shadow { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
        }
    }

    pub fn has_gpu_resources(&self) -> bool {
        self.gpu_resources.is_some()
    }

    /// Uploads the mesh and creates the transform bind group
    pub fn init_gpu_resources(&mut self, device: &wgpu::Device, layout: &BindGroupLayoutWithDesc) {
        self.mesh.init_gpu_resources(device, &self.name);

        let transform_ubo = UniformBuffer::new_with_data(device, &self.transform_uniform());
        let transform_bind_group = BindGroupBuilder::new(layout)
            .resource(transform_ubo.binding_resource())
            .create(device, &format!("{} Transform Bind Group", self.name));

        self.gpu_resources = Some(ObjectGpuResources {
            transform_ubo,
            transform_bind_group,
        });
        log::debug!(
            "uploaded '{}' ({} vertices, {} indices)",
            self.name,
            self.mesh.vertex_count(),
            self.mesh.index_count()
        );
    }

    pub fn update_transform(&mut self, queue: &wgpu::Queue) {
        let uniform = self.transform_uniform();
        if let Some(gpu) = self.gpu_resources.as_mut() {
            gpu.transform_ubo.update_content(queue, uniform);
        }
    }

    pub fn transform_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu_resources
            .as_ref()
            .map(|gpu| &gpu.transform_bind_group)
    }
}

pub trait DrawObject {
    fn draw_mesh(&mut self, mesh: &Mesh);
    fn draw_object(&mut self, object: &Object);
}

impl DrawObject for wgpu::RenderPass<'_> {
    fn draw_mesh(&mut self, mesh: &Mesh) {
        let (Some(vertex_buffer), Some(index_buffer)) = (&mesh.vertex_buffer, &mesh.index_buffer)
        else {
            return;
        };

        self.set_vertex_buffer(0, vertex_buffer.slice(..));
        self.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.index_count(), 0, 0..1);
    }

    /// Binds the object's transform at group 1 and draws it
    fn draw_object(&mut self, object: &Object) {
        let Some(bind_group) = object.transform_bind_group() else {
            return;
        };
        self.set_bind_group(1, bind_group, &[]);
        self.draw_mesh(&object.mesh);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_cube;
    use cgmath::{Vector4, Zero};

    #[test]
    fn test_default_transform_is_identity() {
        assert_eq!(Transform::default().matrix(), Matrix4::identity());
    }

    #[test]
    fn test_transform_translates_after_rotating() {
        let transform = Transform {
            position: Vector3::new(0.0, 0.0, -2.0),
            rotation: Vector3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0),
            ..Default::default()
        };
        let p = transform.matrix() * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert!(p.x.abs() < 1e-6);
        assert!((p.z - (-3.0)).abs() < 1e-6);
    }

    #[test]
    fn test_receive_shadow_flag_in_uniform() {
        let object = Object::from_geometry("plane", &generate_cube(), "concrete")
            .with_receive_shadow(true)
            .with_position(Vector3::zero());
        assert_eq!(object.transform_uniform().flags[0], 1.0);
        assert!(!object.cast_shadow);
        assert!(!object.has_gpu_resources());
    }
}
