use crate::{
    error::{Result, VitrineError},
    gfx::{
        camera::{Camera, CameraManager, CameraUniform},
        color::Color,
        resources::material::MaterialManager,
    },
};

use super::{light::Light, object::Object};

/// Stable handle to an object added to a [`Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(usize);

/// Stable handle to a light added to a [`Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LightId(usize);

pub enum SceneCamera {
    /// Perspective camera with orbit controls
    Orbit(CameraManager),
    /// Identity transform; geometry is given in clip space
    Screen,
}

/// Scene graph root. Objects and lights are only ever appended, so handles
/// stay valid for the lifetime of the scene.
pub struct Scene {
    pub camera: SceneCamera,
    pub material_manager: MaterialManager,
    pub background: Color,
    objects: Vec<Object>,
    lights: Vec<Light>,
}

impl Scene {
    pub fn new(camera_manager: CameraManager) -> Self {
        Self::with_camera(SceneCamera::Orbit(camera_manager))
    }

    /// Scene drawn without a camera transform
    pub fn new_screen() -> Self {
        Self::with_camera(SceneCamera::Screen)
    }

    fn with_camera(camera: SceneCamera) -> Self {
        Self {
            camera,
            material_manager: MaterialManager::new(),
            background: Color::BLACK,
            objects: Vec::new(),
            lights: Vec::new(),
        }
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn add_object(&mut self, object: Object) -> ObjectId {
        self.objects.push(object);
        ObjectId(self.objects.len() - 1)
    }

    pub fn object(&self, id: ObjectId) -> Result<&Object> {
        self.objects
            .get(id.0)
            .ok_or_else(|| VitrineError::UnknownObject(format!("{:?}", id)))
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Result<&mut Object> {
        self.objects
            .get_mut(id.0)
            .ok_or_else(|| VitrineError::UnknownObject(format!("{:?}", id)))
    }

    pub fn find_object(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .position(|object| object.name == name)
            .map(ObjectId)
    }

    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &Object)> {
        self.objects
            .iter()
            .enumerate()
            .map(|(index, object)| (ObjectId(index), object))
    }

    pub fn objects_mut(&mut self) -> impl Iterator<Item = &mut Object> {
        self.objects.iter_mut()
    }

    pub fn add_light(&mut self, light: Light) -> LightId {
        self.lights.push(light);
        LightId(self.lights.len() - 1)
    }

    pub fn light(&self, id: LightId) -> Result<&Light> {
        self.lights
            .get(id.0)
            .ok_or_else(|| VitrineError::UnknownLight(format!("{:?}", id)))
    }

    pub fn light_mut(&mut self, id: LightId) -> Result<&mut Light> {
        self.lights
            .get_mut(id.0)
            .ok_or_else(|| VitrineError::UnknownLight(format!("{:?}", id)))
    }

    pub fn find_light(&self, name: &str) -> Option<LightId> {
        self.lights
            .iter()
            .position(|light| light.name == name)
            .map(LightId)
    }

    pub fn lights(&self) -> impl Iterator<Item = &Light> {
        self.lights.iter()
    }

    pub fn camera_manager_mut(&mut self) -> Option<&mut CameraManager> {
        match &mut self.camera {
            SceneCamera::Orbit(manager) => Some(manager),
            SceneCamera::Screen => None,
        }
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if let SceneCamera::Orbit(manager) = &mut self.camera {
            manager.camera.resize_projection(width, height);
        }
    }

    /// Recomputes camera matrices
    pub fn update(&mut self) {
        if let SceneCamera::Orbit(manager) = &mut self.camera {
            manager.camera.update_view_proj();
        }
    }

    pub fn camera_uniform(&self) -> CameraUniform {
        match &self.camera {
            SceneCamera::Orbit(manager) => {
                let eye = manager.camera.eye;
                CameraUniform {
                    view_position: [eye.x, eye.y, eye.z, 1.0],
                    view_proj: manager.camera.build_view_projection_matrix().into(),
                }
            }
            SceneCamera::Screen => CameraUniform::default(),
        }
    }

    pub fn statistics(&self) -> SceneStatistics {
        SceneStatistics {
            object_count: self.objects.len(),
            light_count: self.lights.len(),
            material_count: self.material_manager.list().len(),
            total_triangles: self.objects.iter().map(|o| o.mesh.index_count() / 3).sum(),
            total_vertices: self.objects.iter().map(|o| o.mesh.vertex_count()).sum(),
        }
    }
}

/// Scene statistics for the stats overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneStatistics {
    pub object_count: usize,
    pub light_count: usize,
    pub material_count: usize,
    pub total_triangles: u32,
    pub total_vertices: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::{CameraController, OrbitCamera};
    use crate::gfx::geometry::generate_cube;
    use crate::gfx::resources::material::PhysicalMaterial;

    fn scene_with_cube() -> (Scene, ObjectId) {
        let camera = OrbitCamera::looking_at_origin(5.0, 1.0);
        let mut scene = Scene::new(CameraManager::new(camera, CameraController::default()));
        scene
            .material_manager
            .add_physical(PhysicalMaterial::new("cube"));
        let id = scene.add_object(Object::from_geometry("cube", &generate_cube(), "cube"));
        (scene, id)
    }

    #[test]
    fn test_handles_resolve() {
        let (mut scene, id) = scene_with_cube();
        let light = scene.add_light(Light::ambient("ambient", Color::WHITE, 1.0));

        assert_eq!(scene.find_object("cube"), Some(id));
        assert_eq!(scene.find_light("ambient"), Some(light));
        assert_eq!(scene.object(id).map(|o| o.name.as_str()).ok(), Some("cube"));
        assert!(scene.find_light("missing").is_none());
    }

    #[test]
    fn test_unknown_handle_is_error() {
        let (scene, _) = scene_with_cube();
        let other = Scene::new_screen();
        assert!(matches!(
            other.object(ObjectId(0)),
            Err(VitrineError::UnknownObject(_))
        ));
        assert!(scene.light(LightId(3)).is_err());
    }

    #[test]
    fn test_statistics() {
        let (scene, _) = scene_with_cube();
        let stats = scene.statistics();
        assert_eq!(stats.object_count, 1);
        assert_eq!(stats.material_count, 1);
        assert_eq!(stats.total_triangles, 12);
        assert_eq!(stats.total_vertices, 24);
    }

    #[test]
    fn test_screen_camera_is_identity() {
        let mut scene = Scene::new_screen();
        scene.set_aspect(100, 50);
        scene.update();
        assert_eq!(
            scene.camera_uniform().view_proj,
            CameraUniform::default().view_proj
        );
        assert!(scene.camera_manager_mut().is_none());
    }
}
