//! Scene graph: objects, lights, materials and the camera
//!
//! A [`Scene`] is built once at startup. Objects and lights are addressed by
//! the [`ObjectId`]/[`LightId`] handles returned when they are added, and
//! materials by name through [`Scene::material_manager`].

pub mod light;
pub mod object;
pub mod scene;
pub mod vertex;

pub use light::{Light, LightKind, ShadowConfig};
pub use object::{DrawObject, Object, Transform, TransformUniform};
pub use scene::{LightId, ObjectId, Scene, SceneCamera, SceneStatistics};
pub use vertex::Vertex3D;
