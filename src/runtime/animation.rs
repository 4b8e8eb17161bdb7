//! Time-dependent scene state
//!
//! Everything the frame loop changes on its own lives in an [`AnimationState`]
//! value. Each tick produces the next state from the previous one and a delta,
//! then writes it into the scene. Updates are scaled by the delta so animation
//! speed does not depend on the frame rate.

use cgmath::Vector3;

use crate::error::Result;
use crate::gfx::resources::material::MaterialId;
use crate::gfx::scene::{ObjectId, Scene};

/// Constant angular velocity applied to one object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spin {
    pub object: ObjectId,
    /// Radians per second around x, y and z
    pub rate: Vector3<f32>,
}

impl Spin {
    pub fn new(object: ObjectId, rate: Vector3<f32>) -> Self {
        Self { object, rate }
    }
}

/// Static description of what a demo animates
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationRules {
    pub spins: Vec<Spin>,
    /// Shader materials whose `u_time` uniform follows the animation clock
    pub shader_clocks: Vec<MaterialId>,
}

impl AnimationRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_spin(mut self, object: ObjectId, rate: Vector3<f32>) -> Self {
        self.spins.push(Spin::new(object, rate));
        self
    }

    pub fn with_shader_clock(mut self, material: impl Into<MaterialId>) -> Self {
        self.shader_clocks.push(material.into());
        self
    }
}

/// Per-frame animated values
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationState {
    /// Current rotation of each spinning object, indexed like `AnimationRules::spins`
    pub rotations: Vec<Vector3<f32>>,
    /// Value fed to shader `u_time` uniforms
    pub time: f32,
}

impl AnimationState {
    /// Captures the starting values from the scene
    pub fn capture(rules: &AnimationRules, scene: &Scene) -> Result<Self> {
        let rotations = rules
            .spins
            .iter()
            .map(|spin| {
                scene
                    .object(spin.object)
                    .map(|object| object.transform.rotation)
            })
            .collect::<Result<Vec<_>>>()?;

        let time = match rules.shader_clocks.first() {
            Some(id) => scene.material_manager.shader(id)?.uniforms.time,
            None => 0.0,
        };

        Ok(Self { rotations, time })
    }

    /// Returns the state `delta` seconds later
    pub fn advance(mut self, delta: f32, rules: &AnimationRules) -> Self {
        let delta = delta.max(0.0);
        for (rotation, spin) in self.rotations.iter_mut().zip(&rules.spins) {
            *rotation += spin.rate * delta;
        }
        self.time += delta;
        self
    }

    /// Writes the animated values into the scene
    pub fn apply(&self, rules: &AnimationRules, scene: &mut Scene) -> Result<()> {
        for (rotation, spin) in self.rotations.iter().zip(&rules.spins) {
            scene.object_mut(spin.object)?.transform.rotation = *rotation;
        }

        for id in &rules.shader_clocks {
            scene.material_manager.shader_mut(id)?.uniforms.time = self.time;
        }

        Ok(())
    }
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            rotations: Vec::new(),
            time: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VitrineError;
    use crate::gfx::geometry::generate_cube;
    use crate::gfx::resources::material::{PhysicalMaterial, ShaderMaterial};
    use crate::gfx::scene::Object;

    fn spinning_scene() -> (Scene, AnimationRules) {
        let mut scene = Scene::new_screen();
        scene
            .material_manager
            .add_physical(PhysicalMaterial::new("hero"));
        let hero = scene.add_object(Object::from_geometry("hero", &generate_cube(), "hero"));
        let rules = AnimationRules::new().with_spin(hero, Vector3::new(0.6, 0.6, 0.0));
        (scene, rules)
    }

    fn close(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        (a.x - b.x).abs() < 1e-5 && (a.y - b.y).abs() < 1e-5 && (a.z - b.z).abs() < 1e-5
    }

    #[test]
    fn test_rotation_update_is_additive() {
        let (scene, rules) = spinning_scene();
        let start = AnimationState::capture(&rules, &scene).unwrap();

        for (d1, d2) in [(0.016, 0.017), (0.0, 0.5), (1.25, 0.0), (0.1, 2.0)] {
            let twice = start.clone().advance(d1, &rules).advance(d2, &rules);
            let once = start.clone().advance(d1 + d2, &rules);
            assert!(close(twice.rotations[0], once.rotations[0]), "{d1} + {d2}");
            assert!((twice.time - once.time).abs() < 1e-5);
        }
    }

    #[test]
    fn test_rotation_rate_scales_with_delta() {
        let (scene, rules) = spinning_scene();
        let state = AnimationState::capture(&rules, &scene)
            .unwrap()
            .advance(0.5, &rules);
        assert!(close(state.rotations[0], Vector3::new(0.3, 0.3, 0.0)));
    }

    #[test]
    fn test_negative_delta_is_ignored() {
        let (scene, rules) = spinning_scene();
        let start = AnimationState::capture(&rules, &scene).unwrap();
        let after = start.clone().advance(-1.0, &rules);
        assert_eq!(after, start);
    }

    #[test]
    fn test_apply_writes_rotation_and_time() {
        let (mut scene, rules) = spinning_scene();
        scene
            .material_manager
            .add_shader(ShaderMaterial::builtin("plane"));
        let rules = rules.with_shader_clock("plane");

        let state = AnimationState::capture(&rules, &scene).unwrap();
        assert_eq!(state.time, 1.0);

        let state = state.advance(2.0, &rules);
        state.apply(&rules, &mut scene).unwrap();

        let hero = scene.object(rules.spins[0].object).unwrap();
        assert!(close(hero.transform.rotation, Vector3::new(1.2, 1.2, 0.0)));
        assert_eq!(scene.material_manager.shader("plane").unwrap().uniforms.time, 3.0);
    }

    #[test]
    fn test_capture_rejects_unknown_material() {
        let (scene, rules) = spinning_scene();
        let rules = rules.with_shader_clock("missing");
        assert!(matches!(
            AnimationState::capture(&rules, &scene),
            Err(VitrineError::UnknownMaterial(_))
        ));
    }
}
