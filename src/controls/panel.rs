//! Control panel model: a tree of folders holding sliders and color pickers
//!
//! The panel knows nothing about ImGui. The UI layer walks [`ControlPanel::tree`]
//! to draw widgets and calls [`ControlPanel::set`] when one changes; every
//! binding of that control then queues its edit.

use crate::error::{Result, VitrineError};
use crate::gfx::color::Color;
use crate::gfx::scene::Scene;

use super::binding::{Binding, ControlValue, Conversion, EditQueue, Property};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlKind {
    Slider { min: f32, max: f32 },
    Color,
}

#[derive(Debug, Clone)]
pub struct Control {
    /// Folder path such as `Lighting/Ambient`
    pub folder: String,
    pub label: String,
    pub kind: ControlKind,
    value: ControlValue,
    bindings: Vec<Binding>,
}

impl Control {
    /// `folder/label`, the name used by [`ControlPanel::set`]
    pub fn key(&self) -> String {
        if self.folder.is_empty() {
            self.label.clone()
        } else {
            format!("{}/{}", self.folder, self.label)
        }
    }

    pub fn value(&self) -> ControlValue {
        self.value
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    fn accept(&self, value: ControlValue) -> Result<ControlValue> {
        match (self.kind, value) {
            (ControlKind::Slider { min, max }, ControlValue::Scalar(v)) => {
                Ok(ControlValue::Scalar(v.clamp(min, max)))
            }
            (ControlKind::Color, ControlValue::Color(c)) => Ok(ControlValue::Color(c.clamped())),
            (ControlKind::Slider { .. }, _) => Err(self.mismatch("scalar")),
            (ControlKind::Color, _) => Err(self.mismatch("color")),
        }
    }

    fn mismatch(&self, expected: &'static str) -> VitrineError {
        VitrineError::ControlValueMismatch {
            control: self.key(),
            expected,
        }
    }
}

/// Returned by `add_*` to attach bindings to the new control
pub struct ControlHandle<'a> {
    control: &'a mut Control,
}

impl ControlHandle<'_> {
    pub fn bind(self, property: Property) -> Self {
        self.bind_with(property, Conversion::Identity)
    }

    /// Checked against the scene by [`ControlPanel::validate`]
    pub fn bind_with(self, property: Property, conversion: Conversion) -> Self {
        self.control.bindings.push(Binding::new(property, conversion));
        self
    }
}

/// A folder of the panel tree; `controls` index into [`ControlPanel::controls`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Folder {
    pub name: String,
    pub controls: Vec<usize>,
    pub children: Vec<Folder>,
}

impl Folder {
    fn child_mut(&mut self, name: &str) -> &mut Folder {
        let index = match self.children.iter().position(|f| f.name == name) {
            Some(index) => index,
            None => {
                self.children.push(Folder {
                    name: name.to_string(),
                    ..Default::default()
                });
                self.children.len() - 1
            }
        };
        &mut self.children[index]
    }
}

pub struct ControlPanel {
    pub title: String,
    controls: Vec<Control>,
    edits: EditQueue,
}

impl ControlPanel {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            controls: Vec::new(),
            edits: EditQueue::new(),
        }
    }

    /// Adds a slider; `initial` is clamped into `min..=max`
    pub fn add_slider(
        &mut self,
        folder: &str,
        label: &str,
        min: f32,
        max: f32,
        initial: f32,
    ) -> ControlHandle<'_> {
        self.push(
            folder,
            label,
            ControlKind::Slider { min, max },
            ControlValue::Scalar(initial.clamp(min, max)),
        )
    }

    pub fn add_color(&mut self, folder: &str, label: &str, initial: Color) -> ControlHandle<'_> {
        self.push(
            folder,
            label,
            ControlKind::Color,
            ControlValue::Color(initial.clamped()),
        )
    }

    fn push(
        &mut self,
        folder: &str,
        label: &str,
        kind: ControlKind,
        value: ControlValue,
    ) -> ControlHandle<'_> {
        self.controls.push(Control {
            folder: folder.trim_matches('/').to_string(),
            label: label.to_string(),
            kind,
            value,
            bindings: Vec::new(),
        });
        let last = self.controls.len() - 1;
        ControlHandle {
            control: &mut self.controls[last],
        }
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Control> {
        self.controls.iter().find(|c| c.key() == key)
    }

    pub fn value(&self, key: &str) -> Option<ControlValue> {
        self.get(key).map(Control::value)
    }

    /// Changes a control as if the user edited it
    ///
    /// The value is clamped to the control's range and one edit per binding
    /// is queued for the next frame.
    pub fn set(&mut self, key: &str, value: ControlValue) -> Result<()> {
        let index = self
            .controls
            .iter()
            .position(|c| c.key() == key)
            .ok_or_else(|| VitrineError::UnknownControl(key.to_string()))?;
        self.set_at(index, value)
    }

    /// [`set`](Self::set) by position in [`controls`](Self::controls)
    pub fn set_at(&mut self, index: usize, value: ControlValue) -> Result<()> {
        let control = self
            .controls
            .get_mut(index)
            .ok_or_else(|| VitrineError::UnknownControl(format!("#{index}")))?;
        let value = control.accept(value)?;
        control.value = value;
        for binding in &control.bindings {
            self.edits.push(binding.resolve(value));
        }
        Ok(())
    }

    pub fn drain_edits(&mut self) -> std::vec::Drain<'_, super::PropertyEdit> {
        self.edits.drain()
    }

    pub fn pending_edits(&self) -> usize {
        self.edits.len()
    }

    /// Checks every binding against `scene`
    ///
    /// Each binding is resolved with its control's current value, so an
    /// unknown light or material and a control of the wrong kind are all
    /// reported here instead of on the first edit.
    pub fn validate(&self, scene: &Scene) -> Result<()> {
        for control in &self.controls {
            for binding in &control.bindings {
                binding.resolve(control.value).validate(scene).map_err(|err| {
                    log::error!("control '{}' cannot drive {}", control.key(), binding.property);
                    err
                })?;
            }
        }
        Ok(())
    }

    /// Folder tree in insertion order; the root has no name
    pub fn tree(&self) -> Folder {
        let mut root = Folder::default();
        for (index, control) in self.controls.iter().enumerate() {
            let mut folder = &mut root;
            for name in control.folder.split('/').filter(|s| !s.is_empty()) {
                folder = folder.child_mut(name);
            }
            folder.controls.push(index);
        }
        root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::{LightField, MaterialField};
    use crate::gfx::resources::PhysicalMaterial;
    use crate::gfx::scene::{Light, Scene};

    fn apply_all(panel: &mut ControlPanel, scene: &mut Scene) {
        for edit in panel.drain_edits() {
            edit.apply(scene).unwrap();
        }
    }

    fn lit_scene() -> Scene {
        let mut scene = Scene::new_screen();
        scene.add_light(Light::ambient("ambient", Color::from_hex(0x404040), 1.0));
        scene.add_light(Light::point(
            "key",
            Color::WHITE,
            0.25,
            cgmath::Vector3::new(0.0, 0.0, 4.0),
        ));
        scene.add_light(Light::point(
            "fill",
            Color::WHITE,
            0.75,
            cgmath::Vector3::new(0.0, 0.0, 4.0),
        ));
        scene
            .material_manager
            .add_physical(PhysicalMaterial::new("hero"));
        scene
    }

    #[test]
    fn test_slider_round_trip() {
        let mut scene = lit_scene();
        let ambient = scene.find_light("ambient").unwrap();
        let mut panel = ControlPanel::new("test");
        panel
            .add_slider("Lighting/Ambient", "intensity", 0.1, 10.0, 1.0)
            .bind(Property::light(ambient, LightField::Intensity));

        panel
            .set("Lighting/Ambient/intensity", ControlValue::Scalar(3.5))
            .unwrap();
        assert_eq!(panel.pending_edits(), 1);
        apply_all(&mut panel, &mut scene);

        assert_eq!(scene.light(ambient).unwrap().intensity, 3.5);
        assert_eq!(
            panel.value("Lighting/Ambient/intensity"),
            Some(ControlValue::Scalar(3.5))
        );
    }

    #[test]
    fn test_slider_clamps() {
        let mut panel = ControlPanel::new("test");
        panel.add_slider("Cube/Material", "roughness", 0.0, 1.0, 0.5);

        panel
            .set("Cube/Material/roughness", ControlValue::Scalar(3.0))
            .unwrap();
        assert_eq!(
            panel.value("Cube/Material/roughness"),
            Some(ControlValue::Scalar(1.0))
        );
        panel
            .set("Cube/Material/roughness", ControlValue::Scalar(-1.0))
            .unwrap();
        assert_eq!(
            panel.value("Cube/Material/roughness"),
            Some(ControlValue::Scalar(0.0))
        );
    }

    #[test]
    fn test_complementary_intensities_sum_to_one() {
        let mut scene = lit_scene();
        let key = scene.find_light("key").unwrap();
        let fill = scene.find_light("fill").unwrap();
        let mut panel = ControlPanel::new("test");
        panel
            .add_slider("Lighting/Point", "shadowIntensity", 0.0, 1.0, 0.25)
            .bind(Property::light(key, LightField::Intensity))
            .bind_with(Property::light(fill, LightField::Intensity), Conversion::Complement);

        for step in 0..=20 {
            let v = step as f32 / 20.0;
            panel
                .set("Lighting/Point/shadowIntensity", ControlValue::Scalar(v))
                .unwrap();
            apply_all(&mut panel, &mut scene);
            let k = scene.light(key).unwrap().intensity;
            let f = scene.light(fill).unwrap().intensity;
            assert_eq!(k, v);
            assert!((k + f - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_color_control_drives_material() {
        let mut scene = lit_scene();
        let mut panel = ControlPanel::new("test");
        panel
            .add_color("Cube/Material", "color", Color::from_hex(0x00ff00))
            .bind(Property::material("hero", MaterialField::Color));

        panel
            .set(
                "Cube/Material/color",
                ControlValue::Color(Color::from_hex(0x3366ff)),
            )
            .unwrap();
        apply_all(&mut panel, &mut scene);
        assert_eq!(
            scene.material_manager.physical("hero").unwrap().color.to_hex(),
            0x3366ff
        );
    }

    #[test]
    fn test_unknown_control() {
        let mut panel = ControlPanel::new("test");
        let err = panel
            .set("Lighting/Nope", ControlValue::Scalar(1.0))
            .unwrap_err();
        assert!(matches!(err, VitrineError::UnknownControl(key) if key == "Lighting/Nope"));
    }

    #[test]
    fn test_wrong_value_kind() {
        let mut panel = ControlPanel::new("test");
        panel.add_color("Lighting/Ambient", "color", Color::WHITE);
        assert!(panel
            .set("Lighting/Ambient/color", ControlValue::Scalar(0.3))
            .is_err());
        assert_eq!(panel.pending_edits(), 0);
    }

    #[test]
    fn test_validate_rejects_bad_bindings() {
        let scene = lit_scene();
        let ambient = scene.find_light("ambient").unwrap();

        let mut panel = ControlPanel::new("test");
        panel
            .add_slider("Lighting/Ambient", "intensity", 0.1, 10.0, 1.0)
            .bind(Property::light(ambient, LightField::Intensity));
        panel
            .add_color("Cube/Material", "color", Color::WHITE)
            .bind(Property::material("hero", MaterialField::Color));
        assert!(panel.validate(&scene).is_ok());

        panel
            .add_slider("Cube/Material", "metalness", 0.0, 1.0, 0.5)
            .bind(Property::material("missing", MaterialField::Metalness));
        assert!(matches!(
            panel.validate(&scene),
            Err(VitrineError::UnknownMaterial(_))
        ));

        let mut mismatched = ControlPanel::new("test");
        mismatched
            .add_slider("Lighting/Ambient", "color", 0.0, 1.0, 0.5)
            .bind(Property::light(ambient, LightField::Color));
        assert!(matches!(
            mismatched.validate(&scene),
            Err(VitrineError::ControlValueMismatch { .. })
        ));
    }

    #[test]
    fn test_tree_groups_folders() {
        let mut panel = ControlPanel::new("test");
        panel.add_color("Lighting/Ambient", "color", Color::WHITE);
        panel.add_slider("Lighting/Ambient", "intensity", 0.1, 10.0, 1.0);
        panel.add_slider("Lighting/Point", "shadowIntensity", 0.0, 1.0, 0.25);
        panel.add_slider("Cube/Material", "metalness", 0.0, 1.0, 0.5);

        let tree = panel.tree();
        let names: Vec<_> = tree.children.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Lighting", "Cube"]);
        let lighting = &tree.children[0];
        assert_eq!(lighting.children[0].name, "Ambient");
        assert_eq!(lighting.children[0].controls, vec![0, 1]);
        assert_eq!(lighting.children[1].controls, vec![2]);
    }
}
