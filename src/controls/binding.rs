//! Links between panel controls and scene properties
//!
//! A [`Binding`] never holds a reference into the scene. It names the target
//! through a [`Property`] and turns a control value into a [`PropertyEdit`],
//! which the frame loop applies when it drains the [`EditQueue`].

use std::fmt;

use crate::error::{Result, VitrineError};
use crate::gfx::color::Color;
use crate::gfx::resources::MaterialId;
use crate::gfx::scene::{LightId, Scene};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightField {
    Color,
    Intensity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialField {
    Color,
    Roughness,
    Metalness,
    Reflectivity,
    Clearcoat,
    ClearcoatRoughness,
}

/// A mutable scene property a control can write
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    Light { light: LightId, field: LightField },
    Material { material: MaterialId, field: MaterialField },
}

impl Property {
    pub fn light(light: LightId, field: LightField) -> Self {
        Property::Light { light, field }
    }

    pub fn material(material: impl Into<MaterialId>, field: MaterialField) -> Self {
        Property::Material {
            material: material.into(),
            field,
        }
    }

    fn expects_color(&self) -> bool {
        matches!(
            self,
            Property::Light {
                field: LightField::Color,
                ..
            } | Property::Material {
                field: MaterialField::Color,
                ..
            }
        )
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Property::Light { light, field } => write!(f, "{:?}.{:?}", light, field),
            Property::Material { material, field } => write!(f, "{}.{:?}", material, field),
        }
    }
}

/// Value produced by a control
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlValue {
    Scalar(f32),
    Color(Color),
}

impl ControlValue {
    pub fn as_scalar(self) -> Option<f32> {
        match self {
            ControlValue::Scalar(v) => Some(v),
            ControlValue::Color(_) => None,
        }
    }

    pub fn as_color(self) -> Option<Color> {
        match self {
            ControlValue::Color(c) => Some(c),
            ControlValue::Scalar(_) => None,
        }
    }

    pub fn kind_name(self) -> &'static str {
        match self {
            ControlValue::Scalar(_) => "scalar",
            ControlValue::Color(_) => "color",
        }
    }
}

impl From<f32> for ControlValue {
    fn from(value: f32) -> Self {
        ControlValue::Scalar(value)
    }
}

impl From<Color> for ControlValue {
    fn from(color: Color) -> Self {
        ControlValue::Color(color)
    }
}

/// How a control value maps onto its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Conversion {
    #[default]
    Identity,
    /// `1 - v`, per channel for colors
    Complement,
}

impl Conversion {
    pub fn convert(self, value: ControlValue) -> ControlValue {
        match (self, value) {
            (Conversion::Identity, value) => value,
            (Conversion::Complement, ControlValue::Scalar(v)) => ControlValue::Scalar(1.0 - v),
            (Conversion::Complement, ControlValue::Color(c)) => {
                ControlValue::Color(Color::rgb(1.0 - c.r, 1.0 - c.g, 1.0 - c.b))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub property: Property,
    pub conversion: Conversion,
}

impl Binding {
    pub fn new(property: Property, conversion: Conversion) -> Self {
        Self {
            property,
            conversion,
        }
    }

    pub fn resolve(&self, value: ControlValue) -> PropertyEdit {
        PropertyEdit::new(self.property.clone(), self.conversion.convert(value))
    }
}

/// A pending write of one value into one scene property
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyEdit {
    pub property: Property,
    pub value: ControlValue,
}

impl PropertyEdit {
    pub fn new(property: Property, value: ControlValue) -> Self {
        Self { property, value }
    }

    pub fn apply(&self, scene: &mut Scene) -> Result<()> {
        match &self.property {
            Property::Light { light, field } => {
                let light = scene.light_mut(*light)?;
                match field {
                    LightField::Color => light.color = self.color()?,
                    LightField::Intensity => light.intensity = self.scalar()?,
                }
            }
            Property::Material { material, field } => {
                let material = scene.material_manager.physical_mut(material)?;
                match field {
                    MaterialField::Color => material.color = self.color()?,
                    MaterialField::Roughness => material.roughness = self.scalar()?,
                    MaterialField::Metalness => material.metalness = self.scalar()?,
                    MaterialField::Reflectivity => material.reflectivity = self.scalar()?,
                    MaterialField::Clearcoat => material.clearcoat = self.scalar()?,
                    MaterialField::ClearcoatRoughness => {
                        material.clearcoat_roughness = self.scalar()?
                    }
                }
            }
        }
        Ok(())
    }

    /// Fails the way [`apply`](Self::apply) would, without writing anything
    pub fn validate(&self, scene: &Scene) -> Result<()> {
        match &self.property {
            Property::Light { light, .. } => {
                scene.light(*light)?;
            }
            Property::Material { material, .. } => {
                scene.material_manager.physical(material)?;
            }
        }
        if value_matches(&self.property, self.value) {
            Ok(())
        } else if self.property.expects_color() {
            Err(self.mismatch("color"))
        } else {
            Err(self.mismatch("scalar"))
        }
    }

    fn scalar(&self) -> Result<f32> {
        self.value.as_scalar().ok_or_else(|| self.mismatch("scalar"))
    }

    fn color(&self) -> Result<Color> {
        self.value.as_color().ok_or_else(|| self.mismatch("color"))
    }

    fn mismatch(&self, expected: &'static str) -> VitrineError {
        VitrineError::ControlValueMismatch {
            control: self.property.to_string(),
            expected,
        }
    }
}

/// Edits made by the panel since the last frame
#[derive(Debug, Default)]
pub struct EditQueue {
    edits: Vec<PropertyEdit>,
}

impl EditQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, edit: PropertyEdit) {
        self.edits.push(edit);
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, PropertyEdit> {
        self.edits.drain(..)
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}

fn value_matches(property: &Property, value: ControlValue) -> bool {
    property.expects_color() == matches!(value, ControlValue::Color(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::resources::PhysicalMaterial;
    use crate::gfx::scene::Light;

    fn scene() -> (Scene, LightId) {
        let mut scene = Scene::new_screen();
        let ambient = scene.add_light(Light::ambient("ambient", Color::from_hex(0x404040), 1.0));
        scene
            .material_manager
            .add_physical(PhysicalMaterial::new("hero").with_roughness(0.5));
        (scene, ambient)
    }

    #[test]
    fn test_complement() {
        assert_eq!(
            Conversion::Complement.convert(ControlValue::Scalar(0.25)),
            ControlValue::Scalar(0.75)
        );
        assert_eq!(
            Conversion::Identity.convert(ControlValue::Scalar(0.25)),
            ControlValue::Scalar(0.25)
        );
    }

    #[test]
    fn test_edit_writes_light() {
        let (mut scene, ambient) = scene();
        let binding = Binding::new(
            Property::light(ambient, LightField::Color),
            Conversion::Identity,
        );
        binding
            .resolve(ControlValue::Color(Color::from_hex(0xff0000)))
            .apply(&mut scene)
            .unwrap();
        assert_eq!(scene.light(ambient).unwrap().color.to_hex(), 0xff0000);
    }

    #[test]
    fn test_edit_writes_material() {
        let (mut scene, _) = scene();
        PropertyEdit::new(
            Property::material("hero", MaterialField::Clearcoat),
            ControlValue::Scalar(0.8),
        )
        .apply(&mut scene)
        .unwrap();
        let hero = scene.material_manager.physical("hero").unwrap();
        assert_eq!(hero.clearcoat, 0.8);
        assert_eq!(hero.roughness, 0.5);
    }

    #[test]
    fn test_value_kind_mismatch() {
        let (mut scene, ambient) = scene();
        let err = PropertyEdit::new(
            Property::light(ambient, LightField::Intensity),
            ControlValue::Color(Color::WHITE),
        )
        .apply(&mut scene)
        .unwrap_err();
        assert!(matches!(
            err,
            VitrineError::ControlValueMismatch {
                expected: "scalar",
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_material() {
        let (mut scene, _) = scene();
        let err = PropertyEdit::new(
            Property::material("missing", MaterialField::Metalness),
            ControlValue::Scalar(0.1),
        )
        .apply(&mut scene)
        .unwrap_err();
        assert!(matches!(err, VitrineError::UnknownMaterial(_)));
    }

    #[test]
    fn test_validate_leaves_scene_untouched() {
        let (scene, ambient) = scene();
        let ok = PropertyEdit::new(
            Property::light(ambient, LightField::Intensity),
            ControlValue::Scalar(7.0),
        );
        assert!(ok.validate(&scene).is_ok());
        assert_eq!(scene.light(ambient).unwrap().intensity, 1.0);

        let missing = PropertyEdit::new(
            Property::material("missing", MaterialField::Roughness),
            ControlValue::Scalar(0.2),
        );
        assert!(matches!(
            missing.validate(&scene),
            Err(VitrineError::UnknownMaterial(_))
        ));

        let wrong_kind = PropertyEdit::new(
            Property::material("hero", MaterialField::Color),
            ControlValue::Scalar(0.2),
        );
        assert!(matches!(
            wrong_kind.validate(&scene),
            Err(VitrineError::ControlValueMismatch {
                expected: "color",
                ..
            })
        ));
    }

    #[test]
    fn test_queue_drains_in_order() {
        let (_, ambient) = scene();
        let mut queue = EditQueue::new();
        for v in [0.1, 0.2] {
            queue.push(PropertyEdit::new(
                Property::light(ambient, LightField::Intensity),
                ControlValue::Scalar(v),
            ));
        }
        let values: Vec<_> = queue.drain().map(|e| e.value).collect();
        assert_eq!(
            values,
            vec![ControlValue::Scalar(0.1), ControlValue::Scalar(0.2)]
        );
        assert!(queue.is_empty());
    }
}
