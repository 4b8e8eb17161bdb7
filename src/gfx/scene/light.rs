use cgmath::Vector3;

use crate::gfx::color::Color;

/// Shadow map settings of a shadow casting light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowConfig {
    pub map_size: u32,
    pub near: f32,
    pub far: f32,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            map_size: 512,
            near: 0.5,
            far: 500.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LightKind {
    Ambient,
    Point {
        position: Vector3<f32>,
        shadow: Option<ShadowConfig>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub name: String,
    pub kind: LightKind,
    pub color: Color,
    pub intensity: f32,
}

impl Light {
    pub fn ambient(name: impl Into<String>, color: Color, intensity: f32) -> Self {
        Self {
            name: name.into(),
            kind: LightKind::Ambient,
            color,
            intensity,
        }
    }

    pub fn point(
        name: impl Into<String>,
        color: Color,
        intensity: f32,
        position: Vector3<f32>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: LightKind::Point {
                position,
                shadow: None,
            },
            color,
            intensity,
        }
    }

    /// Enables shadow casting. Has no effect on ambient lights.
    pub fn with_shadow(mut self, config: ShadowConfig) -> Self {
        if let LightKind::Point { shadow, .. } = &mut self.kind {
            *shadow = Some(config);
        }
        self
    }

    /// Copy of this light under a new name, without shadow casting
    pub fn clone_as(&self, name: impl Into<String>) -> Self {
        let mut light = self.clone();
        light.name = name.into();
        if let LightKind::Point { shadow, .. } = &mut light.kind {
            *shadow = None;
        }
        light
    }

    pub fn position(&self) -> Option<Vector3<f32>> {
        match self.kind {
            LightKind::Point { position, .. } => Some(position),
            LightKind::Ambient => None,
        }
    }

    pub fn shadow(&self) -> Option<ShadowConfig> {
        match self.kind {
            LightKind::Point { shadow, .. } => shadow,
            LightKind::Ambient => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_as_drops_shadow() {
        let key = Light::point("key", Color::WHITE, 0.25, Vector3::new(-0.5, 0.5, 4.0))
            .with_shadow(ShadowConfig::default());
        let fill = key.clone_as("fill");

        assert_eq!(fill.name, "fill");
        assert_eq!(fill.position(), key.position());
        assert!(key.shadow().is_some());
        assert!(fill.shadow().is_none());
    }

    #[test]
    fn test_ambient_ignores_shadow() {
        let ambient = Light::ambient("ambient", Color::rgb(0.25, 0.25, 0.25), 1.0)
            .with_shadow(ShadowConfig::default());
        assert_eq!(ambient.kind, LightKind::Ambient);
        assert!(ambient.position().is_none());
    }
}
