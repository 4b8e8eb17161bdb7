use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, MouseButton, MouseScrollDelta, WindowEvent},
};

use super::orbit_camera::OrbitCamera;

/// Orbit controls: left drag rotates, right drag pans, the wheel zooms
pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    is_rotating: bool,
    is_panning: bool,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(0.005, 0.1)
    }
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            pan_speed: 0.01,
            is_rotating: false,
            is_panning: false,
        }
    }

    pub fn on_button(&mut self, button: MouseButton, pressed: bool) {
        match button {
            MouseButton::Left => self.is_rotating = pressed,
            MouseButton::Right => self.is_panning = pressed,
            _ => (),
        }
    }

    /// Raw pointer motion in pixels
    pub fn on_motion(&mut self, dx: f32, dy: f32, camera: &mut OrbitCamera) {
        if self.is_rotating {
            camera.add_yaw(-dx * self.rotate_speed);
            camera.add_pitch(dy * self.rotate_speed);
        } else if self.is_panning {
            camera.pan((-dx * self.pan_speed, dy * self.pan_speed));
        }
    }

    /// Positive `lines` zoom in
    pub fn on_scroll(&mut self, lines: f32, camera: &mut OrbitCamera) {
        camera.add_distance(-lines * self.zoom_speed);
    }

    pub fn process_window_event(&mut self, event: &WindowEvent, camera: &mut OrbitCamera) {
        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                self.on_button(*button, *state == ElementState::Pressed);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => *y as f32 / 50.0,
                };
                self.on_scroll(lines, camera);
            }
            WindowEvent::Focused(false) => {
                self.is_rotating = false;
                self.is_panning = false;
            }
            _ => (),
        }
    }

    pub fn process_device_event(&mut self, event: &DeviceEvent, camera: &mut OrbitCamera) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.on_motion(delta.0 as f32, delta.1 as f32, camera);
        }
    }

    pub fn is_rotating(&self) -> bool {
        self.is_rotating
    }

    pub fn is_panning(&self) -> bool {
        self.is_panning
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;

    #[test]
    fn test_motion_without_button_is_ignored() {
        let mut controller = CameraController::default();
        let mut camera = OrbitCamera::looking_at_origin(5.0, 1.0);
        let before = camera.eye;
        controller.on_motion(40.0, 10.0, &mut camera);
        assert_eq!(camera.eye, before);
    }

    #[test]
    fn test_left_drag_rotates_around_target() {
        let mut controller = CameraController::default();
        let mut camera = OrbitCamera::looking_at_origin(5.0, 1.0);
        controller.on_button(MouseButton::Left, true);
        controller.on_motion(100.0, 0.0, &mut camera);
        assert!(camera.yaw != 0.0);
        assert!(((camera.eye - camera.target).magnitude() - 5.0).abs() < 1e-4);

        controller.on_button(MouseButton::Left, false);
        let yaw = camera.yaw;
        controller.on_motion(100.0, 0.0, &mut camera);
        assert_eq!(camera.yaw, yaw);
    }

    #[test]
    fn test_right_drag_pans() {
        let mut controller = CameraController::default();
        let mut camera = OrbitCamera::looking_at_origin(5.0, 1.0);
        controller.on_button(MouseButton::Right, true);
        controller.on_motion(-20.0, 0.0, &mut camera);
        assert!(camera.target.x > 0.0);
        assert_eq!(camera.yaw, 0.0);
    }

    #[test]
    fn test_scroll_up_zooms_in() {
        let mut controller = CameraController::default();
        let mut camera = OrbitCamera::looking_at_origin(5.0, 1.0);
        controller.on_scroll(1.0, &mut camera);
        assert!(camera.distance < 5.0);
    }
}
