use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, KeyEvent, MouseScrollDelta},
    keyboard::{KeyCode, PhysicalKey},
};

use super::orbit_camera::OrbitCamera;

/// Maps raw mouse and keyboard input onto orbit camera motion
///
/// Left drag orbits, Shift + left drag pans, the wheel zooms and Shift + C
/// returns to the starting pose.
pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    is_shift_held: bool,
    is_mouse_pressed: bool,
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            pan_speed: 0.01,
            is_shift_held: false,
            is_mouse_pressed: false,
        }
    }

    pub fn process_events(&mut self, event: &DeviceEvent, camera: &mut OrbitCamera) {
        match event {
            DeviceEvent::Button {
                button: 0, // Left Mouse Button
                state,
            } => {
                self.is_mouse_pressed = *state == ElementState::Pressed;
            }
            DeviceEvent::MouseWheel { delta, .. } => {
                let scroll_amount = -match delta {
                    MouseScrollDelta::LineDelta(_, scroll) => *scroll,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y: scroll, .. }) => {
                        *scroll as f32
                    }
                };
                camera.add_distance(scroll_amount * self.zoom_speed);
            }
            DeviceEvent::MouseMotion { delta } => {
                if !self.is_mouse_pressed {
                    return;
                }
                if self.is_shift_held {
                    camera.pan((
                        -delta.0 as f32 * self.pan_speed,
                        delta.1 as f32 * self.pan_speed,
                    ));
                } else {
                    camera.add_yaw(-delta.0 as f32 * self.rotate_speed);
                    camera.add_pitch(delta.1 as f32 * self.rotate_speed);
                }
            }
            _ => (),
        }
    }

    pub fn process_keyed_events(&mut self, event: &KeyEvent, camera: &mut OrbitCamera) {
        match event {
            KeyEvent {
                physical_key: PhysicalKey::Code(KeyCode::ShiftLeft | KeyCode::ShiftRight),
                state,
                ..
            } => {
                let was_shift_held = self.is_shift_held;
                self.is_shift_held = *state == ElementState::Pressed;
                if was_shift_held != self.is_shift_held {
                    log::trace!("Shift held: {}", self.is_shift_held);
                }
            }
            KeyEvent {
                physical_key: PhysicalKey::Code(KeyCode::KeyC),
                state: ElementState::Pressed,
                ..
            } => {
                if self.is_shift_held {
                    log::info!("Resetting camera to its starting pose");
                    camera.reset_to_default();
                }
            }
            _ => (),
        }
    }

    /// Returns true if currently rotating
    pub fn is_rotating(&self) -> bool {
        self.is_mouse_pressed && !self.is_shift_held
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::OrbitCameraBounds;
    use cgmath::Vector3;

    fn press(controller: &mut CameraController, camera: &mut OrbitCamera) {
        controller.process_events(
            &DeviceEvent::Button {
                button: 0,
                state: ElementState::Pressed,
            },
            camera,
        );
    }

    #[test]
    fn test_drag_rotates_only_while_pressed() {
        let mut camera = OrbitCamera::new(3.0, 0.0, 0.0, Vector3::new(0.0, 0.0, 0.0), 1.0);
        let mut controller = CameraController::new(0.01, 0.1);

        controller.process_events(&DeviceEvent::MouseMotion { delta: (10.0, 0.0) }, &mut camera);
        assert_eq!(camera.yaw, 0.0);

        press(&mut controller, &mut camera);
        assert!(controller.is_rotating());
        controller.process_events(&DeviceEvent::MouseMotion { delta: (10.0, 0.0) }, &mut camera);
        assert!((camera.yaw + 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_wheel_zoom_respects_bounds() {
        let mut camera = OrbitCamera::new(3.0, 0.0, 0.0, Vector3::new(0.0, 0.0, 0.0), 1.0)
            .with_bounds(OrbitCameraBounds::default().with_distance(2.0, 5.0));
        let mut controller = CameraController::new(0.01, 1.0);

        for _ in 0..100 {
            controller.process_events(
                &DeviceEvent::MouseWheel {
                    delta: MouseScrollDelta::LineDelta(0.0, -1.0),
                },
                &mut camera,
            );
        }
        assert_eq!(camera.distance, 5.0);
    }
}
