use cgmath::{Deg, Matrix4, SquareMatrix, Vector3};
use winit::event::{DeviceEvent, KeyEvent};

use super::{
    camera_controller::CameraController,
    orbit_camera::{OrbitCamera, OrbitCameraBounds},
};

/// Vertical field of view of the scene camera.
pub const FIELD_OF_VIEW: Deg<f32> = Deg(75.0);
pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 100.0;
/// Orbit distance limits of the scene camera.
pub const MIN_DISTANCE: f32 = 2.0;
pub const MAX_DISTANCE: f32 = 5.0;
pub const DAMPING_FACTOR: f32 = 0.05;

pub struct CameraManager {
    pub camera: OrbitCamera,
    pub controller: CameraController,
}

impl CameraManager {
    pub fn new(camera: OrbitCamera, controller: CameraController) -> Self {
        Self { camera, controller }
    }

    /// Damped orbit camera at (1, 1, 2) looking at the origin
    pub fn scene_default(aspect: f32) -> Self {
        let eye = Vector3::new(1.0, 1.0, 2.0);
        let camera = OrbitCamera::looking_at(eye, Vector3::new(0.0, 0.0, 0.0), aspect)
            .with_fov(FIELD_OF_VIEW)
            .with_clip_planes(NEAR_PLANE, FAR_PLANE)
            .with_bounds(OrbitCameraBounds::default().with_distance(MIN_DISTANCE, MAX_DISTANCE))
            .with_damping(DAMPING_FACTOR);

        Self::new(camera, CameraController::new(0.005, 0.1))
    }

    pub fn process_event(&mut self, event: &DeviceEvent) {
        self.controller.process_events(event, &mut self.camera);
    }

    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        self.controller
            .process_keyed_events(event, &mut self.camera);
    }

    /// Advances damped controls by one frame
    pub fn update(&mut self) -> bool {
        self.camera.update_controls()
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.camera.set_aspect(aspect);
    }
}

pub trait Camera: Sized {
    fn build_view_projection_matrix(&self) -> Matrix4<f32>;
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct CameraUniform {
    /// The eye position of the camera in homogenous coordinates.
    ///
    /// Homogenous coordinates are used to fullfill the 16 byte alignment requirement.
    pub view_position: [f32; 4],

    /// Contains the view projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: convert_matrix4_to_array(Matrix4::identity()),
        }
    }
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    matrix4.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Rad};

    #[test]
    fn test_scene_default_camera() {
        let manager = CameraManager::scene_default(1200.0 / 800.0);
        let camera = &manager.camera;

        assert!((camera.eye - Vector3::new(1.0, 1.0, 2.0)).magnitude() < 1e-5);
        assert_eq!(camera.fovy, Rad::from(Deg(75.0)));
        assert_eq!(camera.znear, 0.1);
        assert_eq!(camera.zfar, 100.0);
        assert_eq!(camera.bounds.min_distance, Some(2.0));
        assert_eq!(camera.bounds.max_distance, Some(5.0));
        assert!(camera.damping.enabled);
    }

    #[test]
    fn test_matrix_conversion_is_column_major() {
        let m = Matrix4::from_translation(Vector3::new(1.0, 2.0, 3.0));
        let array = convert_matrix4_to_array(m);
        assert_eq!(array[3], [1.0, 2.0, 3.0, 1.0]);
    }
}
