use super::camera_utils::{convert_matrix4_to_array, Camera, CameraUniform};
use cgmath::*;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Orbit pose restored by [`OrbitCamera::reset_to_default`]
#[derive(Debug, Clone, Copy)]
struct OrbitPose {
    distance: f32,
    pitch: f32,
    yaw: f32,
    target: Vector3<f32>,
}

/// Inertia for drag input
///
/// Rotation and pan requests accumulate here and are applied a `factor`
/// fraction at a time by [`OrbitCamera::update_controls`], so motion eases
/// out after the pointer stops.
#[derive(Debug, Clone, Copy)]
pub struct Damping {
    pub enabled: bool,
    pub factor: f32,
    yaw: f32,
    pitch: f32,
    pan: Vector3<f32>,
}

impl Damping {
    pub fn new(factor: f32) -> Self {
        Self {
            enabled: true,
            factor: factor.clamp(0.0, 1.0),
            yaw: 0.0,
            pitch: 0.0,
            pan: Vector3::zero(),
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new(0.0)
        }
    }

    /// True while queued motion is still being applied
    pub fn is_settling(&self) -> bool {
        const REST: f32 = 1e-6;
        self.yaw.abs() > REST || self.pitch.abs() > REST || self.pan.magnitude2() > REST * REST
    }

    fn clear(&mut self) {
        self.yaw = 0.0;
        self.pitch = 0.0;
        self.pan = Vector3::zero();
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub bounds: OrbitCameraBounds,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub damping: Damping,
    pub uniform: CameraUniform,
    home: OrbitPose,
}

impl Camera for OrbitCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.eye);
        let target = Point3::from_vec(self.target);
        let view = Matrix4::look_at_rh(eye, target, self.up);
        let proj =
            OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }
}

impl OrbitCamera {
    pub fn new(distance: f32, pitch: f32, yaw: f32, target: Vector3<f32>, aspect: f32) -> Self {
        let mut camera = Self {
            distance,
            pitch,
            yaw,
            eye: Vector3::zero(), // Derived from the orbit in `update()`
            target,
            up: Vector3::unit_y(),
            bounds: OrbitCameraBounds::default(),
            aspect,
            fovy: Rad(std::f32::consts::PI / 4.0),
            znear: 0.1,
            zfar: 1000.0,
            damping: Damping::disabled(),
            uniform: CameraUniform::default(),
            home: OrbitPose {
                distance,
                pitch,
                yaw,
                target,
            },
        };
        camera.update();
        camera
    }

    /// Orbit camera placed at `eye` looking at `target`
    pub fn looking_at(eye: Vector3<f32>, target: Vector3<f32>, aspect: f32) -> Self {
        let offset = eye - target;
        let distance = offset.magnitude().max(f32::EPSILON);
        let pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
        let yaw = offset.x.atan2(offset.z);
        Self::new(distance, pitch, yaw, target, aspect)
    }

    pub fn with_fov(mut self, fovy: impl Into<Rad<f32>>) -> Self {
        self.fovy = fovy.into();
        self
    }

    pub fn with_clip_planes(mut self, znear: f32, zfar: f32) -> Self {
        self.znear = znear;
        self.zfar = zfar;
        self
    }

    /// Replaces the bounds and pulls the current pose inside them
    pub fn with_bounds(mut self, bounds: OrbitCameraBounds) -> Self {
        self.bounds = bounds;
        self.home.distance = self.clamp_distance(self.home.distance);
        self.set_distance(self.distance);
        self
    }

    pub fn with_damping(mut self, factor: f32) -> Self {
        self.damping = Damping::new(factor);
        self
    }

    pub fn reset_to_default(&mut self) {
        let home = self.home;
        self.distance = home.distance;
        self.pitch = home.pitch;
        self.yaw = home.yaw;
        self.target = home.target;
        self.damping.clear();

        self.update();
    }

    fn clamp_distance(&self, distance: f32) -> f32 {
        distance.clamp(
            self.bounds.min_distance.unwrap_or(f32::EPSILON),
            self.bounds.max_distance.unwrap_or(f32::MAX),
        )
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = self.clamp_distance(distance);
        self.update();
    }

    pub fn add_distance(&mut self, delta: f32) {
        let corrected_zoom = f32::log10(self.distance) * delta;
        self.set_distance(self.distance + corrected_zoom);
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(self.bounds.min_pitch, self.bounds.max_pitch);
        self.update();
    }

    pub fn add_pitch(&mut self, delta: f32) {
        if self.damping.enabled {
            self.damping.pitch += delta;
        } else {
            self.set_pitch(self.pitch + delta);
        }
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        let mut bounded_yaw = yaw;
        if let Some(min_yaw) = self.bounds.min_yaw {
            bounded_yaw = bounded_yaw.max(min_yaw);
        }
        if let Some(max_yaw) = self.bounds.max_yaw {
            bounded_yaw = bounded_yaw.min(max_yaw);
        }
        self.yaw = bounded_yaw;
        self.update();
    }

    pub fn add_yaw(&mut self, delta: f32) {
        if self.damping.enabled {
            self.damping.yaw += delta;
        } else {
            self.set_yaw(self.yaw + delta);
        }
    }

    /// Pans the camera relative to the current view direction
    /// delta.0 = horizontal pan (left/right relative to camera view)
    /// delta.1 = vertical pan (up/down relative to camera view)
    pub fn pan(&mut self, delta: (f32, f32)) {
        let forward = (self.target - self.eye).normalize();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward).normalize();

        // Scaled by distance so panning feels the same at every zoom level
        let pan_scale = self.distance * 0.1;
        let movement = right * delta.0 * pan_scale + up * delta.1 * pan_scale;

        if self.damping.enabled {
            self.damping.pan += movement;
        } else {
            self.target += movement;
            self.update();
        }
    }

    /// Applies one frame of queued damped motion
    ///
    /// Returns whether the camera moved. Does nothing when damping is off,
    /// since input is then applied immediately.
    pub fn update_controls(&mut self) -> bool {
        if !self.damping.enabled || !self.damping.is_settling() {
            return false;
        }

        let factor = self.damping.factor;
        let (yaw, pitch, pan) = (self.damping.yaw, self.damping.pitch, self.damping.pan);

        self.target += pan * factor;
        self.set_yaw(self.yaw + yaw * factor);
        self.set_pitch(self.pitch + pitch * factor);

        let remaining = 1.0 - factor;
        self.damping.yaw *= remaining;
        self.damping.pitch *= remaining;
        self.damping.pan *= remaining;
        true
    }

    /// Updates the camera after changing `distance`, `pitch` or `yaw`.
    fn update(&mut self) {
        self.eye =
            calculate_cartesian_eye_position(self.pitch, self.yaw, self.distance, self.target);
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.set_aspect(width as f32 / height as f32);
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn update_view_proj(&mut self) {
        self.uniform.view_position = [self.eye.x, self.eye.y, self.eye.z, 1.0];
        self.uniform.view_proj = convert_matrix4_to_array(self.build_view_projection_matrix());
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrbitCameraBounds {
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
    pub min_pitch: f32,
    pub max_pitch: f32,
    pub min_yaw: Option<f32>,
    pub max_yaw: Option<f32>,
}

impl OrbitCameraBounds {
    pub fn with_distance(mut self, min: f32, max: f32) -> Self {
        self.min_distance = Some(min);
        self.max_distance = Some(max);
        self
    }
}

impl Default for OrbitCameraBounds {
    fn default() -> Self {
        Self {
            min_distance: None,
            max_distance: Some(16.0),
            min_pitch: -std::f32::consts::PI / 2.0 + f32::EPSILON,
            max_pitch: std::f32::consts::PI / 2.0 - f32::EPSILON,
            min_yaw: None,
            max_yaw: None,
        }
    }
}

fn calculate_cartesian_eye_position(
    pitch: f32,
    yaw: f32,
    distance: f32,
    target: Vector3<f32>,
) -> Vector3<f32> {
    Vector3::new(
        distance * yaw.sin() * pitch.cos(),
        distance * pitch.sin(),
        distance * yaw.cos() * pitch.cos(),
    ) + target
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vector3<f32>, b: Vector3<f32>) {
        assert!((a - b).magnitude() < 1e-5, "{a:?} != {b:?}");
    }

    #[test]
    fn test_looking_at_reproduces_eye() {
        let camera = OrbitCamera::looking_at(Vector3::new(1.0, 1.0, 2.0), Vector3::zero(), 1.5);
        assert_close(camera.eye, Vector3::new(1.0, 1.0, 2.0));
        assert!((camera.distance - 6.0f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn test_distance_bounds() {
        let mut camera = OrbitCamera::looking_at(Vector3::new(1.0, 1.0, 2.0), Vector3::zero(), 1.0)
            .with_bounds(OrbitCameraBounds::default().with_distance(2.0, 5.0));

        camera.set_distance(10.0);
        assert_eq!(camera.distance, 5.0);
        camera.set_distance(0.5);
        assert_eq!(camera.distance, 2.0);
        assert!((camera.eye.magnitude() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_damped_rotation_eases_in() {
        let mut camera =
            OrbitCamera::looking_at(Vector3::new(0.0, 0.0, 3.0), Vector3::zero(), 1.0)
                .with_damping(0.05);
        let start = camera.yaw;

        camera.add_yaw(1.0);
        assert_eq!(camera.yaw, start);

        assert!(camera.update_controls());
        assert!((camera.yaw - start - 0.05).abs() < 1e-6);
        assert!(camera.update_controls());
        assert!((camera.yaw - start - 0.05 - 0.05 * 0.95).abs() < 1e-6);

        for _ in 0..2000 {
            camera.update_controls();
        }
        assert!((camera.yaw - start - 1.0).abs() < 1e-3);
        assert!(!camera.damping.is_settling());
    }

    #[test]
    fn test_undamped_rotation_is_immediate() {
        let mut camera = OrbitCamera::new(3.0, 0.0, 0.0, Vector3::zero(), 1.0);
        camera.add_yaw(0.5);
        assert_eq!(camera.yaw, 0.5);
        assert!(!camera.update_controls());
    }

    #[test]
    fn test_reset_restores_initial_pose() {
        let mut camera =
            OrbitCamera::looking_at(Vector3::new(1.0, 1.0, 2.0), Vector3::zero(), 1.0);
        camera.set_yaw(2.0);
        camera.set_distance(4.0);
        camera.pan((1.0, 0.0));

        camera.reset_to_default();
        assert_close(camera.eye, Vector3::new(1.0, 1.0, 2.0));
        assert_close(camera.target, Vector3::zero());
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut camera = OrbitCamera::new(3.0, 0.0, 0.0, Vector3::zero(), 1.0);
        camera.resize_projection(800, 600);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);

        camera.resize_projection(800, 0);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn test_view_projection_keeps_target_centered() {
        let mut camera = OrbitCamera::looking_at(Vector3::new(1.0, 1.0, 2.0), Vector3::zero(), 1.5)
            .with_fov(Deg(75.0))
            .with_clip_planes(0.1, 100.0);
        camera.update_view_proj();

        let clip = camera.build_view_projection_matrix() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert!((clip.x / clip.w).abs() < 1e-5);
        assert!((clip.y / clip.w).abs() < 1e-5);
        let depth = clip.z / clip.w;
        assert!(depth > 0.0 && depth < 1.0);
        let [x, y, z, w] = camera.uniform.view_position;
        assert_close(Vector3::new(x, y, z), Vector3::new(1.0, 1.0, 2.0));
        assert_eq!(w, 1.0);
    }
}
