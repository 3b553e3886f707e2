//! Per-frame motion of the decorative instances
//!
//! [`FallingAnimator::advance`] is the whole per-frame contract: every
//! decorative instance moves once, and the point light is repositioned once,
//! no matter how many instances exist.

use crate::{
    config::SceneConfig,
    gfx::scene::{Scene, Transform},
};

/// What happens to an instance that has fallen out of view
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InstanceLifecycle {
    /// Instances keep falling forever.
    #[default]
    Unbounded,
    /// Instances below `floor` are lifted back up to `ceiling`.
    Recycle { floor: f32, ceiling: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FallingAnimator {
    pub fall_speed: f32,
    pub rotation_speed: f32,
    pub lifecycle: InstanceLifecycle,
}

impl Default for FallingAnimator {
    fn default() -> Self {
        Self::from_config(&SceneConfig::default())
    }
}

impl FallingAnimator {
    pub fn from_config(config: &SceneConfig) -> Self {
        Self {
            fall_speed: config.fall_speed,
            rotation_speed: config.rotation_speed,
            lifecycle: config.lifecycle,
        }
    }

    /// Moves one instance by one frame
    pub fn step(&self, transform: &mut Transform) {
        transform.position.y -= self.fall_speed;
        transform.rotation.x -= self.rotation_speed;
        transform.rotation.y -= self.rotation_speed;

        if let InstanceLifecycle::Recycle { floor, ceiling } = self.lifecycle {
            if transform.position.y < floor {
                transform.position.y = ceiling;
            }
        }
    }

    /// Advances the whole scene by one frame
    ///
    /// # Arguments
    /// * `elapsed` - Seconds since the clock started
    ///
    /// # Returns
    /// Number of instances that were moved
    pub fn advance(&self, scene: &mut Scene, elapsed: f32) -> usize {
        let mut moved = 0;
        for transform in scene.decorative_instances_mut() {
            self.step(transform);
            moved += 1;
        }

        scene.point_light.position.x = elapsed.cos();
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        camera::CameraManager,
        scene::{Mesh, Object, ObjectKind},
    };
    use cgmath::Vector3;

    fn scene_with_instances(instances: Vec<Transform>) -> Scene {
        let mut scene = Scene::new(CameraManager::scene_default(1.5));
        scene.add_object(Object::single(
            "text",
            ObjectKind::Text,
            Mesh::new(Vec::new(), Vec::new()),
        ));
        scene.add_object(Object::new(
            "donuts",
            ObjectKind::Decorative,
            Mesh::new(Vec::new(), Vec::new()),
            instances,
        ));
        scene
    }

    #[test]
    fn test_step_falls_and_spins() {
        let animator = FallingAnimator::default();
        let mut t = Transform::identity()
            .with_position(Vector3::new(1.0, 5.0, -2.0))
            .with_rotation(Vector3::new(0.5, 0.25, 0.1));

        animator.step(&mut t);

        assert!((t.position.y - 4.997).abs() < 1e-6);
        assert!((t.rotation.x - 0.495).abs() < 1e-6);
        assert!((t.rotation.y - 0.245).abs() < 1e-6);
        assert_eq!(t.rotation.z, 0.1);
        assert_eq!((t.position.x, t.position.z), (1.0, -2.0));
    }

    #[test]
    fn test_position_after_frames() {
        let animator = FallingAnimator::default();
        let start = Transform::identity().with_position(Vector3::new(0.0, 7.0, 0.0));
        let mut scene = scene_with_instances(vec![start; 4]);

        let frames = 600;
        for frame in 0..frames {
            animator.advance(&mut scene, frame as f32 / 60.0);
        }

        let expected = 7.0 - 0.003 * frames as f32;
        for t in scene.decorative_instances() {
            assert!((t.position.y - expected).abs() < 1e-3);
        }
        // Unbounded instances fall past any floor
        assert!(FallingAnimator::default().lifecycle == InstanceLifecycle::Unbounded);
    }

    #[test]
    fn test_light_is_written_once_regardless_of_instance_count() {
        let animator = FallingAnimator::default();
        for count in [0, 1, 100] {
            let mut scene = scene_with_instances(vec![Transform::identity(); count]);
            let moved = animator.advance(&mut scene, 2.0);
            assert_eq!(moved, count);
            assert_eq!(scene.point_light.position.x, 2.0f32.cos());
            assert_eq!(scene.point_light.position.y, -0.5);
            assert_eq!(scene.point_light.position.z, 1.0);
        }
    }

    #[test]
    fn test_text_is_not_animated() {
        let mut scene = scene_with_instances(vec![Transform::identity()]);
        FallingAnimator::default().advance(&mut scene, 0.0);
        assert_eq!(
            scene.get_object("text").unwrap().instances[0],
            Transform::identity()
        );
    }

    #[test]
    fn test_recycle_lifts_instances_back_up() {
        let animator = FallingAnimator {
            lifecycle: InstanceLifecycle::Recycle {
                floor: -1.0,
                ceiling: 10.0,
            },
            ..FallingAnimator::default()
        };
        let mut t = Transform::identity().with_position(Vector3::new(0.0, -0.999, 0.0));

        animator.step(&mut t);
        assert_eq!(t.position.y, 10.0);

        animator.step(&mut t);
        assert!((t.position.y - 9.997).abs() < 1e-5);
    }
}
