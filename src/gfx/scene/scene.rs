use wgpu::Device;

use super::{
    light::{AmbientLight, PointLight},
    object::{Object, ObjectKind, Transform},
};
use crate::{
    gfx::{
        camera::camera_utils::CameraManager,
        resources::material::{Material, MaterialManager},
    },
    wgpu_utils::BindGroupLayoutWithDesc,
};

/// Main scene containing objects, lights, materials, and camera
pub struct Scene {
    pub camera_manager: CameraManager,
    pub ambient_light: AmbientLight,
    pub point_light: PointLight,
    pub objects: Vec<Object>,
    pub material_manager: MaterialManager,
}

impl Scene {
    /// Empty scene with the default lights and the shared matte material
    pub fn new(camera_manager: CameraManager) -> Self {
        Self {
            camera_manager,
            ambient_light: AmbientLight::default(),
            point_light: PointLight::default(),
            objects: Vec::new(),
            material_manager: MaterialManager::new(),
        }
    }

    /// Refreshes the camera uniform from the current orbit
    pub fn update(&mut self) {
        self.camera_manager.camera.update_view_proj();
    }

    pub fn add_object(&mut self, object: Object) {
        log::debug!(
            "Adding {:?} object '{}' with {} instance(s), {} triangles",
            object.kind,
            object.name,
            object.instance_count(),
            object.mesh.triangle_count()
        );
        self.objects.push(object);
    }

    pub fn add_material(&mut self, material: Material) {
        self.material_manager.add_material(material);
    }

    pub fn get_object(&self, name: &str) -> Option<&Object> {
        self.objects.iter().find(|o| o.name == name)
    }

    /// Number of drawable mesh instances across all objects
    pub fn mesh_count(&self) -> usize {
        self.objects.iter().map(Object::instance_count).sum()
    }

    pub fn instance_count(&self, kind: ObjectKind) -> usize {
        self.objects
            .iter()
            .filter(|o| o.kind == kind)
            .map(Object::instance_count)
            .sum()
    }

    /// Transforms of every decorative instance, in spawn order
    pub fn decorative_instances_mut(&mut self) -> impl Iterator<Item = &mut Transform> + '_ {
        self.objects
            .iter_mut()
            .filter(|o| o.kind == ObjectKind::Decorative)
            .flat_map(|o| o.instances.iter_mut())
    }

    pub fn decorative_instances(&self) -> impl Iterator<Item = &Transform> + '_ {
        self.objects
            .iter()
            .filter(|o| o.kind == ObjectKind::Decorative)
            .flat_map(|o| o.instances.iter())
    }

    /// Creates missing GPU resources for objects and materials
    pub fn init_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        material_layout: &BindGroupLayoutWithDesc,
    ) {
        for object in self.objects.iter_mut() {
            object.init_gpu_resources(device);
        }
        self.material_manager
            .update_all_gpu_resources(device, queue, material_layout);
    }

    /// Uploads every object's instance transforms
    pub fn update_all_transforms(&mut self, device: &Device, queue: &wgpu::Queue) {
        for object in &mut self.objects {
            object.update_instances(device, queue);
        }
    }

    /// Material for rendering an object, or the default one
    pub fn get_material_for_object(&self, object: &Object) -> &Material {
        self.material_manager
            .get_material_for_object(object.get_material_id())
    }

    pub fn get_statistics(&self) -> SceneStatistics {
        SceneStatistics {
            object_count: self.objects.len(),
            instance_count: self.mesh_count(),
            material_count: self.material_manager.list_materials().len(),
            total_triangles: self
                .objects
                .iter()
                .map(|o| o.mesh.triangle_count() as usize * o.instance_count())
                .sum(),
        }
    }
}

/// Scene statistics for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneStatistics {
    pub object_count: usize,
    pub instance_count: usize,
    pub material_count: usize,
    pub total_triangles: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::object::Mesh;
    use cgmath::Vector3;

    fn scene() -> Scene {
        Scene::new(CameraManager::scene_default(1.5))
    }

    #[test]
    fn test_new_scene_is_empty_and_lit() {
        let scene = scene();
        assert_eq!(scene.mesh_count(), 0);
        assert_eq!(scene.ambient_light, AmbientLight::default());
        assert_eq!(scene.point_light.position, Vector3::new(1.0, -0.5, 1.0));
        assert_eq!(scene.get_statistics().material_count, 1);
    }

    #[test]
    fn test_counts_by_kind() {
        let mut scene = scene();
        scene.add_object(Object::single(
            "text",
            ObjectKind::Text,
            Mesh::new(Vec::new(), Vec::new()),
        ));
        scene.add_object(Object::new(
            "donuts",
            ObjectKind::Decorative,
            Mesh::new(Vec::new(), Vec::new()),
            vec![Transform::identity(); 3],
        ));

        assert_eq!(scene.mesh_count(), 4);
        assert_eq!(scene.instance_count(ObjectKind::Text), 1);
        assert_eq!(scene.instance_count(ObjectKind::Decorative), 3);
        assert_eq!(scene.decorative_instances().count(), 3);

        for t in scene.decorative_instances_mut() {
            t.position.y = 4.0;
        }
        assert!(scene.decorative_instances().all(|t| t.position.y == 4.0));
        assert_eq!(scene.get_object("text").unwrap().instances[0], Transform::identity());
    }
}
