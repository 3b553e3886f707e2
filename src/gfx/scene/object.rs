use cgmath::{Matrix4, Rad, Vector3};
use wgpu::{util::DeviceExt, Device};

use super::vertex::{InstanceRaw, Vertex3D};
use crate::{
    gfx::{geometry::GeometryData, resources::material::MaterialId},
    wgpu_utils::InstanceBuffer,
};

/// Triangle mesh with lazily created GPU buffers
pub struct Mesh {
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    index_count: u32,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex3D>, indices: Vec<u32>) -> Self {
        let index_count = indices.len() as u32;
        Self {
            vertices,
            indices,
            vertex_buffer: None,
            index_buffer: None,
            index_count,
        }
    }

    pub fn from_geometry(geometry: &GeometryData) -> Self {
        let (vertices, indices) = geometry.to_scene_format();
        Self::new(vertices, indices)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn triangle_count(&self) -> u32 {
        self.index_count / 3
    }

    pub fn is_uploaded(&self) -> bool {
        self.vertex_buffer.is_some() && self.index_buffer.is_some()
    }

    pub fn init_gpu_resources(&mut self, device: &Device) {
        if self.is_uploaded() || self.vertices.is_empty() || self.indices.is_empty() {
            return;
        }

        self.vertex_buffer = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.index_buffer = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }
}

/// Position, Euler rotation (radians, applied X then Y then Z) and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn with_position(mut self, position: Vector3<f32>) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Vector3<f32>) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vector3::new(scale, scale, scale);
        self
    }

    /// Model matrix `T * Rx * Ry * Rz * S`
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z))
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

/// What an object is for; animation only touches decorative objects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Text,
    Decorative,
}

/// A mesh drawn once per transform in `instances`
pub struct Object {
    pub name: String,
    pub kind: ObjectKind,
    pub mesh: Mesh,
    pub instances: Vec<Transform>,
    pub visible: bool,
    material_id: Option<MaterialId>,
    instance_buffer: Option<InstanceBuffer<InstanceRaw>>,
}

impl Object {
    pub fn new(name: &str, kind: ObjectKind, mesh: Mesh, instances: Vec<Transform>) -> Self {
        Self {
            name: name.to_string(),
            kind,
            mesh,
            instances,
            visible: true,
            material_id: None,
            instance_buffer: None,
        }
    }

    /// Object drawn once at its own origin
    pub fn single(name: &str, kind: ObjectKind, mesh: Mesh) -> Self {
        Self::new(name, kind, mesh, vec![Transform::identity()])
    }

    pub fn set_material(&mut self, material_id: &str) {
        self.material_id = Some(material_id.to_string());
    }

    pub fn get_material_id(&self) -> Option<&MaterialId> {
        self.material_id.as_ref()
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Model matrices in the layout the instance buffer expects
    pub fn instance_data(&self) -> Vec<InstanceRaw> {
        self.instances
            .iter()
            .map(|t| InstanceRaw::from(t.matrix()))
            .collect()
    }

    pub fn init_gpu_resources(&mut self, device: &Device) {
        self.mesh.init_gpu_resources(device);
        if self.instance_buffer.is_none() {
            self.instance_buffer = Some(InstanceBuffer::new(device, self.instances.len()));
        }
    }

    /// Uploads the current instance transforms
    pub fn update_instances(&mut self, device: &Device, queue: &wgpu::Queue) {
        let data = self.instance_data();
        if let Some(buffer) = &mut self.instance_buffer {
            buffer.update_data(device, queue, &data);
        }
    }
}

pub trait DrawObject<'a> {
    fn draw_object(&mut self, object: &'a Object);
}

impl<'a, 'b> DrawObject<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    /// Skips objects whose buffers have not been uploaded yet
    fn draw_object(&mut self, object: &'b Object) {
        let (Some(vertex_buffer), Some(index_buffer), Some(instances)) = (
            &object.mesh.vertex_buffer,
            &object.mesh.index_buffer,
            &object.instance_buffer,
        ) else {
            return;
        };
        if !object.visible || instances.is_empty() {
            return;
        }

        self.set_vertex_buffer(0, vertex_buffer.slice(..));
        self.set_vertex_buffer(1, instances.slice());
        self.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..object.mesh.index_count, 0, 0..instances.len() as u32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector4};
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_identity_transform() {
        let m = Transform::identity().matrix();
        let p = m * Vector4::new(1.0, 2.0, 3.0, 1.0);
        assert_eq!(p, Vector4::new(1.0, 2.0, 3.0, 1.0));
    }

    #[test]
    fn test_transform_scales_then_rotates_then_translates() {
        let t = Transform::identity()
            .with_position(Vector3::new(0.0, 5.0, 0.0))
            .with_rotation(Vector3::new(0.0, 0.0, FRAC_PI_2))
            .with_uniform_scale(2.0);

        let p = t.matrix() * Vector4::new(1.0, 0.0, 0.0, 1.0);
        // (1,0,0) -> scaled (2,0,0) -> rotated about z (0,2,0) -> moved (0,7,0)
        assert!((p.truncate() - Vector3::new(0.0, 7.0, 0.0)).magnitude() < 1e-5);
    }

    #[test]
    fn test_instance_data_follows_transforms() {
        let mesh = Mesh::new(Vec::new(), Vec::new());
        let object = Object::new(
            "donuts",
            ObjectKind::Decorative,
            mesh,
            vec![
                Transform::identity(),
                Transform::identity().with_position(Vector3::new(1.0, 2.0, 3.0)),
            ],
        );

        let data = object.instance_data();
        assert_eq!(data.len(), 2);
        assert_eq!(data[1].model[3], [1.0, 2.0, 3.0, 1.0]);
        assert!(object.get_material_id().is_none());
    }

    #[test]
    fn test_mesh_from_geometry() {
        let torus = crate::gfx::geometry::generate_torus(0.3, 0.2, 4, 6);
        let mesh = Mesh::from_geometry(&torus);
        assert_eq!(mesh.vertex_count(), torus.vertex_count());
        assert_eq!(mesh.triangle_count() as usize, torus.triangle_count());
        assert!(!mesh.is_uploaded());
    }
}
