//! Material system
//!
//! Materials are stored in [`MaterialManager`] and objects reference them by
//! ID, so every object using the same material shares one uniform buffer and
//! bind group.

use std::collections::HashMap;
use wgpu::Device;

use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    binding_types,
    uniform_buffer::UniformBuffer,
};

/// Material ID for referencing materials
pub type MaterialId = String;

/// ID of the material every object falls back to
pub const DEFAULT_MATERIAL: &str = "default";

/// GPU uniform data for materials, matches `Material` in `scene.wgsl`
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
    _padding: [f32; 2],
}

type MaterialUBO = UniformBuffer<MaterialUniform>;

/// Creates the bind group layout every material bind group is built against
pub fn material_bind_group_layout(device: &Device) -> BindGroupLayoutWithDesc {
    BindGroupLayoutBuilder::new()
        .next_binding_fragment(binding_types::uniform_sized::<MaterialUniform>())
        .create(device, "Material Bind Group")
}

struct MaterialGpu {
    ubo: MaterialUBO,
    bind_group: wgpu::BindGroup,
}

/// Surface description of a mesh
pub struct Material {
    pub name: String,
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,

    gpu: Option<MaterialGpu>,
}

impl Default for Material {
    /// Matte white: full roughness, no metalness
    fn default() -> Self {
        Self::new(DEFAULT_MATERIAL, [1.0, 1.0, 1.0, 1.0], 0.0, 1.0)
    }
}

impl Material {
    pub fn new(name: &str, base_color: [f32; 4], metallic: f32, roughness: f32) -> Self {
        Self {
            name: name.to_string(),
            base_color,
            metallic: metallic.clamp(0.0, 1.0),
            roughness: roughness.clamp(0.0, 1.0),
            gpu: None,
        }
    }

    pub fn with_color(mut self, r: f32, g: f32, b: f32) -> Self {
        self.base_color = [r, g, b, self.base_color[3]];
        self
    }

    pub fn with_metallic(mut self, metallic: f32) -> Self {
        self.metallic = metallic.clamp(0.0, 1.0);
        self
    }

    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    pub fn uniform(&self) -> MaterialUniform {
        MaterialUniform {
            base_color: self.base_color,
            metallic: self.metallic,
            roughness: self.roughness,
            _padding: [0.0; 2],
        }
    }

    /// Creates GPU resources on first use and uploads the current properties
    pub fn update_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        layout: &BindGroupLayoutWithDesc,
    ) {
        let uniform = self.uniform();
        let gpu = self.gpu.get_or_insert_with(|| {
            let ubo = MaterialUBO::new(device);
            let bind_group = BindGroupBuilder::new(layout)
                .resource(ubo.binding_resource())
                .create(device, "Material Bind Group");
            MaterialGpu { ubo, bind_group }
        });
        gpu.ubo.update_content(queue, uniform);
    }

    /// Bind group for rendering, `None` before the first GPU upload
    pub fn get_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu.as_ref().map(|gpu| &gpu.bind_group)
    }
}

/// Manages all materials of a scene
///
/// Always holds the default material, so lookups for unknown IDs can fall
/// back to it.
pub struct MaterialManager {
    materials: HashMap<MaterialId, Material>,
    default_material_id: MaterialId,
}

impl Default for MaterialManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialManager {
    pub fn new() -> Self {
        let default_material = Material::default();
        let default_material_id = default_material.name.clone();
        let mut materials = HashMap::new();
        materials.insert(default_material_id.clone(), default_material);

        Self {
            materials,
            default_material_id,
        }
    }

    /// Adds a material, replacing any material with the same name
    pub fn add_material(&mut self, material: Material) {
        self.materials.insert(material.name.clone(), material);
    }

    pub fn get_material(&self, id: &str) -> Option<&Material> {
        self.materials.get(id)
    }

    pub fn get_default_material(&self) -> &Material {
        // The default entry is inserted in `new` and never removed
        &self.materials[&self.default_material_id]
    }

    /// Material for an object, falling back to the default
    pub fn get_material_for_object(&self, material_id: Option<&MaterialId>) -> &Material {
        material_id
            .and_then(|id| self.get_material(id))
            .unwrap_or_else(|| self.get_default_material())
    }

    pub fn list_materials(&self) -> Vec<&MaterialId> {
        self.materials.keys().collect()
    }

    pub fn update_all_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        layout: &BindGroupLayoutWithDesc,
    ) {
        for material in self.materials.values_mut() {
            material.update_gpu_resources(device, queue, layout);
        }
    }
}
