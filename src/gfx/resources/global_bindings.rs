//! Global uniform bindings for camera and scene data
//!
//! Per-frame state shared by every draw: the camera matrices plus the
//! ambient and point light. Bound to slot 0 of the scene pipeline.

use crate::{
    gfx::{
        camera::camera_utils::CameraUniform,
        scene::light::{AmbientLight, PointLight},
    },
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Global uniform buffer content structure
///
/// MUST match the `Globals` struct in `scene.wgsl` exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
    /// rgb = color * intensity
    ambient: [f32; 4],
    /// xyz = position, w = range
    point_position: [f32; 4],
    /// rgb = color * intensity, w = decay
    point_color: [f32; 4],
}
// 16 + 64 + 16 + 16 + 16 = 128 bytes

impl GlobalUBOContent {
    pub fn new(camera: CameraUniform, ambient: &AmbientLight, point: &PointLight) -> Self {
        let [ar, ag, ab] = ambient.radiance();
        let [pr, pg, pb] = point.radiance();
        let p = point.position;
        Self {
            view_position: camera.view_position,
            view_proj: camera.view_proj,
            ambient: [ar, ag, ab, 1.0],
            point_position: [p.x, p.y, p.z, point.distance],
            point_color: [pr, pg, pb, point.decay],
        }
    }
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Updates the global uniform buffer with camera and light data
pub fn update_global_ubo(
    ubo: &mut GlobalUBO,
    queue: &wgpu::Queue,
    camera: CameraUniform,
    ambient: &AmbientLight,
    point: &PointLight,
) {
    ubo.update_content(queue, GlobalUBOContent::new(camera, ambient, point));
}

/// Bind group layout and bind group for the global uniforms
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: Option<wgpu::BindGroup>,
}

impl GlobalBindings {
    /// Sets up the layout; the bind group waits for `create_bind_group()`
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform_sized::<GlobalUBOContent>())
            .create(device, "Globals Bind Group");

        GlobalBindings {
            bind_group_layout,
            bind_group: None,
        }
    }

    pub fn create_bind_group(&mut self, device: &wgpu::Device, ubo: &GlobalUBO) {
        self.bind_group = Some(
            BindGroupBuilder::new(&self.bind_group_layout)
                .resource(ubo.binding_resource())
                .create(device, "Global Bind Group"),
        );
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    /// `None` until `create_bind_group()` has run
    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.bind_group.as_ref()
    }
}
