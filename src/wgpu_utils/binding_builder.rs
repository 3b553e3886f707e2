//! Builders for bind group layouts and bind groups
//!
//! Bindings are numbered in the order they are added, so a layout and the
//! bind groups created from it only need to agree on ordering.

/// A bind group layout together with the entries it was built from
pub struct BindGroupLayoutWithDesc {
    pub layout: wgpu::BindGroupLayout,
    pub entries: Vec<wgpu::BindGroupLayoutEntry>,
}

#[derive(Default)]
pub struct BindGroupLayoutBuilder {
    entries: Vec<wgpu::BindGroupLayoutEntry>,
}

impl BindGroupLayoutBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_binding(mut self, visibility: wgpu::ShaderStages, ty: wgpu::BindingType) -> Self {
        self.entries.push(wgpu::BindGroupLayoutEntry {
            binding: self.entries.len() as u32,
            visibility,
            ty,
            count: None,
        });
        self
    }

    /// Binding visible to both vertex and fragment stages
    pub fn next_binding_rendering(self, ty: wgpu::BindingType) -> Self {
        self.next_binding(wgpu::ShaderStages::VERTEX_FRAGMENT, ty)
    }

    pub fn next_binding_fragment(self, ty: wgpu::BindingType) -> Self {
        self.next_binding(wgpu::ShaderStages::FRAGMENT, ty)
    }

    pub fn create(self, device: &wgpu::Device, label: &str) -> BindGroupLayoutWithDesc {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(label),
            entries: &self.entries,
        });
        BindGroupLayoutWithDesc {
            layout,
            entries: self.entries,
        }
    }
}

pub struct BindGroupBuilder<'a> {
    layout_with_desc: &'a BindGroupLayoutWithDesc,
    entries: Vec<wgpu::BindGroupEntry<'a>>,
}

impl<'a> BindGroupBuilder<'a> {
    pub fn new(layout_with_desc: &'a BindGroupLayoutWithDesc) -> Self {
        Self {
            layout_with_desc,
            entries: Vec::with_capacity(layout_with_desc.entries.len()),
        }
    }

    pub fn resource(mut self, resource: wgpu::BindingResource<'a>) -> Self {
        debug_assert!(
            self.entries.len() < self.layout_with_desc.entries.len(),
            "more resources than layout entries"
        );
        self.entries.push(wgpu::BindGroupEntry {
            binding: self.entries.len() as u32,
            resource,
        });
        self
    }

    pub fn create(self, device: &wgpu::Device, label: &str) -> wgpu::BindGroup {
        debug_assert_eq!(
            self.entries.len(),
            self.layout_with_desc.entries.len(),
            "bind group does not fill every layout entry"
        );
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.layout_with_desc.layout,
            entries: &self.entries,
        })
    }
}
