use std::marker::PhantomData;

fn short_type_name<T>() -> &'static str {
    let type_name = std::any::type_name::<T>();
    match type_name.rfind(':') {
        Some(pos) => &type_name[(pos + 1)..],
        None => type_name,
    }
}

/// Typed uniform buffer that skips redundant uploads
pub struct UniformBuffer<Content> {
    buffer: wgpu::Buffer,
    content_type: PhantomData<Content>,
    previous_content: Vec<u8>,
}

impl<Content: bytemuck::Pod> UniformBuffer<Content> {
    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("UniformBuffer: {}", short_type_name::<Content>())),
            size: std::mem::size_of::<Content>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        UniformBuffer {
            buffer,
            content_type: PhantomData,
            previous_content: Vec::new(),
        }
    }

    /// Uploads `content` unless it matches the last upload byte for byte
    pub fn update_content(&mut self, queue: &wgpu::Queue, content: Content) {
        let new_content = bytemuck::bytes_of(&content);
        if self.previous_content == new_content {
            return;
        }
        queue.write_buffer(&self.buffer, 0, new_content);
        self.previous_content = new_content.to_vec();
    }

    pub fn binding_resource(&self) -> wgpu::BindingResource {
        self.buffer.as_entire_binding()
    }
}

/// Per-instance vertex buffer that grows when more elements are written
pub struct InstanceBuffer<Content> {
    buffer: wgpu::Buffer,
    content_type: PhantomData<Content>,
    capacity: usize,
    len: usize,
}

impl<Content: bytemuck::Pod> InstanceBuffer<Content> {
    pub fn new(device: &wgpu::Device, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        InstanceBuffer {
            buffer: Self::allocate(device, capacity),
            content_type: PhantomData,
            capacity,
            len: 0,
        }
    }

    fn allocate(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("InstanceBuffer<{}>", short_type_name::<Content>())),
            size: (capacity * std::mem::size_of::<Content>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Replaces the buffer contents, reallocating when `data` outgrows it
    pub fn update_data(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, data: &[Content]) {
        if data.len() > self.capacity {
            self.capacity = data.len().next_power_of_two();
            self.buffer = Self::allocate(device, self.capacity);
            log::debug!(
                "Grew {} instance buffer to {} elements",
                short_type_name::<Content>(),
                self.capacity
            );
        }
        if !data.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(data));
        }
        self.len = data.len();
    }

    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        let bytes = (self.len * std::mem::size_of::<Content>()) as u64;
        self.buffer.slice(..bytes.max(std::mem::size_of::<Content>() as u64))
    }

    /// Number of elements written by the last update
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<std::string::String>(), "String");
        assert_eq!(short_type_name::<u32>(), "u32");
    }
}
