//! WGPU binding type utilities

/// Uniform binding whose size is checked against `T` at pipeline creation
pub fn uniform_sized<T>() -> wgpu::BindingType {
    wgpu::BindingType::Buffer {
        ty: wgpu::BufferBindingType::Uniform,
        has_dynamic_offset: false,
        min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<T>() as u64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sized_uniform_records_size() {
        match uniform_sized::<[f32; 8]>() {
            wgpu::BindingType::Buffer {
                min_binding_size, ..
            } => assert_eq!(min_binding_size.map(|s| s.get()), Some(32)),
            other => panic!("unexpected binding {other:?}"),
        }
    }
}
