//! Render pipeline management system for wgpu
//!
//! Pipelines are registered by name with a [`PipelineConfig`] and compiled
//! either up front via [`PipelineManager::create_all_pipelines`] or on first
//! lookup.

use std::{collections::HashMap, sync::Arc};
use wgpu::*;

use crate::gfx::scene::vertex::{InstanceRaw, Vertex3D};

/// Configuration for creating a render pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub label: String,
    pub shader: String,
    pub bind_group_layouts: Vec<BindGroupLayout>,
    pub vertex_buffers: Vec<VertexBufferLayout<'static>>,
    pub primitive_topology: PrimitiveTopology,
    pub cull_mode: Option<Face>,
    pub depth_format: Option<TextureFormat>,
    pub color_targets: Vec<Option<ColorTargetState>>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            label: "Default Pipeline".to_string(),
            shader: "scene.wgsl".to_string(),
            bind_group_layouts: Vec::new(),
            vertex_buffers: vec![Vertex3D::desc(), InstanceRaw::desc()],
            primitive_topology: PrimitiveTopology::TriangleList,
            cull_mode: Some(Face::Back),
            depth_format: None,
            color_targets: vec![Some(ColorTargetState {
                format: TextureFormat::Bgra8UnormSrgb,
                blend: Some(BlendState::REPLACE),
                write_mask: ColorWrites::ALL,
            })],
        }
    }
}

impl PipelineConfig {
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_owned();
        self
    }

    /// Sets the shader for this pipeline (builder pattern)
    ///
    /// # Arguments
    /// * `shader` - Name the shader was loaded under
    pub fn with_shader(mut self, shader: &str) -> Self {
        self.shader = shader.to_string();
        self
    }

    /// `None` draws both faces
    pub fn with_cull_mode(mut self, face: Option<Face>) -> Self {
        self.cull_mode = face;
        self
    }

    pub fn with_bind_group_layouts(mut self, layouts: Vec<BindGroupLayout>) -> Self {
        self.bind_group_layouts = layouts;
        self
    }

    pub fn with_vertex_buffers(mut self, buffers: Vec<VertexBufferLayout<'static>>) -> Self {
        self.vertex_buffers = buffers;
        self
    }

    /// Enables depth testing against a buffer of the given format
    pub fn with_depth_format(mut self, format: TextureFormat) -> Self {
        self.depth_format = Some(format);
        self
    }

    pub fn with_color_targets(mut self, targets: Vec<Option<ColorTargetState>>) -> Self {
        self.color_targets = targets;
        self
    }
}

/// Compiles and caches the render pipelines used by the engine
pub struct PipelineManager {
    device: Arc<Device>,
    pipelines: HashMap<String, RenderPipeline>,
    pipeline_configs: HashMap<String, PipelineConfig>,
    shader_modules: HashMap<String, ShaderModule>,
    pending_pipelines: Vec<String>,
}

impl PipelineManager {
    pub fn new(device: Arc<Device>) -> Self {
        Self {
            device,
            pipelines: HashMap::new(),
            pipeline_configs: HashMap::new(),
            shader_modules: HashMap::new(),
            pending_pipelines: Vec::new(),
        }
    }

    /// Registers a pipeline configuration without creating it
    pub fn register_pipeline(&mut self, name: &str, config: PipelineConfig) {
        self.pipeline_configs.insert(name.to_string(), config);
        self.pending_pipelines.push(name.to_string());
    }

    /// Compiles a WGSL module and stores it under `name`
    pub fn load_shader(&mut self, name: &str, source: &str) {
        let shader_module = self.device.create_shader_module(ShaderModuleDescriptor {
            label: Some(name),
            source: ShaderSource::Wgsl(source.into()),
        });
        self.shader_modules.insert(name.to_string(), shader_module);
    }

    /// Gets or creates a pipeline (lazy loading)
    ///
    /// # Returns
    /// `None` if no config is registered or creation failed
    pub fn get_pipeline(&mut self, name: &str) -> Option<&RenderPipeline> {
        if !self.pipelines.contains_key(name) {
            let config = self.pipeline_configs.get(name)?.clone();
            match self.create_pipeline_from_config(name, &config) {
                Ok(pipeline) => {
                    self.pipelines.insert(name.to_string(), pipeline);
                    self.pending_pipelines.retain(|n| n != name);
                }
                Err(e) => {
                    log::error!("Failed to create pipeline '{}': {}", name, e);
                    return None;
                }
            }
        }

        self.pipelines.get(name)
    }

    /// Creates all pending pipelines immediately
    ///
    /// # Returns
    /// One message per pipeline that failed to build
    pub fn create_all_pipelines(&mut self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let pending = std::mem::take(&mut self.pending_pipelines);

        for name in pending {
            let Some(config) = self.pipeline_configs.get(&name).cloned() else {
                continue;
            };
            match self.create_pipeline_from_config(&name, &config) {
                Ok(pipeline) => {
                    self.pipelines.insert(name, pipeline);
                }
                Err(e) => {
                    errors.push(format!("Pipeline '{}': {}", name, e));
                    self.pending_pipelines.push(name);
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn create_pipeline_from_config(
        &self,
        name: &str,
        config: &PipelineConfig,
    ) -> Result<RenderPipeline, String> {
        let shader = self
            .shader_modules
            .get(&config.shader)
            .ok_or_else(|| format!("Shader '{}' not found", config.shader))?;

        let bind_group_layout_refs: Vec<&BindGroupLayout> =
            config.bind_group_layouts.iter().collect();
        let pipeline_layout = self
            .device
            .create_pipeline_layout(&PipelineLayoutDescriptor {
                label: Some(&format!("{} Layout", name)),
                bind_group_layouts: &bind_group_layout_refs,
                push_constant_ranges: &[],
            });

        let depth_stencil = config.depth_format.map(|format| DepthStencilState {
            format,
            depth_write_enabled: true,
            depth_compare: CompareFunction::Less,
            stencil: StencilState::default(),
            bias: DepthBiasState::default(),
        });

        let pipeline = self
            .device
            .create_render_pipeline(&RenderPipelineDescriptor {
                label: Some(&config.label),
                layout: Some(&pipeline_layout),
                vertex: VertexState {
                    module: shader,
                    entry_point: Some("vs_main"),
                    buffers: &config.vertex_buffers,
                    compilation_options: PipelineCompilationOptions::default(),
                },
                fragment: Some(FragmentState {
                    module: shader,
                    entry_point: Some("fs_main"),
                    targets: &config.color_targets,
                    compilation_options: PipelineCompilationOptions::default(),
                }),
                primitive: PrimitiveState {
                    topology: config.primitive_topology,
                    strip_index_format: None,
                    front_face: FrontFace::Ccw,
                    cull_mode: config.cull_mode,
                    polygon_mode: PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil,
                multisample: MultisampleState::default(),
                multiview: None,
                cache: None,
            });

        Ok(pipeline)
    }
}
