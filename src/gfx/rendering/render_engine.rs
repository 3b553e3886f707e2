//! WGPU-based rendering engine
//!
//! Owns the surface, device and queue, the depth buffer and the single scene
//! pipeline. Draws every visible object of a [`Scene`] and hands the encoder
//! to an optional UI callback before presenting.

use std::sync::Arc;
use wgpu::TextureFormat;

use crate::{
    error::{Result, SceneError},
    gfx::{
        resources::{
            global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO},
            material::material_bind_group_layout,
            texture_resource::TextureResource,
        },
        scene::{
            object::DrawObject,
            scene::Scene,
            vertex::{InstanceRaw, Vertex3D},
        },
    },
    wgpu_utils::BindGroupLayoutWithDesc,
};

use super::pipeline_manager::{PipelineConfig, PipelineManager};

/// Name the scene pipeline is registered under
pub const SCENE_PIPELINE: &str = "Scene";

const CLEAR_COLOR: wgpu::Color = wgpu::Color::BLACK;

/// Picks an sRGB format so lighting is computed in linear space
pub fn choose_surface_format(formats: &[TextureFormat]) -> Option<TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|f| f.is_srgb())
        .or_else(|| formats.first().copied())
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    pub pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    material_layout: BindGroupLayoutWithDesc,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `width` - Initial surface width in physical pixels
    /// * `height` - Initial surface height in physical pixels
    ///
    /// # Errors
    /// Fails when no surface, adapter or device can be created, or when the
    /// surface reports no usable format.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits::downlevel_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;
        let device = Arc::new(device);
        let queue = Arc::new(queue);

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = choose_surface_format(&surface_capabilities.formats)
            .ok_or(SceneError::UnsupportedSurface)?;
        let alpha_mode = surface_capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let global_ubo = GlobalUBO::new(&device);
        let mut global_bindings = GlobalBindings::new(&device);
        global_bindings.create_bind_group(&device, &global_ubo);
        let material_layout = material_bind_group_layout(&device);

        let mut pipeline_manager = PipelineManager::new(device.clone());
        pipeline_manager.load_shader("scene", include_str!("scene.wgsl"));
        pipeline_manager.register_pipeline(
            SCENE_PIPELINE,
            PipelineConfig::default()
                .with_label("Scene Pipeline")
                .with_shader("scene")
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().clone(),
                    material_layout.layout.clone(),
                ])
                .with_vertex_buffers(vec![Vertex3D::desc(), InstanceRaw::desc()])
                .with_cull_mode(None)
                .with_depth_format(TextureResource::DEPTH_FORMAT)
                .with_color_targets(vec![Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })]),
        );
        if let Err(errors) = pipeline_manager.create_all_pipelines() {
            for error in errors {
                log::error!("{}", error);
            }
        }

        log::info!(
            "Render engine ready: {}x{} {:?}",
            config.width,
            config.height,
            format
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_texture,
            format,
            pipeline_manager,
            global_ubo,
            global_bindings,
            material_layout,
        })
    }

    /// Creates missing buffers and uploads the current instance transforms
    pub fn prepare(&mut self, scene: &mut Scene) {
        scene.init_gpu_resources(&self.device, &self.queue, &self.material_layout);
        scene.update_all_transforms(&self.device, &self.queue);
    }

    /// Uploads camera and light state for the next frame
    pub fn update(&mut self, scene: &Scene) {
        update_global_ubo(
            &mut self.global_ubo,
            &self.queue,
            scene.camera_manager.camera.uniform,
            &scene.ambient_light,
            &scene.point_light,
        );
    }

    /// Renders one frame
    ///
    /// A lost, outdated or timed out surface skips the frame; the surface is
    /// reconfigured so the next one can be drawn.
    ///
    /// # Arguments
    /// * `scene` - Objects to draw, already prepared with [`Self::prepare`]
    /// * `ui_callback` - Records UI draws into the same encoder after the scene
    pub fn render_frame<F>(&mut self, scene: &Scene, ui_callback: Option<F>) -> Result<()>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timed out acquiring frame, skipping");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let (Some(globals), Some(pipeline)) = (
                self.global_bindings.bind_group(),
                self.pipeline_manager.get_pipeline(SCENE_PIPELINE),
            ) {
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, globals, &[]);

                for object in scene.objects.iter().filter(|o| o.visible) {
                    let material = scene.get_material_for_object(object);
                    match material.get_bind_group() {
                        Some(material_bind_group) => {
                            render_pass.set_bind_group(1, material_bind_group, &[]);
                            render_pass.draw_object(object);
                        }
                        None => log::trace!(
                            "Skipping '{}' - material '{}' has no GPU resources",
                            object.name,
                            material.name
                        ),
                    }
                }
            }
        }

        if let Some(ui_callback) = ui_callback {
            ui_callback(&self.device, &self.queue, &mut encoder, &surface_texture_view);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    /// Resizes the surface and recreates the depth buffer
    ///
    /// Zero-sized requests (minimized windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if (width, height) == (self.config.width, self.config.height) {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
        log::debug!("Surface resized to {}x{}", width, height);
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Used for creating compatible render targets and UI systems.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_srgb_surface() {
        let formats = [TextureFormat::Bgra8Unorm, TextureFormat::Bgra8UnormSrgb];
        assert_eq!(
            choose_surface_format(&formats),
            Some(TextureFormat::Bgra8UnormSrgb)
        );
    }

    #[test]
    fn test_falls_back_to_first_format() {
        let formats = [TextureFormat::Rgba16Float, TextureFormat::Bgra8Unorm];
        assert_eq!(
            choose_surface_format(&formats),
            Some(TextureFormat::Rgba16Float)
        );
        assert_eq!(choose_surface_format(&[]), None);
    }
}
