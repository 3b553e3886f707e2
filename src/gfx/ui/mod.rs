//! imgui integration
//!
//! [`UiManager`] owns the imgui context, the winit platform glue and the
//! wgpu renderer. The overlay is drawn into the scene's color target after
//! the main pass.

pub mod panel;

pub use panel::{DebugPanel, LightParameter, NumericBinding};

use imgui::{Context, FontConfig, FontSource, MouseCursor};
use imgui_wgpu::{Renderer, RendererConfig};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use std::time::Instant;
use wgpu::{CommandEncoder, Device, Queue, TextureFormat, TextureView};
use winit::{
    event::{Event, WindowEvent},
    window::{Window, WindowId},
};

use crate::error::{Result, SceneError};

const FONT_SIZE: f64 = 13.0;

pub struct UiManager {
    pub context: Context,
    platform: WinitPlatform,
    renderer: Renderer,
    last_frame: Instant,
    last_cursor: Option<MouseCursor>,
}

impl UiManager {
    pub fn new(
        device: &Device,
        queue: &Queue,
        output_color_format: TextureFormat,
        window: &Window,
    ) -> Self {
        let mut context = Context::create();
        context.set_ini_filename(None);

        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(context.io_mut(), window, HiDpiMode::Default);

        // Rasterize at physical size, then scale back so widgets keep their logical size
        let hidpi_factor = window.scale_factor();
        context.io_mut().font_global_scale = (1.0 / hidpi_factor) as f32;
        context.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                oversample_h: 1,
                pixel_snap_h: true,
                size_pixels: (FONT_SIZE * hidpi_factor) as f32,
                ..Default::default()
            }),
        }]);

        let renderer_config = RendererConfig {
            texture_format: output_color_format,
            ..Default::default()
        };
        let renderer = Renderer::new(&mut context, device, queue, renderer_config);

        log::debug!("imgui ready at scale factor {}", hidpi_factor);

        Self {
            context,
            platform,
            renderer,
            last_frame: Instant::now(),
            last_cursor: None,
        }
    }

    /// Forwards a window event to imgui
    ///
    /// # Returns
    /// `true` when imgui wants the mouse or keyboard for itself
    pub fn handle_input(
        &mut self,
        window: &Window,
        window_id: WindowId,
        event: &WindowEvent,
    ) -> bool {
        match event {
            WindowEvent::CursorMoved { .. }
            | WindowEvent::MouseInput { .. }
            | WindowEvent::MouseWheel { .. }
            | WindowEvent::KeyboardInput { .. }
            | WindowEvent::ModifiersChanged(_)
            | WindowEvent::Focused(_)
            | WindowEvent::Resized(_)
            | WindowEvent::ScaleFactorChanged { .. } => {
                let ui_event: Event<()> = Event::WindowEvent {
                    window_id,
                    event: event.clone(),
                };
                self.platform
                    .handle_event(self.context.io_mut(), window, &ui_event);
                self.wants_capture_mouse() || self.wants_capture_keyboard()
            }
            _ => false,
        }
    }

    pub fn wants_capture_mouse(&self) -> bool {
        self.context.io().want_capture_mouse
    }

    pub fn wants_capture_keyboard(&self) -> bool {
        self.context.io().want_capture_keyboard
    }

    /// Builds this frame's widgets without rendering them
    ///
    /// # Returns
    /// Whether imgui wants to capture input after the frame
    pub fn update_logic<F>(&mut self, window: &Window, run_ui: F) -> Result<bool>
    where
        F: FnOnce(&imgui::Ui),
    {
        let now = Instant::now();
        self.context
            .io_mut()
            .update_delta_time(now - self.last_frame);
        self.last_frame = now;

        self.platform
            .prepare_frame(self.context.io_mut(), window)
            .map_err(|e| SceneError::Ui(e.to_string()))?;

        let ui = self.context.new_frame();
        run_ui(ui);

        if self.last_cursor != ui.mouse_cursor() {
            self.last_cursor = ui.mouse_cursor();
            self.platform.prepare_render(ui, window);
        }

        Ok(self.wants_capture_mouse() || self.wants_capture_keyboard())
    }

    /// Ends a frame that will not be presented
    pub fn discard_frame(&mut self) {
        let _ = self.context.render();
    }

    /// Records the widgets built by [`Self::update_logic`] on top of the scene
    pub fn render_display_only(
        &mut self,
        device: &Device,
        queue: &Queue,
        encoder: &mut CommandEncoder,
        color_attachment: &TextureView,
    ) -> Result<()> {
        let draw_data = self.context.render();

        // Minimized windows report an empty display
        if draw_data.display_size[0] <= 0.0 || draw_data.display_size[1] <= 0.0 {
            return Ok(());
        }

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("imgui_render_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_attachment,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        self.renderer
            .render(draw_data, queue, device, &mut render_pass)
            .map_err(|e| SceneError::Ui(format!("{:?}", e)))
    }
}
