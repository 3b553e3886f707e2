use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    config::SceneConfig,
    error::{Result, SceneError},
    frame::{AppContext, FrameScheduler, FrameTarget},
    gfx::{
        rendering::RenderEngine,
        scene::{Scene, Viewport},
        ui::{DebugPanel, UiManager},
    },
};

/// The windowed application: one window, one renderer, one scene
pub struct SceneApp {
    event_loop: EventLoop<()>,
    app_state: AppState,
}

struct AppState {
    config: SceneConfig,
    window: Option<Arc<Window>>,
    frame: Option<WindowFrame>,
    scheduler: Option<FrameScheduler>,
    fatal: Option<SceneError>,
}

/// Draws into the window surface with the imgui overlay on top
struct WindowFrame {
    window: Arc<Window>,
    render_engine: RenderEngine,
    ui_manager: UiManager,
}

impl FrameTarget for WindowFrame {
    fn resize(&mut self, width: u32, height: u32) {
        self.render_engine.resize(width, height);
    }

    fn draw(&mut self, scene: &mut Scene, panel: &DebugPanel) -> Result<()> {
        self.render_engine.prepare(scene);

        // Panel edits land in the lights before they are uploaded
        self.ui_manager.update_logic(&self.window, |ui| {
            panel.draw(ui, scene);
        })?;
        self.render_engine.update(scene);

        let ui_manager = &mut self.ui_manager;
        let mut ui_result = None;
        self.render_engine.render_frame(
            scene,
            Some(
                |device: &wgpu::Device,
                 queue: &wgpu::Queue,
                 encoder: &mut wgpu::CommandEncoder,
                 view: &wgpu::TextureView| {
                    ui_result = Some(ui_manager.render_display_only(device, queue, encoder, view));
                },
            ),
        )?;

        match ui_result {
            Some(result) => result,
            None => {
                self.ui_manager.discard_frame();
                Ok(())
            }
        }
    }
}

impl SceneApp {
    /// Creates the event loop; the window is opened once the loop starts
    pub fn new(config: SceneConfig) -> Result<Self> {
        let event_loop = EventLoop::new()?;
        Ok(Self {
            event_loop,
            app_state: AppState {
                config,
                window: None,
                frame: None,
                scheduler: None,
                fatal: None,
            },
        })
    }

    /// Runs until the window is closed
    ///
    /// # Errors
    /// Startup failures (window, surface, adapter, device) and unrecoverable
    /// frame errors end the loop and are returned here.
    pub fn run(mut self) -> Result<()> {
        self.event_loop.set_control_flow(ControlFlow::Poll);
        self.event_loop.run_app(&mut self.app_state)?;

        match self.app_state.fatal.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn viewport(&self, window: &Window) -> Viewport {
        Viewport::from_physical(
            window.inner_size(),
            window.scale_factor(),
            self.config.max_pixel_ratio,
        )
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let (width, height) = self.config.window_size;
        let window = Arc::new(
            event_loop.create_window(
                WindowAttributes::default()
                    .with_title(self.config.window_title.clone())
                    .with_inner_size(LogicalSize::new(width, height)),
            )?,
        );

        let viewport = self.viewport(&window);
        let (surface_width, surface_height) = viewport.surface_size();
        let render_engine = pollster::block_on(RenderEngine::new(
            window.clone(),
            surface_width,
            surface_height,
        ))?;
        let ui_manager = UiManager::new(
            render_engine.device(),
            render_engine.queue(),
            render_engine.surface_format(),
            &window,
        );

        let context = AppContext::bootstrap(self.config.clone(), viewport);
        self.scheduler = Some(FrameScheduler::new(context));
        self.frame = Some(WindowFrame {
            window: window.clone(),
            render_engine,
            ui_manager,
        });
        self.window = Some(window);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: SceneError) {
        log::error!("{}", error);
        self.fatal = Some(error);
        event_loop.exit();
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if event.state == ElementState::Pressed
            && event.physical_key == PhysicalKey::Code(KeyCode::Escape)
        {
            event_loop.exit();
            return;
        }
        if let Some(scheduler) = self.scheduler.as_mut() {
            scheduler
                .context
                .scene
                .camera_manager
                .process_keyboard_event(event);
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(error) = self.start(event_loop) {
            self.fail(event_loop, error);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };

        let ui_captured = match self.frame.as_mut() {
            Some(frame) => frame.ui_manager.handle_input(&window, window_id, &event),
            None => false,
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput { event, .. } if !ui_captured => {
                self.handle_key(event_loop, &event);
            }
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                let viewport = self.viewport(&window);
                if let (Some(scheduler), Some(frame)) =
                    (self.scheduler.as_mut(), self.frame.as_mut())
                {
                    scheduler.resize(viewport, frame);
                }
            }
            WindowEvent::RedrawRequested => {
                let (Some(scheduler), Some(frame)) = (self.scheduler.as_mut(), self.frame.as_mut())
                else {
                    return;
                };
                match scheduler.tick(frame) {
                    Ok(_) => {}
                    Err(SceneError::Ui(reason)) => log::error!("Debug panel: {}", reason),
                    Err(error) => self.fail(event_loop, error),
                }
            }
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        let (Some(scheduler), Some(frame)) = (self.scheduler.as_mut(), self.frame.as_ref()) else {
            return;
        };

        // Don't move the camera while the panel is being used
        if frame.ui_manager.wants_capture_mouse() {
            return;
        }

        scheduler.context.scene.camera_manager.process_event(&event);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
