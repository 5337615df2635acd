//! Window creation and event handling via winit.
//!
//! Provides [`App`] which implements winit's [`ApplicationHandler`] trait,
//! and a [`run`] function to start the event loop.

use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use orrery_config::Config;
use orrery_input::{DragControls, MouseState};
use orrery_render::{
    Camera, RenderContext, RenderContextError, SurfaceError, TextureError,
    init_render_context_blocking,
};
use orrery_scene::{Scene, TickContext};

use crate::game_loop::GameLoop;
use crate::renderer::SceneRenderer;

/// Fatal application errors; any of these terminates the process with a
/// non-zero status after a diagnostic naming the failing operation.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The winit event loop could not be created or failed while running.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// Window creation failed.
    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),

    /// GPU or surface initialization failed.
    #[error(transparent)]
    Render(#[from] RenderContextError),

    /// A scene texture could not be loaded.
    #[error(transparent)]
    Texture(#[from] TextureError),
}

/// Returns [`WindowAttributes`] based on the given configuration.
///
/// The window is a fixed size; there is no resize support.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ))
        .with_resizable(false)
}

/// Application state: window, GPU context, scene, and input plumbing.
pub struct App {
    window: Option<Arc<Window>>,
    gpu: Option<RenderContext>,
    renderer: Option<SceneRenderer>,
    game_loop: GameLoop,
    scene: Scene,
    mouse: MouseState,
    controls: DragControls,
    camera: Camera,
    config: Config,
    init_error: Option<AppError>,
}

impl App {
    /// Create the application with the given configuration. Nothing talks
    /// to the OS or GPU until the event loop delivers `resumed`.
    pub fn new(config: Config) -> Self {
        let controls = DragControls::new(
            config.input.mouse_sensitivity,
            config.input.invert_y,
        );
        let mut camera = Camera::default();
        camera.set_aspect_ratio(config.window.width as f32, config.window.height as f32);

        Self {
            window: None,
            gpu: None,
            renderer: None,
            game_loop: GameLoop::new(),
            scene: Scene::new(),
            mouse: MouseState::new(),
            controls,
            camera,
            config,
            init_error: None,
        }
    }

    /// Record a fatal startup error and stop the event loop.
    fn fail_init(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        error!("{err}");
        self.init_error = Some(err);
        event_loop.exit();
    }

    /// Run one frame: input, fixed-rate simulation steps, camera, render.
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        self.controls
            .apply(&self.mouse, self.scene.planet_mut(), now);
        self.mouse.clear_transients();

        let idle = self.controls.idle_for(now);
        let scene = &mut self.scene;
        self.game_loop.tick(|_dt| {
            scene.update(&TickContext { idle });
        });

        // The camera trails the planet along +Z at the current zoom.
        let (eye, target) = self.scene.camera_anchor();
        self.camera.position = eye;
        self.camera.look_at(target);

        if let (Some(gpu), Some(renderer)) = (&self.gpu, &self.renderer) {
            let draws = self.scene.draw_list();
            match renderer.render(gpu, &self.camera, &draws, self.scene.light_position()) {
                Ok(()) => {}
                Err(SurfaceError::Timeout) => {
                    // Recoverable: skip this frame.
                }
                Err(SurfaceError::Lost) => {
                    warn!("Surface lost; skipping frame");
                }
                Err(SurfaceError::OutOfMemory) => {
                    error!("GPU out of memory, shutting down");
                    event_loop.exit();
                }
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = window_attributes_from_config(&self.config);
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.fail_init(event_loop, AppError::Window(e));
                return;
            }
        };

        let gpu = match init_render_context_blocking(window.clone(), self.config.window.vsync) {
            Ok(gpu) => gpu,
            Err(e) => {
                self.fail_init(event_loop, AppError::Render(e));
                return;
            }
        };

        let draw_count = self.scene.draw_list().len();
        match SceneRenderer::new(&gpu, &self.config.scene, draw_count) {
            Ok(renderer) => {
                self.renderer = Some(renderer);
            }
            Err(e) => {
                self.fail_init(event_loop, AppError::Texture(e));
                return;
            }
        }

        let size = window.inner_size();
        self.camera
            .set_aspect_ratio(size.width as f32, size.height as f32);
        info!(
            "Window created: {}x{} \"{}\"",
            size.width, size.height, self.config.window.title
        );

        self.gpu = Some(gpu);
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                // The window is non-resizable, but DPI moves still deliver
                // new physical sizes the surface must track.
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                }
                if let (Some(renderer), Some(gpu)) = (&mut self.renderer, &self.gpu) {
                    renderer.resize(&gpu.device, new_size.width.max(1), new_size.height.max(1));
                }
                self.camera
                    .set_aspect_ratio(new_size.width as f32, new_size.height as f32);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse.on_cursor_moved(position.x, position.y);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.mouse.on_button(button, state);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.mouse.on_scroll(delta);
            }
            WindowEvent::CursorEntered { .. } => {
                self.mouse.on_cursor_entered();
            }
            WindowEvent::CursorLeft { .. } => {
                self.mouse.on_cursor_left();
            }
            WindowEvent::RedrawRequested => {
                self.render_frame(event_loop);
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Create the event loop and run the application to completion.
///
/// Returns an error if startup failed at any point; the caller maps that
/// to a non-zero exit status.
pub fn run(config: Config) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.init_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
