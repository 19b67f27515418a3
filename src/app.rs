//! Window, event loop and frame orchestration
//!
//! [`ShapeStudioApp`] owns the winit event loop; [`AppState`] is the
//! `ApplicationHandler` that creates the window, renderer and UI on resume and
//! drives one [`Viewer`] frame per redraw.

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{DeviceEvent, DeviceId, ElementState, Event, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Fullscreen, Window, WindowAttributes, WindowId},
};

use crate::config::ViewerConfig;
use crate::error::{Result, ViewerError};
use crate::gfx::RenderEngine;
use crate::ui::UiManager;
use crate::viewer::Viewer;

/// Two left presses closer than this toggle fullscreen
const DOUBLE_CLICK_INTERVAL: Duration = Duration::from_millis(400);

pub struct ShapeStudioApp {
    event_loop: EventLoop<()>,
    app_state: AppState,
}

struct AppState {
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    viewer: Viewer,
    clicks: ClickTracker,
    failure: Option<ViewerError>,
}

impl ShapeStudioApp {
    /// Creates the event loop and the viewer state; the window opens in [`run`](Self::run)
    pub fn new(config: ViewerConfig) -> Result<Self> {
        let event_loop = EventLoop::new()?;
        let viewer = Viewer::new(&config);

        Ok(Self {
            event_loop,
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                ui_manager: None,
                viewer,
                clicks: ClickTracker::default(),
                failure: None,
            },
        })
    }

    pub fn viewer_mut(&mut self) -> &mut Viewer {
        &mut self.app_state.viewer
    }

    /// Runs until the window closes
    ///
    /// # Errors
    /// Returns the error that stopped the loop: a failed renderer setup, an
    /// out-of-memory surface, or an event loop failure.
    pub fn run(mut self) -> Result<()> {
        self.event_loop.set_control_flow(ControlFlow::Poll);
        self.event_loop.run_app(&mut self.app_state)?;

        match self.app_state.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: ViewerError) {
        error!("{err}");
        self.failure = Some(err);
        event_loop.exit();
    }

    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attributes = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(event_loop.create_window(attributes)?);

        let PhysicalSize { width, height } = window.inner_size();
        let renderer = pollster::block_on(RenderEngine::new(
            Arc::clone(&window),
            width,
            height,
            self.config.vsync,
        ))?;

        let mut ui_manager = UiManager::new(
            renderer.device(),
            renderer.queue(),
            renderer.surface_format(),
            &window,
        );
        ui_manager.update_display_size(width, height);

        self.viewer
            .scene_mut()
            .camera_manager
            .camera
            .resize_projection(width, height);

        info!("window ready at {width}x{height}");
        self.window = Some(window);
        self.render_engine = Some(renderer);
        self.ui_manager = Some(ui_manager);
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.viewer
            .scene_mut()
            .camera_manager
            .camera
            .resize_projection(width, height);
        if let Some(render_engine) = self.render_engine.as_mut() {
            render_engine.resize(width, height);
        }
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            ui_manager.update_display_size(width, height);
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(render_engine), Some(ui_manager)) = (
            self.window.as_ref(),
            self.render_engine.as_mut(),
            self.ui_manager.as_mut(),
        ) else {
            return;
        };
        let viewer = &mut self.viewer;

        let mut actions = Vec::new();
        ui_manager.update_logic(window, |ui| actions = viewer.draw_panel(ui));
        for action in actions {
            if let Err(err) = viewer.handle_action(action) {
                warn!("{err}");
            }
        }

        viewer.advance_frame();
        if viewer.take_fullscreen_toggle() {
            toggle_fullscreen(window);
        }

        render_engine.prepare_scene(viewer.scene_mut());
        render_engine.update(viewer.scene());

        let result = render_engine.render_frame(
            viewer.scene(),
            Some(
                |device: &wgpu::Device,
                 queue: &wgpu::Queue,
                 encoder: &mut wgpu::CommandEncoder,
                 view: &wgpu::TextureView| {
                    ui_manager.render_display_only(device, queue, encoder, view);
                },
            ),
        );

        if let Err(err) = result {
            self.fail(event_loop, err);
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.init_graphics(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(window) = self.window.clone() else {
            return;
        };

        let ui_captured = match self.ui_manager.as_mut() {
            Some(ui_manager) => {
                let ui_event: Event<()> = Event::WindowEvent {
                    window_id,
                    event: event.clone(),
                };
                ui_manager.handle_input(&window, &ui_event)
            }
            None => false,
        };

        let mut to_camera = false;
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } if !ui_captured => event_loop.exit(),
            WindowEvent::Resized(PhysicalSize { width, height }) => self.resize(width, height),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            // Releases and modifier state must reach the camera even over the panel
            WindowEvent::MouseInput {
                state: ElementState::Released,
                ..
            }
            | WindowEvent::ModifiersChanged(_)
            | WindowEvent::Focused(_) => to_camera = true,
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button,
                ..
            } if !ui_captured => {
                to_camera = true;
                if button == MouseButton::Left && self.clicks.register(Instant::now()) {
                    self.viewer.request_fullscreen_toggle();
                }
            }
            WindowEvent::MouseWheel { .. } if !ui_captured => to_camera = true,
            _ => (),
        }

        if to_camera {
            self.viewer
                .scene_mut()
                .camera_manager
                .process_window_event(&event);
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if self.window.is_none() {
            return;
        }
        if self.ui_manager.as_ref().is_some_and(UiManager::wants_input) {
            return;
        }
        self.viewer
            .scene_mut()
            .camera_manager
            .process_device_event(&event);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn toggle_fullscreen(window: &Window) {
    if window.fullscreen().is_some() {
        window.set_fullscreen(None);
    } else {
        window.set_fullscreen(Some(Fullscreen::Borderless(None)));
    }
}

/// Detects double clicks from a stream of press times
#[derive(Debug, Default)]
struct ClickTracker {
    last_press: Option<Instant>,
}

impl ClickTracker {
    /// Records a press; returns true if it completes a double click
    fn register(&mut self, now: Instant) -> bool {
        match self.last_press.take() {
            Some(previous) if now.saturating_duration_since(previous) <= DOUBLE_CLICK_INTERVAL => true,
            _ => {
                self.last_press = Some(now);
                false
            }
        }
    }
}
