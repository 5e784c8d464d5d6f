//! winit application: window, renderer and controller wiring

use anyhow::{anyhow, Context, Result};
use hexweave_core::glam::Vec2;
use hexweave_core::{Controller, PostData};
use hexweave_render::window::{window_attributes, RedrawScheduler, WindowConfig};
use hexweave_render::HexRenderer;
use hexweave_services::{PointerAction, PointerInput, Settings};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

struct Running {
    window: Arc<Window>,
    renderer: HexRenderer,
    controller: Controller,
}

pub struct App {
    settings: Settings,
    posts: Vec<PostData>,
    seed: u64,
    running: Option<Running>,
    input: PointerInput,
    epoch: Instant,
    last_stats_log: f64,
    title: String,
    error: Option<anyhow::Error>,
}

fn logical_viewport(window: &Window) -> Vec2 {
    let size = window.inner_size().to_logical::<f32>(window.scale_factor());
    Vec2::new(size.width, size.height)
}

impl App {
    pub fn new(settings: Settings, posts: Vec<PostData>, seed: u64) -> Self {
        let title = settings.window.title.clone();
        Self {
            settings,
            posts,
            seed,
            running: None,
            input: PointerInput::new(),
            epoch: Instant::now(),
            last_stats_log: 0.0,
            title,
            error: None,
        }
    }

    /// The error that stopped the event loop, if any.
    pub fn into_result(self) -> Result<()> {
        self.error.map_or(Ok(()), Err)
    }

    /// Milliseconds since startup.
    fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64() * 1000.0
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_settings = &self.settings.window;
        let attributes = window_attributes(&WindowConfig {
            title: window_settings.title.clone(),
            width: window_settings.width,
            height: window_settings.height,
            fullscreen: window_settings.fullscreen,
        });
        let window = Arc::new(event_loop.create_window(attributes).context("creating window")?);
        let renderer = pollster::block_on(HexRenderer::new(window.clone())).context("initializing renderer")?;

        let controller = Controller::new(
            self.settings.hex.clone(),
            std::mem::take(&mut self.posts),
            logical_viewport(&window),
            Box::new(RedrawScheduler::new(window.clone())),
            self.seed,
        )
        .context("building the grid")?;

        window.request_redraw();
        self.running = Some(Running {
            window,
            renderer,
            controller,
        });
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        error!(error = %err, "stopping");
        self.error = Some(err);
        event_loop.exit();
    }

    fn dispatch(&mut self, action: PointerAction) {
        let now = self.now();
        if let Some(running) = &mut self.running {
            action.dispatch(&mut running.controller, now);
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = self.now();
        let Some(running) = &mut self.running else { return };
        running.controller.tick(now);

        let viewport = running.controller.scene().viewport();
        if let Err(err) = running.renderer.render(running.controller.display(), viewport) {
            self.fail(event_loop, anyhow!(err).context("rendering frame"));
            return;
        }

        let title = match running.controller.open_post_data() {
            Some(post) => format!("{} - {}", self.settings.window.title, post.title()),
            None => self.settings.window.title.clone(),
        };
        if title != self.title {
            running.window.set_title(&title);
            self.title = title;
        }

        let interval = self.settings.window.fps_log_interval * 1000.0;
        if interval > 0.0 && now - self.last_stats_log >= interval {
            self.last_stats_log = now;
            let animator = running.controller.animator();
            let timer = animator.frame_timer();
            let (min_ms, max_ms) = timer.frame_time_range_ms();
            info!(
                fps = timer.fps().round(),
                frame_ms = timer.frame_time_ms(),
                min_ms,
                max_ms,
                clamped = timer.clamped_frames(),
                jobs = animator.job_count(),
                "frame stats"
            );
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_none() {
            if let Err(err) = self.start(event_loop) {
                self.fail(event_loop, err);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("window closed");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                let now = self.now();
                if let Some(running) = &mut self.running {
                    running.renderer.resize(size.width, size.height);
                    if size.width > 0 && size.height > 0 {
                        let viewport = logical_viewport(&running.window);
                        debug!(width = viewport.x, height = viewport.y, "viewport resized");
                        running.controller.resize(viewport, now);
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let Some(running) = &self.running else { return };
                let logical = position.to_logical::<f32>(running.window.scale_factor());
                let action = self.input.cursor_moved(Vec2::new(logical.x, logical.y));
                self.dispatch(action);
            }
            WindowEvent::CursorLeft { .. } => {
                let action = self.input.cursor_left();
                self.dispatch(action);
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => self.input.pressed(),
                ElementState::Released => {
                    if let Some(action) = self.input.released() {
                        self.dispatch(action);
                    }
                }
            },
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                let now = self.now();
                if let Some(running) = &mut self.running {
                    running.controller.close_post(now);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}
