//! Window management
//!
//! Window attributes and the redraw-backed frame scheduler

use hexweave_core::FrameScheduler;
use std::sync::Arc;
use winit::window::{Fullscreen, Window, WindowAttributes};

pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Hexweave".to_string(),
            width: 1280,
            height: 720,
            fullscreen: false,
        }
    }
}

/// Create window attributes from config
pub fn window_attributes(config: &WindowConfig) -> WindowAttributes {
    let attributes = Window::default_attributes()
        .with_title(config.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));
    if config.fullscreen {
        attributes.with_fullscreen(Some(Fullscreen::Borderless(None)))
    } else {
        attributes
    }
}

/// Schedules animation frames by asking the window for a redraw.
pub struct RedrawScheduler {
    window: Arc<Window>,
}

impl RedrawScheduler {
    pub fn new(window: Arc<Window>) -> Self {
        Self { window }
    }
}

impl FrameScheduler for RedrawScheduler {
    fn request_frame(&mut self) {
        self.window.request_redraw();
    }
}
