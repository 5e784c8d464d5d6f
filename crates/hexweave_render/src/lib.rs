//! Hexweave Render System
//!
//! Draws a [`hexweave_core::DisplayList`] into a winit window with wgpu

pub mod renderer;
pub mod tessellate;
pub mod window;

pub use renderer::HexRenderer;
pub use tessellate::{tessellate, Vertex};
pub use wgpu;
pub use winit;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create surface: {source}")]
    CreateSurface {
        #[source]
        source: wgpu::CreateSurfaceError,
    },

    #[error("no compatible graphics adapter found")]
    NoAdapter,

    #[error("failed to open graphics device: {source}")]
    RequestDevice {
        #[source]
        source: wgpu::RequestDeviceError,
    },

    #[error("surface reports no supported texture format")]
    UnsupportedSurface,

    #[error("failed to acquire frame: {source}")]
    Surface {
        #[source]
        source: wgpu::SurfaceError,
    },
}
