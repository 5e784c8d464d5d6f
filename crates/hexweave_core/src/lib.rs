//! Hexweave Core
//!
//! The renderer-independent half of the hex grid widget:
//! - Layout math, topology and tile physics
//! - The grid with its expanded (open post) overlay and sectors
//! - The animator and its animation jobs
//! - The controller that ties input, transitions and recurring effects together

pub mod math;
pub mod time;
pub mod color;
pub mod easing;
pub mod config;
pub mod layout;
pub mod topology;
pub mod tile;
pub mod sector;
pub mod grid;
pub mod post;
pub mod visual;
pub mod scene;
pub mod animator;
pub mod jobs;
pub mod annotations;
pub mod controller;

pub use glam;

pub use animator::{AnimationJob, Animator, FrameScheduler, JobContext, JobId, JobOutcome, NoopScheduler};
pub use config::{ConfigError, HexConfig};
pub use controller::{Controller, ControllerConfig, TransientJobKind};
pub use post::PostData;
pub use scene::Scene;
pub use visual::DisplayList;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
