//! Hexweave Services Layer
//!
//! Platform-facing glue: settings persistence and pointer input translation

pub mod input;
pub mod settings;

pub use input::{PointerAction, PointerInput};
pub use settings::{Settings, SettingsError, WindowSettings};
