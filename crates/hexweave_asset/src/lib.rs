//! Hexweave Asset Pipeline
//!
//! Post content loading and the combined metadata file:
//! - Date strings to sortable numbers
//! - The URL label catalog
//! - Reading, combining and writing post metadata

pub mod date;
pub mod labels;
pub mod posts;

use std::path::PathBuf;
use thiserror::Error;

pub use date::{date_to_number, sort_by_date_descending};
pub use labels::UrlLabel;
pub use posts::{combine_posts, demo_posts, load_combined, read_post_dir, write_combined, CombinedMetadata};

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unparseable date '{date}' in post '{post}'")]
    InvalidDate { post: String, date: String },

    #[error("unknown URL label '{key}' in post '{post}'")]
    UnknownUrlLabel { post: String, key: String },
}
