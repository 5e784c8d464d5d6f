//! Hexweave Runtime
//!
//! Binary that loads settings and posts, opens a window and runs the grid

mod app;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use hexweave_asset::{combine_posts, demo_posts, load_combined, read_post_dir, write_combined};
use hexweave_core::layout::Orientation;
use hexweave_core::PostData;
use hexweave_services::Settings;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use winit::event_loop::{ControlFlow, EventLoop};

const DEMO_POST_COUNT: usize = 12;
const DEFAULT_POSTS_PATH: &str = "posts.json";

#[derive(Parser)]
#[command(name = "hexweave")]
#[command(about = "Animated hexagonal grid of posts")]
struct Args {
    /// Settings file (JSON); missing files fall back to defaults
    #[arg(short = 's', long, default_value = "hexweave.json")]
    settings: PathBuf,

    /// Combined post metadata file, overrides the settings
    #[arg(short = 'p', long)]
    posts: Option<PathBuf>,

    /// Seed for the content layout and random effects
    #[arg(long)]
    seed: Option<u64>,

    /// Use flat-top tiles
    #[arg(long)]
    horizontal: bool,

    /// Write the default settings to the settings path and exit
    #[arg(long)]
    write_default_settings: bool,

    /// Combine a directory of post files into the posts file and exit
    #[arg(long, value_name = "DIR")]
    combine_posts: Option<PathBuf>,
}

fn load_posts(path: &Path) -> Vec<PostData> {
    match load_combined(path) {
        Ok(combined) if !combined.posts.is_empty() => combined.posts,
        Ok(_) => {
            warn!(path = %path.display(), "post file is empty, using demo posts");
            demo_posts(DEMO_POST_COUNT)
        }
        Err(err) => {
            warn!(error = %err, "could not load posts, using demo posts");
            demo_posts(DEMO_POST_COUNT)
        }
    }
}

fn combine(dir: &Path, out: &Path) -> Result<()> {
    let posts = read_post_dir(dir).with_context(|| format!("reading posts from {}", dir.display()))?;
    let combined = combine_posts(serde_json::json!({ "source": dir.display().to_string() }), posts)
        .context("combining posts")?;
    write_combined(out, &combined).with_context(|| format!("writing {}", out.display()))?;
    info!(posts = combined.posts.len(), out = %out.display(), "posts combined");
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    info!("Hexweave v{}", hexweave_core::VERSION);

    if args.write_default_settings {
        Settings::default()
            .save(&args.settings)
            .context("writing default settings")?;
        return Ok(());
    }

    let mut settings = Settings::load_or_default(&args.settings).context("loading settings")?;
    let posts_path = args
        .posts
        .clone()
        .or_else(|| settings.posts_path.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_POSTS_PATH));

    if let Some(dir) = &args.combine_posts {
        return combine(dir, &posts_path);
    }

    if args.horizontal {
        settings.hex.grid.orientation = Orientation::Horizontal;
    }
    let seed = args.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos() as u64)
            .unwrap_or_default()
    });
    let posts = load_posts(&posts_path);
    info!(posts = posts.len(), seed, "starting");

    let event_loop = EventLoop::new().context("creating event loop")?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(settings, posts, seed);
    event_loop.run_app(&mut app).context("running event loop")?;
    app.into_result()
}
