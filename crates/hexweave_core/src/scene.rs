//! Scene: the shared state every animation job works on

use crate::config::HexConfig;
use crate::grid::Grid;
use crate::math::Vec2;
use crate::post::PostData;
use crate::visual::DisplayList;
use rand::rngs::StdRng;
use rand::SeedableRng;

pub struct Scene {
    pub config: HexConfig,
    pub grid: Grid,
    pub display: DisplayList,
    pub rng: StdRng,
    pub posts: Vec<PostData>,
}

impl Scene {
    /// Build the grid for `viewport` with a reproducible RNG.
    pub fn new(config: HexConfig, posts: Vec<PostData>, viewport: Vec2, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let grid = Grid::new(viewport, &config.grid, &config.tile, posts.len(), &mut rng);
        let display = DisplayList::new(config.grid.background_color);
        Self {
            config,
            grid,
            display,
            rng,
            posts,
        }
    }

    /// Rebuild the grid for `viewport` using the current configuration.
    pub fn resize(&mut self, viewport: Vec2) {
        self.grid
            .resize(viewport, &self.config.grid, &self.config.tile, &mut self.rng);
        self.display.clear();
        self.display.background = self.config.grid.background_color;
    }

    #[inline]
    pub fn viewport(&self) -> Vec2 {
        self.grid.params().viewport
    }

    pub fn post(&self, index: usize) -> Option<&PostData> {
        self.posts.get(index)
    }

    /// Post shown by the open page post, if any.
    pub fn open_post(&self) -> Option<&PostData> {
        self.grid.page_post().and_then(|page_post| self.post(page_post.post))
    }
}
