//! Retained display list
//!
//! Tiles own a slot in [`DisplayList::tiles`] that they overwrite every frame.
//! Lines and markers are immediate: they are cleared at the start of each
//! draw pass and pushed again by whoever wants them.

use crate::color::Hsl;
use crate::math::Vec2;

/// One hexagon as it should appear on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilePolygon {
    pub vertices: [Vec2; 6],
    pub color: Hsl,
    pub opacity: f32,
    pub holds_content: bool,
    pub is_highlighted: bool,
}

impl Default for TilePolygon {
    fn default() -> Self {
        Self {
            vertices: [Vec2::ZERO; 6],
            color: Hsl::default(),
            opacity: 1.0,
            holds_content: false,
            is_highlighted: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub points: Vec<Vec2>,
    pub color: Hsl,
    pub opacity: f32,
    pub width: f32,
    pub closed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub center: Vec2,
    pub radius: f32,
    pub color: Hsl,
    pub opacity: f32,
}

/// The open post's overlay, drawn above the tiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostOverlay {
    pub post: usize,
    pub center: Vec2,
    pub radius: f32,
    pub opacity: f32,
}

#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    pub background: Hsl,
    pub tiles: Vec<TilePolygon>,
    pub lines: Vec<Polyline>,
    pub markers: Vec<Marker>,
    pub post_overlay: Option<PostOverlay>,
}

impl DisplayList {
    pub fn new(background: Hsl) -> Self {
        Self {
            background,
            ..Self::default()
        }
    }

    /// Drop the immediate-mode primitives of the previous frame.
    pub fn begin_frame(&mut self) {
        self.lines.clear();
        self.markers.clear();
        self.post_overlay = None;
    }

    /// Make room for exactly `count` tile polygons.
    pub fn resize_tiles(&mut self, count: usize) {
        self.tiles.resize(count, TilePolygon::default());
    }

    #[inline]
    pub fn push_line(&mut self, line: Polyline) {
        if line.points.len() >= 2 && line.opacity > 0.0 {
            self.lines.push(line);
        }
    }

    #[inline]
    pub fn push_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    pub fn clear(&mut self) {
        self.tiles.clear();
        self.begin_frame();
    }
}
