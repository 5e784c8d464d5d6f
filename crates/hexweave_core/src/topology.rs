//! Neighbour topology
//!
//! Tiles live in an arena addressed by [`TileId`]. Each populated neighbour
//! slot holds a [`NeighborLink`] naming the other tile and the shared
//! [`Relationship`] record for the undirected edge. One record exists per
//! pair, so a spring force computed by one side is visible to the other.

use crate::layout::{reverse_direction, DIRECTION_COUNT};
use crate::math::Vec2;

/// Stable index of a tile in the grid's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileId(u32);

impl TileId {
    #[inline]
    pub const fn new(index: usize) -> Self {
        Self(index as u32)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a relationship record in an [`EdgeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeId(u32);

impl EdgeId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One populated neighbour slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborLink {
    pub tile: TileId,
    pub edge: EdgeId,
}

/// Six neighbour slots indexed by direction.
pub type NeighborSlots = [Option<NeighborLink>; DIRECTION_COUNT];

/// Force computed by one side of an edge, waiting for the other side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CachedForce {
    pub recipient: TileId,
    pub force: Vec2,
    pub step: u64,
}

/// Record shared by both ends of an undirected edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    pub tiles: (TileId, TileId),
    pub rest_length: f32,
    cached_force: Option<CachedForce>,
}

impl Relationship {
    pub fn new(a: TileId, b: TileId, rest_length: f32) -> Self {
        Self {
            tiles: (a, b),
            rest_length,
            cached_force: None,
        }
    }

    /// The tile across the edge from `tile`.
    #[inline]
    pub fn other(&self, tile: TileId) -> TileId {
        if self.tiles.0 == tile {
            self.tiles.1
        } else {
            self.tiles.0
        }
    }

    #[inline]
    pub fn cached_force(&self) -> Option<CachedForce> {
        self.cached_force
    }

    /// Force on `recipient` for integration step `step`.
    ///
    /// The first side to ask computes the force with `compute` and caches the
    /// opposite force for the other side; the second side consumes the cache.
    pub fn force_on(&mut self, recipient: TileId, step: u64, compute: impl FnOnce() -> Vec2) -> Vec2 {
        if let Some(cached) = self.cached_force {
            if cached.recipient == recipient && cached.step == step {
                self.cached_force = None;
                return cached.force;
            }
        }

        let force = compute();
        self.cached_force = Some(CachedForce {
            recipient: self.other(recipient),
            force: -force,
            step,
        });
        force
    }

    pub fn clear_cache(&mut self) {
        self.cached_force = None;
    }
}

/// Damped spring force acting on the tile at `position` from the tile at
/// `other_position`.
///
/// Zero when the two positions coincide.
#[inline]
pub fn spring_force(
    position: Vec2,
    velocity: Vec2,
    other_position: Vec2,
    other_velocity: Vec2,
    rest_length: f32,
    spring_coefficient: f32,
    damping_coefficient: f32,
) -> Vec2 {
    let l = position - other_position;
    let length = l.length();
    if length == 0.0 || !length.is_finite() {
        return Vec2::ZERO;
    }
    let l_dot = velocity - other_velocity;
    let magnitude = (spring_coefficient * (length - rest_length)
        + damping_coefficient * l.dot(l_dot) / length)
        / length;
    -l * magnitude
}

/// Arena of relationship records.
#[derive(Debug, Clone, Default)]
pub struct EdgeArena {
    edges: Vec<Relationship>,
}

impl EdgeArena {
    pub fn new() -> Self {
        Self { edges: Vec::new() }
    }

    pub fn insert(&mut self, relationship: Relationship) -> EdgeId {
        let id = EdgeId(self.edges.len() as u32);
        self.edges.push(relationship);
        id
    }

    #[inline]
    pub fn get(&self, id: EdgeId) -> Option<&Relationship> {
        self.edges.get(id.index())
    }

    #[inline]
    pub fn get_mut(&mut self, id: EdgeId) -> Option<&mut Relationship> {
        self.edges.get_mut(id.index())
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn clear(&mut self) {
        self.edges.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (EdgeId, &Relationship)> {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, edge)| (EdgeId(i as u32), edge))
    }
}

/// Link `a` to `b` in `direction` (and `b` to `a` in the reverse direction),
/// sharing one new record. Returns `None` without touching anything when
/// either slot is already taken.
pub fn link_slots(
    edges: &mut EdgeArena,
    a: TileId,
    a_slots: &mut NeighborSlots,
    b: TileId,
    b_slots: &mut NeighborSlots,
    direction: usize,
    rest_length: f32,
) -> Option<EdgeId> {
    let reverse = reverse_direction(direction);
    if a_slots[direction].is_some() || b_slots[reverse].is_some() {
        return None;
    }
    let edge = edges.insert(Relationship::new(a, b, rest_length));
    a_slots[direction] = Some(NeighborLink { tile: b, edge });
    b_slots[reverse] = Some(NeighborLink { tile: a, edge });
    Some(edge)
}
