//! Display list to triangle list
//!
//! Everything becomes flat-coloured triangles in clip space. Draw order is
//! tiles, post overlay, lines, markers.

use glam::Vec2;
use hexweave_core::color::Hsl;
use hexweave_core::visual::{DisplayList, Polyline};

const MARKER_SEGMENTS: usize = 12;
const OVERLAY_SEGMENTS: usize = 48;
const OVERLAY_COLOR: Hsl = Hsl::new(220.0, 15.0, 96.0);

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[inline]
fn rgba(color: Hsl, opacity: f32) -> [f32; 4] {
    let [r, g, b] = color.to_rgb();
    [r, g, b, opacity.clamp(0.0, 1.0)]
}

/// Maps logical pixels (y down) to clip space (y up).
struct Projection {
    scale: Vec2,
}

impl Projection {
    fn new(viewport: Vec2) -> Self {
        Self {
            scale: Vec2::new(2.0 / viewport.x.max(1.0), -2.0 / viewport.y.max(1.0)),
        }
    }

    #[inline]
    fn project(&self, point: Vec2) -> [f32; 2] {
        let p = point * self.scale + Vec2::new(-1.0, 1.0);
        [p.x, p.y]
    }
}

struct Builder<'a> {
    projection: Projection,
    vertices: &'a mut Vec<Vertex>,
}

impl Builder<'_> {
    fn triangle(&mut self, points: [Vec2; 3], color: [f32; 4]) {
        for point in points {
            self.vertices.push(Vertex {
                position: self.projection.project(point),
                color,
            });
        }
    }

    fn fan(&mut self, center: Vec2, rim: &[Vec2], color: [f32; 4]) {
        for (i, &a) in rim.iter().enumerate() {
            let b = rim[(i + 1) % rim.len()];
            self.triangle([center, a, b], color);
        }
    }

    fn circle(&mut self, center: Vec2, radius: f32, segments: usize, color: [f32; 4]) {
        let rim: Vec<Vec2> = (0..segments)
            .map(|i| {
                let angle = i as f32 / segments as f32 * std::f32::consts::TAU;
                center + Vec2::from_angle(angle) * radius
            })
            .collect();
        self.fan(center, &rim, color);
    }

    fn polyline(&mut self, line: &Polyline) {
        if line.points.len() < 2 {
            return;
        }
        let color = rgba(line.color, line.opacity);
        let half_width = line.width * 0.5;
        let closing = line.closed.then(|| (line.points[line.points.len() - 1], line.points[0]));
        let segments = line.points.windows(2).map(|pair| (pair[0], pair[1])).chain(closing);
        for (a, b) in segments {
            let Some(direction) = (b - a).try_normalize() else { continue };
            let normal = direction.perp() * half_width;
            self.triangle([a + normal, a - normal, b + normal], color);
            self.triangle([b + normal, a - normal, b - normal], color);
        }
    }
}

/// Append the triangles for `display`, drawn into a `viewport` of logical pixels.
pub fn tessellate(display: &DisplayList, viewport: Vec2, vertices: &mut Vec<Vertex>) {
    let mut builder = Builder {
        projection: Projection::new(viewport),
        vertices,
    };

    for tile in &display.tiles {
        if tile.opacity <= 0.0 {
            continue;
        }
        let center = tile.vertices.iter().copied().sum::<Vec2>() / tile.vertices.len() as f32;
        builder.fan(center, &tile.vertices, rgba(tile.color, tile.opacity));
    }

    if let Some(overlay) = display.post_overlay.filter(|overlay| overlay.opacity > 0.0) {
        builder.circle(
            overlay.center,
            overlay.radius,
            OVERLAY_SEGMENTS,
            rgba(OVERLAY_COLOR, overlay.opacity),
        );
    }

    for line in &display.lines {
        builder.polyline(line);
    }

    for marker in &display.markers {
        builder.circle(marker.center, marker.radius, MARKER_SEGMENTS, rgba(marker.color, marker.opacity));
    }
}
