//! Top-down PNG rendering of placement results for the example binaries.
use std::path::Path;

use anyhow::Context;
use glam::{Vec2, Vec3};
use image::{Rgb, RgbImage};
use region_scatter::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Installs a fmt subscriber honoring `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Ignore the error if a subscriber is already installed.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Image size and the world-space XY window it shows.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub image_size: (u32, u32),
    pub domain_min: Vec2,
    pub domain_max: Vec2,
    pub background: [u8; 3],
}

impl RenderConfig {
    pub fn new(image_size: (u32, u32), domain_min: Vec2, domain_max: Vec2) -> Self {
        Self {
            image_size,
            domain_min,
            domain_max,
            background: [24, 24, 28],
        }
    }

    /// Square window of `half_extent` world units around `center`.
    pub fn centered(image_size: (u32, u32), center: Vec2, half_extent: f32) -> Self {
        Self::new(
            image_size,
            center - Vec2::splat(half_extent),
            center + Vec2::splat(half_extent),
        )
    }

    pub fn with_background(mut self, rgb: [u8; 3]) -> Self {
        self.background = rgb;
        self
    }
}

/// How a placement is drawn: a disk plus an optional heading tick along local +X.
#[derive(Debug, Clone, Copy)]
pub struct MarkerStyle {
    pub color: [u8; 3],
    pub radius: i32,
    pub heading_length: i32,
}

impl MarkerStyle {
    pub fn dot(color: [u8; 3], radius: i32) -> Self {
        Self {
            color,
            radius,
            heading_length: 0,
        }
    }

    pub fn with_heading(mut self, length: i32) -> Self {
        self.heading_length = length;
        self
    }
}

pub struct Canvas {
    config: RenderConfig,
    image: RgbImage,
}

impl Canvas {
    pub fn new(config: RenderConfig) -> Self {
        let (w, h) = config.image_size;
        let image = RgbImage::from_pixel(w, h, Rgb(config.background));
        Self { config, image }
    }

    fn to_px(&self, world: Vec3) -> (i32, i32) {
        let (w, h) = self.config.image_size;
        let span = (self.config.domain_max - self.config.domain_min).max(Vec2::splat(f32::EPSILON));
        let uv = (world.truncate() - self.config.domain_min) / span;
        let x = (uv.x * w as f32).floor() as i32;
        // Image rows grow downwards, world Y grows upwards.
        let y = ((1.0 - uv.y) * h as f32).floor() as i32;
        (x, y)
    }

    fn put(&mut self, x: i32, y: i32, color: [u8; 3]) {
        let (w, h) = self.config.image_size;
        if x >= 0 && y >= 0 && (x as u32) < w && (y as u32) < h {
            self.image.put_pixel(x as u32, y as u32, Rgb(color));
        }
    }

    fn disk(&mut self, cx: i32, cy: i32, radius: i32, color: [u8; 3]) {
        let r2 = radius * radius;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= r2 {
                    self.put(cx + dx, cy + dy, color);
                }
            }
        }
    }

    fn line(&mut self, from: (i32, i32), to: (i32, i32), color: [u8; 3]) {
        let (mut x0, mut y0) = from;
        let (x1, y1) = to;
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.put(x0, y0, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    pub fn draw_world_line(&mut self, a: Vec3, b: Vec3, color: [u8; 3]) {
        let (pa, pb) = (self.to_px(a), self.to_px(b));
        self.line(pa, pb, color);
    }

    /// Outline of the XY footprint of `bounds`.
    pub fn draw_footprint(&mut self, bounds: &Aabb, color: [u8; 3]) {
        let (min, max) = (bounds.min, bounds.max);
        let corners = [
            min,
            Vec3::new(max.x, min.y, min.z),
            Vec3::new(max.x, max.y, min.z),
            Vec3::new(min.x, max.y, min.z),
        ];
        self.draw_loop(&corners, color);
    }

    /// Outline of the top face of a box region, rotated boxes included.
    pub fn draw_box_region(&mut self, region: &BoxRegion, color: [u8; 3]) {
        let e = region.half_extents;
        let corners = [
            Vec3::new(-e.x, -e.y, e.z),
            Vec3::new(e.x, -e.y, e.z),
            Vec3::new(e.x, e.y, e.z),
            Vec3::new(-e.x, e.y, e.z),
        ]
        .map(|c| region.transform.transform_point(c));
        self.draw_loop(&corners, color);
    }

    fn draw_loop(&mut self, corners: &[Vec3], color: [u8; 3]) {
        for (i, &a) in corners.iter().enumerate() {
            let b = corners[(i + 1) % corners.len()];
            self.draw_world_line(a, b, color);
        }
    }

    /// Polyline approximation of `path` with `samples` segments.
    pub fn draw_path(&mut self, path: &dyn PathShape, samples: usize, color: [u8; 3]) {
        let length = path.total_length();
        let samples = samples.max(1);
        let mut prev = Vec3::from(path.location_at_distance(0.0));
        for i in 1..=samples {
            let d = length * i as f32 / samples as f32;
            let p = Vec3::from(path.location_at_distance(d));
            self.draw_world_line(prev, p, color);
            prev = p;
        }
    }

    pub fn draw_placements(&mut self, placements: &[Transform], style: MarkerStyle) {
        for t in placements {
            let center = self.to_px(t.position);
            if style.heading_length > 0 {
                let forward = (t.rotation * Vec3::X).truncate().normalize_or_zero();
                let tip = (
                    center.0 + (forward.x * style.heading_length as f32).round() as i32,
                    center.1 - (forward.y * style.heading_length as f32).round() as i32,
                );
                self.line(center, tip, style.color);
            }
            self.disk(center.0, center.1, style.radius, style.color);
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        self.image
            .save(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("Wrote {}.", path.display());
        Ok(())
    }
}

/// Renders one result with a single marker style.
pub fn render_result_to_png(
    result: &PlacementResult,
    style: MarkerStyle,
    config: &RenderConfig,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let mut canvas = Canvas::new(config.clone());
    canvas.draw_placements(&result.placements, style);
    canvas.save(path)
}
