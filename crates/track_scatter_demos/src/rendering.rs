use std::collections::HashMap;
use std::path::Path;

use glam::Vec2;
use image::{Rgb, RgbImage};
use track_scatter::prelude::*;
use tracing_subscriber::EnvFilter;

/// Installs a compact `tracing` subscriber. `RUST_LOG` overrides the default `info` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}

/// How a prop is drawn.
#[derive(Debug, Clone, Copy)]
pub enum PropStyle {
    /// Filled footprint.
    Footprint { color: [u8; 3] },
    /// Dot at the prop origin.
    Dot { color: [u8; 3], radius: i32 },
}

/// Top-down view settings. World X maps to image X, world Z to image Y (flipped so +Z is up).
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub image_size: (u32, u32),
    /// World X/Z shown in the lower-left corner.
    pub world_min: Vec2,
    /// World X/Z shown in the upper-right corner.
    pub world_max: Vec2,
    pub background: [u8; 3],
    pub track_color: [u8; 3],
    pub area_color: [u8; 3],
    pub default_style: PropStyle,
    styles: HashMap<PropId, PropStyle>,
}

impl RenderConfig {
    pub fn new(image_size: (u32, u32), world_min: Vec2, world_max: Vec2) -> Self {
        Self {
            image_size,
            world_min,
            world_max,
            background: [24, 28, 24],
            track_color: [90, 90, 96],
            area_color: [60, 110, 60],
            default_style: PropStyle::Footprint {
                color: [220, 220, 220],
            },
            styles: HashMap::new(),
        }
    }

    pub fn with_background(mut self, color: [u8; 3]) -> Self {
        self.background = color;
        self
    }

    pub fn with_prop_style(mut self, id: impl Into<PropId>, style: PropStyle) -> Self {
        self.styles.insert(id.into(), style);
        self
    }

    pub fn set_prop_style(&mut self, id: impl Into<PropId>, style: PropStyle) {
        self.styles.insert(id.into(), style);
    }

    fn style(&self, id: &str) -> PropStyle {
        self.styles.get(id).copied().unwrap_or(self.default_style)
    }

    fn to_pixel(&self, world: Vec2) -> (i32, i32) {
        let span = (self.world_max - self.world_min).max(Vec2::splat(f32::EPSILON));
        let t = (world - self.world_min) / span;
        let (w, h) = self.image_size;
        let x = (t.x * w as f32).floor() as i32;
        let y = ((1.0 - t.y) * h as f32).floor() as i32;
        (x, y)
    }
}

/// Renders the live segments of `spawner` and the props recorded in `reports`.
///
/// Reports for segments no longer in the pool are skipped.
pub fn render_track_to_png(
    spawner: &SegmentSpawner,
    reports: &[SpawnReport],
    rc: &RenderConfig,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let (w, h) = rc.image_size;
    let mut img = RgbImage::from_pixel(w, h, Rgb(rc.background));
    let config = spawner.config();

    for segment in spawner.pool().iter() {
        let base = Vec2::new(segment.position.x, segment.position.z);
        // The track surface is the gap between the two side areas.
        let inner_left = config.left_area.max_xz().x;
        let inner_right = config.right_area.min_xz().x;
        fill_rect(
            &mut img,
            rc,
            base + Vec2::new(inner_left, 0.0),
            base + Vec2::new(inner_right, config.segment_length),
            rc.track_color,
        );
        for side in Side::BOTH {
            let area = spawner.side_area(segment, side);
            outline_rect(&mut img, rc, area.min_xz(), area.max_xz(), rc.area_color);
        }
    }

    for report in reports {
        if !spawner.pool().contains(report.segment.handle) {
            continue;
        }
        for prop in report.left.placed.iter().chain(&report.right.placed) {
            let Some(entry) = spawner.deck().get(&prop.prop_id) else {
                continue;
            };
            match rc.style(&prop.prop_id) {
                PropStyle::Footprint { color } => {
                    let (min, max) = entry.world_bounds(prop.position).footprint();
                    fill_rect(&mut img, rc, min, max, color);
                }
                PropStyle::Dot { color, radius } => {
                    let (cx, cy) = rc.to_pixel(Vec2::new(prop.position.x, prop.position.z));
                    fill_circle(&mut img, cx, cy, radius, color);
                }
            }
        }
    }

    let path = path.as_ref();
    img.save(path)?;
    tracing::info!("Wrote {}.", path.display());
    Ok(())
}

/// Renders an area outline with accepted candidates in green and rejected ones colored by
/// reason.
pub fn render_candidates_to_png(
    area: &PlacementArea,
    accepted: &[Vec2],
    rejected: &[(Vec2, Rejection)],
    rc: &RenderConfig,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let (w, h) = rc.image_size;
    let mut img = RgbImage::from_pixel(w, h, Rgb(rc.background));
    outline_rect(&mut img, rc, area.min_xz(), area.max_xz(), rc.area_color);

    for (point, reason) in rejected {
        let color = match reason {
            Rejection::NoGround => [90, 90, 200],
            Rejection::Obstructed => [200, 70, 60],
            Rejection::OutOfBounds => [200, 170, 60],
        };
        let (x, y) = rc.to_pixel(*point);
        fill_circle(&mut img, x, y, 2, color);
    }
    for point in accepted {
        let (x, y) = rc.to_pixel(*point);
        fill_circle(&mut img, x, y, 3, [90, 220, 110]);
    }

    let path = path.as_ref();
    img.save(path)?;
    tracing::info!("Wrote {}.", path.display());
    Ok(())
}

fn put(img: &mut RgbImage, x: i32, y: i32, color: [u8; 3]) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, Rgb(color));
    }
}

fn fill_rect(img: &mut RgbImage, rc: &RenderConfig, min: Vec2, max: Vec2, color: [u8; 3]) {
    let (x0, y1) = rc.to_pixel(min);
    let (x1, y0) = rc.to_pixel(max);
    for y in y0.min(y1)..=y0.max(y1) {
        for x in x0.min(x1)..=x0.max(x1) {
            put(img, x, y, color);
        }
    }
}

fn outline_rect(img: &mut RgbImage, rc: &RenderConfig, min: Vec2, max: Vec2, color: [u8; 3]) {
    let (x0, y1) = rc.to_pixel(min);
    let (x1, y0) = rc.to_pixel(max);
    for x in x0..=x1 {
        put(img, x, y0, color);
        put(img, x, y1, color);
    }
    for y in y0..=y1 {
        put(img, x0, y, color);
        put(img, x1, y, color);
    }
}

fn fill_circle(img: &mut RgbImage, cx: i32, cy: i32, radius: i32, color: [u8; 3]) {
    let r2 = radius * radius;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= r2 {
                put(img, cx + dx, cy + dy, color);
            }
        }
    }
}
