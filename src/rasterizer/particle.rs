//! Particle splatting
//!
//! A particle covers the square `[x - r, x + r] x [y - r, y + r]`. The alpha
//! mask is stretched over that square with a fixed-point step; clipping a
//! side advances the starting mask coordinate by the same step so the visible
//! part of the sprite lines up with an unclipped render.

use super::blend::{blend_over, combine_alpha};
use super::depth::depth_passes;
use super::fixed::MASK_SAMPLE_SHIFT;
use super::target::RenderTarget;
use super::types::{unpack_argb, ParticleRaster, RasterOutcome, Reject, MASK_SIZE};

/// Screen-clipped particle bounds and the mask coordinates of their corner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplatBounds {
    pub x0: usize,
    pub y0: usize,
    /// Inclusive
    pub x1: usize,
    /// Inclusive
    pub y1: usize,
    /// Mask coordinates at (x0, y0), MASK_SAMPLE_SHIFT fixed-point
    pub mask_x: i64,
    pub mask_y: i64,
    /// Mask advance per screen pixel
    pub step: i64,
}

impl SplatBounds {
    /// `None` when the box misses the target entirely
    pub fn clip(x: i32, y: i32, radius: i32, width: usize, height: usize) -> Option<Self> {
        let (x0, x1) = (x as i64 - radius as i64, x as i64 + radius as i64);
        let (y0, y1) = (y as i64 - radius as i64, y as i64 + radius as i64);
        let (w, h) = (width as i64, height as i64);
        if x1 < 0 || y1 < 0 || x0 >= w || y0 >= h {
            return None;
        }

        let size = 2 * radius as i64 + 1;
        let step = ((MASK_SIZE as i64) << MASK_SAMPLE_SHIFT) / size;
        // Sample at the center of each covered cell
        let origin = step / 2;

        let mask_x = origin + (-x0).max(0) * step;
        let mask_y = origin + (-y0).max(0) * step;

        Some(Self {
            x0: x0.max(0) as usize,
            y0: y0.max(0) as usize,
            x1: x1.min(w - 1) as usize,
            y1: y1.min(h - 1) as usize,
            mask_x,
            mask_y,
            step,
        })
    }
}

/// Splat one particle: mask alpha times particle alpha, source-over,
/// depth-tested against `particle.z` but never written.
pub fn rasterize_particle(target: &mut RenderTarget, particle: &ParticleRaster) -> RasterOutcome {
    if particle.radius < 0 {
        return RasterOutcome::Rejected(Reject::Degenerate);
    }
    let (alpha, _, _, _) = unpack_argb(particle.color);
    if alpha == 0 {
        return RasterOutcome::Rejected(Reject::Transparent);
    }
    let Some(bounds) = SplatBounds::clip(particle.x, particle.y, particle.radius, target.width, target.height) else {
        log::trace!("particle at ({}, {}) r{} off screen", particle.x, particle.y, particle.radius);
        return RasterOutcome::Rejected(Reject::OffScreen);
    };

    let mask = particle.mask;
    let z = particle.z;
    let mut my = bounds.mask_y;
    for y in bounds.y0..=bounds.y1 {
        let mask_row = (my >> MASK_SAMPLE_SHIFT) as usize;
        let row = y * target.width;
        let color = &mut target.color[row + bounds.x0..=row + bounds.x1];
        let depth = &target.depth[row + bounds.x0..=row + bounds.x1];

        let mut mx = bounds.mask_x;
        for (c, zb) in color.iter_mut().zip(depth.iter()) {
            let m = mask.sample((mx >> MASK_SAMPLE_SHIFT) as usize, mask_row) as u32;
            mx += bounds.step;
            if m == 0 || !depth_passes(z, *zb) {
                continue;
            }
            *c = blend_over(particle.color, *c, combine_alpha(m, alpha));
        }
        my += bounds.step;
    }

    RasterOutcome::Drawn {
        rows: (bounds.y1 - bounds.y0 + 1) as u32,
    }
}
