//! Triangle rasterization entry point

use super::edge::{signed_area2, Span, TriangleSetup};
use super::mode::RenderMode;
use super::span::{span_filler, SpanContext};
use super::target::RenderTarget;
use super::types::{PolygonRaster, RasterOutcome, Reject};

/// Rasterize one screen-space triangle into `target`.
///
/// Preconditions (not checked): the triangle is already clipped against the
/// near plane, textures are power-of-two, and blended primitives arrive in
/// back-to-front order. Rows and columns are clamped to the target.
pub fn rasterize_polygon(target: &mut RenderTarget, poly: &PolygonRaster) -> RasterOutcome {
    let area = signed_area2(&poly.vertices);
    if area == 0 {
        log::trace!("dropping zero-area triangle {:?}", poly.vertices);
        return RasterOutcome::Rejected(Reject::Degenerate);
    }
    if area < 0 && !poly.material.double_sided {
        return RasterOutcome::Rejected(Reject::BackFacing);
    }

    let Some(setup) = TriangleSetup::new(&poly.vertices) else {
        return RasterOutcome::Rejected(Reject::Degenerate);
    };

    let width = target.width as i32;
    let height = target.height as i32;
    let min_x = poly.vertices.iter().map(|v| v.x).min().unwrap_or(0);
    let max_x = poly.vertices.iter().map(|v| v.x).max().unwrap_or(0);
    if setup.y_end <= 0 || setup.y_start >= height || max_x <= 0 || min_x >= width {
        log::trace!("triangle off screen: x {}..{}, y {}..{}", min_x, max_x, setup.y_start, setup.y_end);
        return RasterOutcome::Rejected(Reject::OffScreen);
    }

    let mode = RenderMode::select(&poly.material, poly.texture.is_some());
    let fill = span_filler(mode);
    let ctx = SpanContext {
        texture: if mode.samples_texture() { poly.texture } else { None },
        alpha: mode.primitive_alpha(&poly.material),
    };

    let mut long = setup.long;
    let mut long_row = long.y_start;
    let mut rows = 0;

    for mut short in [setup.upper, setup.lower].into_iter().flatten() {
        let from = short.y_start.max(0);
        let to = short.y_end.min(height);
        if from >= to {
            continue;
        }
        short.skip(from - short.y_start);
        long.skip(from - long_row);

        for y in from..to {
            let (left, right) = if setup.long_on_left() { (&long, &short) } else { (&short, &long) };
            if let Some(span) = Span::between(left, right, y as usize, target.width) {
                fill(target, &span, &ctx);
            }
            long.step();
            short.step();
        }
        long_row = to;
        rows += (to - from) as u32;
    }

    RasterOutcome::Drawn { rows }
}
