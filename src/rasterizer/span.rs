//! Per-mode span fillers
//!
//! Each `RenderMode` maps to one function that walks a single span left to
//! right. The mode is resolved once per primitive (`span_filler`), so the
//! pixel loops carry no material branches. Nothing here allocates.

use super::blend::{blend_over, combine_alpha, modulate};
use super::depth::{depth_passes, is_untouched};
use super::edge::{span_color, span_depth, texel_coord, Attributes, Span};
use super::mode::RenderMode;
use super::target::RenderTarget;
use super::types::{Texture, OPAQUE};

/// Per-primitive inputs shared by every span of that primitive
#[derive(Debug, Clone, Copy)]
pub struct SpanContext<'a> {
    pub texture: Option<&'a Texture>,
    /// Whole-primitive alpha (255 when the mode does not blend)
    pub alpha: u32,
}

pub type SpanFn = fn(&mut RenderTarget, &Span, &SpanContext);

pub fn span_filler(mode: RenderMode) -> SpanFn {
    match mode {
        RenderMode::Solid => fill_solid,
        RenderMode::Textured => fill_textured,
        RenderMode::TexturedBlend => fill_textured_blend,
        RenderMode::TexturedPixelAlpha => fill_textured_pixel_alpha,
        RenderMode::TexturedPixelAlphaBlend => fill_textured_pixel_alpha_blend,
        RenderMode::Lit => fill_lit,
        RenderMode::LitBlend => fill_lit_blend,
        RenderMode::LitPixelAlpha => fill_lit_pixel_alpha,
        RenderMode::Behind => fill_behind,
    }
}

/// Color and depth slices covered by a span
#[inline]
fn span_rows<'t>(target: &'t mut RenderTarget, span: &Span) -> (&'t mut [u32], &'t mut [i32]) {
    let row = span.y * target.width;
    let range = row + span.x_start..row + span.x_end;
    (&mut target.color[range.clone()], &mut target.depth[range])
}

#[inline]
fn sample(tex: &Texture, a: &Attributes) -> u32 {
    tex.sample(texel_coord(a.uz, a.z), texel_coord(a.vz, a.z))
}

#[inline]
fn solid_color(a: &Attributes) -> u32 {
    let (r, g, b) = span_color(a);
    OPAQUE | (r << 16) | (g << 8) | b
}

// Texel alpha composite: 0 skips, 255 occludes, anything else blends over
// without claiming depth.
#[inline]
fn composite_pixel_alpha(c: &mut u32, zb: &mut i32, z: i32, texel: u32, alpha: u32) {
    match alpha {
        0 => {}
        255 => {
            *c = OPAQUE | texel;
            *zb = z;
        }
        _ => *c = blend_over(texel, *c, alpha),
    }
}

fn fill_solid(target: &mut RenderTarget, span: &Span, _ctx: &SpanContext) {
    let (color, depth) = span_rows(target, span);
    let mut a = span.attrs;
    for (c, zb) in color.iter_mut().zip(depth.iter_mut()) {
        let z = span_depth(&a);
        if depth_passes(z, *zb) {
            *c = solid_color(&a);
            *zb = z;
        }
        a.step(&span.d_attrs);
    }
}

fn fill_textured(target: &mut RenderTarget, span: &Span, ctx: &SpanContext) {
    let Some(tex) = ctx.texture else { return };
    let (color, depth) = span_rows(target, span);
    let mut a = span.attrs;
    for (c, zb) in color.iter_mut().zip(depth.iter_mut()) {
        let z = span_depth(&a);
        if depth_passes(z, *zb) {
            *c = OPAQUE | sample(tex, &a);
            *zb = z;
        }
        a.step(&span.d_attrs);
    }
}

fn fill_textured_blend(target: &mut RenderTarget, span: &Span, ctx: &SpanContext) {
    let Some(tex) = ctx.texture else { return };
    let (color, depth) = span_rows(target, span);
    let mut a = span.attrs;
    for (c, zb) in color.iter_mut().zip(depth.iter()) {
        if depth_passes(span_depth(&a), *zb) {
            *c = blend_over(sample(tex, &a), *c, ctx.alpha);
        }
        a.step(&span.d_attrs);
    }
}

fn fill_textured_pixel_alpha(target: &mut RenderTarget, span: &Span, ctx: &SpanContext) {
    let Some(tex) = ctx.texture else { return };
    let (color, depth) = span_rows(target, span);
    let mut a = span.attrs;
    for (c, zb) in color.iter_mut().zip(depth.iter_mut()) {
        let z = span_depth(&a);
        if depth_passes(z, *zb) {
            let texel = sample(tex, &a);
            composite_pixel_alpha(c, zb, z, texel, texel >> 24);
        }
        a.step(&span.d_attrs);
    }
}

fn fill_textured_pixel_alpha_blend(target: &mut RenderTarget, span: &Span, ctx: &SpanContext) {
    let Some(tex) = ctx.texture else { return };
    let (color, depth) = span_rows(target, span);
    let mut a = span.attrs;
    for (c, zb) in color.iter_mut().zip(depth.iter_mut()) {
        let z = span_depth(&a);
        if depth_passes(z, *zb) {
            let texel = sample(tex, &a);
            composite_pixel_alpha(c, zb, z, texel, combine_alpha(texel >> 24, ctx.alpha));
        }
        a.step(&span.d_attrs);
    }
}

fn fill_lit(target: &mut RenderTarget, span: &Span, ctx: &SpanContext) {
    let Some(tex) = ctx.texture else { return };
    let (color, depth) = span_rows(target, span);
    let mut a = span.attrs;
    for (c, zb) in color.iter_mut().zip(depth.iter_mut()) {
        let z = span_depth(&a);
        if depth_passes(z, *zb) {
            let (r, g, b) = span_color(&a);
            *c = OPAQUE | modulate(sample(tex, &a), r, g, b);
            *zb = z;
        }
        a.step(&span.d_attrs);
    }
}

fn fill_lit_blend(target: &mut RenderTarget, span: &Span, ctx: &SpanContext) {
    let Some(tex) = ctx.texture else { return };
    let (color, depth) = span_rows(target, span);
    let mut a = span.attrs;
    for (c, zb) in color.iter_mut().zip(depth.iter()) {
        if depth_passes(span_depth(&a), *zb) {
            let (r, g, b) = span_color(&a);
            *c = blend_over(modulate(sample(tex, &a), r, g, b), *c, ctx.alpha);
        }
        a.step(&span.d_attrs);
    }
}

fn fill_lit_pixel_alpha(target: &mut RenderTarget, span: &Span, ctx: &SpanContext) {
    let Some(tex) = ctx.texture else { return };
    let (color, depth) = span_rows(target, span);
    let mut a = span.attrs;
    for (c, zb) in color.iter_mut().zip(depth.iter_mut()) {
        let z = span_depth(&a);
        if depth_passes(z, *zb) {
            let (r, g, b) = span_color(&a);
            let texel = modulate(sample(tex, &a), r, g, b);
            composite_pixel_alpha(c, zb, z, texel, combine_alpha(texel >> 24, ctx.alpha));
        }
        a.step(&span.d_attrs);
    }
}

fn fill_behind(target: &mut RenderTarget, span: &Span, ctx: &SpanContext) {
    let (color, depth) = span_rows(target, span);
    let mut a = span.attrs;
    match ctx.texture {
        Some(tex) => {
            for (c, zb) in color.iter_mut().zip(depth.iter()) {
                if is_untouched(*zb) {
                    *c = OPAQUE | sample(tex, &a);
                }
                a.step(&span.d_attrs);
            }
        }
        None => {
            for (c, zb) in color.iter_mut().zip(depth.iter()) {
                if is_untouched(*zb) {
                    *c = solid_color(&a);
                }
                a.step(&span.d_attrs);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::fixed::{to_color, to_edge};

    fn flat_span(y: usize, x_start: usize, x_end: usize, z: i32, rgb: (u8, u8, u8)) -> Span {
        Span {
            y,
            x_start,
            x_end,
            attrs: Attributes {
                z: to_edge(z),
                r: to_color(rgb.0),
                g: to_color(rgb.1),
                b: to_color(rgb.2),
                ..Attributes::default()
            },
            d_attrs: Attributes::default(),
        }
    }

    fn texture(texel: u32) -> Texture {
        Texture::new(4, 4, vec![texel; 16]).unwrap()
    }

    fn ctx(texture: Option<&Texture>, alpha: u32) -> SpanContext<'_> {
        SpanContext { texture, alpha }
    }

    #[test]
    fn test_solid_writes_color_and_depth() {
        let mut target = RenderTarget::new(8, 2);
        fill_solid(&mut target, &flat_span(1, 2, 5, 40, (255, 0, 0)), &ctx(None, 255));
        for x in 0..8 {
            let inside = (2..5).contains(&x);
            assert_eq!(target.pixel(x, 1) == 0xFFFF_0000, inside);
            assert_eq!(target.depth_at(x, 1) == 40, inside);
            assert_eq!(target.depth_at(x, 0), 0);
        }
    }

    #[test]
    fn test_blend_tests_but_does_not_write_depth() {
        let tex = texture(0xFFFF_FFFF);
        let mut target = RenderTarget::new(4, 1);
        target.clear(0xFF00_0000);
        target.depth[3] = 100;
        fill_textured_blend(&mut target, &flat_span(0, 0, 4, 50, (0, 0, 0)), &ctx(Some(&tex), 128));
        assert_eq!(target.pixel(0, 0), 0xFF80_8080);
        assert_eq!(target.depth_at(0, 0), 0);
        // Occluded pixel untouched
        assert_eq!(target.pixel(3, 0), 0xFF00_0000);
    }

    #[test]
    fn test_pixel_alpha_three_ways() {
        let mut target = RenderTarget::new(1, 1);
        target.clear(0xFF00_0000);

        // alpha 0: skipped entirely
        let clear = texture(0x00FF_FFFF);
        fill_textured_pixel_alpha(&mut target, &flat_span(0, 0, 1, 10, (0, 0, 0)), &ctx(Some(&clear), 255));
        assert_eq!((target.pixel(0, 0), target.depth_at(0, 0)), (0xFF00_0000, 0));

        // intermediate: blends, no depth write
        let half = texture(0x80FF_FFFF);
        fill_textured_pixel_alpha(&mut target, &flat_span(0, 0, 1, 10, (0, 0, 0)), &ctx(Some(&half), 255));
        assert_eq!((target.pixel(0, 0), target.depth_at(0, 0)), (0xFF80_8080, 0));

        // alpha 255: opaque write with depth
        let solid = texture(0xFF12_3456);
        fill_textured_pixel_alpha(&mut target, &flat_span(0, 0, 1, 10, (0, 0, 0)), &ctx(Some(&solid), 255));
        assert_eq!((target.pixel(0, 0), target.depth_at(0, 0)), (0xFF12_3456, 10));
    }

    #[test]
    fn test_pixel_alpha_blend_multiplies() {
        let mut target = RenderTarget::new(1, 1);
        target.clear(0xFF00_0000);
        let solid = texture(0xFFFF_FFFF);
        fill_textured_pixel_alpha_blend(&mut target, &flat_span(0, 0, 1, 10, (0, 0, 0)), &ctx(Some(&solid), 128));
        // 255 * 128 combines to 128
        assert_eq!(target.pixel(0, 0), 0xFF80_8080);
        assert_eq!(target.depth_at(0, 0), 0);
    }

    #[test]
    fn test_lit_modulates() {
        let tex = texture(0xFFFF_FFFF);
        let mut target = RenderTarget::new(2, 1);
        fill_lit(&mut target, &flat_span(0, 0, 2, 5, (255, 127, 0)), &ctx(Some(&tex), 255));
        assert_eq!(target.pixel(1, 0), 0xFFFF_7F00);
        assert_eq!(target.depth_at(1, 0), 5);
    }

    #[test]
    fn test_lit_blend_and_lit_pixel_alpha() {
        let tex = texture(0x80FF_FFFF);
        let mut target = RenderTarget::new(1, 1);
        target.clear(0xFF00_0000);
        fill_lit_pixel_alpha(&mut target, &flat_span(0, 0, 1, 5, (255, 255, 255)), &ctx(Some(&tex), 255));
        assert_eq!(target.pixel(0, 0), 0xFF80_8080);
        assert_eq!(target.depth_at(0, 0), 0);

        let mut target = RenderTarget::new(1, 1);
        target.clear(0xFF00_0000);
        fill_lit_blend(&mut target, &flat_span(0, 0, 1, 5, (0, 255, 0)), &ctx(Some(&tex), 255));
        // Texel alpha ignored, primitive alpha opaque
        assert_eq!(target.pixel(0, 0), 0xFF00_FF00);
        assert_eq!(target.depth_at(0, 0), 0);
    }

    #[test]
    fn test_lit_pixel_alpha_with_partial_primitive_alpha() {
        let tex = texture(0x80FF_FFFF);
        let mut target = RenderTarget::new(1, 1);
        target.clear(0xFF00_0000);
        fill_lit_pixel_alpha(&mut target, &flat_span(0, 0, 1, 5, (255, 0, 255)), &ctx(Some(&tex), 128));
        // 128 * 128 combines to 64; 255 at weight 64 lands on 63
        assert_eq!(target.pixel(0, 0), 0xFF3F_003F);
        assert_eq!(target.depth_at(0, 0), 0);
    }

    #[test]
    fn test_lit_blend_with_partial_alpha() {
        // Texel alpha is ignored in this mode
        let tex = texture(0x10FF_FFFF);
        let mut target = RenderTarget::new(2, 1);
        target.clear(0xFF00_0000);
        target.depth[1] = 9;
        fill_lit_blend(&mut target, &flat_span(0, 0, 2, 5, (0, 255, 0)), &ctx(Some(&tex), 128));
        assert_eq!(target.pixel(0, 0), 0xFF00_8000);
        assert_eq!(target.depth_at(0, 0), 0);
        assert_eq!(target.pixel(1, 0), 0xFF00_0000);
        assert_eq!(target.depth_at(1, 0), 9);
    }

    #[test]
    fn test_behind_only_fills_untouched() {
        let mut target = RenderTarget::new(3, 1);
        target.clear(0xFF00_0000);
        target.depth[1] = 7;
        fill_behind(&mut target, &flat_span(0, 0, 3, 1, (0, 0, 255)), &ctx(None, 255));
        assert_eq!(target.pixel(0, 0), 0xFF00_00FF);
        assert_eq!(target.pixel(1, 0), 0xFF00_0000);
        assert_eq!(target.pixel(2, 0), 0xFF00_00FF);
        assert_eq!(target.depth, vec![0, 7, 0]);
    }
}
