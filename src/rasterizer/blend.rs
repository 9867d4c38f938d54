//! Integer alpha compositing
//!
//! Alpha values arrive as 8-bit (0-255) and are expanded to a weight in
//! `0..=ALPHA_ONE` so that 255 is exactly opaque and 0 leaves the destination
//! untouched. All products stay within 32 bits: channels and weights are both
//! bounded to 9 bits before multiplying.

use super::fixed::{ALPHA_ONE, ALPHA_SHIFT};
use super::types::{unpack_argb, OPAQUE};

/// 8-bit alpha to a weight in 0..=256
#[inline]
pub fn expand_alpha(a: u32) -> u32 {
    a + (a >> 7)
}

/// Weight of the destination for a given source weight
#[inline]
pub fn complement(weight: u32) -> u32 {
    (ALPHA_ONE * (ALPHA_ONE - weight)) >> ALPHA_SHIFT
}

/// Combine per-pixel and whole-primitive alpha multiplicatively
#[inline]
pub fn combine_alpha(pixel: u32, primitive: u32) -> u32 {
    (pixel * expand_alpha(primitive)) >> ALPHA_SHIFT
}

/// Source-over one channel
#[inline]
pub fn blend_channel(src: u32, dst: u32, top: u32, bottom: u32) -> u32 {
    (src * top + dst * bottom) >> ALPHA_SHIFT
}

/// Source-over composite of `src` onto `dst` with 8-bit alpha.
///
/// The alpha byte of `src` is ignored; the result is always opaque.
#[inline]
pub fn blend_over(src: u32, dst: u32, alpha: u32) -> u32 {
    let top = expand_alpha(alpha);
    let bottom = complement(top);
    let (_, sr, sg, sb) = unpack_argb(src);
    let (_, dr, dg, db) = unpack_argb(dst);
    OPAQUE
        | (blend_channel(sr, dr, top, bottom) << 16)
        | (blend_channel(sg, dg, top, bottom) << 8)
        | blend_channel(sb, db, top, bottom)
}

/// Multiply a texel by a light color (channels 0-255); white leaves it unchanged
#[inline]
pub fn modulate(texel: u32, r: u32, g: u32, b: u32) -> u32 {
    let (a, tr, tg, tb) = unpack_argb(texel);
    (a << 24)
        | (((tr * (r + 1)) >> 8) << 16)
        | (((tg * (g + 1)) >> 8) << 8)
        | ((tb * (b + 1)) >> 8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opaque_alpha_yields_source() {
        for &dst in &[0xFF00_0000, 0xFFFF_FFFF, 0xFF12_3456] {
            assert_eq!(blend_over(0xFFAB_CDEF, dst, 255), 0xFFAB_CDEF);
        }
    }

    #[test]
    fn test_zero_alpha_yields_destination() {
        for &dst in &[0xFF00_0000, 0xFFFF_FFFF, 0xFF12_3456] {
            assert_eq!(blend_over(0xFFAB_CDEF, dst, 0), dst);
        }
    }

    #[test]
    fn test_half_alpha_mixes() {
        let out = blend_over(0xFFFF_FFFF, 0xFF00_0000, 128);
        let (_, r, g, b) = unpack_argb(out);
        assert_eq!((r, g, b), (128, 128, 128));
    }

    #[test]
    fn test_combine_alpha() {
        assert_eq!(combine_alpha(255, 255), 255);
        assert_eq!(combine_alpha(0, 255), 0);
        assert_eq!(combine_alpha(255, 0), 0);
        assert_eq!(combine_alpha(200, 128), 100);
    }

    #[test]
    fn test_modulate() {
        assert_eq!(modulate(0xFF80_4020, 255, 255, 255), 0xFF80_4020);
        assert_eq!(modulate(0xFF80_4020, 0, 0, 0), 0xFF00_0000);
        assert_eq!(modulate(0xFFFF_FFFF, 127, 127, 127), 0xFF7F_7F7F);
    }
}
