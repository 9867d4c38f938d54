//! Fixed-point constants and helpers
//!
//! Every interpolated quantity in the rasterizer is an `i64` carrying a fixed
//! number of fractional bits. The shift amounts live here so the edge setup,
//! the span fillers and the particle splatter all round the same way.

/// Fractional bits for edge x, reciprocal depth and perspective texture terms
pub const EDGE_SHIFT: u32 = 20;
pub const EDGE_ONE: i64 = 1 << EDGE_SHIFT;

/// Fractional bits for interpolated color channels
pub const COLOR_SHIFT: u32 = 16;

/// Fractional bits of an alpha weight (0..=ALPHA_ONE)
pub const ALPHA_SHIFT: u32 = 8;
pub const ALPHA_ONE: u32 = 1 << ALPHA_SHIFT;

/// Fractional bits of alpha-mask sample coordinates
pub const MASK_SAMPLE_SHIFT: u32 = 16;

/// Largest `|u * z|` carried by the texture interpolators. Shifted by
/// EDGE_SHIFT it leaves headroom for edge-to-edge differences in an `i64`.
pub const MAX_TEXEL_DEPTH: i64 = 1 << 41;

/// Integer to edge fixed-point
#[inline]
pub fn to_edge(v: i32) -> i64 {
    (v as i64) << EDGE_SHIFT
}

/// Integer channel (0-255) to color fixed-point
#[inline]
pub fn to_color(v: u8) -> i64 {
    (v as i64) << COLOR_SHIFT
}

/// Smallest integer >= x, for an edge fixed-point x
#[inline]
pub fn edge_ceil(x: i64) -> i32 {
    ((x + EDGE_ONE - 1) >> EDGE_SHIFT) as i32
}

/// Edge fixed-point to integer, rounding toward negative infinity
#[inline]
pub fn edge_floor(x: i64) -> i32 {
    (x >> EDGE_SHIFT) as i32
}

/// Color fixed-point to a clamped 8-bit channel
#[inline]
pub fn color_channel(c: i64) -> u32 {
    (c >> COLOR_SHIFT).clamp(0, 255) as u32
}

/// `(num << shift) / den` computed in 128 bits.
///
/// `den` must be non-zero; callers check for empty spans and flat edges first.
#[inline]
pub fn wide_div(num: i64, den: i64, shift: u32) -> i64 {
    (((num as i128) << shift) / den as i128) as i64
}

/// `(a * b) >> shift` computed in 128 bits
#[inline]
pub fn wide_mul(a: i64, b: i64, shift: u32) -> i64 {
    ((a as i128 * b as i128) >> shift) as i64
}
