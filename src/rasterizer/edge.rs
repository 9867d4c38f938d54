//! Fixed-point triangle setup and edge stepping
//!
//! A triangle is split at its middle vertex into a top and a bottom half.
//! The long edge (top to bottom) spans both halves; each half pairs it with
//! one short edge. `modifier` records which side the long edge is on so the
//! same scanline walk handles both orientations.

use super::fixed::{color_channel, edge_ceil, to_color, to_edge, wide_div, wide_mul, EDGE_SHIFT, MAX_TEXEL_DEPTH};
use super::types::ScreenVertex;

/// Attributes carried along an edge or a span, all fixed-point
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Attributes {
    /// Reciprocal depth (EDGE_SHIFT)
    pub z: i64,
    /// u * z (EDGE_SHIFT)
    pub uz: i64,
    /// v * z (EDGE_SHIFT)
    pub vz: i64,
    /// Color channels (COLOR_SHIFT)
    pub r: i64,
    pub g: i64,
    pub b: i64,
}

impl Attributes {
    pub fn from_vertex(v: &ScreenVertex) -> Self {
        let z = v.z as i64;
        // Out-of-range vertices saturate instead of wrapping
        let times_z = |t: i32| (t as i64 * z).clamp(-MAX_TEXEL_DEPTH, MAX_TEXEL_DEPTH) << EDGE_SHIFT;
        Self {
            z: z << EDGE_SHIFT,
            uz: times_z(v.u),
            vz: times_z(v.v),
            r: to_color(v.color.0),
            g: to_color(v.color.1),
            b: to_color(v.color.2),
        }
    }

    /// Per-unit delta from `self` to `end` over `steps` (EDGE_SHIFT fixed-point)
    pub fn delta(&self, end: &Self, steps: i64) -> Self {
        Self {
            z: wide_div(end.z - self.z, steps, EDGE_SHIFT),
            uz: wide_div(end.uz - self.uz, steps, EDGE_SHIFT),
            vz: wide_div(end.vz - self.vz, steps, EDGE_SHIFT),
            r: wide_div(end.r - self.r, steps, EDGE_SHIFT),
            g: wide_div(end.g - self.g, steps, EDGE_SHIFT),
            b: wide_div(end.b - self.b, steps, EDGE_SHIFT),
        }
    }

    /// `self + delta * t`, with `t` in EDGE_SHIFT fixed-point
    pub fn advanced(&self, delta: &Self, t: i64) -> Self {
        let step = |v: i64, d: i64| v + wide_mul(d, t, EDGE_SHIFT);
        Self {
            z: step(self.z, delta.z),
            uz: step(self.uz, delta.uz),
            vz: step(self.vz, delta.vz),
            r: step(self.r, delta.r),
            g: step(self.g, delta.g),
            b: step(self.b, delta.b),
        }
    }

    #[inline]
    pub fn step(&mut self, delta: &Self) {
        self.z += delta.z;
        self.uz += delta.uz;
        self.vz += delta.vz;
        self.r += delta.r;
        self.g += delta.g;
        self.b += delta.b;
    }
}

/// One triangle edge, walked one scanline at a time
#[derive(Debug, Clone, Copy)]
pub struct Edge {
    /// x at the current scanline (EDGE_SHIFT)
    pub x: i64,
    pub dx: i64,
    pub attrs: Attributes,
    pub d_attrs: Attributes,
    pub y_start: i32,
    pub y_end: i32,
}

impl Edge {
    /// Edge from `top` to `bottom`; `None` if it covers no scanline
    pub fn new(top: &ScreenVertex, bottom: &ScreenVertex) -> Option<Self> {
        let dy = (bottom.y - top.y) as i64;
        if dy <= 0 {
            return None;
        }
        let start = Attributes::from_vertex(top);
        let end = Attributes::from_vertex(bottom);
        // Steps are whole rows, expressed in EDGE_SHIFT so the delta is per row
        let d_attrs = start.delta(&end, dy << EDGE_SHIFT);
        Some(Self {
            x: to_edge(top.x),
            dx: wide_div(to_edge(bottom.x - top.x), dy, 0),
            attrs: start,
            d_attrs,
            y_start: top.y,
            y_end: bottom.y,
        })
    }

    #[inline]
    pub fn step(&mut self) {
        self.x += self.dx;
        self.attrs.step(&self.d_attrs);
    }

    /// Skip `rows` scanlines at once (used when clipping against the top)
    pub fn skip(&mut self, rows: i32) {
        if rows <= 0 {
            return;
        }
        let rows = rows as i64;
        self.x += self.dx * rows;
        self.attrs = self.attrs.advanced(&self.d_attrs, rows << EDGE_SHIFT);
    }
}

/// Per-primitive interpolation state
#[derive(Debug, Clone, Copy)]
pub struct TriangleSetup {
    pub y_start: i32,
    pub y_end: i32,
    /// +1 when the long edge is on the left, -1 when on the right
    pub modifier: i32,
    pub long: Edge,
    pub upper: Option<Edge>,
    pub lower: Option<Edge>,
}

/// Twice the signed screen area (y down, positive for front faces)
pub fn signed_area2(v: &[ScreenVertex; 3]) -> i64 {
    let ax = (v[1].x - v[0].x) as i64;
    let ay = (v[1].y - v[0].y) as i64;
    let bx = (v[2].x - v[0].x) as i64;
    let by = (v[2].y - v[0].y) as i64;
    ax * by - bx * ay
}

impl TriangleSetup {
    /// `None` for zero-height or collinear triangles
    pub fn new(vertices: &[ScreenVertex; 3]) -> Option<Self> {
        let mut sorted = *vertices;
        sorted.sort_by_key(|v| v.y);
        let [top, mid, bottom] = sorted;

        let long = Edge::new(&top, &bottom)?;

        // Sign of (long edge x at mid.y) - mid.x
        let cross = (bottom.x - top.x) as i64 * (mid.y - top.y) as i64
            - (mid.x - top.x) as i64 * (bottom.y - top.y) as i64;
        if cross == 0 {
            return None;
        }

        Some(Self {
            y_start: top.y,
            y_end: bottom.y,
            modifier: if cross < 0 { 1 } else { -1 },
            long,
            upper: Edge::new(&top, &mid),
            lower: Edge::new(&mid, &bottom),
        })
    }

    pub fn long_on_left(&self) -> bool {
        self.modifier > 0
    }
}

/// One scanline between two edges, prestepped to the first pixel center
#[derive(Debug, Clone, Copy)]
pub struct Span {
    pub y: usize,
    pub x_start: usize,
    pub x_end: usize,
    pub attrs: Attributes,
    /// Per-pixel deltas
    pub d_attrs: Attributes,
}

impl Span {
    /// Build the span covering pixels `ceil(left.x) .. ceil(right.x)`, clamped
    /// to `0..width`. `None` when the span is empty, including `dx == 0`.
    pub fn between(left: &Edge, right: &Edge, y: usize, width: usize) -> Option<Self> {
        let dx = right.x - left.x;
        if dx <= 0 {
            return None;
        }
        let x_start = edge_ceil(left.x).max(0);
        let x_end = edge_ceil(right.x).min(width as i32);
        if x_start >= x_end {
            return None;
        }

        let d_attrs = left.attrs.delta(&right.attrs, dx);
        let prestep = to_edge(x_start) - left.x;
        Some(Self {
            y,
            x_start: x_start as usize,
            x_end: x_end as usize,
            attrs: left.attrs.advanced(&d_attrs, prestep),
            d_attrs,
        })
    }
}

/// Perspective divide of an interpolated `u * z` term, rounding toward
/// negative infinity so every texel covers the same width across u = 0
#[inline]
pub fn texel_coord(tz: i64, z: i64) -> i32 {
    tz.div_euclid(z.max(1)) as i32
}

/// Interpolated color channels as 8-bit values
#[inline]
pub fn span_color(a: &Attributes) -> (u32, u32, u32) {
    (color_channel(a.r), color_channel(a.g), color_channel(a.b))
}

/// Interpolated depth in depth-buffer units
#[inline]
pub fn span_depth(a: &Attributes) -> i32 {
    (a.z >> EDGE_SHIFT) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::fixed::{edge_floor, EDGE_ONE};

    fn v(x: i32, y: i32, z: i32) -> ScreenVertex {
        ScreenVertex::new(x, y, z)
    }

    #[test]
    fn test_setup_sorts_and_finds_long_edge() {
        let setup = TriangleSetup::new(&[v(30, 40, 1), v(10, 10, 1), v(50, 10, 1)]).unwrap();
        assert_eq!((setup.y_start, setup.y_end), (10, 40));
        // Flat top: the upper half is empty
        assert!(setup.upper.is_none());
        assert!(setup.lower.is_some());
    }

    #[test]
    fn test_modifier_tracks_long_edge_side() {
        // Middle vertex right of the long edge
        let right = TriangleSetup::new(&[v(0, 0, 1), v(20, 10, 1), v(0, 20, 1)]).unwrap();
        assert!(right.long_on_left());
        assert_eq!(right.modifier, 1);
        // Middle vertex left of the long edge
        let left = TriangleSetup::new(&[v(20, 0, 1), v(0, 10, 1), v(20, 20, 1)]).unwrap();
        assert_eq!(left.modifier, -1);
    }

    #[test]
    fn test_degenerate_triangles() {
        assert!(TriangleSetup::new(&[v(0, 5, 1), v(10, 5, 1), v(20, 5, 1)]).is_none());
        assert!(TriangleSetup::new(&[v(0, 0, 1), v(5, 5, 1), v(10, 10, 1)]).is_none());
    }

    #[test]
    fn test_edge_steps_linearly() {
        let mut edge = Edge::new(&v(0, 0, 100).with_color(0, 0, 0), &v(30, 10, 200).with_color(250, 0, 0)).unwrap();
        for _ in 0..5 {
            edge.step();
        }
        assert_eq!(edge_floor(edge.x), 15);
        assert_eq!(span_depth(&edge.attrs), 150);
        assert_eq!(span_color(&edge.attrs).0, 125);
    }

    #[test]
    fn test_edge_skip_matches_steps() {
        let a = v(3, 2, 77).with_uv(5, 9);
        let b = v(41, 29, 311).with_uv(60, 1);
        let mut stepped = Edge::new(&a, &b).unwrap();
        let mut skipped = stepped;
        for _ in 0..13 {
            stepped.step();
        }
        skipped.skip(13);
        assert_eq!(stepped.x, skipped.x);
        assert!((stepped.attrs.z - skipped.attrs.z).abs() <= 16);
        assert!((stepped.attrs.uz - skipped.attrs.uz).abs() <= 16);
    }

    #[test]
    fn test_zero_width_span_is_skipped() {
        let left = Edge::new(&v(10, 0, 1), &v(10, 10, 1)).unwrap();
        let right = left;
        assert!(Span::between(&left, &right, 0, 100).is_none());
    }

    #[test]
    fn test_span_prestep_and_clamp() {
        let mut left = Edge::new(&v(-5, 0, 100), &v(-5, 10, 100)).unwrap();
        let mut right = Edge::new(&v(200, 0, 300), &v(200, 10, 300)).unwrap();
        left.x += EDGE_ONE / 2;
        right.x += EDGE_ONE / 2;
        let span = Span::between(&left, &right, 0, 64).unwrap();
        assert_eq!(span.x_start, 0);
        assert_eq!(span.x_end, 64);
        // z at x = 0 is 100 + 200 * 4.5 / 205
        assert_eq!(span_depth(&span.attrs), 104);
    }

    #[test]
    fn test_texel_coord_divides() {
        let a = Attributes::from_vertex(&v(0, 0, 50).with_uv(12, 7));
        assert_eq!(texel_coord(a.uz, a.z), 12);
        assert_eq!(texel_coord(a.vz, a.z), 7);
    }

    #[test]
    fn test_texel_coord_floors_negative() {
        let z = to_edge(10);
        assert_eq!(texel_coord(-z / 2, z), -1);
        assert_eq!(texel_coord(-z, z), -1);
        assert_eq!(texel_coord(-z - 1, z), -2);
        assert_eq!(texel_coord(z / 2, z), 0);
    }

    #[test]
    fn test_large_uv_depth_product_saturates() {
        // Within range: exact
        let a = Attributes::from_vertex(&v(0, 0, 1 << 30).with_uv(1024, -1024));
        assert_eq!(texel_coord(a.uz, a.z), 1024);
        assert_eq!(texel_coord(a.vz, a.z), -1024);

        // Beyond range: clamped, sign kept, no wrap
        let b = Attributes::from_vertex(&v(0, 0, i32::MAX).with_uv(i32::MAX, i32::MIN));
        assert_eq!(b.uz, MAX_TEXEL_DEPTH << EDGE_SHIFT);
        assert_eq!(b.vz, -MAX_TEXEL_DEPTH << EDGE_SHIFT);
        let end = Attributes::from_vertex(&v(0, 0, i32::MAX).with_uv(i32::MIN, i32::MAX));
        let d = b.delta(&end, to_edge(4));
        assert!(d.uz < 0 && d.vz > 0);
    }
}
