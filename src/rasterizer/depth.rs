//! Depth-test rule shared by every span filler and the particle splatter.
//!
//! Depth values are reciprocal depth: larger is nearer, 0 is the cleared
//! "infinitely far" value. A candidate passes only if strictly nearer than
//! what is stored, so at equal depth the first writer wins.

/// Depth value of an untouched buffer entry
pub const DEPTH_CLEAR: i32 = 0;

#[inline]
pub fn depth_passes(candidate: i32, stored: i32) -> bool {
    candidate > stored
}

/// Test used by background primitives: nothing drawn here yet
#[inline]
pub fn is_untouched(stored: i32) -> bool {
    stored == DEPTH_CLEAR
}
