// SPDX-License-Identifier: MIT
//! # Pixel Geometry
//!
//! Shared geometry primitives for the pipeline. The important export here is
//! [`scale_dimension`]: the one scale-to-pixel rounding function used both by
//! the shrink planner's reconciliation step and by the resize stage. Keeping
//! a single rounding contract is what lets the planner detect "this residual
//! scale is really identity" without the two sides drifting apart.

/// Represents a 2D size with width and height in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

/// Apply a scale factor to a pixel dimension, rounding to the nearest pixel.
///
/// This is the canonical scale-to-pixel rounding for the whole pipeline.
/// `scale == 1.0` returns the dimension untouched, and a positive input
/// never collapses below one pixel.
///
/// # Arguments
/// * `dim` - Source dimension in pixels
/// * `scale` - Positive scale factor
pub fn scale_dimension(dim: u32, scale: f64) -> u32 {
    if scale == 1.0 || dim == 0 {
        return dim;
    }
    ((f64::from(dim) * scale).round() as u32).max(1)
}

/// Dimensions produced by an integer decode-time shrink.
///
/// Decoders that shrink by an integer divisor round each axis up, so a
/// 300px axis shrunk by 8 yields 38px, not 37. Clamped to a minimum of 1px.
pub fn shrunk_size(size: Size, divisor: u32) -> Size {
    let d = divisor.max(1);
    Size {
        w: ((size.w + d - 1) / d).max(1),
        h: ((size.h + d - 1) / d).max(1),
    }
}
