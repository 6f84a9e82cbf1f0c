// SPDX-License-Identifier: MIT
//! # Shrink Plan Computation
//!
//! This module decides whether a decode-time shrink is worth asking for and
//! computes the divisor to request. It is the quantized half of the scaling
//! story: decoders that shrink during decode only support a small set of
//! integer divisors, so whatever they produce is reconciled against the
//! originally requested scale by the caller afterward.
//!
//! ## Capability Model
//!
//! Codec families differ in what their decoders can do:
//! 1. **Integer shrink**: JPEG and WebP decoders can skip inverse-transform
//!    work and emit a raster reduced by a power-of-two divisor
//! 2. **Arbitrary-scale decode**: vector input rasterizes directly at any
//!    scale, with no quantization error at all
//! 3. **Neither**: everything else decodes at full resolution only
//!
//! The capabilities live in a closed table ([`ImageKind::caps`]) so adding a
//! codec family is a data change, not new branching logic.
//!
//! ## Divisor Staircase
//!
//! The requested divisor is `floor(1 / scale)` snapped down the descending
//! staircase {8, 4, 2, 1}. Snapping down is deliberate: the decoder must
//! produce an image at least as large as the target, and the leftover scale
//! is applied by the full-precision resize stage.

use crate::geom::{shrunk_size, Size};

/// Codec families the pipeline can receive.
///
/// A closed enumeration: the planner only cares about decode-time scaling
/// capabilities, which are looked up in [`ImageKind::caps`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageKind {
    Jpeg,
    Png,
    Webp,
    Gif,
    Tiff,
    Svg,
}

/// Decode-time scaling capabilities of a codec family.
#[derive(Clone, Copy, Debug, Default)]
pub struct KindCaps {
    /// Decoder can emit a raster reduced by an integer divisor.
    pub integer_shrink: bool,
    /// Decoder rasterizes at an arbitrary scale (vector input).
    pub arbitrary_scale: bool,
}

impl ImageKind {
    /// Capability table for all supported codec families.
    pub const fn caps(self) -> KindCaps {
        match self {
            ImageKind::Jpeg => KindCaps {
                integer_shrink: true,
                arbitrary_scale: false,
            },
            ImageKind::Webp => KindCaps {
                integer_shrink: true,
                arbitrary_scale: false,
            },
            ImageKind::Svg => KindCaps {
                integer_shrink: false,
                arbitrary_scale: true,
            },
            ImageKind::Png | ImageKind::Gif | ImageKind::Tiff => KindCaps {
                integer_shrink: false,
                arbitrary_scale: false,
            },
        }
    }

    /// Whether this family rasterizes from vector input.
    pub fn is_vector(self) -> bool {
        self.caps().arbitrary_scale
    }
}

impl std::fmt::Display for ImageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ImageKind::Jpeg => "jpeg",
            ImageKind::Png => "png",
            ImageKind::Webp => "webp",
            ImageKind::Gif => "gif",
            ImageKind::Tiff => "tiff",
            ImageKind::Svg => "svg",
        };
        f.write_str(name)
    }
}

/// Decide whether decode-time shrink applies to this request.
///
/// Vector input is always eligible: rasterization honors the scale directly,
/// upscale included. Raster input qualifies only when the global disable
/// switch is off, the request is a downscale, and the codec family supports
/// integer shrink.
///
/// # Arguments
/// * `kind` - Codec family of the source image
/// * `scale` - Requested combined scale factor (positive)
/// * `shrink_disabled` - Global "disable shrink-on-load" switch
pub fn can_scale_on_load(kind: ImageKind, scale: f64, shrink_disabled: bool) -> bool {
    let caps = kind.caps();

    if caps.arbitrary_scale {
        return true;
    }

    if shrink_disabled || scale >= 1.0 {
        return false;
    }

    caps.integer_shrink
}

/// Compute the integer shrink divisor for a downscale request.
///
/// `floor(1 / scale)` snapped down to the nearest supported power-of-two
/// divisor. Never overshoots: the decoded image is always at least as large
/// as the requested target.
pub fn shrink_divisor(scale: f64) -> u32 {
    let raw = (1.0 / scale) as i64;

    match raw {
        r if r >= 8 => 8,
        r if r >= 4 => 4,
        r if r >= 2 => 2,
        _ => 1,
    }
}

/// Complete shrink plan computed from the request parameters.
#[derive(Clone, Copy, Debug)]
pub struct ShrinkPlan {
    /// Codec family the plan was computed for
    pub kind: ImageKind,
    /// Originally requested combined scale
    pub requested: f64,
    /// Integer divisor to request from the decoder (1, 2, 4 or 8)
    pub divisor: u32,
    /// Scale hint forwarded to arbitrary-scale decoders
    pub decode_scale: f64,
}

impl ShrinkPlan {
    /// Dimensions an integer-shrink decoder will produce for this plan.
    pub fn decoded_size(&self, src: Size) -> Size {
        shrunk_size(src, self.divisor)
    }
}

/// Build a shrink plan, or `None` when the request is not eligible.
///
/// # Arguments
/// * `kind` - Codec family of the source image
/// * `scale` - Requested combined scale factor (positive)
/// * `shrink_disabled` - Global "disable shrink-on-load" switch
pub fn build_shrink_plan(kind: ImageKind, scale: f64, shrink_disabled: bool) -> Option<ShrinkPlan> {
    if !can_scale_on_load(kind, scale, shrink_disabled) {
        return None;
    }

    Some(ShrinkPlan {
        kind,
        requested: scale,
        divisor: shrink_divisor(scale),
        decode_scale: scale,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_divisor_staircase() {
        assert_eq!(shrink_divisor(0.6), 1); // raw = 1
        assert_eq!(shrink_divisor(0.49), 2); // raw = 2
        assert_eq!(shrink_divisor(0.3), 2); // raw = 3
        assert_eq!(shrink_divisor(0.24), 4); // raw = 4
        assert_eq!(shrink_divisor(0.13), 4); // raw = 7
        assert_eq!(shrink_divisor(0.125), 8); // raw = 8
        assert_eq!(shrink_divisor(0.1), 8); // raw = 10
        assert_eq!(shrink_divisor(0.001), 8);
    }

    #[test]
    fn test_divisor_for_upscale_is_one() {
        assert_eq!(shrink_divisor(1.0), 1);
        assert_eq!(shrink_divisor(2.0), 1);
    }

    #[test]
    fn test_eligibility_matrix() {
        // Raster families with integer shrink qualify on downscale only.
        assert!(can_scale_on_load(ImageKind::Jpeg, 0.5, false));
        assert!(can_scale_on_load(ImageKind::Webp, 0.5, false));
        assert!(!can_scale_on_load(ImageKind::Jpeg, 1.0, false));
        assert!(!can_scale_on_load(ImageKind::Jpeg, 1.5, false));

        // Families without decode-time shrink never qualify.
        assert!(!can_scale_on_load(ImageKind::Png, 0.1, false));
        assert!(!can_scale_on_load(ImageKind::Gif, 0.1, false));
        assert!(!can_scale_on_load(ImageKind::Tiff, 0.1, false));

        // The disable switch shuts raster shrink off entirely.
        assert!(!can_scale_on_load(ImageKind::Jpeg, 0.5, true));
        assert!(!can_scale_on_load(ImageKind::Webp, 0.5, true));
    }

    #[test]
    fn test_vector_is_always_eligible() {
        assert!(can_scale_on_load(ImageKind::Svg, 0.5, false));
        assert!(can_scale_on_load(ImageKind::Svg, 1.0, false));
        assert!(can_scale_on_load(ImageKind::Svg, 2.0, false));
        assert!(can_scale_on_load(ImageKind::Svg, 0.5, true));
    }

    #[test]
    fn test_build_plan_carries_divisor_and_hint() {
        let plan = build_shrink_plan(ImageKind::Jpeg, 0.1, false).unwrap();
        assert_eq!(plan.divisor, 8);
        assert_eq!(plan.decode_scale, 0.1);
        assert_eq!(
            plan.decoded_size(Size { w: 4000, h: 3000 }),
            Size { w: 500, h: 375 }
        );

        assert!(build_shrink_plan(ImageKind::Png, 0.1, false).is_none());
        assert!(build_shrink_plan(ImageKind::Jpeg, 0.5, true).is_none());
    }

    proptest! {
        #[test]
        fn prop_divisor_is_a_supported_step(scale in 0.001f64..0.999) {
            let d = shrink_divisor(scale);
            prop_assert!(matches!(d, 1 | 2 | 4 | 8));
        }

        #[test]
        fn prop_divisor_never_overshoots(scale in 0.001f64..0.999) {
            let d = shrink_divisor(scale);
            prop_assert!(f64::from(d) <= 1.0 / scale);
        }

        #[test]
        fn prop_divisor_monotone_in_scale(a in 0.001f64..0.999, b in 0.001f64..0.999) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(shrink_divisor(lo) >= shrink_divisor(hi));
        }
    }
}
