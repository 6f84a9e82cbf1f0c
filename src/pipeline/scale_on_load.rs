//! # Scale-on-Load Stage
//!
//! Decides whether the decoder can hand back an already-downscaled raster,
//! asks for it, and folds the quantization error back into the residual
//! scales so downstream geometry stays correct to the pixel.
//!
//! ## Why This Stage Exists
//!
//! Decoding at reduced resolution skips most of the inverse-transform work
//! and never allocates the full raster, so it dwarfs any later resample in
//! both CPU and memory. The catch is granularity: integer-shrink decoders
//! only support the {1, 2, 4, 8} divisor staircase, and the divisor is
//! chosen from the *requested* scale while the decoder reports its own
//! rounding. Both gaps are closed here by recomputing the residual scales
//! from the actual decoded geometry.
//!
//! ## Skip Conditions
//!
//! The stage is a silent no-op when the image was already auto-trimmed
//! (trim must see full-resolution pixels), when the request is identity
//! scale, when no source bytes are available, or when the codec family is
//! not eligible. A JPEG divisor of 1 is also skipped: a second decode pass
//! that changes nothing is pure overhead.

use anyhow::Result;
use log::debug;

use pix_scale::geom::scale_dimension;
use pix_scale::plan::{ImageKind, build_shrink_plan};

use super::{PipelineContext, PipelineStage};
use crate::codec::ImageHandle;
use crate::config::PipelineConfig;

/// Pipeline stage that loads the image through the decoder's own scaling.
pub struct ScaleOnLoad {
    shrink_disabled: bool,
}

impl ScaleOnLoad {
    /// Capture the relevant configuration at build time.
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            shrink_disabled: config.disable_shrink_on_load,
        }
    }
}

impl PipelineStage for ScaleOnLoad {
    fn name(&self) -> &'static str {
        "scale_on_load"
    }

    fn run(
        &self,
        ctx: &mut PipelineContext,
        img: &mut dyn ImageHandle,
        data: Option<&[u8]>,
    ) -> Result<()> {
        let prescale = ctx.combined_scale();

        if ctx.trimmed || prescale == 1.0 {
            return Ok(());
        }
        let Some(data) = data else {
            return Ok(());
        };
        let Some(plan) = build_shrink_plan(ctx.kind, prescale, self.shrink_disabled) else {
            return Ok(());
        };

        // A JPEG pass with divisor 1 reproduces the raster we already have.
        if ctx.kind == ImageKind::Jpeg && plan.divisor == 1 {
            return Ok(());
        }

        debug!(
            "scale-on-load: {} divisor {} for requested scale {:.4}",
            ctx.kind, plan.divisor, prescale
        );

        img.load(data, plan.divisor, plan.decode_scale, ctx.orientation)?;

        // Fold what the decoder actually produced back into the residual
        // scales, measuring from real geometry rather than the divisor.
        let (new_width, new_height) = (img.width(), img.height());

        ctx.wscale = f64::from(ctx.src_width) * ctx.wscale / f64::from(new_width);
        if ctx.src_width == scale_dimension(ctx.src_width, ctx.wscale) {
            ctx.wscale = 1.0;
        }

        ctx.hscale = f64::from(ctx.src_height) * ctx.hscale / f64::from(new_height);
        if ctx.src_height == scale_dimension(ctx.src_height, ctx.hscale) {
            ctx.hscale = 1.0;
        }

        debug!(
            "scale-on-load: decoded {}x{}, residual scales {:.4}x{:.4}",
            new_width, new_height, ctx.wscale, ctx.hscale
        );

        Ok(())
    }
}
