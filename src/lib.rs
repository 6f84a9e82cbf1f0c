//! # Pix-Pipe Image Pipeline Library
//!
//! A per-request image processing pipeline built around decode-time
//! scaling: when the codec can produce an already-downscaled raster, the
//! pipeline asks for it and reconciles the leftover scale, instead of
//! decoding at full resolution and throwing most of the pixels away.
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//! - `codec`: the decode capability (`ImageHandle`) and its `image`-crate
//!   backend
//! - `pipeline`: the synchronous stage chain, per-request context, and the
//!   scale-on-load stage
//! - `config`: configuration management and validation
//! - `error`: typed pipeline errors underneath `anyhow`
//!
//! The planning math itself (capability table, divisor staircase, shared
//! rounding contract) lives in the `pix-scale` crate and is re-exported
//! here.
//!
//! ## Example
//!
//! ```rust,no_run
//! use pix_pipe::{CodecImage, ImageKind, Pipeline, PipelineConfig, PipelineContext};
//!
//! # fn example(jpeg_bytes: &[u8]) -> anyhow::Result<()> {
//! let config = PipelineConfig::default();
//! let pipeline = Pipeline::builder().with_scale_on_load(&config).build();
//!
//! let mut ctx = PipelineContext::new(4000, 3000, ImageKind::Jpeg);
//! ctx.set_scale(0.1, 0.1);
//!
//! let mut img = CodecImage::new(&config);
//! pipeline.run(&mut ctx, &mut img, Some(jpeg_bytes))?;
//!
//! // The decoder produced a reduced raster; ctx now carries the residual
//! // scales the resize stage still has to apply.
//! # Ok(())
//! # }
//! ```

// Internal module imports
pub mod codec;
pub mod config;
pub mod error;
pub mod pipeline;

/// Re-export error types for convenience
pub use error::{PipelineError, PipelineResult};

/// Re-export the pipeline surface
pub use codec::{CodecImage, ImageHandle};
pub use config::PipelineConfig;
pub use pipeline::{Pipeline, PipelineBuilder, PipelineContext, PipelineStage, ScaleOnLoad};

/// Re-export commonly used types from the planning crate
pub use pix_scale::geom::{Size, scale_dimension};
pub use pix_scale::plan::{ImageKind, KindCaps, ShrinkPlan, build_shrink_plan};
