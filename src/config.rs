//! # Configuration Module
//!
//! This module provides configuration structures and validation for the
//! image pipeline. It serves as the common interface between the embedding
//! server, the pipeline stages, and the codec layer.
//!
//! ## Overview
//!
//! The configuration system is designed to be:
//! - **Explicit**: every consumer receives the configuration it needs at
//!   construction time; there is no process-wide state
//! - **Validated**: runtime validation with helpful error messages
//! - **Extensible**: easy to add new pipeline options
//!
//! ## Configuration Parameters
//!
//! | Parameter | Type | Range | Description |
//! |-----------|------|-------|-------------|
//! | `disable_shrink_on_load` | `bool` | true/false | Turn decode-time shrink off globally |
//! | `max_src_resolution` | `u64` | > 0 | Largest source pixel count the codec will decode |
//!
//! ## Build-Time Decisions
//!
//! Stages capture the values they need when they are constructed, so the
//! per-request execution path carries no configuration lookups.

use crate::error::{PipelineError, PipelineResult};

/// Configuration for the per-request image pipeline.
///
/// # Field Descriptions
///
/// - `disable_shrink_on_load`: global switch that turns decode-time shrink
///   off for raster input (vector rasterization is unaffected)
/// - `max_src_resolution`: decode guard in pixels; sources above it are
///   rejected before a full-resolution raster is allocated
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Disable decode-time shrink for raster codecs.
    ///
    /// When `true`, every raster image decodes at full resolution and all
    /// scaling is left to the resize stage. Vector input still rasterizes
    /// at the requested scale; that path has no quantization cost.
    pub disable_shrink_on_load: bool,

    /// Largest source pixel count the codec will decode.
    ///
    /// Checked against the header geometry before full decode, so a
    /// hostile or oversized source is rejected before its raster is
    /// allocated. Must be greater than 0.
    pub max_src_resolution: u64,
}

impl Default for PipelineConfig {
    /// Creates a default configuration suitable for most deployments.
    ///
    /// Default values:
    /// - `disable_shrink_on_load`: false (shrink whenever the codec can)
    /// - `max_src_resolution`: 50_000_000 (50 Mpx)
    fn default() -> Self {
        Self {
            disable_shrink_on_load: false,
            max_src_resolution: 50_000_000,
        }
    }
}

impl PipelineConfig {
    /// Creates a new configuration with the specified parameters.
    ///
    /// # Parameters
    ///
    /// - `disable_shrink_on_load`: global decode-time shrink switch
    /// - `max_src_resolution`: decode guard in pixels (must be > 0)
    pub fn new(disable_shrink_on_load: bool, max_src_resolution: u64) -> Self {
        Self {
            disable_shrink_on_load,
            max_src_resolution,
        }
    }

    /// Validates the configuration parameters.
    ///
    /// # Validation Rules
    ///
    /// - `max_src_resolution` must be greater than 0
    ///
    /// # Returns
    ///
    /// - `Ok(())` if all parameters are valid
    /// - `Err(PipelineError::Config)` naming the offending field otherwise
    pub fn validate(&self) -> PipelineResult<()> {
        if self.max_src_resolution == 0 {
            return Err(PipelineError::config(
                "max_src_resolution",
                self.max_src_resolution.to_string(),
                "must be greater than 0",
            ));
        }
        Ok(())
    }
}
