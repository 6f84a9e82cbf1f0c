//! # Request-Scoped Pipeline Context
//!
//! Mutable per-request state threaded explicitly through every pipeline
//! stage. Exactly one request owns a context at a time; no stage shares it
//! across requests and nothing about it is process-wide.

use pix_scale::plan::ImageKind;

/// Per-request pipeline state.
///
/// `src_width`/`src_height` are the original source geometry (orientation
/// already normalized) and are immutable after the initial metadata read.
/// `wscale`/`hscale` are the residual scale factors the resize stage still
/// has to apply; stages that achieve part of the scaling (like decode-time
/// shrink) rewrite them so that residual × achieved always reproduces the
/// originally requested target geometry.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    /// Original source width in pixels (positive, immutable).
    pub src_width: u32,

    /// Original source height in pixels (positive, immutable).
    pub src_height: u32,

    /// Residual width scale still to be applied downstream.
    pub wscale: f64,

    /// Residual height scale still to be applied downstream.
    pub hscale: f64,

    /// Codec family of the source image.
    pub kind: ImageKind,

    /// EXIF-style orientation (1–8) from the metadata read.
    pub orientation: u8,

    /// Whether a destructive auto-trim already ran on this request.
    ///
    /// Trim has to see full-resolution pixels, so a trimmed image must not
    /// be reloaded at reduced resolution.
    pub trimmed: bool,
}

impl PipelineContext {
    /// Create a context at identity scale for a freshly measured source.
    pub fn new(src_width: u32, src_height: u32, kind: ImageKind) -> Self {
        Self {
            src_width,
            src_height,
            wscale: 1.0,
            hscale: 1.0,
            kind,
            orientation: 1,
            trimmed: false,
        }
    }

    /// Set the requested per-axis scale factors.
    pub fn set_scale(&mut self, wscale: f64, hscale: f64) {
        self.wscale = wscale;
        self.hscale = hscale;
    }

    /// The dominant axis scale, which drives the shrink decision.
    pub fn combined_scale(&self) -> f64 {
        self.wscale.max(self.hscale)
    }
}
