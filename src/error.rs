//! # Pipeline Error Types
//!
//! Typed errors for the per-request image pipeline. Pipeline and codec APIs
//! return `anyhow::Result`, with these types underneath so callers can still
//! classify failures by downcasting.
//!
//! Decode failures are fatal for the request: they are surfaced verbatim,
//! never recovered locally, and never retried with a different shrink
//! divisor.

use std::{error::Error as StdError, fmt};

use pix_scale::plan::ImageKind;

/// Result alias for fallible pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Base error type for the image pipeline.
#[derive(Debug)]
pub enum PipelineError {
    /// Configuration validation errors
    Config {
        field: String,
        value: String,
        reason: String,
    },
    /// Decode failures: the codec could not produce a raster from the bytes
    Decode {
        kind: Option<ImageKind>,
        reason: String,
        source: Option<Box<dyn StdError + Send + Sync>>,
    },
    /// Resource budget rejections (e.g. source resolution over the limit)
    Resource { resource: String, reason: String },
}

impl PipelineError {
    /// Create a configuration error
    pub fn config(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Config {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a decode error
    pub fn decode(kind: Option<ImageKind>, reason: impl Into<String>) -> Self {
        Self::Decode {
            kind,
            reason: reason.into(),
            source: None,
        }
    }

    /// Create a decode error wrapping the codec's own error
    pub fn decode_source(
        kind: Option<ImageKind>,
        reason: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::Decode {
            kind,
            reason: reason.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a resource budget error
    pub fn resource(resource: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Resource {
            resource: resource.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Config {
                field,
                value,
                reason,
            } => {
                write!(f, "Invalid configuration {}={}: {}", field, value, reason)
            }
            PipelineError::Decode { kind, reason, .. } => match kind {
                Some(kind) => write!(f, "Failed to decode {} image: {}", kind, reason),
                None => write!(f, "Failed to decode image: {}", reason),
            },
            PipelineError::Resource { resource, reason } => {
                write!(f, "Resource limit hit for {}: {}", resource, reason)
            }
        }
    }
}

impl StdError for PipelineError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            PipelineError::Decode {
                source: Some(src), ..
            } => Some(src.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_formats() {
        let err = PipelineError::config("max_src_resolution", "0", "must be greater than 0");
        assert!(err.to_string().contains("max_src_resolution"));

        let err = PipelineError::decode(Some(ImageKind::Jpeg), "truncated scan data");
        assert_eq!(
            err.to_string(),
            "Failed to decode jpeg image: truncated scan data"
        );
    }

    #[test]
    fn test_decode_source_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        let err = PipelineError::decode_source(None, "read past end", io);
        assert!(err.source().is_some());
    }
}
