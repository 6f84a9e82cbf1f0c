//! # Codec Layer
//!
//! The pipeline's decode capability. Stages talk to an [`ImageHandle`]: an
//! opaque, request-owned handle that is loaded in place and then queried for
//! its actual pixel geometry. The concrete [`CodecImage`] implementation
//! decodes with the `image` crate and materializes integer decode-time
//! shrink through the SIMD reducer in `pix_scale`.
//!
//! ## Load Semantics
//!
//! `load` receives everything a shrinking decoder needs:
//! 1. **Shrink divisor**: 1, 2, 4 or 8; the raster comes back reduced by
//!    that factor, each axis rounded up
//! 2. **Scale hint**: forwarded for decoders that rasterize at arbitrary
//!    scale (vector input); raster decode ignores it
//! 3. **Orientation**: EXIF-style value 1–8, normalized during load so the
//!    reported geometry is already upright
//!
//! ## Resource Guard
//!
//! Source geometry is probed from the header before full decode and checked
//! against the configured resolution budget, so oversized input is rejected
//! before a full raster is allocated.

use std::io::Cursor;

use anyhow::Result;
use fast_image_resize::Resizer;
use image::{DynamicImage, ImageReader};

use pix_scale::cpu::reduce_rgba_cpu;
use pix_scale::geom::{Size, shrunk_size};

use crate::config::PipelineConfig;
use crate::error::PipelineError;

/// Abstract decode capability owned by a single in-flight request.
///
/// Created once per request and mutated in place by `load`. The geometry
/// accessors are only meaningful after a successful load.
pub trait ImageHandle {
    /// Decode `data` into this handle.
    ///
    /// # Arguments
    /// * `data` - Encoded source bytes
    /// * `shrink` - Integer decode-time shrink divisor (1 = none)
    /// * `scale` - Scale hint for arbitrary-scale decoders
    /// * `orientation` - EXIF-style orientation (1–8) to normalize away
    fn load(&mut self, data: &[u8], shrink: u32, scale: f64, orientation: u8) -> Result<()>;

    /// Pixel width after load, orientation already normalized.
    fn width(&self) -> u32;

    /// Pixel height after load, orientation already normalized.
    fn height(&self) -> u32;
}

/// Raster decode backend built on the `image` crate.
///
/// Holds the decoded RGBA raster for the rest of the pipeline. Vector input
/// is not rasterizable by this backend; it arrives through other
/// [`ImageHandle`] implementations.
pub struct CodecImage {
    max_src_resolution: u64,
    resizer: Resizer,
    pixels: Vec<u8>,
    size: Size,
}

impl CodecImage {
    /// Create an empty handle with the configured decode guard.
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            max_src_resolution: config.max_src_resolution,
            resizer: Resizer::new(),
            pixels: Vec::new(),
            size: Size { w: 0, h: 0 },
        }
    }

    /// Decoded RGBA pixel data (tightly packed, `width * height * 4` bytes).
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Read source geometry from the header without decoding the raster.
    fn probe_dimensions(data: &[u8]) -> Result<(u32, u32), PipelineError> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| PipelineError::decode_source(None, "unrecognized image signature", e))?;

        reader
            .into_dimensions()
            .map_err(|e| PipelineError::decode_source(None, "failed to read image header", e))
    }

    /// Normalize an EXIF-style orientation so the raster is upright.
    fn apply_orientation(img: DynamicImage, orientation: u8) -> DynamicImage {
        match orientation {
            2 => img.fliph(),
            3 => img.rotate180(),
            4 => img.flipv(),
            5 => img.rotate90().fliph(),
            6 => img.rotate90(),
            7 => img.rotate270().fliph(),
            8 => img.rotate270(),
            _ => img,
        }
    }
}

impl ImageHandle for CodecImage {
    fn load(&mut self, data: &[u8], shrink: u32, _scale: f64, orientation: u8) -> Result<()> {
        let (header_w, header_h) = Self::probe_dimensions(data)?;

        let src_pixels = u64::from(header_w) * u64::from(header_h);
        if src_pixels > self.max_src_resolution {
            return Err(PipelineError::resource(
                "source resolution",
                format!(
                    "{}x{} is {} pixels, budget is {}",
                    header_w, header_h, src_pixels, self.max_src_resolution
                ),
            )
            .into());
        }

        let decoded = image::load_from_memory(data)
            .map_err(|e| PipelineError::decode_source(None, "image decoding failed", e))?;
        let decoded = Self::apply_orientation(decoded, orientation);

        let rgba = decoded.to_rgba8();
        let full = Size {
            w: rgba.width(),
            h: rgba.height(),
        };

        if shrink > 1 {
            let out = shrunk_size(full, shrink);
            let mut reduced = vec![0u8; (out.w as usize) * (out.h as usize) * 4];
            reduce_rgba_cpu(&mut self.resizer, rgba.as_raw(), full, out, &mut reduced)
                .map_err(|e| PipelineError::decode_source(None, "decode-time reduction failed", e))?;
            self.pixels = reduced;
            self.size = out;
        } else {
            self.pixels = rgba.into_raw();
            self.size = full;
        }

        log::debug!(
            "codec: loaded {}x{} (shrink {})",
            self.size.w,
            self.size.h,
            shrink
        );

        Ok(())
    }

    fn width(&self) -> u32 {
        self.size.w
    }

    fn height(&self) -> u32 {
        self.size.h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};

    fn encode(img: &RgbImage, format: ImageFormat) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(img.clone())
            .write_to(&mut Cursor::new(&mut bytes), format)
            .unwrap();
        bytes
    }

    #[test]
    fn test_load_without_shrink_keeps_geometry() {
        let data = encode(&RgbImage::new(64, 48), ImageFormat::Png);
        let mut img = CodecImage::new(&PipelineConfig::default());

        img.load(&data, 1, 1.0, 1).unwrap();
        assert_eq!((img.width(), img.height()), (64, 48));
        assert_eq!(img.pixels().len(), 64 * 48 * 4);
    }

    #[test]
    fn test_load_with_shrink_rounds_up() {
        let data = encode(&RgbImage::new(100, 75), ImageFormat::Jpeg);
        let mut img = CodecImage::new(&PipelineConfig::default());

        img.load(&data, 8, 0.1, 1).unwrap();
        // 100/8 = 12.5 → 13, 75/8 = 9.375 → 10
        assert_eq!((img.width(), img.height()), (13, 10));
        assert_eq!(img.pixels().len(), 13 * 10 * 4);
    }

    #[test]
    fn test_orientation_is_normalized() {
        let data = encode(&RgbImage::new(80, 40), ImageFormat::Png);
        let mut img = CodecImage::new(&PipelineConfig::default());

        img.load(&data, 1, 1.0, 6).unwrap();
        assert_eq!((img.width(), img.height()), (40, 80));
    }

    #[test]
    fn test_resolution_guard_rejects_before_decode() {
        let data = encode(&RgbImage::new(100, 100), ImageFormat::Png);
        let config = PipelineConfig::new(false, 1_000);
        let mut img = CodecImage::new(&config);

        let err = img.load(&data, 1, 1.0, 1).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::Resource { .. })
        ));
    }

    #[test]
    fn test_corrupt_bytes_are_a_decode_error() {
        let mut img = CodecImage::new(&PipelineConfig::default());

        let err = img.load(&[0u8; 16], 1, 1.0, 1).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::Decode { .. })
        ));
    }
}
