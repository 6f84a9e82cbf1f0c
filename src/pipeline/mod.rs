//! # Per-Request Processing Pipeline
//!
//! Linear, synchronous stage chain for one in-flight request. Provides the
//! stage trait, the composable chain, and a builder for declarative
//! assembly.
//!
//! ## Architecture
//!
//! The pipeline follows a linear, explicitly-threaded design:
//! 1. **PipelineStage Trait**: extensible processing interface
//! 2. **Pipeline**: composable stage chain with a single run loop
//! 3. **PipelineBuilder**: fluent API for pipeline assembly
//! 4. **PipelineContext**: exclusively-owned per-request state
//!
//! ## Concurrency Model
//!
//! A pipeline runs synchronously on the thread that owns the request.
//! Context and image handle are owned by exactly one request, so the chain
//! needs no locks, queues, or cross-request coordination; the embedding
//! server scales by running many independent pipelines in parallel.
//!
//! ## Non-Branching Patterns
//!
//! Configuration decisions are made at build time: each stage captures the
//! settings it needs during construction, and the run loop is a plain
//! sequential walk with no configuration lookups.

use anyhow::Result;
use log::debug;

use crate::codec::ImageHandle;
use crate::config::PipelineConfig;

mod context;
mod scale_on_load;

pub use context::PipelineContext;
pub use scale_on_load::ScaleOnLoad;

/// Abstract pipeline stage interface.
/// Implement this trait to add custom per-request processing steps.
pub trait PipelineStage {
    /// Stable stage name used in logs.
    fn name(&self) -> &'static str;

    /// Run this stage against the request's context and image handle.
    ///
    /// # Arguments
    /// * `ctx` - Mutable per-request state
    /// * `img` - The request's decode handle
    /// * `data` - Encoded source bytes, when still available
    fn run(
        &self,
        ctx: &mut PipelineContext,
        img: &mut dyn ImageHandle,
        data: Option<&[u8]>,
    ) -> Result<()>;
}

/// Composable stage chain.
/// Runs stages in order; the first failing stage aborts the request.
pub struct Pipeline {
    pub stages: Vec<Box<dyn PipelineStage>>,
}

impl Pipeline {
    /// Create a new pipeline using the builder pattern.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Run the full chain for one request.
    pub fn run(
        &self,
        ctx: &mut PipelineContext,
        img: &mut dyn ImageHandle,
        data: Option<&[u8]>,
    ) -> Result<()> {
        for stage in &self.stages {
            debug!("pipeline: running stage {}", stage.name());
            stage.run(ctx, img, data)?;
        }
        Ok(())
    }

    /// Get the number of stages in the chain.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }
}

/// Builder for assembling pipelines with a fluent API.
pub struct PipelineBuilder {
    stages: Vec<Box<dyn PipelineStage>>,
}

impl PipelineBuilder {
    /// Create a new pipeline builder.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Add the scale-on-load stage configured from `config`.
    pub fn with_scale_on_load(mut self, config: &PipelineConfig) -> Self {
        self.stages.push(Box::new(ScaleOnLoad::new(config)));
        self
    }

    /// Add a custom stage to the chain.
    pub fn with_stage<S: PipelineStage + 'static>(mut self, stage: S) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Build the pipeline with the configured stages.
    pub fn build(self) -> Pipeline {
        Pipeline {
            stages: self.stages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pix_scale::plan::ImageKind;

    struct NullHandle;

    impl ImageHandle for NullHandle {
        fn load(&mut self, _data: &[u8], _shrink: u32, _scale: f64, _orientation: u8) -> Result<()> {
            Ok(())
        }
        fn width(&self) -> u32 {
            0
        }
        fn height(&self) -> u32 {
            0
        }
    }

    struct RecordingStage {
        tag: f64,
    }

    impl PipelineStage for RecordingStage {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn run(
            &self,
            ctx: &mut PipelineContext,
            _img: &mut dyn ImageHandle,
            _data: Option<&[u8]>,
        ) -> Result<()> {
            ctx.wscale = self.tag;
            Ok(())
        }
    }

    #[test]
    fn test_stages_run_in_order() {
        let pipeline = Pipeline::builder()
            .with_stage(RecordingStage { tag: 2.0 })
            .with_stage(RecordingStage { tag: 3.0 })
            .build();

        let mut ctx = PipelineContext::new(100, 100, ImageKind::Png);
        pipeline.run(&mut ctx, &mut NullHandle, None).unwrap();

        assert_eq!(pipeline.stage_count(), 2);
        assert_eq!(ctx.wscale, 3.0);
    }

    #[test]
    fn test_builder_wires_scale_on_load() {
        let pipeline = Pipeline::builder()
            .with_scale_on_load(&PipelineConfig::default())
            .build();
        assert_eq!(pipeline.stage_count(), 1);
        assert_eq!(pipeline.stages[0].name(), "scale_on_load");
    }
}
