//! Error types for the generator pipeline

use crate::pipeline::StageName;
use thiserror::Error;

/// An unexpected collaborator failure, tagged with the stage it surfaced in.
///
/// Expected negative outcomes (an invalid name, a declined confirmation)
/// are terminal statuses rather than errors and never show up here.
#[derive(Debug, Error)]
#[error("{stage} stage failed: {source:#}")]
pub struct PipelineError {
    pub stage: StageName,
    #[source]
    pub source: anyhow::Error,
}

impl PipelineError {
    pub fn new(stage: StageName, source: anyhow::Error) -> Self {
        Self { stage, source }
    }
}
