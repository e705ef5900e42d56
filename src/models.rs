// src/models.rs
use crate::runner::GenerationResult;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// The code a user submitted together with what came out of the pipeline.
#[derive(Serialize, Clone, Debug)]
pub struct Submission {
    pub source: String,
    pub result: GenerationResult,
    pub submitted_at: DateTime<Utc>,
}

impl Submission {
    pub fn new(source: String, result: GenerationResult) -> Self {
        Self {
            source,
            result,
            submitted_at: Utc::now(),
        }
    }
}
