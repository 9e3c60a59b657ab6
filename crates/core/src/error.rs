use thiserror::Error;

use crate::{completion::CompletionError, transcript::CaptionError};

#[derive(Error, Debug)]
pub enum SkimError {
    #[error("No valid video ID found in the provided YouTube URL: {url}")]
    InvalidUrl { url: String },

    #[error("Invalid summary scope {value:?}: expected a positive number of minutes")]
    InvalidSummaryScope { value: String },

    #[error("Transcript retrieval failed for {video_id}: {source}")]
    Transcript {
        video_id: String,
        #[source]
        source: CaptionError,
    },

    #[error("Summarization failed at segment {index}: {source}")]
    Completion {
        index: usize,
        #[source]
        source: CompletionError,
    },
}

impl SkimError {
    /// Faults caused by what the user typed, as opposed to upstream failures.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SkimError::InvalidUrl { .. } | SkimError::InvalidSummaryScope { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SkimError>;
