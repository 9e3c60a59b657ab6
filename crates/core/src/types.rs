use std::{fmt, num::NonZeroU32};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SkimError};

/// One caption cue as delivered by the caption source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// Window length in minutes used both to bucket cues and to label summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryScope(NonZeroU32);

impl SummaryScope {
    pub fn new(minutes: u32) -> Option<Self> {
        NonZeroU32::new(minutes).map(Self)
    }

    /// Parse a form value such as `" 3 "` or `"+3"`. Zero, negatives and
    /// non-integers are rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        raw.trim()
            .parse::<i64>()
            .ok()
            .and_then(|minutes| u32::try_from(minutes).ok())
            .and_then(Self::new)
            .ok_or_else(|| SkimError::InvalidSummaryScope {
                value: raw.to_string(),
            })
    }

    pub fn minutes(self) -> u32 {
        self.0.get()
    }

    /// Label of the `index`-th window, in minutes from the start of the video.
    pub fn timestamp_minutes(self, index: usize) -> u64 {
        index as u64 * u64::from(self.minutes())
    }
}

impl fmt::Display for SummaryScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptUnavailable {
    Disabled,
    NotFound,
}

impl TranscriptUnavailable {
    pub fn notice(self, video_id: &str) -> String {
        match self {
            TranscriptUnavailable::Disabled => {
                format!("Transcripts are disabled for the video with ID '{video_id}'.")
            }
            TranscriptUnavailable::NotFound => {
                format!("No transcript found for the video with ID '{video_id}'.")
            }
        }
    }
}

/// Outcome of segmenting a video's transcript.
#[derive(Debug, Clone, PartialEq)]
pub enum Segments {
    Timed(Vec<String>),
    /// The caption source had nothing usable. Summarization still runs on the
    /// single explanatory sentence returned by [`Segments::into_texts`].
    Unavailable {
        video_id: String,
        reason: TranscriptUnavailable,
    },
}

impl Segments {
    pub fn is_available(&self) -> bool {
        matches!(self, Segments::Timed(_))
    }

    pub fn into_texts(self) -> Vec<String> {
        match self {
            Segments::Timed(segments) => segments,
            Segments::Unavailable { video_id, reason } => vec![reason.notice(&video_id)],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryEntry {
    pub index: usize,
    pub timestamp_minutes: u64,
    pub text: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoSummary {
    pub video_id: String,
    pub title: Option<String>,
    pub summary_scope: u32,
    pub transcript_available: bool,
    pub entries: Vec<SummaryEntry>,
}
