use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, info};

use crate::{
    error::{Result, SkimError},
    sanitize::sanitize_text,
    types::{Segments, SummaryScope, TranscriptEntry, TranscriptUnavailable},
};

#[derive(Debug, thiserror::Error)]
pub enum CaptionError {
    #[error("Transcripts are disabled for video {video_id}")]
    TranscriptsDisabled { video_id: String },

    #[error("No transcript found for video {video_id} in languages {languages:?}")]
    NoTranscriptFound {
        video_id: String,
        languages: Vec<String>,
    },

    #[error("Video {video_id} is unplayable: {reason}")]
    VideoUnplayable { video_id: String, reason: String },

    #[error("YouTube is blocking requests for video {video_id}")]
    RequestBlocked { video_id: String },

    #[error("Could not parse YouTube page data for video {video_id}")]
    Unparsable { video_id: String },

    #[error("HTTP {status} while fetching {what}")]
    Status { status: StatusCode, what: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Source of caption cues for a video ID.
#[async_trait]
pub trait CaptionSource: Send + Sync {
    /// All cues of the chosen caption track, in timeline order.
    async fn fetch_transcript(
        &self,
        video_id: &str,
    ) -> std::result::Result<Vec<TranscriptEntry>, CaptionError>;

    async fn fetch_title(
        &self,
        _video_id: &str,
    ) -> std::result::Result<Option<String>, CaptionError> {
        Ok(None)
    }
}

/// Fold cues into windows of `summary_scope` minutes.
///
/// A cue starting exactly on a window edge opens the next window. The edge
/// only advances by one scope per closed window, so after a silent gap longer
/// than the scope the windows drift away from their `index * scope` labels.
pub fn segment_cues(cues: &[TranscriptEntry], summary_scope: SummaryScope) -> Vec<String> {
    let scope = f64::from(summary_scope.minutes());
    let mut segments = Vec::new();
    let mut segment_text = String::new();
    let mut break_point = scope;

    for cue in cues {
        let sanitized = sanitize_text(&cue.text);
        if cue.start / 60.0 >= break_point {
            segments.push(segment_text.trim().to_string());
            segment_text = sanitized;
            break_point += scope;
        } else {
            segment_text.push(' ');
            segment_text.push_str(&sanitized);
        }
    }

    if !segment_text.is_empty() {
        segments.push(segment_text.trim().to_string());
    }

    segments
}

/// Fetch the transcript of `video_id` and cut it into windows.
///
/// Disabled or missing captions are not an error: they come back as
/// [`Segments::Unavailable`] so the caller can still render something.
pub async fn get_transcript(
    source: &dyn CaptionSource,
    video_id: &str,
    summary_scope: SummaryScope,
) -> Result<Segments> {
    let unavailable = |reason: TranscriptUnavailable| {
        info!(video_id, ?reason, "transcript unavailable");
        Ok(Segments::Unavailable {
            video_id: video_id.to_string(),
            reason,
        })
    };

    let cues = match source.fetch_transcript(video_id).await {
        Ok(cues) => cues,
        Err(CaptionError::TranscriptsDisabled { .. }) => {
            return unavailable(TranscriptUnavailable::Disabled);
        }
        Err(CaptionError::NoTranscriptFound { .. }) => {
            return unavailable(TranscriptUnavailable::NotFound);
        }
        Err(err) => {
            return Err(SkimError::Transcript {
                video_id: video_id.to_string(),
                source: err,
            });
        }
    };

    let segments = segment_cues(&cues, summary_scope);
    debug!(
        video_id,
        cues = cues.len(),
        segments = segments.len(),
        scope_minutes = summary_scope.minutes(),
        "transcript segmented"
    );
    for (index, segment) in segments.iter().enumerate() {
        debug!(video_id, index, chars = segment.len(), "segment: {segment}");
    }

    Ok(Segments::Timed(segments))
}
