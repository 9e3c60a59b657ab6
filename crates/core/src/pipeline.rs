use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    error::Result,
    summarizer::Summarizer,
    transcript::{CaptionSource, get_transcript},
    types::{Segments, SummaryScope, VideoSummary},
};

/// Everything one summarization request needs, built once at startup.
pub struct SkimPipeline {
    captions: Arc<dyn CaptionSource>,
    summarizer: Summarizer,
}

impl SkimPipeline {
    pub fn new(captions: Arc<dyn CaptionSource>, summarizer: Summarizer) -> Self {
        Self {
            captions,
            summarizer,
        }
    }

    pub async fn segments(&self, video_id: &str, summary_scope: SummaryScope) -> Result<Segments> {
        get_transcript(self.captions.as_ref(), video_id, summary_scope).await
    }

    /// Fetch, segment and summarize `video_id`.
    pub async fn summarize_video(
        &self,
        video_id: &str,
        summary_scope: SummaryScope,
    ) -> Result<VideoSummary> {
        let segments = self.segments(video_id, summary_scope).await?;
        let transcript_available = segments.is_available();
        let title = self.title(video_id).await;

        let texts = segments.into_texts();
        info!(
            video_id,
            segments = texts.len(),
            transcript_available,
            "summarizing transcript"
        );
        let entries = self
            .summarizer
            .summarize_segments(&texts, video_id, summary_scope)
            .await?;

        Ok(VideoSummary {
            video_id: video_id.to_string(),
            title,
            summary_scope: summary_scope.minutes(),
            transcript_available,
            entries,
        })
    }

    async fn title(&self, video_id: &str) -> Option<String> {
        match self.captions.fetch_title(video_id).await {
            Ok(title) => title.filter(|title| !title.trim().is_empty()),
            Err(e) => {
                warn!(video_id, error = %e, "could not fetch video title");
                None
            }
        }
    }
}
