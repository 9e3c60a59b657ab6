use std::sync::Arc;

use futures::{StreamExt, TryStreamExt, stream};
use tracing::{debug, info};

use crate::{
    completion::{CompletionRequest, CompletionService},
    error::{Result, SkimError},
    format::{create_youtube_link, display_entries},
    sanitize::sanitize_text,
    types::{SummaryEntry, SummaryScope},
};

pub const SYSTEM_ROLE_DESCRIPTION: &str = "You are a co-reference based summarization algorithm";

pub const SUMMARY_INSTRUCTION: &str =
    "Summarize the following text by returning one sentence that uses mostly words from the text itself:\n  ";

/// Turns transcript segments into one timestamped sentence each.
pub struct Summarizer {
    completion: Arc<dyn CompletionService>,
    concurrency: usize,
}

impl Summarizer {
    pub fn new(completion: Arc<dyn CompletionService>) -> Self {
        Self {
            completion,
            concurrency: 1,
        }
    }

    /// Allow up to `concurrency` completion calls in flight. Results are
    /// still returned in segment order.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Summarize every segment. The first completion failure aborts the whole
    /// batch; no partial list is returned.
    pub async fn summarize_segments(
        &self,
        segments: &[String],
        video_id: &str,
        summary_scope: SummaryScope,
    ) -> Result<Vec<SummaryEntry>> {
        // Collected first so the returned future stays `Send`.
        let requests: Vec<_> = segments
            .iter()
            .enumerate()
            .map(|(index, segment)| self.summarize_segment(index, segment, video_id, summary_scope))
            .collect();

        let entries: Vec<SummaryEntry> = stream::iter(requests)
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        info!(video_id, summaries = entries.len(), "segments summarized");
        Ok(entries)
    }

    /// Same as [`Summarizer::summarize_segments`], rendered for display.
    pub async fn summarize_video_segments(
        &self,
        segments: &[String],
        video_id: &str,
        summary_scope: SummaryScope,
        html_link: bool,
    ) -> Result<Vec<String>> {
        let entries = self
            .summarize_segments(segments, video_id, summary_scope)
            .await?;
        Ok(display_entries(&entries, html_link))
    }

    async fn summarize_segment(
        &self,
        index: usize,
        segment: &str,
        video_id: &str,
        summary_scope: SummaryScope,
    ) -> Result<SummaryEntry> {
        let completion = self
            .completion
            .complete(summary_request(segment))
            .await
            .map_err(|source| SkimError::Completion { index, source })?;

        let text = sanitize_text(&completion);
        let timestamp_minutes = summary_scope.timestamp_minutes(index);
        debug!(video_id, index, timestamp_minutes, "summary: {text}");

        Ok(SummaryEntry {
            index,
            timestamp_minutes,
            text,
            link: create_youtube_link(video_id, timestamp_minutes),
        })
    }
}

fn summary_request(segment: &str) -> CompletionRequest {
    CompletionRequest {
        system: SYSTEM_ROLE_DESCRIPTION.to_string(),
        user: format!("{SUMMARY_INSTRUCTION}{}", sanitize_text(segment)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_carries_fixed_instructions_and_sanitized_segment() {
        let request = summary_request("so, what's next?");
        assert_eq!(request.system, "You are a co-reference based summarization algorithm");
        assert_eq!(
            request.user,
            "Summarize the following text by returning one sentence that uses mostly words from the text itself:\n  so whats next"
        );
    }
}
