//! Skimtube Core Library
//!
//! Fetches a YouTube caption track, slices it into fixed-length time windows
//! and asks a chat-completion model for one sentence per window.

pub mod completion;
pub mod error;
pub mod format;
pub mod pipeline;
pub mod provider;
pub mod sanitize;
pub mod summarizer;
pub mod transcript;
pub mod types;
pub mod video_id;
pub mod youtube;

// Re-export commonly used items at crate root
pub use completion::{ChatCompletionClient, CompletionError, CompletionRequest, CompletionService};
pub use error::{Result, SkimError};
pub use format::{create_youtube_link, display_entries, format_display_entry};
pub use pipeline::SkimPipeline;
pub use provider::{Provider, ProviderConfig, ProviderError};
pub use sanitize::sanitize_text;
pub use summarizer::Summarizer;
pub use transcript::{CaptionError, CaptionSource, get_transcript, segment_cues};
pub use types::{
    Segments, SummaryEntry, SummaryScope, TranscriptEntry, TranscriptUnavailable, VideoSummary,
};
pub use video_id::extract_video_id;
pub use youtube::YoutubeCaptionSource;
