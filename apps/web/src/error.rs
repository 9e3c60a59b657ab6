use axum::response::{IntoResponse, Redirect, Response};
use skimtube_core::SkimError;
use url::form_urlencoded;

pub const FORM_PATH: &str = "/YoutubeSummarizer";

/// What the form page tells the user after a failed submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    InvalidUrl,
    InvalidChunk,
    Failed,
}

impl FlashKind {
    pub fn code(self) -> &'static str {
        match self {
            FlashKind::InvalidUrl => "invalid_url",
            FlashKind::InvalidChunk => "invalid_chunk",
            FlashKind::Failed => "failed",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "invalid_url" => Some(FlashKind::InvalidUrl),
            "invalid_chunk" => Some(FlashKind::InvalidChunk),
            "failed" => Some(FlashKind::Failed),
            _ => None,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            FlashKind::InvalidUrl => "No valid video ID found in the provided YouTube URL.",
            FlashKind::InvalidChunk => "Minutes per summary must be a positive whole number.",
            FlashKind::Failed => {
                "An unexpected error occurred while processing your request. Please try again later."
            }
        }
    }
}

impl From<&SkimError> for FlashKind {
    fn from(error: &SkimError) -> Self {
        match error {
            SkimError::InvalidUrl { .. } => FlashKind::InvalidUrl,
            SkimError::InvalidSummaryScope { .. } => FlashKind::InvalidChunk,
            _ => FlashKind::Failed,
        }
    }
}

/// A failed submission. Sends the user back to the form with the values
/// they typed.
#[derive(Debug)]
pub struct SubmitError {
    pub flash: FlashKind,
    pub key: String,
    pub min_chunk: String,
}

impl SubmitError {
    pub fn new(flash: FlashKind, key: &str, min_chunk: &str) -> Self {
        Self {
            flash,
            key: key.to_string(),
            min_chunk: min_chunk.to_string(),
        }
    }

    pub fn location(&self) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("error", self.flash.code())
            .append_pair("key", &self.key)
            .append_pair("min_chunk", &self.min_chunk)
            .finish();
        format!("{FORM_PATH}?{query}")
    }
}

impl IntoResponse for SubmitError {
    fn into_response(self) -> Response {
        Redirect::to(&self.location()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{StatusCode, header::LOCATION};

    use super::*;

    #[test]
    fn codes_round_trip() {
        for kind in [FlashKind::InvalidUrl, FlashKind::InvalidChunk, FlashKind::Failed] {
            assert_eq!(FlashKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(FlashKind::from_code("<script>"), None);
    }

    #[test]
    fn validation_errors_get_specific_flashes() {
        let url = SkimError::InvalidUrl {
            url: "nope".to_string(),
        };
        let scope = SkimError::InvalidSummaryScope {
            value: "0".to_string(),
        };
        assert_eq!(FlashKind::from(&url), FlashKind::InvalidUrl);
        assert_eq!(FlashKind::from(&scope), FlashKind::InvalidChunk);
    }

    #[test]
    fn redirect_preserves_submitted_values() {
        let error = SubmitError::new(
            FlashKind::InvalidChunk,
            "https://www.youtube.com/watch?v=abc&t=1",
            "-3",
        );
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[LOCATION],
            "/YoutubeSummarizer?error=invalid_chunk&key=https%3A%2F%2Fwww.youtube.com%2Fwatch%3Fv%3Dabc%26t%3D1&min_chunk=-3"
        );
    }
}
