use axum::{
    Form,
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;
use skimtube_core::{SummaryScope, display_entries, extract_video_id};
use tracing::{Instrument, Span, error, field, info, info_span, warn};
use uuid::Uuid;

use crate::{
    error::{FlashKind, SubmitError},
    state::AppState,
    templates,
};

#[derive(Debug, Default, Deserialize)]
pub struct FormQuery {
    pub error: Option<String>,
    pub key: Option<String>,
    pub min_chunk: Option<String>,
}

/// Field names match the form inputs.
#[derive(Debug, Default, Deserialize)]
pub struct SummarizeForm {
    #[serde(rename = "Key")]
    pub key: Option<String>,
    #[serde(rename = "minChunk")]
    pub min_chunk: Option<String>,
}

pub async fn index() -> Html<String> {
    Html(templates::index_page())
}

pub async fn summarizer_form(
    State(state): State<AppState>,
    Query(query): Query<FormQuery>,
) -> Html<String> {
    let flash = query.error.as_deref().and_then(FlashKind::from_code);
    let min_chunk = query
        .min_chunk
        .unwrap_or_else(|| state.default_chunk_minutes.to_string());
    Html(templates::form_page(
        flash,
        query.key.as_deref().unwrap_or_default(),
        &min_chunk,
    ))
}

pub async fn summarizer_result(
    State(state): State<AppState>,
    Form(form): Form<SummarizeForm>,
) -> Result<Html<String>, SubmitError> {
    let request_id = Uuid::new_v4();
    let span = info_span!("summarize", %request_id, video_id = field::Empty);
    summarize(state, form).instrument(span).await
}

async fn summarize(state: AppState, form: SummarizeForm) -> Result<Html<String>, SubmitError> {
    let key = form.key.unwrap_or_default();
    let min_chunk = form.min_chunk.unwrap_or_default();
    let reject = |flash| SubmitError::new(flash, &key, &min_chunk);

    let video_id = extract_video_id(&key).map_err(|e| {
        warn!(error = %e, "rejected submission");
        reject(FlashKind::from(&e))
    })?;
    Span::current().record("video_id", video_id.as_str());

    let summary_scope = SummaryScope::parse(&min_chunk).map_err(|e| {
        warn!(error = %e, "rejected submission");
        reject(FlashKind::from(&e))
    })?;

    let summary = state
        .pipeline
        .summarize_video(&video_id, summary_scope)
        .await
        .map_err(|e| {
            error!(error = %e, "error processing video summary");
            reject(FlashKind::from(&e))
        })?;

    let entries: Vec<String> = display_entries(&summary.entries, state.html_links)
        .into_iter()
        .map(|entry| entry + "<br>")
        .collect();
    info!(
        entries = entries.len(),
        transcript_available = summary.transcript_available,
        "summary ready"
    );

    Ok(Html(templates::result_page(&summary, &entries)))
}
