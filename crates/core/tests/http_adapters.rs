use std::net::SocketAddr;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use skimtube_core::{
    CaptionError, CaptionSource, ChatCompletionClient, CompletionError, CompletionRequest,
    CompletionService, Provider, YoutubeCaptionSource,
};
use tokio::net::TcpListener;

async fn serve(app: impl FnOnce(String) -> Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    let base = format!("http://{addr}");
    let router = app(base.clone());
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    base
}

// Fake YouTube

const WATCH_PAGE: &str = r#"<html><head><title>Ferris&amp;Co: Episode 1! - YouTube</title></head>
<body><script>ytcfg.set({"INNERTUBE_API_KEY": "fake-key_123"});</script></body></html>"#;

const TIMEDTEXT: &str = r#"<?xml version="1.0" encoding="utf-8" ?><transcript>
<text start="0" dur="4.5">welcome back</text>
<text start="65.2" dur="3.1">today we talk about &amp;amp; ownership</text>
<text start="130" dur="2">borrowing</text>
</transcript>"#;

async fn watch(Query(query): Query<Vec<(String, String)>>) -> Response {
    let video_id = query
        .iter()
        .find(|(name, _)| name == "v")
        .map(|(_, value)| value.as_str())
        .unwrap_or_default();
    match video_id {
        "blocked" => Html("<div class=\"g-recaptcha\"></div>").into_response(),
        "gone" => StatusCode::NOT_FOUND.into_response(),
        _ => Html(WATCH_PAGE).into_response(),
    }
}

async fn player(
    State(base): State<String>,
    Query(query): Query<Vec<(String, String)>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    assert!(query.contains(&("key".to_string(), "fake-key_123".to_string())));
    assert_eq!(body["context"]["client"]["clientName"], "ANDROID");

    let video_id = body["videoId"].as_str().unwrap_or_default();
    let tracks = match video_id {
        "silent" => return Json(json!({ "playabilityStatus": { "status": "OK" } })),
        "private" => {
            return Json(json!({
                "playabilityStatus": { "status": "LOGIN_REQUIRED", "reason": "This video is private" }
            }));
        }
        "german" => json!([
            { "languageCode": "de", "baseUrl": format!("{base}/api/timedtext?v=german&lang=de") }
        ]),
        _ => json!([
            { "languageCode": "en", "kind": "asr", "baseUrl": format!("{base}/api/timedtext?v=asr&fmt=srv3") },
            { "languageCode": "en", "baseUrl": format!("{base}/api/timedtext?v=manual&fmt=srv3") }
        ]),
    };

    Json(json!({
        "playabilityStatus": { "status": "OK" },
        "captions": { "playerCaptionsTracklistRenderer": { "captionTracks": tracks } }
    }))
}

async fn timedtext(Query(query): Query<Vec<(String, String)>>) -> Response {
    assert!(
        !query.iter().any(|(name, _)| name == "fmt"),
        "srv3 format should be stripped"
    );
    if query.contains(&("v".to_string(), "manual".to_string())) {
        TIMEDTEXT.into_response()
    } else {
        (StatusCode::BAD_REQUEST, "wrong track").into_response()
    }
}

async fn fake_youtube() -> YoutubeCaptionSource {
    let base = serve(|base| {
        Router::new()
            .route("/watch", get(watch))
            .route("/youtubei/v1/player", post(player))
            .route("/api/timedtext", get(timedtext))
            .with_state(base)
    })
    .await;
    YoutubeCaptionSource::new(vec!["en".to_string()])
        .unwrap()
        .with_base_url(base)
}

#[tokio::test]
async fn manual_english_track_is_fetched_and_parsed() {
    let source = fake_youtube().await;

    let cues = source.fetch_transcript("captioned").await.unwrap();

    assert_eq!(cues.len(), 3);
    assert_eq!(cues[0].text, "welcome back");
    assert_eq!(cues[1].text, "today we talk about & ownership");
    assert_eq!(cues[1].start, 65.2);
    assert_eq!(cues[2].duration, 2.0);
}

#[tokio::test]
async fn title_is_read_from_watch_page() {
    let source = fake_youtube().await;
    let title = source.fetch_title("captioned").await.unwrap();
    assert_eq!(title.as_deref(), Some("FerrisCo Episode 1"));
}

#[tokio::test]
async fn video_without_tracks_has_transcripts_disabled() {
    let source = fake_youtube().await;
    assert!(matches!(
        source.fetch_transcript("silent").await,
        Err(CaptionError::TranscriptsDisabled { ref video_id }) if video_id == "silent"
    ));
}

#[tokio::test]
async fn track_in_other_language_is_not_found() {
    let source = fake_youtube().await;
    match source.fetch_transcript("german").await {
        Err(CaptionError::NoTranscriptFound { languages, .. }) => assert_eq!(languages, vec!["en"]),
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn upstream_faults_are_reported() {
    let source = fake_youtube().await;

    assert!(matches!(
        source.fetch_transcript("blocked").await,
        Err(CaptionError::RequestBlocked { .. })
    ));
    assert!(matches!(
        source.fetch_transcript("gone").await,
        Err(CaptionError::Status { status, .. }) if status == StatusCode::NOT_FOUND
    ));
    assert!(matches!(
        source.fetch_transcript("private").await,
        Err(CaptionError::VideoUnplayable { ref reason, .. }) if reason == "This video is private"
    ));
}

// Fake chat completions

async fn chat_completions(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let auth = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    match auth {
        "Bearer good-key" => {}
        "Bearer busy-key" => return StatusCode::TOO_MANY_REQUESTS.into_response(),
        "Bearer odd-key" => return Json(json!({ "choices": [] })).into_response(),
        _ => return StatusCode::UNAUTHORIZED.into_response(),
    }

    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["role"], "user");
    let user = body["messages"][1]["content"].as_str().unwrap_or_default();
    Json(json!({
        "choices": [
            { "message": { "role": "assistant", "content": format!("{} says {user}", body["model"].as_str().unwrap_or_default()) } }
        ]
    }))
    .into_response()
}

async fn fake_completion_url() -> String {
    let base = serve(|_| Router::new().route("/v1/chat/completions", post(chat_completions))).await;
    format!("{base}/v1/chat/completions")
}

fn request() -> CompletionRequest {
    CompletionRequest {
        system: "be brief".to_string(),
        user: "hello".to_string(),
    }
}

#[tokio::test]
async fn completion_content_is_returned() {
    let client = ChatCompletionClient::new(&Provider::Openai, "good-key".to_string())
        .with_api_url(fake_completion_url().await)
        .with_model("test-model");

    let content = client.complete(request()).await.unwrap();

    assert_eq!(content, "test-model says hello");
}

#[tokio::test]
async fn completion_faults_are_classified() {
    let url = fake_completion_url().await;
    let client = |key: &str| {
        ChatCompletionClient::new(&Provider::Grok, key.to_string()).with_api_url(url.clone())
    };

    assert!(matches!(
        client("bad-key").complete(request()).await,
        Err(CompletionError::Unauthorized { status }) if status == StatusCode::UNAUTHORIZED
    ));
    assert!(matches!(
        client("busy-key").complete(request()).await,
        Err(CompletionError::RateLimited)
    ));
    assert!(matches!(
        client("odd-key").complete(request()).await,
        Err(CompletionError::InvalidResponse(_))
    ));
}

#[test]
fn provider_defaults_pick_the_model() {
    let client = ChatCompletionClient::new(&Provider::Gemini, String::new());
    assert_eq!(client.model(), "gemini-2.5-flash");
}
