use std::sync::LazyLock;

use async_trait::async_trait;
use html_escape::decode_html_entities;
use regex::Regex;
use reqwest::{
    StatusCode,
    header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue},
};
use tracing::debug;

use crate::{
    sanitize::sanitize_text,
    transcript::{CaptionError, CaptionSource},
    types::TranscriptEntry,
};

const DEFAULT_BASE_URL: &str = "https://www.youtube.com";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const INNERTUBE_CLIENT_NAME: &str = "ANDROID";
const INNERTUBE_CLIENT_VERSION: &str = "20.10.38";

static INNERTUBE_API_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#).expect("api key pattern is valid")
});
static TEXT_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<text\b([^>]*?)>(.*?)</text>").expect("text element pattern is valid")
});
static ATTRIBUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\b(start|dur)="([^"]*)""#).expect("attribute pattern is valid"));
static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("markup pattern is valid"));
static PAGE_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<title>(.*?)</title>").expect("title pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq)]
struct CaptionTrack {
    language_code: String,
    base_url: String,
    is_generated: bool,
}

/// Caption source backed by YouTube's watch page and player API.
pub struct YoutubeCaptionSource {
    client: reqwest::Client,
    base_url: String,
    languages: Vec<String>,
}

impl YoutubeCaptionSource {
    /// `languages` is the preference order of caption language codes;
    /// an empty list means English.
    pub fn new(languages: Vec<String>) -> Result<Self, CaptionError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US"));

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        let languages = if languages.is_empty() {
            vec!["en".to_string()]
        } else {
            languages
        };

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            languages,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn fetch_watch_page(&self, video_id: &str) -> Result<String, CaptionError> {
        let response = self
            .client
            .get(format!("{}/watch", self.base_url))
            .query(&[("v", video_id)])
            .send()
            .await?;
        check_status(response.status(), video_id, "watch page")?;
        Ok(response.text().await?)
    }

    async fn fetch_player(
        &self,
        video_id: &str,
        api_key: &str,
    ) -> Result<serde_json::Value, CaptionError> {
        let response = self
            .client
            .post(format!("{}/youtubei/v1/player", self.base_url))
            .query(&[("key", api_key)])
            .json(&serde_json::json!({
                "context": {
                    "client": {
                        "clientName": INNERTUBE_CLIENT_NAME,
                        "clientVersion": INNERTUBE_CLIENT_VERSION,
                    }
                },
                "videoId": video_id,
            }))
            .send()
            .await?;
        check_status(response.status(), video_id, "player data")?;
        Ok(response.json().await?)
    }

    async fn fetch_timedtext(
        &self,
        video_id: &str,
        track: &CaptionTrack,
    ) -> Result<String, CaptionError> {
        let response = self.client.get(&track.base_url).send().await?;
        check_status(response.status(), video_id, "caption track")?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl CaptionSource for YoutubeCaptionSource {
    async fn fetch_transcript(&self, video_id: &str) -> Result<Vec<TranscriptEntry>, CaptionError> {
        let html = self.fetch_watch_page(video_id).await?;
        if html.contains("g-recaptcha") {
            return Err(CaptionError::RequestBlocked {
                video_id: video_id.to_string(),
            });
        }
        let api_key = extract_innertube_api_key(&html).ok_or_else(|| CaptionError::Unparsable {
            video_id: video_id.to_string(),
        })?;

        let player = self.fetch_player(video_id, &api_key).await?;
        let tracks = caption_tracks(video_id, &player)?;
        let track = select_track(&tracks, &self.languages).ok_or_else(|| {
            CaptionError::NoTranscriptFound {
                video_id: video_id.to_string(),
                languages: self.languages.clone(),
            }
        })?;
        debug!(
            video_id,
            language = %track.language_code,
            generated = track.is_generated,
            "caption track selected"
        );

        let xml = self.fetch_timedtext(video_id, track).await?;
        Ok(parse_timedtext(&xml))
    }

    async fn fetch_title(&self, video_id: &str) -> Result<Option<String>, CaptionError> {
        let html = self.fetch_watch_page(video_id).await?;
        Ok(extract_title(&html))
    }
}

fn check_status(status: StatusCode, video_id: &str, what: &str) -> Result<(), CaptionError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(CaptionError::RequestBlocked {
            video_id: video_id.to_string(),
        });
    }
    if !status.is_success() {
        return Err(CaptionError::Status {
            status,
            what: format!("{what} for {video_id}"),
        });
    }
    Ok(())
}

fn extract_innertube_api_key(html: &str) -> Option<String> {
    INNERTUBE_API_KEY
        .captures(html)
        .and_then(|captures| captures.get(1))
        .map(|key| key.as_str().to_string())
}

fn assert_playable(video_id: &str, player: &serde_json::Value) -> Result<(), CaptionError> {
    let Some(playability) = player.get("playabilityStatus") else {
        return Ok(());
    };
    let status = playability["status"].as_str().unwrap_or("OK");
    if status == "OK" {
        return Ok(());
    }

    let reason = playability["reason"].as_str().unwrap_or(status).to_string();
    if status == "LOGIN_REQUIRED" && reason.contains("not a bot") {
        return Err(CaptionError::RequestBlocked {
            video_id: video_id.to_string(),
        });
    }
    Err(CaptionError::VideoUnplayable {
        video_id: video_id.to_string(),
        reason,
    })
}

fn caption_tracks(
    video_id: &str,
    player: &serde_json::Value,
) -> Result<Vec<CaptionTrack>, CaptionError> {
    assert_playable(video_id, player)?;

    let tracks: Vec<CaptionTrack> = player["captions"]["playerCaptionsTracklistRenderer"]["captionTracks"]
        .as_array()
        .map(|tracks| {
            tracks
                .iter()
                .filter_map(|track| {
                    Some(CaptionTrack {
                        language_code: track["languageCode"].as_str()?.to_string(),
                        base_url: track["baseUrl"].as_str()?.replace("&fmt=srv3", ""),
                        is_generated: track["kind"].as_str() == Some("asr"),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    if tracks.is_empty() {
        return Err(CaptionError::TranscriptsDisabled {
            video_id: video_id.to_string(),
        });
    }
    Ok(tracks)
}

/// First requested language wins; within a language a manually created
/// track beats an auto-generated one.
fn select_track<'a>(tracks: &'a [CaptionTrack], languages: &[String]) -> Option<&'a CaptionTrack> {
    languages.iter().find_map(|language| {
        tracks
            .iter()
            .filter(|track| &track.language_code == language)
            .min_by_key(|track| track.is_generated)
    })
}

fn parse_timedtext(xml: &str) -> Vec<TranscriptEntry> {
    TEXT_ELEMENT
        .captures_iter(xml)
        .filter_map(|element| {
            let mut start = None;
            let mut duration = 0.0;
            for attribute in ATTRIBUTE.captures_iter(&element[1]) {
                match &attribute[1] {
                    "start" => start = attribute[2].parse::<f64>().ok(),
                    _ => duration = attribute[2].parse::<f64>().unwrap_or(0.0),
                }
            }

            let decoded = decode_html_entities(&element[2]);
            let stripped = MARKUP_TAG.replace_all(&decoded, "");
            let text = decode_html_entities(&stripped).into_owned();

            Some(TranscriptEntry {
                text,
                start: start?,
                duration,
            })
        })
        .collect()
}

fn extract_title(html: &str) -> Option<String> {
    let raw = PAGE_TITLE.captures(html)?.get(1)?.as_str();
    let title = decode_html_entities(raw).replace(" - YouTube", "");
    let title = sanitize_text(&title).trim().to_string();
    (!title.is_empty()).then_some(title)
}
