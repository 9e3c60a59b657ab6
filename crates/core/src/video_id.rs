use url::{ParseError, Url};

use crate::error::{Result, SkimError};

const SHORT_LINK_HOST: &str = "youtu.be";

/// Extract the video ID from a watch, short-link, embed or shorts URL.
///
/// The ID is returned as found; it is not checked against YouTube's ID
/// alphabet, so a well-formed URL pointing at a missing video only fails once
/// the caption source is asked for it.
pub fn extract_video_id(youtube_url: &str) -> Result<String> {
    let invalid = || SkimError::InvalidUrl {
        url: youtube_url.to_string(),
    };
    let url = parse_lenient(youtube_url.trim()).ok_or_else(invalid)?;

    if let Some(id) = url
        .query_pairs()
        .find_map(|(key, value)| (key == "v" && !value.is_empty()).then(|| value.into_owned()))
    {
        return Ok(id);
    }

    if url.host_str() == Some(SHORT_LINK_HOST) {
        let id = url.path().trim_start_matches('/');
        if !id.is_empty() {
            return Ok(id.to_string());
        }
    }

    let segments: Vec<&str> = url.path().split('/').collect();
    for marker in ["embed", "shorts"] {
        if segments.contains(&marker) {
            if let Some(id) = segments.last().filter(|id| !id.is_empty()) {
                return Ok(id.to_string());
            }
        }
    }

    Err(invalid())
}

fn parse_lenient(raw: &str) -> Option<Url> {
    match Url::parse(raw) {
        Ok(url) => Some(url),
        Err(ParseError::RelativeUrlWithoutBase) => Url::parse(&format!("https://{raw}")).ok(),
        Err(_) => None,
    }
}
