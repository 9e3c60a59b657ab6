use html_escape::encode_double_quoted_attribute;

use crate::types::SummaryEntry;

/// Link into the video at `timestamp_in_minutes`.
pub fn create_youtube_link(video_id: &str, timestamp_in_minutes: u64) -> String {
    format!(
        "https://youtu.be/{}?t={}",
        video_id,
        timestamp_in_minutes * 60
    )
}

/// Render a summary as `"<minutes>: <summary>"`, optionally with the label
/// wrapped in an anchor pointing at that moment of the video.
pub fn format_display_entry(entry: &SummaryEntry, html_link: bool) -> String {
    if html_link {
        format!(
            "<a href=\"{}\">{}:</a> {}",
            encode_double_quoted_attribute(&entry.link),
            entry.timestamp_minutes,
            entry.text
        )
    } else {
        format!("{}: {}", entry.timestamp_minutes, entry.text)
    }
}

/// [`format_display_entry`] over a whole summary, in order.
pub fn display_entries(entries: &[SummaryEntry], html_link: bool) -> Vec<String> {
    entries
        .iter()
        .map(|entry| format_display_entry(entry, html_link))
        .collect()
}
