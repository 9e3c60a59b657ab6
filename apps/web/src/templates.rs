use html_escape::{encode_double_quoted_attribute, encode_text};
use skimtube_core::VideoSummary;

use crate::error::{FORM_PATH, FlashKind};

const FOOTER_TEXT: &str = "skimtube";

fn layout(page_title: &str, page_header: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
body {{ font-family: sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; line-height: 1.5; }}
.flash {{ background: #fde8e8; border: 1px solid #f5a3a3; padding: 0.5rem 1rem; }}
.help {{ color: #666; font-size: 0.9rem; }}
footer {{ margin-top: 3rem; color: #888; font-size: 0.8rem; }}
</style>
</head>
<body>
<header><h1>{header}</h1></header>
<main>
{body}
</main>
<footer>{footer}</footer>
</body>
</html>
"#,
        title = encode_text(page_title),
        header = encode_text(page_header),
        footer = FOOTER_TEXT,
    )
}

pub fn index_page() -> String {
    let body = format!(
        r#"<p>Get a one-sentence summary for every few minutes of a YouTube video.</p>
<p><a href="{FORM_PATH}">Summarize a video</a></p>"#
    );
    layout("Home", "YouTube Summarizer App", &body)
}

pub fn form_page(flash: Option<FlashKind>, key: &str, min_chunk: &str) -> String {
    let flash = flash
        .map(|kind| format!(r#"<p class="flash" role="alert">{}</p>"#, kind.message()))
        .unwrap_or_default();

    let body = format!(
        r#"{flash}
<form method="post" action="{FORM_PATH}">
<p>
<label for="Key">Enter the URL of the video you want to summarize. On YouTube, click the share button and copy the link. Paste it here.</label><br>
<input type="text" id="Key" name="Key" size="60" value="{key}" required><br>
<span class="help">Example: https://www.youtube.com/watch?v=utU9L8ONRbk</span>
</p>
<p>
<label for="minChunk">How many minutes do you want summarized into one sentence?</label><br>
<input type="number" id="minChunk" name="minChunk" min="1" step="1" value="{min_chunk}" required>
</p>
<p><button type="submit">Summarize</button></p>
</form>"#,
        key = encode_double_quoted_attribute(key),
        min_chunk = encode_double_quoted_attribute(min_chunk),
    );
    layout("YouTube Summarizer", "YouTube Summarizer", &body)
}

/// `entries` are display entries that already carry their own markup.
pub fn result_page(summary: &VideoSummary, entries: &[String]) -> String {
    let mut body = String::new();

    if let Some(title) = &summary.title {
        body.push_str(&format!("<h2>{}</h2>\n", encode_text(title)));
    }
    body.push_str(&format!(
        "<p class=\"help\">One sentence per {} minute(s) of video.</p>\n",
        summary.summary_scope
    ));

    body.push_str("<p>\n");
    for entry in entries {
        body.push_str(entry);
        body.push('\n');
    }
    body.push_str("</p>\n");

    body.push_str(&format!(
        r#"<p><a href="{FORM_PATH}">Go back to summarize another video</a></p>"#
    ));
    layout("Summary Results", "Summary Results", &body)
}
