//! Rewrites YouTube links in board content into embedded players.
//!
//! Two passes: anchor elements whose href is a YouTube link are replaced
//! whole, then bare watch or short URLs left in the text are replaced.
//! Links without a recognisable 11-character video id are left alone.

use regex::Captures;

use crate::patterns;

pub const EMBED_WIDTH: u32 = 560;
pub const EMBED_HEIGHT: u32 = 315;

fn iframe(video_id: &str) -> String {
    format!(
        "<iframe src=\"https://www.youtube.com/embed/{video_id}\" width=\"{EMBED_WIDTH}\" height=\"{EMBED_HEIGHT}\" frameborder=\"0\" allowfullscreen></iframe>"
    )
}

fn video_id(href: &str) -> Option<&str> {
    patterns::youtube_video_id()?
        .captures(href)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Replace YouTube links in `content` with iframe embeds.
pub fn embed_youtube(content: &str) -> String {
    if content.trim().is_empty() {
        return content.to_string();
    }

    let mut html = content.to_string();

    if let Some(anchor) = patterns::youtube_anchor() {
        html = anchor
            .replace_all(&html, |caps: &Captures<'_>| match video_id(&caps[1]) {
                Some(id) => iframe(id),
                None => caps[0].to_string(),
            })
            .into_owned();
    }

    if let Some(bare) = patterns::youtube_url() {
        html = bare
            .replace_all(&html, |caps: &Captures<'_>| iframe(&caps[1]))
            .into_owned();
    }

    html
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "dQw4w9WgXcQ";

    #[test]
    fn bare_watch_url_becomes_iframe() {
        let out = embed_youtube(&format!("보세요 https://www.youtube.com/watch?v={ID} 끝"));
        assert_eq!(out, format!("보세요 {} 끝", iframe(ID)));
    }

    #[test]
    fn short_url_becomes_iframe() {
        let out = embed_youtube(&format!("https://youtu.be/{ID}"));
        assert_eq!(out, iframe(ID));
    }

    #[test]
    fn anchor_is_replaced_whole() {
        let out = embed_youtube(&format!(
            "<p><a href=\"https://youtu.be/{ID}\" target=\"_blank\">https://youtu.be/{ID}</a></p>"
        ));
        assert_eq!(out, format!("<p>{}</p>", iframe(ID)));
    }

    #[test]
    fn anchor_without_video_id_is_kept() {
        let input = "<a href=\"https://www.youtube.com/channel/abc\">channel</a>";
        assert_eq!(embed_youtube(input), input);
    }

    #[test]
    fn iframe_has_fixed_size() {
        let out = embed_youtube(&format!("https://youtu.be/{ID}"));
        assert!(out.contains("width=\"560\""));
        assert!(out.contains("height=\"315\""));
    }

    #[test]
    fn blank_content_is_untouched() {
        assert_eq!(embed_youtube(""), "");
        assert_eq!(embed_youtube("  "), "  ");
        assert_eq!(embed_youtube("plain text"), "plain text");
    }
}
