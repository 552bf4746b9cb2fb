//! Compiled regular expressions shared across modules.
//!
//! Each pattern is compiled on first use. The patterns are constants, but
//! a failed compile is logged and reported as `None` rather than panicking.

use std::sync::OnceLock;

use regex::Regex;

fn compiled(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| {
        Regex::new(pattern)
            .map_err(|e| tracing::error!(pattern, error = %e, "invalid regex"))
            .ok()
    })
    .as_ref()
}

/// `/board/{digits}/update`, capturing the digits.
pub fn board_update_path() -> Option<&'static Regex> {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    compiled(&CELL, r"/board/(\d+)/update")
}

/// An anchor element whose href points at YouTube.
pub fn youtube_anchor() -> Option<&'static Regex> {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    compiled(
        &CELL,
        r#"(?is)<a\s[^>]*?href\s*=\s*["']([^"']*(?:youtube\.com|youtu\.be)[^"']*)["'][^>]*>.*?</a>"#,
    )
}

/// A bare YouTube watch or short link, capturing the 11-character video id.
pub fn youtube_url() -> Option<&'static Regex> {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    compiled(
        &CELL,
        r"https?://(?:www\.)?(?:youtube\.com/watch\?v=|youtu\.be/)([A-Za-z0-9_-]{11})",
    )
}

/// The video id inside any YouTube link, with or without a scheme.
pub fn youtube_video_id() -> Option<&'static Regex> {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    compiled(
        &CELL,
        r"(?:youtube\.com/watch\?v=|youtu\.be/)([A-Za-z0-9_-]{11})",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_patterns_compile() {
        assert!(board_update_path().is_some());
        assert!(youtube_anchor().is_some());
        assert!(youtube_url().is_some());
        assert!(youtube_video_id().is_some());
    }

    #[test]
    fn board_update_path_captures_id() {
        let re = board_update_path().unwrap();
        let caps = re.captures("/board/42/update").unwrap();
        assert_eq!(&caps[1], "42");
        assert!(re.captures("/board/abc/update").is_none());
    }
}
