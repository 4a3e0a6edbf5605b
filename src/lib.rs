pub mod config;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod select;
pub mod service;
pub mod youtube;

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

pub use pipeline::{Extraction, ExtractionResult, Extractor, Failure, FailureReason};

/// Canonical identifier of a video on the platform
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single timed caption cue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaptionCue {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

impl CaptionCue {
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start,
            duration,
        }
    }
}

/// One selectable caption track advertised for a video
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptionTrack {
    pub language_code: String,
    pub is_generated: bool,
    pub is_translatable: bool,
    /// Timedtext endpoint for this track
    pub base_url: String,
    /// Target language when this descriptor is a machine translation
    pub translated_to: Option<String>,
}

impl CaptionTrack {
    /// Language the cues will be delivered in
    pub fn effective_language(&self) -> &str {
        self.translated_to.as_deref().unwrap_or(&self.language_code)
    }
}

impl std::fmt::Display for CaptionTrack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = if self.is_generated { "auto" } else { "manual" };
        match &self.translated_to {
            Some(target) => write!(f, "{} ({kind}) -> {target}", self.language_code),
            None => write!(f, "{} ({kind})", self.language_code),
        }
    }
}

/// Display metadata for a video
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoMetadata {
    pub video_id: VideoId,
    pub title: String,
    pub channel: String,
    pub duration: u64,
}

impl VideoMetadata {
    /// Metadata used when the lookup fails
    pub fn placeholder(video_id: &VideoId) -> Self {
        Self {
            video_id: video_id.clone(),
            title: "unknown title".to_string(),
            channel: "unknown channel".to_string(),
            duration: 0,
        }
    }
}

// The capture runs up to the first '&', newline, '?' or '#'.
static URL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"youtube\.com/watch\?(?:[^#\n]*?&)?v=([^&\n?#]+)",
        r"youtu\.be/([^&\n?#]+)",
        r"youtube(?:-nocookie)?\.com/embed/([^&\n?#]+)",
        r"youtube\.com/live/([^&\n?#]+)",
        r"youtube\.com/shorts/([^&\n?#]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Extract the video ID from the supported YouTube URL shapes
pub fn extract_video_id(input: &str) -> Option<VideoId> {
    let input = input.trim();

    URL_PATTERNS
        .iter()
        .find_map(|re| re.captures(input))
        .map(|caps| caps[1].to_string())
        .filter(|id| !id.is_empty())
        .map(VideoId)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> Option<VideoId> {
        Some(VideoId(s.to_string()))
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"), id("dQw4w9WgXcQ"));
    }

    #[test]
    fn test_watch_url_with_extra_params() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=120"),
            id("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_watch_url_v_not_first() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ#t=3"),
            id("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_all_shapes_agree() {
        let urls = [
            "https://www.youtube.com/watch?v=abc123XYZ_-",
            "https://m.youtube.com/watch?v=abc123XYZ_-",
            "https://youtu.be/abc123XYZ_-",
            "https://youtu.be/abc123XYZ_-?si=tracking",
            "https://www.youtube.com/embed/abc123XYZ_-",
            "https://www.youtube.com/live/abc123XYZ_-?feature=share",
            "https://www.youtube.com/shorts/abc123XYZ_-",
        ];
        for url in urls {
            assert_eq!(extract_video_id(url), id("abc123XYZ_-"), "{url}");
        }
    }

    #[test]
    fn test_id_stops_at_newline() {
        assert_eq!(extract_video_id("https://youtu.be/dQw4w9WgXcQ\nmore"), id("dQw4w9WgXcQ"));
    }

    #[test]
    fn test_unrecognized_url() {
        assert_eq!(extract_video_id("https://example.com/video"), None);
    }

    #[test]
    fn test_missing_id() {
        assert_eq!(extract_video_id("https://youtu.be/"), None);
        assert_eq!(extract_video_id("https://www.youtube.com/watch?v=&t=1"), None);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(extract_video_id(""), None);
    }

    #[test]
    fn test_whitespace_trimming() {
        assert_eq!(extract_video_id("  https://youtu.be/dQw4w9WgXcQ  "), id("dQw4w9WgXcQ"));
    }

    #[test]
    fn test_placeholder_metadata() {
        let vid = VideoId("xyz".to_string());
        let meta = VideoMetadata::placeholder(&vid);
        assert_eq!(meta.video_id, vid);
        assert_eq!(meta.title, "unknown title");
        assert_eq!(meta.channel, "unknown channel");
        assert_eq!(meta.duration, 0);
    }

    #[test]
    fn test_track_display() {
        let track = CaptionTrack {
            language_code: "en".to_string(),
            is_generated: true,
            is_translatable: true,
            base_url: String::new(),
            translated_to: Some("ko".to_string()),
        };
        assert_eq!(track.to_string(), "en (auto) -> ko");
        assert_eq!(track.effective_language(), "ko");
    }
}
