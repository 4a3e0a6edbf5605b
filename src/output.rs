use serde::{Deserialize, Serialize};

use crate::pipeline::{Extraction, ExtractionResult, Failure, FailureReason};

/// Language of user-facing failure messages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ko,
}

/// Video details attached to a successful response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Info {
    pub title: String,
    pub channel: String,
    pub duration: u64,
    #[serde(rename = "subtitleCount")]
    pub subtitle_count: usize,
}

/// JSON envelope handed to any wrapping transport
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<Info>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub fn from_result(result: &ExtractionResult, locale: Locale) -> Self {
        match result {
            Ok(extraction) => Self::success(extraction),
            Err(failure) => Self::failure(failure, locale),
        }
    }

    fn success(extraction: &Extraction) -> Self {
        Self {
            success: true,
            text: Some(extraction.text.clone()),
            info: Some(Info {
                title: extraction.metadata.title.clone(),
                channel: extraction.metadata.channel.clone(),
                duration: extraction.metadata.duration,
                subtitle_count: extraction.cue_count,
            }),
            error: None,
        }
    }

    fn failure(failure: &Failure, locale: Locale) -> Self {
        Self {
            success: false,
            text: None,
            info: None,
            error: Some(failure_message(failure, locale)),
        }
    }
}

/// Render the extracted text as-is
pub fn render_text(extraction: &Extraction) -> String {
    extraction.text.clone()
}

/// Render any result as the JSON envelope
pub fn render_json(result: &ExtractionResult, locale: Locale) -> eyre::Result<String> {
    let response = Response::from_result(result, locale);
    Ok(serde_json::to_string_pretty(&response)?)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Message {
    InvalidUrl,
    VideoUnavailable,
    PrivateVideo,
    CaptionsDisabled,
    NoCaptions,
    Restricted,
    Network,
    FetchFailed,
    EmptyResult,
}

// Substring hints in the raw detail win over the reason code.
fn classify_message(failure: &Failure) -> Message {
    let detail = failure.detail.as_str();

    if failure.reason == FailureReason::InvalidUrl {
        Message::InvalidUrl
    } else if detail.contains("Video unavailable") {
        Message::VideoUnavailable
    } else if detail.contains("Private video") {
        Message::PrivateVideo
    } else if detail.contains("Could not retrieve a transcript") {
        if detail.contains("Subtitles are disabled") {
            Message::CaptionsDisabled
        } else if detail.contains("No transcripts found") {
            Message::NoCaptions
        } else {
            Message::Restricted
        }
    } else if detail.contains("Connection") || detail.contains("Network") {
        Message::Network
    } else {
        match failure.reason {
            FailureReason::InvalidUrl => Message::InvalidUrl,
            FailureReason::NoTracksAvailable => Message::NoCaptions,
            FailureReason::FetchFailed => Message::FetchFailed,
            FailureReason::EmptyResult => Message::EmptyResult,
            FailureReason::ServiceUnavailable => Message::Network,
        }
    }
}

/// Human-readable explanation of a failure
pub fn failure_message(failure: &Failure, locale: Locale) -> String {
    let message = classify_message(failure);
    match locale {
        Locale::En => english(message),
        Locale::Ko => korean(message),
    }
    .to_string()
}

fn english(message: Message) -> &'static str {
    match message {
        Message::InvalidUrl => "Not a valid YouTube URL.",
        Message::VideoUnavailable => "The video is unavailable. It may have been deleted or made private.",
        Message::PrivateVideo => "This video is private.",
        Message::CaptionsDisabled => "Captions are disabled for this video.",
        Message::NoCaptions => "This video has no captions.",
        Message::Restricted => "Could not retrieve captions. The video may be restricted.",
        Message::Network => "A network problem occurred. Please try again later.",
        Message::FetchFailed => "The captions could not be downloaded.",
        Message::EmptyResult => "The captions contain no spoken text.",
    }
}

fn korean(message: Message) -> &'static str {
    match message {
        Message::InvalidUrl => "올바른 유튜브 URL이 아닙니다.",
        Message::VideoUnavailable => "비디오를 사용할 수 없습니다. 삭제되었거나 비공개일 수 있습니다.",
        Message::PrivateVideo => "비공개 비디오입니다.",
        Message::CaptionsDisabled => "이 비디오는 자막이 비활성화되어 있습니다.",
        Message::NoCaptions => "이 비디오에는 자막이 없습니다.",
        Message::Restricted => "자막을 가져올 수 없습니다. 비디오가 제한되어 있을 수 있습니다.",
        Message::Network => "네트워크 연결 문제가 발생했습니다. 잠시 후 다시 시도해주세요.",
        Message::FetchFailed => "자막 데이터를 가져오지 못했습니다.",
        Message::EmptyResult => "자막에서 추출할 텍스트가 없습니다.",
    }
}
