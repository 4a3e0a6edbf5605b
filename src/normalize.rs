use std::sync::LazyLock;

use regex::Regex;

use crate::CaptionCue;

/// Non-speech annotations dropped by default
pub const DEFAULT_EXCLUDE_MARKERS: [&str; 4] = ["[음악]", "[Music]", "[Applause]", "[박수]"];

/// Sentences at or below this many characters, terminator included, are noise
const MIN_SENTENCE_CHARS: usize = 3;

static SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]\s+").unwrap());

/// Turns a cue list into sentence-per-paragraph prose
#[derive(Debug, Clone)]
pub struct Normalizer {
    exclude: Vec<String>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDE_MARKERS.iter().map(|s| s.to_string()).collect())
    }
}

impl Normalizer {
    pub fn new(exclude: Vec<String>) -> Self {
        Self { exclude }
    }

    fn is_excluded(&self, text: &str) -> bool {
        self.exclude.iter().any(|m| m == text)
    }

    /// Normalize cues into sentences separated by blank lines.
    ///
    /// Returns an empty string when no cue carries speech.
    pub fn normalize(&self, cues: &[CaptionCue]) -> String {
        // A dropped cue closes the current run, so speech on either side of a
        // gap never merges into one sentence.
        let mut runs: Vec<Vec<String>> = vec![Vec::new()];
        for cue in cues {
            let text = cue.text.trim();
            if text.is_empty() || self.is_excluded(text) {
                if runs.last().is_some_and(|run| !run.is_empty()) {
                    runs.push(Vec::new());
                }
                continue;
            }
            if let Some(run) = runs.last_mut() {
                run.push(collapse_whitespace(text));
            }
        }

        runs.iter()
            .filter(|run| !run.is_empty())
            .map(|run| run.join(" "))
            .flat_map(|text| {
                split_sentences(&text)
                    .into_iter()
                    .filter_map(finish_sentence)
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut last = 0;
    for m in SENTENCE_END.find_iter(text) {
        // terminators are single-byte ASCII
        sentences.push(&text[last..m.start() + 1]);
        last = m.end();
    }
    sentences.push(&text[last..]);
    sentences
}

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

fn finish_sentence(unit: &str) -> Option<String> {
    let unit = unit.trim();
    if unit.chars().count() <= MIN_SENTENCE_CHARS {
        return None;
    }
    if unit.ends_with(is_terminator) {
        Some(unit.to_string())
    } else {
        Some(format!("{unit}."))
    }
}
