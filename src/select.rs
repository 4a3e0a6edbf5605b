use log::debug;
use serde::{Deserialize, Serialize};

use crate::CaptionTrack;

/// Language preferences driving track selection and translation fallback
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LanguagePolicy {
    /// Preferred languages, highest priority first
    pub languages: Vec<String>,
    /// Regional variants accepted for auto-generated tracks only
    pub variant_languages: Vec<String>,
    /// Target language when a fetched track has to be machine translated
    pub translate_to: String,
}

impl Default for LanguagePolicy {
    fn default() -> Self {
        Self {
            languages: vec!["ko".to_string(), "en".to_string()],
            variant_languages: vec!["en-US".to_string(), "en-GB".to_string()],
            translate_to: "ko".to_string(),
        }
    }
}

/// Selection tiers, evaluated in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    ManualPreferred,
    GeneratedPreferred,
    GeneratedVariant,
    FirstAvailable,
}

impl Tier {
    pub const ORDER: [Tier; 4] = [
        Tier::ManualPreferred,
        Tier::GeneratedPreferred,
        Tier::GeneratedVariant,
        Tier::FirstAvailable,
    ];
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::ManualPreferred => write!(f, "manual-preferred"),
            Tier::GeneratedPreferred => write!(f, "generated-preferred"),
            Tier::GeneratedVariant => write!(f, "generated-variant"),
            Tier::FirstAvailable => write!(f, "first-available"),
        }
    }
}

/// Deterministic caption track picker
#[derive(Debug, Clone, Default)]
pub struct TrackSelector {
    policy: LanguagePolicy,
}

impl TrackSelector {
    pub fn new(policy: LanguagePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &LanguagePolicy {
        &self.policy
    }

    /// Pick one track, or `None` when the video exposes no tracks
    pub fn select<'a>(&self, tracks: &'a [CaptionTrack]) -> Option<&'a CaptionTrack> {
        Tier::ORDER.iter().find_map(|&tier| {
            let track = self.apply(tier, tracks)?;
            debug!("Selected caption track {track} via {tier}");
            Some(track)
        })
    }

    fn apply<'a>(&self, tier: Tier, tracks: &'a [CaptionTrack]) -> Option<&'a CaptionTrack> {
        match tier {
            Tier::ManualPreferred => find_by_language(tracks, &self.policy.languages, false),
            Tier::GeneratedPreferred => find_by_language(tracks, &self.policy.languages, true),
            Tier::GeneratedVariant => find_by_language(tracks, &self.policy.variant_languages, true),
            Tier::FirstAvailable => tracks.first(),
        }
    }
}

// Language list order decides, not track enumeration order.
fn find_by_language<'a>(tracks: &'a [CaptionTrack], languages: &[String], generated: bool) -> Option<&'a CaptionTrack> {
    languages.iter().find_map(|lang| {
        tracks
            .iter()
            .find(|t| t.is_generated == generated && t.language_code == *lang)
    })
}
