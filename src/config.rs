use std::path::PathBuf;

use eyre::Result;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::normalize::{DEFAULT_EXCLUDE_MARKERS, Normalizer};
use crate::output::Locale;
use crate::select::{LanguagePolicy, TrackSelector};

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Preferred caption languages, highest priority first
    pub languages: Option<Vec<String>>,
    /// Regional variants accepted for auto-generated tracks
    pub variant_languages: Option<Vec<String>>,
    pub translate_to: Option<String>,
    /// Cue texts treated as non-speech
    pub exclude_markers: Option<Vec<String>>,
    pub timeout_secs: Option<u64>,
    pub locale: Option<Locale>,
    pub default_format: Option<String>,
}

impl Config {
    /// Load config from ~/.config/yttext/config.toml if it exists
    pub fn load() -> Result<Self> {
        let path = config_path();
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }

    pub fn language_policy(&self) -> LanguagePolicy {
        let defaults = LanguagePolicy::default();
        LanguagePolicy {
            languages: self.languages.clone().unwrap_or(defaults.languages),
            variant_languages: self.variant_languages.clone().unwrap_or(defaults.variant_languages),
            translate_to: self.translate_to.clone().unwrap_or(defaults.translate_to),
        }
    }

    pub fn selector(&self) -> TrackSelector {
        TrackSelector::new(self.language_policy())
    }

    pub fn normalizer(&self) -> Normalizer {
        let markers = self
            .exclude_markers
            .clone()
            .unwrap_or_else(|| DEFAULT_EXCLUDE_MARKERS.iter().map(|s| s.to_string()).collect());
        Normalizer::new(markers)
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("yttext")
        .join("config.toml")
}
