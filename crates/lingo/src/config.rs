//! Translator configuration.
//!
//! Values come from code (`with_*` builders), from any serde source the
//! host already uses for its settings file, or from the environment.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Language assumed when nothing else is configured.
pub const DEFAULT_LANGUAGE: &str = "en_US";

/// Startup settings for a [`Translator`](crate::Translator).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Initial active language key.
    pub language: String,
    /// Languages whose missing translations are not reported.
    pub muted: Vec<String>,
    /// Suppress every missing-translation warning.
    pub silent: bool,
    /// Language key → display name.
    pub available: BTreeMap<String, String>,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            muted: Vec::new(),
            silent: false,
            available: BTreeMap::new(),
        }
    }
}

impl TranslatorConfig {
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    #[must_use]
    pub fn with_muted<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.muted.extend(languages.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    #[must_use]
    pub fn with_available(mut self, language: impl Into<String>, name: impl Into<String>) -> Self {
        self.available.insert(language.into(), name.into());
        self
    }

    /// Load config from environment variables.
    ///
    /// Reads:
    /// - `LINGO_LANGUAGE`: initial language key
    /// - `LINGO_MUTED_LANGUAGES`: comma-separated language keys to mute
    /// - `LINGO_SILENT`: set to "1" or "true" to silence all warnings
    ///
    /// Unset or blank variables keep their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(val) = lookup("LINGO_LANGUAGE")
            && !val.trim().is_empty()
        {
            config.language = val.trim().to_string();
        }

        if let Some(val) = lookup("LINGO_MUTED_LANGUAGES") {
            config.muted = val
                .split(',')
                .map(str::trim)
                .filter(|lang| !lang.is_empty())
                .map(String::from)
                .collect();
        }

        if let Some(val) = lookup("LINGO_SILENT") {
            let val = val.trim();
            config.silent = val == "1" || val.eq_ignore_ascii_case("true");
        }

        config
    }
}
