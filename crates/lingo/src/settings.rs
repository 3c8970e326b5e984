//! Active language state.
//!
//! [`LanguageSettings`] is an immutable snapshot: everything one lookup
//! needs besides the request itself. [`SharedSettings`] publishes
//! snapshots for an application whose UI thread switches language while
//! other threads resolve strings.
//!
//! # Invariants
//!
//! 1. **Consistent reads**: a lookup works on one snapshot from start to
//!    finish; a concurrent language switch is seen by the next lookup,
//!    never halfway through.
//! 2. **Dictionary is shared, not copied**: snapshots hold an
//!    `Arc<Dictionary>`, so switching language does not clone tables.
//! 3. **Writers never block readers**: updates build a new snapshot and
//!    swap it in atomically via `arc-swap`.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::TranslatorConfig;
use crate::dictionary::Dictionary;

/// Snapshot of the language context a lookup runs against.
#[derive(Debug, Clone)]
pub struct LanguageSettings {
    /// Active language key, e.g. `"fr_FR"`.
    pub current: String,
    pub dictionary: Arc<Dictionary>,
    /// Languages whose missing translations are not reported.
    pub muted: BTreeSet<String>,
    /// Suppress all missing-translation warnings.
    pub silent: bool,
    /// Language key → display name, for language pickers.
    pub available: BTreeMap<String, String>,
}

impl LanguageSettings {
    /// Settings with `current` active and nothing muted.
    #[must_use]
    pub fn new(current: impl Into<String>, dictionary: impl Into<Arc<Dictionary>>) -> Self {
        Self {
            current: current.into(),
            dictionary: dictionary.into(),
            muted: BTreeSet::new(),
            silent: false,
            available: BTreeMap::new(),
        }
    }

    /// Settings described by `config`.
    #[must_use]
    pub fn from_config(config: &TranslatorConfig, dictionary: impl Into<Arc<Dictionary>>) -> Self {
        Self {
            current: config.language.clone(),
            dictionary: dictionary.into(),
            muted: config.muted.iter().cloned().collect(),
            silent: config.silent,
            available: config.available.clone(),
        }
    }

    #[must_use]
    pub fn with_muted(mut self, language: impl Into<String>) -> Self {
        self.muted.insert(language.into());
        self
    }

    #[must_use]
    pub fn with_silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    /// Whether warnings for `language_key` are suppressed.
    #[must_use]
    pub fn is_silenced(&self, language_key: &str) -> bool {
        self.silent || self.muted.contains(language_key)
    }
}

/// Atomically published [`LanguageSettings`].
///
/// # Example
///
/// ```
/// use lingo::dictionary::Dictionary;
/// use lingo::settings::{LanguageSettings, SharedSettings};
///
/// let shared = SharedSettings::new(LanguageSettings::new("en_US", Dictionary::new()));
/// let before = shared.snapshot();
/// shared.set_current("de_DE");
///
/// assert_eq!(before.current, "en_US");
/// assert_eq!(shared.snapshot().current, "de_DE");
/// ```
#[derive(Debug)]
pub struct SharedSettings {
    inner: ArcSwap<LanguageSettings>,
}

impl SharedSettings {
    #[must_use]
    pub fn new(settings: LanguageSettings) -> Self {
        Self {
            inner: ArcSwap::from_pointee(settings),
        }
    }

    /// The settings in effect right now.
    #[must_use]
    pub fn snapshot(&self) -> Arc<LanguageSettings> {
        self.inner.load_full()
    }

    /// Active language key.
    #[must_use]
    pub fn current(&self) -> String {
        self.inner.load().current.clone()
    }

    /// Switch the active language.
    pub fn set_current(&self, language: impl Into<String>) {
        let language = language.into();
        tracing::debug!(target: "lingo", language = %language, "switching language");
        self.update(|settings| settings.current = language.clone());
    }

    /// Stop reporting missing translations for `language`.
    pub fn mute(&self, language: impl Into<String>) {
        let language = language.into();
        self.update(|settings| {
            settings.muted.insert(language.clone());
        });
    }

    pub fn unmute(&self, language: &str) {
        self.update(|settings| {
            settings.muted.remove(language);
        });
    }

    pub fn set_silent(&self, silent: bool) {
        self.update(|settings| settings.silent = silent);
    }

    /// Replace the whole dictionary.
    pub fn reload(&self, dictionary: impl Into<Arc<Dictionary>>) {
        let dictionary = dictionary.into();
        tracing::debug!(
            target: "lingo",
            languages = dictionary.languages().len(),
            "reloading dictionary"
        );
        self.update(|settings| settings.dictionary = Arc::clone(&dictionary));
    }

    /// Replace every field at once.
    pub fn store(&self, settings: LanguageSettings) {
        self.inner.store(Arc::new(settings));
    }

    fn update(&self, mut edit: impl FnMut(&mut LanguageSettings)) {
        self.inner.rcu(|current| {
            let mut next = LanguageSettings::clone(current);
            edit(&mut next);
            next
        });
    }
}
