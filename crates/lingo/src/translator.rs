//! Application-facing translator.
//!
//! [`Translator`] pairs published [`SharedSettings`] with a [`Resolver`]
//! and exposes the four gettext call shapes:
//!
//! | Call | Context | Plural |
//! |------|---------|--------|
//! | [`Translator::gettext`] | no | no |
//! | [`Translator::pgettext`] | yes | no |
//! | [`Translator::ngettext`] | no | yes |
//! | [`Translator::npgettext`] | yes | yes |
//!
//! Every call reads one settings snapshot, so a language switch from
//! another thread never splits a lookup.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::TranslatorConfig;
use crate::dictionary::Dictionary;
use crate::error::ResolveError;
use crate::resolver::{LookupRequest, Resolver};
use crate::settings::{LanguageSettings, SharedSettings};

/// Shared translation entry point.
///
/// # Example
///
/// ```
/// use lingo::{Dictionary, Translator, TranslatorConfig};
///
/// let dict = Dictionary::from_json_str(
///     r#"{"fr_FR": {"%{n} apple": ["%{n} pomme", "%{n} pommes"]}}"#,
/// ).unwrap();
/// let tr = Translator::new(TranslatorConfig::default().with_language("fr_FR"), dict);
///
/// let text = tr.ngettext("%{n} apple", "%{n} apples", 3, &[("n", "3")], false).unwrap();
/// assert_eq!(text, "3 pommes");
/// ```
#[derive(Debug)]
pub struct Translator {
    settings: SharedSettings,
    resolver: Resolver,
}

impl Translator {
    /// Translator over `dictionary` configured by `config`, using the
    /// default resolver.
    #[must_use]
    pub fn new(config: TranslatorConfig, dictionary: impl Into<Arc<Dictionary>>) -> Self {
        Self::from_settings(LanguageSettings::from_config(&config, dictionary))
    }

    #[must_use]
    pub fn from_settings(settings: LanguageSettings) -> Self {
        Self {
            settings: SharedSettings::new(settings),
            resolver: Resolver::new(),
        }
    }

    /// Replace the resolver, e.g. to inject plural rules or a warning sink.
    #[must_use]
    pub fn with_resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = resolver;
        self
    }

    #[must_use]
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    #[must_use]
    pub fn settings(&self) -> &SharedSettings {
        &self.settings
    }

    /// Resolve a fully specified request against the current settings.
    pub fn resolve(&self, request: &LookupRequest<'_>) -> Result<String, ResolveError> {
        let snapshot = self.settings.snapshot();
        self.resolver.resolve(&snapshot, request)
    }

    /// Translate `msgid` in the current language.
    pub fn gettext(
        &self,
        msgid: &str,
        params: &[(&str, &str)],
        disable_escaping: bool,
    ) -> Result<String, ResolveError> {
        self.resolve(
            &LookupRequest::new(msgid)
                .params(params)
                .disable_escaping(disable_escaping),
        )
    }

    /// Translate `msgid` under `context`.
    pub fn pgettext(
        &self,
        context: &str,
        msgid: &str,
        params: &[(&str, &str)],
        disable_escaping: bool,
    ) -> Result<String, ResolveError> {
        self.resolve(
            &LookupRequest::new(msgid)
                .context(context)
                .params(params)
                .disable_escaping(disable_escaping),
        )
    }

    /// Translate `msgid` with the plural form chosen by `count`.
    pub fn ngettext(
        &self,
        msgid: &str,
        plural: &str,
        count: i64,
        params: &[(&str, &str)],
        disable_escaping: bool,
    ) -> Result<String, ResolveError> {
        self.resolve(
            &LookupRequest::new(msgid)
                .plural(plural)
                .count(count)
                .params(params)
                .disable_escaping(disable_escaping),
        )
    }

    /// Translate `msgid` under `context` with the plural form chosen by
    /// `count`.
    pub fn npgettext(
        &self,
        context: &str,
        msgid: &str,
        plural: &str,
        count: i64,
        params: &[(&str, &str)],
        disable_escaping: bool,
    ) -> Result<String, ResolveError> {
        self.resolve(
            &LookupRequest::new(msgid)
                .context(context)
                .plural(plural)
                .count(count)
                .params(params)
                .disable_escaping(disable_escaping),
        )
    }

    /// Substitute `params` into already translated text.
    #[must_use]
    pub fn interpolate(&self, text: &str, params: &[(&str, &str)], disable_escaping: bool) -> String {
        self.resolver.interpolate(text, params, disable_escaping)
    }

    #[must_use]
    pub fn current_language(&self) -> String {
        self.settings.current()
    }

    pub fn set_language(&self, language: impl Into<String>) {
        self.settings.set_current(language);
    }

    pub fn mute_language(&self, language: impl Into<String>) {
        self.settings.mute(language);
    }

    pub fn unmute_language(&self, language: &str) {
        self.settings.unmute(language);
    }

    pub fn set_silent(&self, silent: bool) {
        self.settings.set_silent(silent);
    }

    /// Swap in a new dictionary, keeping the language state.
    pub fn reload(&self, dictionary: impl Into<Arc<Dictionary>>) {
        self.settings.reload(dictionary);
    }

    /// Language key → display name, as configured.
    #[must_use]
    pub fn available_languages(&self) -> BTreeMap<String, String> {
        self.settings.snapshot().available.clone()
    }
}
