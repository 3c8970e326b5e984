//! Translation lookup.
//!
//! [`Resolver::resolve`] turns a [`LookupRequest`] into display text
//! against one [`LanguageSettings`] snapshot:
//!
//! 1. pick the language (request override, else `current`),
//! 2. return `""` for an empty or blank msgid,
//! 3. compute the untranslated fallback (`plural` when the count selects a
//!    non-zero slot, else the msgid),
//! 4. find the language table, falling back to the family (`de_DE` → `de`),
//! 5. look up the trimmed msgid, then the context if one was requested,
//! 6. unwrap a void-context map when no context was requested,
//! 7. pick the plural slot for plural lists,
//! 8. interpolate parameters.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Missing language | No table for key or family | Warn, untranslated text |
//! | Missing translation | msgid (or context) absent | Warn, untranslated text |
//! | Malformed plural data | Plural slot absent or empty | `Err(MalformedPluralData)` |
//! | Missing void context | Context map without `""`, no context asked | `Err(MissingVoidContext)` |
//! | Empty msgid | Caller passed `""` or only whitespace | `Ok("")`, no warning |
//!
//! Warnings go through the injected [`Diagnostics`] sink and are skipped
//! when the language is muted or the settings are silent.

use std::fmt;
use std::sync::Arc;

use lingo_plural::{PluralRegistry, PluralSelector};

use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::dictionary::Form;
use crate::error::ResolveError;
use crate::interpolate::{Interpolator, PlaceholderInterpolator};
use crate::settings::LanguageSettings;

/// One lookup: the msgid plus everything that can qualify it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupRequest<'a> {
    /// Untranslated key. Surrounding whitespace is ignored for lookup.
    pub msgid: &'a str,
    /// Count driving plural selection. Defaults to 1.
    pub count: i64,
    /// Disambiguating context. An empty context means none.
    pub context: Option<&'a str>,
    /// Untranslated plural text, shown when no translation exists and the
    /// count selects a plural slot.
    pub plural: Option<&'a str>,
    /// Language to use instead of the current one.
    pub language: Option<&'a str>,
    /// `%{name}` substitutions.
    pub params: &'a [(&'a str, &'a str)],
    /// Insert parameter values without HTML escaping.
    pub disable_escaping: bool,
}

impl<'a> LookupRequest<'a> {
    #[must_use]
    pub fn new(msgid: &'a str) -> Self {
        Self {
            msgid,
            count: 1,
            context: None,
            plural: None,
            language: None,
            params: &[],
            disable_escaping: false,
        }
    }

    #[must_use]
    pub fn count(mut self, count: i64) -> Self {
        self.count = count;
        self
    }

    #[must_use]
    pub fn context(mut self, context: &'a str) -> Self {
        self.context = Some(context);
        self
    }

    #[must_use]
    pub fn plural(mut self, plural: &'a str) -> Self {
        self.plural = Some(plural);
        self
    }

    #[must_use]
    pub fn language(mut self, language: &'a str) -> Self {
        self.language = Some(language);
        self
    }

    #[must_use]
    pub fn params(mut self, params: &'a [(&'a str, &'a str)]) -> Self {
        self.params = params;
        self
    }

    #[must_use]
    pub fn disable_escaping(mut self, disable: bool) -> Self {
        self.disable_escaping = disable;
        self
    }
}

/// Resolves lookups with pluggable plural rules, interpolation and
/// warning sink.
#[derive(Clone)]
pub struct Resolver {
    plurals: Arc<dyn PluralSelector>,
    interpolator: Arc<dyn Interpolator>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver").finish_non_exhaustive()
    }
}

impl Resolver {
    /// Built-in gettext plural table, `%{name}` interpolation, `tracing`
    /// warnings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            plurals: Arc::new(PluralRegistry::builtin()),
            interpolator: Arc::new(PlaceholderInterpolator),
            diagnostics: Arc::new(TracingDiagnostics),
        }
    }

    #[must_use]
    pub fn with_plurals(mut self, plurals: Arc<dyn PluralSelector>) -> Self {
        self.plurals = plurals;
        self
    }

    #[must_use]
    pub fn with_interpolator(mut self, interpolator: Arc<dyn Interpolator>) -> Self {
        self.interpolator = interpolator;
        self
    }

    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Substitute `params` into `text` with the configured interpolator.
    #[must_use]
    pub fn interpolate(&self, text: &str, params: &[(&str, &str)], disable_escaping: bool) -> String {
        self.interpolator.apply(text, params, !disable_escaping)
    }

    /// Resolve `request` to display text.
    ///
    /// Missing languages and translations fall back to the untranslated
    /// text. Errors are reserved for defects in the dictionary itself.
    pub fn resolve(
        &self,
        settings: &LanguageSettings,
        request: &LookupRequest<'_>,
    ) -> Result<String, ResolveError> {
        let language = request.language.unwrap_or(settings.current.as_str());

        if request.msgid.trim().is_empty() {
            return Ok(String::new());
        }

        let silent = settings.is_silenced(language);
        let untranslated = match request.plural {
            Some(plural) if self.plurals.select_index(language, request.count) > 0 => plural,
            _ => request.msgid,
        };
        let fallback = || self.interpolate(untranslated, request.params, request.disable_escaping);

        let Some((table_key, table)) = settings.dictionary.table_for(language) else {
            if !silent {
                self.diagnostics
                    .warn(&format!("No translations found for {language}"));
            }
            return Ok(fallback());
        };
        if table_key != language {
            tracing::trace!(target: "lingo", language, table = table_key, "using family translations");
        }

        let msgid = request.msgid.trim();
        let context = request.context.filter(|context| !context.is_empty());

        let form = match (table.get(msgid), context) {
            (None, _) => None,
            (Some(entry), Some(context)) => entry.with_context(context),
            (Some(entry), None) => Some(entry.without_context().ok_or_else(|| {
                ResolveError::MissingVoidContext {
                    msgid: msgid.to_string(),
                    language: language.to_string(),
                }
            })?),
        };

        let Some(form) = form else {
            if !silent {
                let message = match context {
                    Some(context) => {
                        format!("Untranslated {language}: \"{msgid}\" with context \"{context}\"")
                    }
                    None => format!("Untranslated {language}: \"{msgid}\""),
                };
                self.diagnostics.warn(&message);
            }
            return Ok(fallback());
        };

        let text = match form {
            Form::Plain(text) => text,
            Form::Plurals(forms) => {
                // A lone form is unambiguous for a count of 1, whatever slot
                // the language's rule would pick.
                let index = if forms.len() == 1 && request.count == 1 {
                    0
                } else {
                    self.plurals.select_index(language, request.count)
                };
                match forms.get(index) {
                    Some(text) if !text.is_empty() => text.as_str(),
                    _ => {
                        return Err(ResolveError::MalformedPluralData {
                            msgid: msgid.to_string(),
                            index,
                            language: language.to_string(),
                            count: request.count,
                        });
                    }
                }
            }
        };

        Ok(self.interpolate(text, request.params, request.disable_escaping))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::RecordingDiagnostics;
    use crate::dictionary::Dictionary;
    use lingo_plural::PluralRule;
    use tracing_test::traced_test;

    fn settings(json: &str, current: &str) -> LanguageSettings {
        LanguageSettings::new(current, Dictionary::from_json_str(json).unwrap())
    }

    fn recording() -> (Resolver, Arc<RecordingDiagnostics>) {
        let sink = Arc::new(RecordingDiagnostics::new());
        let resolver = Resolver::new().with_diagnostics(sink.clone());
        (resolver, sink)
    }

    #[test]
    fn plain_entry() {
        let (resolver, sink) = recording();
        let s = settings(r#"{"fr_FR": {"Hello": "Bonjour"}}"#, "fr_FR");
        let out = resolver.resolve(&s, &LookupRequest::new("Hello")).unwrap();
        assert_eq!(out, "Bonjour");
        assert!(sink.messages().is_empty());
    }

    #[test]
    fn plural_list_selects_by_count() {
        let (resolver, _) = recording();
        let s = settings(r#"{"fr_FR": {"Hello": ["Bonjour", "Bonjours"]}}"#, "fr_FR");
        let resolve = |n| resolver.resolve(&s, &LookupRequest::new("Hello").count(n)).unwrap();
        assert_eq!(resolve(2), "Bonjours");
        assert_eq!(resolve(1), "Bonjour");
        // French treats zero as singular.
        assert_eq!(resolve(0), "Bonjour");
    }

    #[test]
    fn void_context_is_unwrapped() {
        let (resolver, _) = recording();
        let s = settings(r#"{"fr_FR": {"Hello": {"": "Bonjour"}}}"#, "fr_FR");
        assert_eq!(resolver.resolve(&s, &LookupRequest::new("Hello")).unwrap(), "Bonjour");
    }

    #[test]
    fn context_disambiguation() {
        let (resolver, sink) = recording();
        let s = settings(
            r#"{"en": {"Book": {"": "plain form", "shelf": "shelf-context form"}}}"#,
            "en",
        );
        let plain = resolver.resolve(&s, &LookupRequest::new("Book")).unwrap();
        let shelf = resolver
            .resolve(&s, &LookupRequest::new("Book").context("shelf"))
            .unwrap();
        assert_eq!(plain, "plain form");
        assert_eq!(shelf, "shelf-context form");
        // Empty context behaves like no context.
        let empty = resolver.resolve(&s, &LookupRequest::new("Book").context("")).unwrap();
        assert_eq!(empty, "plain form");
        assert!(sink.messages().is_empty());
    }

    #[test]
    fn context_with_plural_forms() {
        let (resolver, _) = recording();
        let s = settings(r#"{"ru": {"File": {"menu": ["Файл", "Файла", "Файлов"]}}}"#, "ru");
        let req = LookupRequest::new("File").context("menu").count(3);
        assert_eq!(resolver.resolve(&s, &req).unwrap(), "Файла");
        let req = LookupRequest::new("File").context("menu").count(11);
        assert_eq!(resolver.resolve(&s, &req).unwrap(), "Файлов");
    }

    #[test]
    fn missing_context_warns_with_context() {
        let (resolver, sink) = recording();
        let s = settings(r#"{"fr": {"Bank": {"": "Banque"}}}"#, "fr");
        let out = resolver
            .resolve(&s, &LookupRequest::new("Bank").context("river"))
            .unwrap();
        assert_eq!(out, "Bank");
        assert_eq!(
            sink.messages(),
            vec!["Untranslated fr: \"Bank\" with context \"river\""]
        );
    }

    #[test]
    fn context_on_plain_entry_is_missing() {
        let (resolver, sink) = recording();
        let s = settings(r#"{"fr": {"Bank": "Banque"}}"#, "fr");
        let out = resolver
            .resolve(&s, &LookupRequest::new("Bank").context("river"))
            .unwrap();
        assert_eq!(out, "Bank");
        assert_eq!(sink.messages().len(), 1);
    }

    #[test]
    fn context_map_without_void_slot_is_an_error() {
        let (resolver, _) = recording();
        let s = settings(r#"{"fr": {"Bank": {"river": "Rive"}}}"#, "fr");
        let err = resolver.resolve(&s, &LookupRequest::new("Bank")).unwrap_err();
        assert_eq!(
            err,
            ResolveError::MissingVoidContext {
                msgid: "Bank".into(),
                language: "fr".into()
            }
        );
    }

    #[test]
    fn empty_msgid_short_circuits() {
        let (resolver, sink) = recording();
        let s = settings(r#"{}"#, "xx");
        let req = LookupRequest::new("")
            .plural("many")
            .count(5)
            .params(&[("a", "b")]);
        assert_eq!(resolver.resolve(&s, &req).unwrap(), "");
        assert!(sink.messages().is_empty());
    }

    #[test]
    fn blank_msgid_short_circuits() {
        let (resolver, sink) = recording();
        let s = settings(r#"{"fr": {"Hello": "Bonjour"}}"#, "fr");
        for msgid in ["   ", "\t\n", " "] {
            assert_eq!(resolver.resolve(&s, &LookupRequest::new(msgid)).unwrap(), "");
        }
        assert!(sink.messages().is_empty());
    }

    #[test]
    fn empty_context_map_without_context_is_an_error() {
        let (resolver, _) = recording();
        let s = settings(r#"{"fr": {"Hello": "Bonjour", "Bank": {}}}"#, "fr");
        let err = resolver.resolve(&s, &LookupRequest::new("Bank")).unwrap_err();
        assert!(matches!(err, ResolveError::MissingVoidContext { .. }));
        // The rest of the language still resolves.
        assert_eq!(resolver.resolve(&s, &LookupRequest::new("Hello")).unwrap(), "Bonjour");
    }

    #[test]
    fn empty_context_map_with_context_warns() {
        let (resolver, sink) = recording();
        let s = settings(r#"{"fr": {"Bank": {}}}"#, "fr");
        let out = resolver
            .resolve(&s, &LookupRequest::new("Bank").context("river"))
            .unwrap();
        assert_eq!(out, "Bank");
        assert_eq!(
            sink.messages(),
            vec!["Untranslated fr: \"Bank\" with context \"river\""]
        );
    }

    #[test]
    fn empty_plural_list_is_malformed() {
        let (resolver, _) = recording();
        let s = settings(r#"{"fr": {"Hello": "Bonjour", "Apple": []}}"#, "fr");
        for count in [1, 2] {
            let err = resolver
                .resolve(&s, &LookupRequest::new("Apple").count(count))
                .unwrap_err();
            assert_eq!(
                err,
                ResolveError::MalformedPluralData {
                    msgid: "Apple".into(),
                    index: usize::from(count > 1),
                    language: "fr".into(),
                    count,
                }
            );
        }
        assert_eq!(resolver.resolve(&s, &LookupRequest::new("Hello")).unwrap(), "Bonjour");
    }

    #[test]
    fn missing_language_warns_once_and_returns_msgid() {
        let (resolver, sink) = recording();
        let s = settings(r#"{"fr": {"Hello": "Bonjour"}}"#, "xx_YY");
        let out = resolver
            .resolve(&s, &LookupRequest::new("Hi %{name}").params(&[("name", "Zoë")]))
            .unwrap();
        assert_eq!(out, "Hi Zoë");
        assert_eq!(sink.messages(), vec!["No translations found for xx_YY"]);
    }

    #[test]
    fn missing_key_uses_default_plural() {
        let (resolver, sink) = recording();
        let s = settings(r#"{"en": {}}"#, "en");
        let req = LookupRequest::new("%{n} apple").plural("%{n} apples").count(4);
        let out = resolver
            .resolve(&s, &req.params(&[("n", "4")]))
            .unwrap();
        assert_eq!(out, "4 apples");
        let one = resolver
            .resolve(&s, &LookupRequest::new("%{n} apple").plural("%{n} apples").params(&[("n", "1")]))
            .unwrap();
        assert_eq!(one, "1 apple");
        assert_eq!(sink.messages().len(), 2);
    }

    #[test]
    fn default_plural_follows_language_rule() {
        let (resolver, _) = recording();
        // Japanese has one form, so the singular msgid is always the fallback.
        let s = settings(r#"{}"#, "ja");
        let req = LookupRequest::new("apple").plural("apples").count(9);
        assert_eq!(resolver.resolve(&s, &req).unwrap(), "apple");
        // Arabic selects slot 1 for a single item, so the plural text is used.
        let req = LookupRequest::new("apple").plural("apples").language("ar");
        assert_eq!(resolver.resolve(&s, &req).unwrap(), "apples");
    }

    #[test]
    fn family_fallback() {
        let (resolver, _) = recording();
        let s = settings(r#"{"de": {"Yes": "Ja"}}"#, "de_DE");
        assert_eq!(resolver.resolve(&s, &LookupRequest::new("Yes")).unwrap(), "Ja");
    }

    #[test]
    fn whitespace_is_trimmed_for_lookup() {
        let (resolver, _) = recording();
        let s = settings(r#"{"de": {"Hello": "Hallo"}}"#, "de");
        assert_eq!(resolver.resolve(&s, &LookupRequest::new("  Hello  ")).unwrap(), "Hallo");
        assert_eq!(resolver.resolve(&s, &LookupRequest::new("\nHello\t")).unwrap(), "Hallo");
    }

    #[test]
    fn untranslated_fallback_keeps_original_whitespace() {
        let (resolver, sink) = recording();
        let s = settings(r#"{"de": {}}"#, "de");
        assert_eq!(resolver.resolve(&s, &LookupRequest::new(" Hi ")).unwrap(), " Hi ");
        assert_eq!(sink.messages(), vec!["Untranslated de: \"Hi\""]);
    }

    #[test]
    fn language_override_beats_current() {
        let (resolver, _) = recording();
        let s = settings(r#"{"de": {"Yes": "Ja"}, "fr": {"Yes": "Oui"}}"#, "de");
        let req = LookupRequest::new("Yes").language("fr");
        assert_eq!(resolver.resolve(&s, &req).unwrap(), "Oui");
    }

    #[test]
    fn single_form_with_count_one_uses_slot_zero() {
        let (resolver, _) = recording();
        // Arabic would pick slot 1 for one item.
        let s = settings(r#"{"ar": {"item": ["only form"]}}"#, "ar");
        let req = LookupRequest::new("item").count(1);
        assert_eq!(resolver.resolve(&s, &req).unwrap(), "only form");
    }

    #[test]
    fn single_form_override_is_limited_to_count_one() {
        let (resolver, _) = recording();
        let s = settings(r#"{"en": {"item": ["only form"]}}"#, "en");
        let err = resolver
            .resolve(&s, &LookupRequest::new("item").count(2))
            .unwrap_err();
        assert_eq!(
            err,
            ResolveError::MalformedPluralData {
                msgid: "item".into(),
                index: 1,
                language: "en".into(),
                count: 2,
            }
        );
    }

    #[test]
    fn empty_plural_slot_is_malformed() {
        let (resolver, sink) = recording();
        let s = settings(r#"{"fr": {"Apple": ["Pomme", ""]}}"#, "fr").with_silent(true);
        let err = resolver
            .resolve(&s, &LookupRequest::new("Apple").count(3))
            .unwrap_err();
        assert!(matches!(err, ResolveError::MalformedPluralData { index: 1, .. }));
        assert!(sink.messages().is_empty());
    }

    #[test]
    fn muted_and_silent_suppress_warnings() {
        let (resolver, sink) = recording();
        let base = settings(r#"{"fr": {}}"#, "fr");

        let muted = base.clone().with_muted("fr");
        assert_eq!(resolver.resolve(&muted, &LookupRequest::new("Hi")).unwrap(), "Hi");
        let req = LookupRequest::new("Hi").language("xx");
        assert_eq!(resolver.resolve(&muted.clone().with_muted("xx"), &req).unwrap(), "Hi");
        assert!(sink.messages().is_empty());

        // Muting is per language.
        resolver.resolve(&muted, &req).unwrap();
        assert_eq!(sink.drain(), vec!["No translations found for xx"]);

        let silent = base.with_silent(true);
        resolver.resolve(&silent, &LookupRequest::new("Hi")).unwrap();
        resolver.resolve(&silent, &req).unwrap();
        assert!(sink.messages().is_empty());
    }

    #[test]
    fn escaping_applies_to_params_only() {
        let (resolver, _) = recording();
        let s = settings(r#"{"en": {"Hi": "<b>Hi</b> %{who}"}}"#, "en");
        let params = [("who", "<script>")];
        let escaped = resolver
            .resolve(&s, &LookupRequest::new("Hi").params(&params))
            .unwrap();
        assert_eq!(escaped, "<b>Hi</b> &lt;script&gt;");
        let raw = resolver
            .resolve(&s, &LookupRequest::new("Hi").params(&params).disable_escaping(true))
            .unwrap();
        assert_eq!(raw, "<b>Hi</b> <script>");
    }

    #[test]
    fn custom_plural_selector_is_used() {
        let sink = Arc::new(RecordingDiagnostics::new());
        let resolver = Resolver::new()
            .with_diagnostics(sink)
            .with_plurals(Arc::new(PluralRule::Custom {
                forms: 3,
                select: |n| (n % 3) as usize,
            }));
        let s = settings(r#"{"en": {"x": ["a", "b", "c"]}}"#, "en");
        let out: Vec<String> = (3..6)
            .map(|n| resolver.resolve(&s, &LookupRequest::new("x").count(n)).unwrap())
            .collect();
        assert_eq!(out, vec!["a", "b", "c"]);
    }

    #[test]
    #[traced_test]
    fn default_sink_logs_through_tracing() {
        let s = settings(r#"{}"#, "pt_BR");
        let out = Resolver::new().resolve(&s, &LookupRequest::new("Hello")).unwrap();
        assert_eq!(out, "Hello");
        assert!(logs_contain("No translations found for pt_BR"));
    }
}
