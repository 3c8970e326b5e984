//! Language key → plural rule dispatch.
//!
//! The registry is a plain lookup table, consulted in three steps:
//!
//! 1. the language key exactly as given (`pt_BR`),
//! 2. its family code, the part before the first `_`, `-`, `.` or `@`,
//!    lowercased (`de_DE.UTF-8` → `de`),
//! 3. the fallback rule, [`PluralRule::Germanic`] unless overridden.
//!
//! Adding a language is a [`PluralRegistry::register`] call; nothing in
//! the resolver changes.

use std::collections::HashMap;

use crate::rule::PluralRule;

/// Picks the plural-form index for a language and a count.
///
/// Implementations must be pure and total: the same inputs always give
/// the same index, and no input panics.
pub trait PluralSelector: Send + Sync {
    /// Zero-based index into the plural list of `language_key`.
    fn select_index(&self, language_key: &str, count: i64) -> usize;
}

/// Family code of a language key: `"fr_FR"` → `"fr"`, `"sah"` → `"sah"`.
#[must_use]
pub fn language_family(language_key: &str) -> &str {
    language_key
        .split(['_', '-', '.', '@'])
        .next()
        .unwrap_or(language_key)
}

/// Built-in gettext plural table, extensible at runtime.
#[derive(Debug, Clone)]
pub struct PluralRegistry {
    rules: HashMap<String, PluralRule>,
    fallback: PluralRule,
}

impl Default for PluralRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

const SINGLE: &[&str] = &[
    "ay", "bo", "cgg", "dz", "fa", "id", "ja", "jbo", "ka", "kk", "km", "ko", "ky", "lo", "ms",
    "my", "sah", "su", "th", "tt", "ug", "vi", "wo", "zh",
];

const FRENCH: &[&str] = &[
    "ach", "ak", "am", "arn", "br", "fil", "fr", "gun", "ln", "mfe", "mg", "mi", "oc", "pt_BR",
    "tg", "ti", "tr", "uz", "wa",
];

const EAST_SLAVIC: &[&str] = &["be", "bs", "hr", "ru", "sr", "uk"];

impl PluralRegistry {
    /// An empty registry: every language uses `fallback`.
    #[must_use]
    pub fn with_fallback(fallback: PluralRule) -> Self {
        Self {
            rules: HashMap::new(),
            fallback,
        }
    }

    /// The GNU gettext plural-forms table.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::with_fallback(PluralRule::Germanic);

        let groups: [(&[&str], PluralRule); 3] = [
            (SINGLE, PluralRule::Single),
            (FRENCH, PluralRule::French),
            (EAST_SLAVIC, PluralRule::EastSlavic),
        ];
        for (codes, rule) in groups {
            for code in codes {
                registry.rules.insert((*code).to_string(), rule.clone());
            }
        }

        let singles = [
            ("is", PluralRule::Icelandic),
            ("jv", PluralRule::Javanese),
            ("mk", PluralRule::Macedonian),
            ("lv", PluralRule::Latvian),
            ("lt", PluralRule::Lithuanian),
            ("mnk", PluralRule::Mandinka),
            ("ro", PluralRule::Romanian),
            ("pl", PluralRule::Polish),
            ("csb", PluralRule::Polish),
            ("cs", PluralRule::CzechSlovak),
            ("sk", PluralRule::CzechSlovak),
            ("sl", PluralRule::Slovenian),
            ("mt", PluralRule::Maltese),
            ("gd", PluralRule::ScottishGaelic),
            ("cy", PluralRule::Welsh),
            ("kw", PluralRule::Cornish),
            ("ga", PluralRule::Irish),
            ("ar", PluralRule::Arabic),
        ];
        for (code, rule) in singles {
            registry.rules.insert(code.to_string(), rule);
        }

        registry
    }

    /// Add or replace the rule for a language key or family code.
    pub fn register(&mut self, language_key: impl Into<String>, rule: PluralRule) {
        let language_key = language_key.into();
        tracing::debug!(language = %language_key, ?rule, "registering plural rule");
        self.rules.insert(language_key, rule);
    }

    /// Replace the rule used for unknown languages.
    pub fn set_fallback(&mut self, rule: PluralRule) {
        self.fallback = rule;
    }

    /// Rule applied to `language_key` after exact and family lookup.
    #[must_use]
    pub fn rule_for(&self, language_key: &str) -> &PluralRule {
        if let Some(rule) = self.rules.get(language_key) {
            return rule;
        }
        let family = language_family(language_key);
        self.rules
            .get(family)
            .or_else(|| self.rules.get(&family.to_ascii_lowercase()))
            .unwrap_or(&self.fallback)
    }

    /// Whether `language_key` resolves to a registered rule rather than
    /// the fallback.
    #[must_use]
    pub fn knows(&self, language_key: &str) -> bool {
        let family = language_family(language_key);
        self.rules.contains_key(language_key)
            || self.rules.contains_key(family)
            || self.rules.contains_key(&family.to_ascii_lowercase())
    }
}

impl PluralSelector for PluralRegistry {
    fn select_index(&self, language_key: &str, count: i64) -> usize {
        self.rule_for(language_key).index(count)
    }
}

impl PluralSelector for PluralRule {
    fn select_index(&self, _language_key: &str, count: i64) -> usize {
        self.index(count)
    }
}
