#![forbid(unsafe_code)]

//! Runtime lookup of compiled gettext dictionaries.
//!
//! Resolves a msgid, with an optional context, plural text and count,
//! against a JSON dictionary produced by a gettext extraction pipeline.
//! Handles locale family fallback (`de_DE` → `de`), void-context
//! unwrapping, plural slot selection and `%{name}` interpolation with
//! HTML escaping.
//!
//! # Role in Lingo
//! `lingo` is the lookup layer. Plural rules live in `lingo-plural` and
//! are consumed through the [`PluralSelector`] trait; warnings go to a
//! [`Diagnostics`] sink; language state is published through
//! [`SharedSettings`].
//!
//! # How it fits in an application
//! Build a [`Dictionary`] once from the compiled JSON, wrap it in a
//! [`Translator`], and call `gettext`/`pgettext`/`ngettext`/`npgettext`
//! from any thread. Missing translations fall back to the untranslated
//! text and log a warning; only malformed dictionary data is an error.

pub mod config;
pub mod diagnostics;
pub mod dictionary;
pub mod error;
pub mod interpolate;
pub mod resolver;
pub mod settings;
pub mod translator;

pub use config::{DEFAULT_LANGUAGE, TranslatorConfig};
pub use diagnostics::{Diagnostics, RecordingDiagnostics, TracingDiagnostics};
pub use dictionary::{
    ContextForm, CoverageReport, Dictionary, Form, LanguageCoverage, TranslationEntry,
    TranslationTable,
};
pub use error::{DictionaryError, ResolveError};
pub use interpolate::{Interpolator, PlaceholderInterpolator, escape_html};
pub use lingo_plural::{PluralRegistry, PluralRule, PluralSelector};
pub use resolver::{LookupRequest, Resolver};
pub use settings::{LanguageSettings, SharedSettings};
pub use translator::Translator;
