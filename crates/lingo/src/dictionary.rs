//! Compiled translation dictionaries.
//!
//! A dictionary maps language keys to translation tables; a table maps a
//! trimmed msgid to one of three entry shapes produced by the upstream
//! compiler:
//!
//! | JSON shape | Entry |
//! |------------|-------|
//! | `"Bonjour"` | [`TranslationEntry::Plain`] |
//! | `["Pomme", "Pommes"]` | [`TranslationEntry::Plurals`] |
//! | `{"": "Banque", "river": "Rive"}` | [`TranslationEntry::Contexts`] |
//!
//! # Invariants
//!
//! 1. **Validated once**: shapes are checked on ingestion. After that,
//!    lookups match on the enum and never re-inspect JSON.
//! 2. **Immutable**: a loaded dictionary is never edited in place. A new
//!    catalog is a full reload (see `SharedSettings::reload`).
//! 3. **Shape, not content**: empty plural lists and empty context maps
//!    are accepted. A plural list too short for a count, or a context map
//!    without the requested slot, is reported at lookup time.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Root not an object | Wrong file | `DictionaryError::InvalidRoot` |
//! | Language not an object | Wrong nesting | `DictionaryError::InvalidLanguage` |
//! | Number/bool/null entry | Corrupt output | `DictionaryError::InvalidEntry` |
//! | Object inside a context map | Corrupt output | `DictionaryError::InvalidEntry` |

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::DictionaryError;

/// Translation stored under one context key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextForm {
    Plain(String),
    Plurals(Vec<String>),
}

/// Context key → translation. The empty key is the void context.
pub type ContextMap = BTreeMap<String, ContextForm>;

/// One msgid's translation, in any of the three compiled shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationEntry {
    /// A single string: no plurals, no context.
    Plain(String),
    /// One string per plural-form index.
    Plurals(Vec<String>),
    /// Translations keyed by context.
    Contexts(ContextMap),
}

/// Borrowed view of a translation once the context is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form<'a> {
    Plain(&'a str),
    Plurals(&'a [String]),
}

impl ContextForm {
    #[must_use]
    pub fn as_form(&self) -> Form<'_> {
        match self {
            Self::Plain(text) => Form::Plain(text),
            Self::Plurals(forms) => Form::Plurals(forms),
        }
    }
}

impl TranslationEntry {
    /// Translation for an explicit context.
    ///
    /// Only context maps have contexts; plain and plural entries yield
    /// `None` for every context.
    #[must_use]
    pub fn with_context(&self, context: &str) -> Option<Form<'_>> {
        match self {
            Self::Contexts(map) => map.get(context).map(ContextForm::as_form),
            Self::Plain(_) | Self::Plurals(_) => None,
        }
    }

    /// Translation when no context is requested.
    ///
    /// Plain and plural entries are returned as they are; a context map is
    /// unwrapped through its void (`""`) slot. A context map without one
    /// gives `None`.
    #[must_use]
    pub fn without_context(&self) -> Option<Form<'_>> {
        match self {
            Self::Plain(text) => Some(Form::Plain(text)),
            Self::Plurals(forms) => Some(Form::Plurals(forms)),
            Self::Contexts(map) => map.get("").map(ContextForm::as_form),
        }
    }

    fn from_value(language: &str, msgid: &str, value: Value) -> Result<Self, DictionaryError> {
        match value {
            Value::String(text) => Ok(Self::Plain(text)),
            Value::Array(items) => plural_list(items)
                .map(Self::Plurals)
                .map_err(|reason| DictionaryError::entry(language, msgid, reason)),
            Value::Object(contexts) => {
                let mut map = ContextMap::new();
                for (context, value) in contexts {
                    let form = match value {
                        Value::String(text) => ContextForm::Plain(text),
                        Value::Array(items) => {
                            ContextForm::Plurals(plural_list(items).map_err(|reason| {
                                DictionaryError::entry(
                                    language,
                                    msgid,
                                    format!("context {context:?}: {reason}"),
                                )
                            })?)
                        }
                        other => {
                            return Err(DictionaryError::entry(
                                language,
                                msgid,
                                format!(
                                    "context {context:?} must map to a string or a list, found {}",
                                    kind(&other)
                                ),
                            ));
                        }
                    };
                    map.insert(context, form);
                }
                Ok(Self::Contexts(map))
            }
            other => Err(DictionaryError::entry(
                language,
                msgid,
                format!("expected a string, list or object, found {}", kind(&other)),
            )),
        }
    }
}

fn plural_list(items: Vec<Value>) -> Result<Vec<String>, String> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::String(text) => Ok(text),
            other => Err(format!("plural form {index} is {}, not a string", kind(&other))),
        })
        .collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Translations for a single language, keyed by trimmed msgid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationTable {
    entries: HashMap<String, TranslationEntry>,
}

impl TranslationTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry.
    pub fn insert(&mut self, msgid: impl Into<String>, entry: TranslationEntry) {
        self.entries.insert(msgid.into(), entry);
    }

    #[must_use]
    pub fn get(&self, msgid: &str) -> Option<&TranslationEntry> {
        self.entries.get(msgid)
    }

    #[must_use]
    pub fn contains(&self, msgid: &str) -> bool {
        self.entries.contains_key(msgid)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn msgids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<K: Into<String>> FromIterator<(K, TranslationEntry)> for TranslationTable {
    fn from_iter<I: IntoIterator<Item = (K, TranslationEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Language key → translation table.
///
/// # Example
///
/// ```
/// use lingo::dictionary::{Dictionary, Form};
///
/// let dict = Dictionary::from_json_str(r#"{
///     "fr": { "Apple": ["Pomme", "Pommes"], "Bank": { "": "Banque", "river": "Rive" } }
/// }"#).unwrap();
///
/// let (language, table) = dict.table_for("fr_CA").unwrap();
/// assert_eq!(language, "fr");
/// let bank = table.get("Bank").unwrap();
/// assert_eq!(bank.without_context(), Some(Form::Plain("Banque")));
/// assert_eq!(bank.with_context("river"), Some(Form::Plain("Rive")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    tables: HashMap<String, TranslationTable>,
}

impl Dictionary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate compiled JSON.
    pub fn from_json_str(json: &str) -> Result<Self, DictionaryError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse and validate compiled JSON from any reader.
    pub fn from_json_reader(reader: impl std::io::Read) -> Result<Self, DictionaryError> {
        let value: Value = serde_json::from_reader(reader)?;
        Self::from_value(value)
    }

    /// Validate an already parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self, DictionaryError> {
        let Value::Object(languages) = value else {
            return Err(DictionaryError::InvalidRoot { found: kind(&value) });
        };

        let mut tables = HashMap::with_capacity(languages.len());
        for (language, table) in languages {
            let Value::Object(entries) = table else {
                return Err(DictionaryError::InvalidLanguage {
                    found: kind(&table),
                    language,
                });
            };
            let mut parsed = TranslationTable::new();
            for (msgid, entry) in entries {
                let entry = TranslationEntry::from_value(&language, &msgid, entry)?;
                parsed.insert(msgid, entry);
            }
            tracing::trace!(language = %language, entries = parsed.len(), "loaded translations");
            tables.insert(language, parsed);
        }

        Ok(Self { tables })
    }

    /// Insert or replace the table of a language.
    pub fn insert_table(&mut self, language: impl Into<String>, table: TranslationTable) {
        self.tables.insert(language.into(), table);
    }

    /// Table stored under exactly `language`.
    #[must_use]
    pub fn table(&self, language: &str) -> Option<&TranslationTable> {
        self.tables.get(language)
    }

    /// Table for `language_key`, falling back to its family (`de_DE` → `de`).
    ///
    /// Returns the key the table was found under.
    #[must_use]
    pub fn table_for(&self, language_key: &str) -> Option<(&str, &TranslationTable)> {
        if let Some((key, table)) = self.tables.get_key_value(language_key) {
            return Some((key.as_str(), table));
        }
        let (family, _) = language_key.split_once('_')?;
        self.tables
            .get_key_value(family)
            .map(|(key, table)| (key.as_str(), table))
    }

    /// Language keys present, sorted.
    #[must_use]
    pub fn languages(&self) -> Vec<&str> {
        let mut languages: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        languages.sort_unstable();
        languages
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    // -----------------------------------------------------------------
    // Coverage
    // -----------------------------------------------------------------

    /// Every msgid translated in at least one language, sorted and deduplicated.
    #[must_use]
    pub fn all_msgids(&self) -> Vec<String> {
        let mut msgids: Vec<String> = self
            .tables
            .values()
            .flat_map(|table| table.msgids().map(String::from))
            .collect();
        msgids.sort_unstable();
        msgids.dedup();
        msgids
    }

    /// Per-language coverage against the union of all msgids.
    ///
    /// Coverage counts the table stored under each key only; family
    /// fallback is a lookup-time concern.
    #[must_use]
    pub fn coverage_report(&self) -> CoverageReport {
        let all = self.all_msgids();
        let total = all.len();

        let languages = self
            .languages()
            .into_iter()
            .filter_map(|language| {
                let table = self.tables.get(language)?;
                let missing: Vec<String> = all
                    .iter()
                    .filter(|msgid| !table.contains(msgid))
                    .cloned()
                    .collect();
                let present = total - missing.len();
                let coverage_percent = if total == 0 {
                    100.0
                } else {
                    (present as f32 / total as f32) * 100.0
                };
                Some(LanguageCoverage {
                    language: language.to_string(),
                    present,
                    missing,
                    coverage_percent,
                })
            })
            .collect();

        CoverageReport {
            total_msgids: total,
            languages,
        }
    }
}

impl<'de> Deserialize<'de> for Dictionary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(serde::de::Error::custom)
    }
}

/// How complete each language is relative to the whole dictionary.
#[derive(Debug, Clone)]
pub struct CoverageReport {
    /// Unique msgids across all languages.
    pub total_msgids: usize,
    /// One row per language, sorted by language key.
    pub languages: Vec<LanguageCoverage>,
}

/// Coverage of a single language.
#[derive(Debug, Clone)]
pub struct LanguageCoverage {
    pub language: String,
    pub present: usize,
    /// Msgids translated elsewhere but not here, sorted.
    pub missing: Vec<String>,
    /// 0.0–100.0.
    pub coverage_percent: f32,
}
