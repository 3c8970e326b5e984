//! Error types.
//!
//! Missing languages and missing translations are not errors: the
//! resolver recovers by returning the untranslated text. Only defects in
//! the compiled dictionary itself surface here.

use thiserror::Error;

/// A lookup hit data the dictionary compiler should never have produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error(
        "plural form {index} missing for msgid {msgid:?} in language {language:?} (count {count})"
    )]
    MalformedPluralData {
        msgid: String,
        index: usize,
        language: String,
        count: i64,
    },

    #[error(
        "msgid {msgid:?} in language {language:?} only has context-specific translations; \
         a context is required"
    )]
    MissingVoidContext { msgid: String, language: String },
}

/// Rejected while ingesting a compiled dictionary.
#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("dictionary root must be an object keyed by language, found {found}")]
    InvalidRoot { found: &'static str },

    #[error("translations for language {language:?} must be an object, found {found}")]
    InvalidLanguage {
        language: String,
        found: &'static str,
    },

    #[error("invalid entry for msgid {msgid:?} in language {language:?}: {reason}")]
    InvalidEntry {
        language: String,
        msgid: String,
        reason: String,
    },
}

impl DictionaryError {
    pub(crate) fn entry(language: &str, msgid: &str, reason: impl Into<String>) -> Self {
        Self::InvalidEntry {
            language: language.to_string(),
            msgid: msgid.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_plural_names_every_coordinate() {
        let err = ResolveError::MalformedPluralData {
            msgid: "%{n} apple".into(),
            index: 3,
            language: "ar".into(),
            count: 5,
        };
        let text = err.to_string();
        assert!(text.contains("plural form 3"));
        assert!(text.contains("\"%{n} apple\""));
        assert!(text.contains("\"ar\""));
        assert!(text.contains("count 5"));
    }

    #[test]
    fn entry_constructor() {
        let err = DictionaryError::entry("fr", "Hello", "number is not a translation");
        assert_eq!(
            err.to_string(),
            "invalid entry for msgid \"Hello\" in language \"fr\": number is not a translation"
        );
    }
}
