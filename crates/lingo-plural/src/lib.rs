#![forbid(unsafe_code)]

//! Plural form selection for compiled gettext dictionaries.
//!
//! Maps a `(language key, count)` pair to the zero-based slot of a
//! translated plural list. Every language family carries its own rule,
//! mirroring the GNU gettext `Plural-Forms` table, collapsed from CLDR
//! categories into an ordered index.
//!
//! # Role in Lingo
//! `lingo-plural` is the leaf of the workspace. The resolver in `lingo`
//! only sees the [`PluralSelector`] trait, so rule tables can be swapped
//! or extended without touching lookup logic.
//!
//! # Example
//!
//! ```
//! use lingo_plural::{PluralRegistry, PluralSelector};
//!
//! let plurals = PluralRegistry::builtin();
//! assert_eq!(plurals.select_index("en_US", 1), 0);
//! assert_eq!(plurals.select_index("fr_FR", 0), 0);
//! assert_eq!(plurals.select_index("ru", 3), 1);
//! // Arabic reserves index 0 for `zero`, so one item lands on slot 1.
//! assert_eq!(plurals.select_index("ar", 1), 1);
//! ```

pub mod expr;
pub mod registry;
pub mod rule;

pub use expr::{MAX_DEPTH, MAX_TOKENS, PluralError, PluralExpr, parse_plural_forms};
pub use registry::{PluralRegistry, PluralSelector, language_family};
pub use rule::{PluralCategory, PluralRule};
