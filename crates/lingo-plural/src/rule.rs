//! Plural rules mapping a count to a plural-form index.
//!
//! Each built-in [`PluralRule`] reproduces one formula of the GNU gettext
//! plural-forms table. The index it returns is the position of the form
//! inside a compiled plural list, which is why the order of categories is
//! fixed per rule and differs between families.
//!
//! # Invariants
//!
//! 1. Every rule maps any `i64` to an index in `0..form_count()`.
//! 2. Rules are pure: the same count always yields the same index.
//! 3. Negative counts are treated as their absolute value.
//! 4. Index 0 is not always the `one` slot (see [`PluralRule::Arabic`],
//!    [`PluralRule::Javanese`], [`PluralRule::Mandinka`]).

use core::fmt;

use crate::expr::{PluralError, PluralExpr, parse_plural_forms};

/// CLDR plural categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl fmt::Display for PluralCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zero => write!(f, "zero"),
            Self::One => write!(f, "one"),
            Self::Two => write!(f, "two"),
            Self::Few => write!(f, "few"),
            Self::Many => write!(f, "many"),
            Self::Other => write!(f, "other"),
        }
    }
}

use PluralCategory::{Few, Many, One, Other, Two, Zero};

/// A plural rule: count in, form index out.
///
/// Built-in variants are named after the language (or family) that made
/// the formula known. [`PluralRule::Expression`] carries a rule parsed
/// from a `Plural-Forms` header; [`PluralRule::Custom`] wraps a plain
/// function for anything else.
#[derive(Clone)]
pub enum PluralRule {
    /// One form for every count (Japanese, Chinese, Korean, Thai, ...).
    Single,
    /// `n != 1` (English, German, Spanish, ... and the default).
    Germanic,
    /// `n > 1`: zero shares the singular (French, Turkish, Brazilian Portuguese, ...).
    French,
    /// Singular for counts ending in 1 except 11.
    Icelandic,
    /// `n != 0`: index 0 is the `zero` slot.
    Javanese,
    /// Singular for 1 and anything ending in 1.
    Macedonian,
    /// one / other / zero, in that order.
    Latvian,
    /// one / few / other.
    Lithuanian,
    /// one / few / many (Russian, Ukrainian, Belarusian, Serbian, Croatian, Bosnian).
    EastSlavic,
    /// zero / one / other.
    Mandinka,
    /// one / few / other, with 0 and 2..=19 (mod 100) as `few`.
    Romanian,
    /// one / few / many (Polish, Kashubian).
    Polish,
    /// one / 2..=4 / other (Czech, Slovak).
    CzechSlovak,
    /// Keyed on the last two digits: 1, 2, 3..=4, other.
    Slovenian,
    /// one / few / many / other.
    Maltese,
    /// 1 and 11 / 2 and 12 / 3..=19 / other.
    ScottishGaelic,
    /// 1 / 2 / other / 8 and 11.
    Welsh,
    /// 1 / 2 / 3 / other.
    Cornish,
    /// 1 / 2 / 3..=6 / 7..=10 / other.
    Irish,
    /// zero / one / two / few / many / other: one item is index 1.
    Arabic,
    /// A gettext plural expression with its declared number of forms.
    Expression { forms: usize, expr: PluralExpr },
    /// Custom rule function and its number of forms.
    Custom { forms: usize, select: fn(u64) -> usize },
}

impl PluralRule {
    /// Zero-based plural-form index for `count`.
    ///
    /// The result is always below [`form_count`](Self::form_count).
    #[must_use]
    pub fn index(&self, count: i64) -> usize {
        let n = count.unsigned_abs();
        match self {
            Self::Single => 0,
            Self::Germanic => usize::from(n != 1),
            Self::French => usize::from(n > 1),
            Self::Icelandic => usize::from(n % 10 != 1 || n % 100 == 11),
            Self::Javanese => usize::from(n != 0),
            Self::Macedonian => usize::from(!(n == 1 || n % 10 == 1)),
            Self::Latvian => latvian(n),
            Self::Lithuanian => lithuanian(n),
            Self::EastSlavic => east_slavic(n),
            Self::Mandinka => match n {
                0 => 0,
                1 => 1,
                _ => 2,
            },
            Self::Romanian => romanian(n),
            Self::Polish => polish(n),
            Self::CzechSlovak => match n {
                1 => 0,
                2..=4 => 1,
                _ => 2,
            },
            Self::Slovenian => match n % 100 {
                1 => 0,
                2 => 1,
                3 | 4 => 2,
                _ => 3,
            },
            Self::Maltese => maltese(n),
            Self::ScottishGaelic => match n {
                1 | 11 => 0,
                2 | 12 => 1,
                3..=19 => 2,
                _ => 3,
            },
            Self::Welsh => match n {
                1 => 0,
                2 => 1,
                8 | 11 => 3,
                _ => 2,
            },
            Self::Cornish => match n {
                1 => 0,
                2 => 1,
                3 => 2,
                _ => 3,
            },
            Self::Irish => match n {
                1 => 0,
                2 => 1,
                3..=6 => 2,
                7..=10 => 3,
                _ => 4,
            },
            Self::Arabic => arabic(n),
            Self::Expression { forms, expr } => clamp(expr.evaluate(n), *forms),
            Self::Custom { forms, select } => select(n).min(forms.saturating_sub(1)),
        }
    }

    /// Number of plural forms this rule distinguishes (`nplurals`).
    #[must_use]
    pub fn form_count(&self) -> usize {
        match self {
            Self::Expression { forms, .. } | Self::Custom { forms, .. } => (*forms).max(1),
            builtin => builtin.categories().map_or(1, <[PluralCategory]>::len),
        }
    }

    /// CLDR category labels for each index, for built-in rules.
    ///
    /// The labels follow the gettext slot order, not the CLDR order.
    #[must_use]
    pub fn categories(&self) -> Option<&'static [PluralCategory]> {
        let labels: &'static [PluralCategory] = match self {
            Self::Single => &[Other],
            Self::Germanic | Self::French | Self::Icelandic | Self::Macedonian => &[One, Other],
            Self::Javanese => &[Zero, Other],
            Self::Latvian => &[One, Other, Zero],
            Self::Lithuanian | Self::Romanian | Self::CzechSlovak => &[One, Few, Other],
            Self::EastSlavic | Self::Polish => &[One, Few, Many],
            Self::Mandinka => &[Zero, One, Other],
            Self::Slovenian | Self::ScottishGaelic | Self::Cornish => &[One, Two, Few, Other],
            Self::Maltese => &[One, Few, Many, Other],
            Self::Welsh => &[One, Two, Other, Many],
            Self::Irish => &[One, Two, Few, Many, Other],
            Self::Arabic => &[Zero, One, Two, Few, Many, Other],
            Self::Expression { .. } | Self::Custom { .. } => return None,
        };
        Some(labels)
    }

    /// CLDR category selected for `count`, when the rule has labels.
    #[must_use]
    pub fn category(&self, count: i64) -> Option<PluralCategory> {
        let labels = self.categories()?;
        labels.get(self.index(count)).copied()
    }

    /// Build a rule from a gettext header such as
    /// `"nplurals=3; plural=(n==1 ? 0 : n>=2 && n<=4 ? 1 : 2);"`.
    pub fn from_plural_forms(header: &str) -> Result<Self, PluralError> {
        let (forms, expr) = parse_plural_forms(header)?;
        Ok(Self::Expression { forms, expr })
    }
}

impl fmt::Debug for PluralRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expression { forms, expr } => f
                .debug_struct("PluralRule::Expression")
                .field("forms", forms)
                .field("expr", expr)
                .finish(),
            Self::Custom { forms, .. } => write!(f, "PluralRule::Custom({forms} forms)"),
            other => write!(f, "PluralRule::{}", builtin_name(other)),
        }
    }
}

fn builtin_name(rule: &PluralRule) -> &'static str {
    match rule {
        PluralRule::Single => "Single",
        PluralRule::Germanic => "Germanic",
        PluralRule::French => "French",
        PluralRule::Icelandic => "Icelandic",
        PluralRule::Javanese => "Javanese",
        PluralRule::Macedonian => "Macedonian",
        PluralRule::Latvian => "Latvian",
        PluralRule::Lithuanian => "Lithuanian",
        PluralRule::EastSlavic => "EastSlavic",
        PluralRule::Mandinka => "Mandinka",
        PluralRule::Romanian => "Romanian",
        PluralRule::Polish => "Polish",
        PluralRule::CzechSlovak => "CzechSlovak",
        PluralRule::Slovenian => "Slovenian",
        PluralRule::Maltese => "Maltese",
        PluralRule::ScottishGaelic => "ScottishGaelic",
        PluralRule::Welsh => "Welsh",
        PluralRule::Cornish => "Cornish",
        PluralRule::Irish => "Irish",
        PluralRule::Arabic => "Arabic",
        PluralRule::Expression { .. } => "Expression",
        PluralRule::Custom { .. } => "Custom",
    }
}

// ── Formulas ────────────────────────────────────────────────────────

fn clamp(index: u64, forms: usize) -> usize {
    let last = forms.saturating_sub(1);
    usize::try_from(index).map_or(last, |i| i.min(last))
}

fn latvian(n: u64) -> usize {
    if n % 10 == 1 && n % 100 != 11 {
        0
    } else if n != 0 {
        1
    } else {
        2
    }
}

fn lithuanian(n: u64) -> usize {
    let mod100 = n % 100;
    if n % 10 == 1 && mod100 != 11 {
        0
    } else if n % 10 >= 2 && !(10..20).contains(&mod100) {
        1
    } else {
        2
    }
}

fn east_slavic(n: u64) -> usize {
    let mod10 = n % 10;
    let mod100 = n % 100;
    if mod10 == 1 && mod100 != 11 {
        0
    } else if (2..=4).contains(&mod10) && !(10..20).contains(&mod100) {
        1
    } else {
        2
    }
}

fn romanian(n: u64) -> usize {
    let mod100 = n % 100;
    if n == 1 {
        0
    } else if n == 0 || (1..20).contains(&mod100) {
        1
    } else {
        2
    }
}

fn polish(n: u64) -> usize {
    let mod10 = n % 10;
    let mod100 = n % 100;
    if n == 1 {
        0
    } else if (2..=4).contains(&mod10) && !(10..20).contains(&mod100) {
        1
    } else {
        2
    }
}

fn maltese(n: u64) -> usize {
    let mod100 = n % 100;
    if n == 1 {
        0
    } else if n == 0 || (2..11).contains(&mod100) {
        1
    } else if (11..20).contains(&mod100) {
        2
    } else {
        3
    }
}

fn arabic(n: u64) -> usize {
    let mod100 = n % 100;
    match n {
        0 => 0,
        1 => 1,
        2 => 2,
        _ if (3..=10).contains(&mod100) => 3,
        _ if mod100 >= 11 => 4,
        _ => 5,
    }
}
