//! Derives a college type from free-text institute names.
//!
//! Rules are evaluated in priority order and the first match wins:
//!
//! 1. absent or empty name: `Other`
//! 2. "government" and "autonomous": `Government-Autonomous`
//! 3. "government": `Government`
//! 4. a "-aided" qualifier or the word "unaided": `Unaided`
//! 5. the word "aided": `Aided`
//! 6. "autonomous": `Autonomous`
//! 7. anything else: `Other`
//!
//! Matching is case-insensitive. Changing the order changes which label
//! mixed names receive.

use crate::model::CollegeType;
use once_cell::sync::Lazy;
use regex::Regex;

static HYPHEN_AIDED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)-aided\b").expect("static regex compiles"));
static UNAIDED_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bunaided\b").expect("static regex compiles"));
static AIDED_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\baided\b").expect("static regex compiles"));

pub fn classify(institute: Option<&str>) -> CollegeType {
    let name = match institute {
        Some(text) if !text.trim().is_empty() => text.to_lowercase(),
        _ => return CollegeType::Other,
    };

    let government = name.contains("government");
    let autonomous = name.contains("autonomous");

    if government && autonomous {
        CollegeType::GovernmentAutonomous
    } else if government {
        CollegeType::Government
    } else if HYPHEN_AIDED.is_match(&name) || UNAIDED_WORD.is_match(&name) {
        CollegeType::Unaided
    } else if AIDED_WORD.is_match(&name) {
        CollegeType::Aided
    } else if autonomous {
        CollegeType::Autonomous
    } else {
        CollegeType::Other
    }
}

/// Classifies a record's institute field. Blank names fall through to `classify`.
pub fn classify_name(institute: &str) -> CollegeType {
    classify(Some(institute))
}
