//! Experience and education signals pulled out of raw resume / job text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static YEARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*\+?\s*(?:years?|yrs?)").expect("valid years pattern"));

/// Degree levels, checked in this order.
static DEGREE_PATTERNS: Lazy<Vec<(DegreeLevel, Regex)>> = Lazy::new(|| {
    [
        (DegreeLevel::PhD, r"\b(?:phd|doctorate)\b"),
        (DegreeLevel::Masters, r"\b(?:masters?|ms|msc|m\.tech|mba)\b"),
        (
            DegreeLevel::Bachelors,
            r"\b(?:bachelors?|bs|bsc|b\.tech|b\.e|undergraduate)\b",
        ),
        (DegreeLevel::Diploma, r"\b(?:diploma)\b"),
    ]
    .into_iter()
    .map(|(level, pattern)| (level, Regex::new(pattern).expect("valid degree pattern")))
    .collect()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DegreeLevel {
    PhD,
    Masters,
    Bachelors,
    Diploma,
}

/// Years of experience: the first integer followed by `year(s)`/`yr(s)`.
///
/// Only the first mention counts. Returns 0 when nothing is found.
pub fn extract_years_experience(text: &str) -> u32 {
    let lower = text.to_lowercase();
    YEARS_RE
        .captures(&lower)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .unwrap_or(0)
}

/// Degree levels mentioned anywhere in the text.
pub fn extract_education(text: &str) -> Vec<DegreeLevel> {
    let lower = text.to_lowercase();
    DEGREE_PATTERNS
        .iter()
        .filter(|(_, re)| re.is_match(&lower))
        .map(|(level, _)| *level)
        .collect()
}
