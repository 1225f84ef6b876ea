//! Feature Builder: turns a (resume, job) pair into the fixed 10-dimension
//! vector the scaler and regressor are fitted against.
//!
//! The trainer and the predictor both call `build_features`; there is no other
//! path to a feature vector. Reordering `FEATURE_NAMES` invalidates every
//! persisted artifact, so bump `FEATURE_SCHEMA_VERSION` alongside it.

use std::collections::HashSet;

use thiserror::Error;
use tracing::debug;

use crate::matching::normalize::{bigrams, normalize, tokens, truncate_chars};
use crate::matching::profile::extract_years_experience;
use crate::matching::semantic::SemanticEncoder;
use crate::matching::skills::{extract_skills, intersection};
use crate::matching::vectorizer::TfidfVectorizer;

pub const FEATURE_COUNT: usize = 10;
pub const FEATURE_SCHEMA_VERSION: u32 = 1;

/// Prefix length fed to the semantic encoder.
const SEMANTIC_PREFIX_CHARS: usize = 2000;
/// Job tokens shorter than this do not count towards the title match.
const MIN_TITLE_TOKEN_LEN: usize = 4;

pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "lexical_similarity",
    "skill_match_ratio",
    "skill_overlap",
    "experience_years",
    "semantic_similarity",
    "skill_density",
    "title_match_ratio",
    "bigram_overlap",
    "resume_skill_count",
    "job_skill_count",
];

pub type FeatureVector = [f64; FEATURE_COUNT];

/// Failures of individual sub-computations. Never escapes `build_features`.
#[derive(Debug, Error, PartialEq)]
pub enum FeatureError {
    #[error("vectorizer has an empty vocabulary")]
    EmptyVocabulary,

    #[error("document has no terms in the fitted vocabulary")]
    NoKnownTerms,

    #[error("document has no tokens")]
    EmptyDocument,

    #[error("vector dimensions differ ({left} vs {right})")]
    DimensionMismatch { left: usize, right: usize },
}

/// Builds the feature vector for one pair. Infallible: failing sub-features
/// fall back to 0 and are logged at debug level.
pub fn build_features(
    resume_text: &str,
    job_text: &str,
    vectorizer: &TfidfVectorizer,
    encoder: &dyn SemanticEncoder,
) -> FeatureVector {
    let resume_clean = normalize(resume_text);
    let job_clean = normalize(job_text);

    let lexical = vectorizer
        .similarity(&resume_clean, &job_clean)
        .unwrap_or_else(|e| {
            debug!("lexical similarity unavailable: {e}");
            0.0
        });

    let resume_skills = extract_skills(resume_text);
    let job_skills = extract_skills(job_text);
    let overlap = intersection(&resume_skills, &job_skills).len();
    let skill_match_ratio = overlap as f64 / job_skills.len().max(1) as f64;

    let experience = extract_years_experience(resume_text);

    let semantic = encoder
        .similarity(
            truncate_chars(&resume_clean, SEMANTIC_PREFIX_CHARS),
            truncate_chars(&job_clean, SEMANTIC_PREFIX_CHARS),
        )
        .unwrap_or_else(|e| {
            debug!("semantic similarity unavailable: {e}");
            0.0
        });

    let resume_words = tokens(&resume_clean).len();
    let skill_density = resume_skills.len() as f64 / resume_words.max(1) as f64;

    [
        lexical,
        skill_match_ratio,
        overlap as f64,
        experience as f64,
        semantic,
        skill_density,
        title_match_ratio(&resume_clean, &job_clean),
        bigram_overlap(&resume_clean, &job_clean) as f64,
        resume_skills.len() as f64,
        job_skills.len() as f64,
    ]
}

/// Share of job tokens that are long enough and appear inside the resume text.
/// The denominator counts every job token, short ones included.
fn title_match_ratio(resume_clean: &str, job_clean: &str) -> f64 {
    let job_tokens = tokens(job_clean);
    let hits = job_tokens
        .iter()
        .filter(|t| t.chars().count() >= MIN_TITLE_TOKEN_LEN && resume_clean.contains(*t))
        .count();
    hits as f64 / job_tokens.len().max(1) as f64
}

fn bigram_overlap(resume_clean: &str, job_clean: &str) -> usize {
    let resume: HashSet<String> = bigrams(resume_clean).into_iter().collect();
    let job: HashSet<String> = bigrams(job_clean).into_iter().collect();
    resume.intersection(&job).count()
}
