// Matching: text analysis, feature extraction and scoring of a resume
// against a target job, plus the HTTP handlers that expose it.

pub mod features;
pub mod handlers;
pub mod normalize;
pub mod predictor;
pub mod profile;
pub mod recommendations;
pub mod scorer;
pub mod semantic;
pub mod skills;
pub mod vectorizer;
