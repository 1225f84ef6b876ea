use serde::{Deserialize, Serialize};

/// One labeled (resume, job) pair. `match_score` is in [0, 100].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub resume_text: String,
    pub job_title: String,
    pub match_score: f64,
}

impl TrainingExample {
    pub fn has_valid_score(&self) -> bool {
        self.match_score.is_finite() && (0.0..=100.0).contains(&self.match_score)
    }
}
