//! Predictor: one (resume, job) pair in, a complete `MatchResult` out.
//!
//! `calculate_match` never fails: any error or panic inside the pipeline is
//! turned into `MatchResult::failed` carrying the reason.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, error};

use crate::career::{generate_roadmap, map_resources};
use crate::matching::profile::{extract_education, extract_years_experience};
use crate::matching::recommendations::recommend_skills;
use crate::matching::scorer::{MatchError, MatchScorer, ScoringInput};
use crate::matching::skills::{extract_skills, extract_soft_skills, intersection};
use crate::models::match_result::{
    Confidence, EducationAnalysis, ExperienceAnalysis, ExperienceStatus, MatchResult,
};

const MAX_USER_SKILLS_SHOWN: usize = 20;
const MAX_MISSING_SKILLS_SHOWN: usize = 10;
/// A resume this many years over the requirement counts as exceeding it.
const EXCEEDS_MARGIN: u32 = 2;

pub fn calculate_match(scorer: &dyn MatchScorer, resume_text: &str, job_text: &str) -> MatchResult {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        try_calculate_match(scorer, resume_text, job_text)
    }))
    .unwrap_or_else(|payload| Err(MatchError::Panicked(panic_message(payload.as_ref()))));

    match outcome {
        Ok(result) => result,
        Err(e) => {
            error!("Match calculation failed: {e}");
            MatchResult::failed(format!("Error during prediction: {e}"))
        }
    }
}

fn try_calculate_match(
    scorer: &dyn MatchScorer,
    resume_text: &str,
    job_text: &str,
) -> Result<MatchResult, MatchError> {
    let mut user_skills = extract_skills(resume_text);
    let job_skills = extract_skills(job_text);
    let matching_skills = intersection(&user_skills, &job_skills);
    let mut missing_skills: Vec<String> = job_skills
        .iter()
        .filter(|s| !matching_skills.contains(s))
        .cloned()
        .collect();

    let resume_years = extract_years_experience(resume_text);
    let job_years = extract_years_experience(job_text);
    let experience_analysis = ExperienceAnalysis {
        resume_years,
        job_years_required: job_years,
        status: experience_status(resume_years, job_years),
    };

    let detected_degrees = extract_education(resume_text);
    let job_requirements = extract_education(job_text);
    let education_analysis = EducationAnalysis {
        is_match: job_requirements.is_empty()
            || job_requirements.iter().any(|d| detected_degrees.contains(d)),
        detected_degrees,
        job_requirements,
    };

    let raw = scorer.score(&ScoringInput {
        resume_text,
        job_text,
        matching_skills: matching_skills.len(),
        job_skills: job_skills.len(),
    })?;
    if !raw.is_finite() {
        return Err(MatchError::NonFinite);
    }
    let probability = round_to(raw.clamp(0.0, 100.0), 2);
    let (confidence, message) = Confidence::from_probability(probability);
    debug!(
        "{}: probability {probability} ({} of {} job skills)",
        scorer.name(),
        matching_skills.len(),
        job_skills.len()
    );

    let skill_match_percentage = round_to(
        matching_skills.len() as f64 / job_skills.len().max(1) as f64 * 100.0,
        1,
    );
    let skill_recommendations = recommend_skills(&user_skills, &missing_skills, job_text);
    let roadmap = generate_roadmap(&missing_skills, resume_years);

    let study_skills: Vec<String> = missing_skills
        .iter()
        .chain(&skill_recommendations)
        .cloned()
        .collect();
    let resource_materials = map_resources(&study_skills);

    let total_skills_found = user_skills.len();
    user_skills.truncate(MAX_USER_SKILLS_SHOWN);
    missing_skills.truncate(MAX_MISSING_SKILLS_SHOWN);

    Ok(MatchResult {
        probability,
        confidence,
        message: message.to_string(),
        user_skills,
        job_required_skills: job_skills,
        matching_skills,
        missing_skills,
        skill_recommendations,
        skill_match_percentage,
        total_skills_found,
        model_used: scorer.name().to_string(),
        experience_analysis,
        education_analysis,
        soft_skills: extract_soft_skills(resume_text),
        roadmap,
        resource_materials,
        error: None,
    })
}

fn experience_status(resume_years: u32, job_years: u32) -> ExperienceStatus {
    if resume_years < job_years {
        ExperienceStatus::Gap
    } else if resume_years >= job_years.saturating_add(EXCEEDS_MARGIN) {
        ExperienceStatus::Exceeds
    } else {
        ExperienceStatus::Match
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::matching::scorer::{ForestScorer, RuleBasedScorer};
    use crate::matching::semantic::HashedEncoder;
    use crate::matching::skills::SKILL_VOCABULARY;
    use crate::training::test_support::trained_artifact;

    const RESUME: &str =
        "Python developer with 5 years of experience in Django, Machine Learning and SQL.";
    const JOB: &str = "Senior Python Developer required with experience in Django and ML.";

    fn forest() -> ForestScorer {
        ForestScorer::new(
            Arc::new(trained_artifact()),
            Arc::new(HashedEncoder::default()),
        )
    }

    struct FixedScorer(f64);

    impl MatchScorer for FixedScorer {
        fn name(&self) -> &'static str {
            "Fixed"
        }
        fn score(&self, _: &ScoringInput<'_>) -> Result<f64, MatchError> {
            Ok(self.0)
        }
    }

    struct PanickingScorer;

    impl MatchScorer for PanickingScorer {
        fn name(&self) -> &'static str {
            "Panicking"
        }
        fn score(&self, _: &ScoringInput<'_>) -> Result<f64, MatchError> {
            panic!("tree index out of bounds")
        }
    }

    #[test]
    fn test_concrete_scenario_rule_based() {
        let result = calculate_match(&RuleBasedScorer, RESUME, JOB);

        assert!(result.probability >= 60.0, "{}", result.probability);
        assert!(result.matching_skills.contains(&"Python".to_string()));
        assert!(result.matching_skills.contains(&"Django".to_string()));
        assert_eq!(result.model_used, "Rule-Based Fallback");
        assert_eq!(result.experience_analysis.resume_years, 5);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_concrete_scenario_trained_model() {
        let result = calculate_match(&forest(), RESUME, JOB);

        assert!(result.probability >= 60.0, "{}", result.probability);
        assert!(result.matching_skills.contains(&"Python".to_string()));
        assert!(result.matching_skills.contains(&"Django".to_string()));
        assert_eq!(result.model_used, "Random Forest v2.0");
    }

    #[test]
    fn test_probability_bounds_and_rounding() {
        for raw in [-25.0, 0.0, 33.33333, 99.999, 140.0] {
            let p = calculate_match(&FixedScorer(raw), RESUME, JOB).probability;
            assert!((0.0..=100.0).contains(&p), "{raw} → {p}");
            assert_eq!(p, (p * 100.0).round() / 100.0);
        }
        assert_eq!(calculate_match(&FixedScorer(33.33333), RESUME, JOB).probability, 33.33);
    }

    #[test]
    fn test_forest_probability_bounds() {
        let scorer = forest();
        for (resume, job) in [
            ("", ""),
            ("Java", "Cyber Security"),
            (RESUME, JOB),
            ("!!!???", "Data Scientist"),
        ] {
            let p = calculate_match(&scorer, resume, job).probability;
            assert!((0.0..=100.0).contains(&p), "{p}");
        }
    }

    #[test]
    fn test_more_matching_skills_never_lower_rule_score() {
        let job = "Needs Python, Django, SQL, Docker and AWS";
        let resumes = [
            "",
            "Python",
            "Python, Django",
            "Python, Django, SQL",
            "Python, Django, SQL, Docker, AWS",
        ];
        let scores: Vec<f64> = resumes
            .iter()
            .map(|r| calculate_match(&RuleBasedScorer, r, job).probability)
            .collect();
        assert!(scores.windows(2).all(|w| w[0] <= w[1]), "{scores:?}");
        assert_eq!(scores[4], 100.0);
    }

    #[test]
    fn test_more_matching_skills_never_lower_forest_score() {
        let scorer = forest();
        let job = "Backend engineer with Python, Django, SQL and Docker";
        let resumes = [
            "Experienced in Figma, Canva, Photoshop, Jira.",
            "Experienced in Python, Django, Figma, Jira.",
            "Experienced in Python, Django, SQL, Docker.",
        ];
        let scores: Vec<f64> = resumes
            .iter()
            .map(|r| calculate_match(&scorer, r, job).probability)
            .collect();
        assert!(scores.windows(2).all(|w| w[0] < w[1]), "{scores:?}");
    }

    #[test]
    fn test_forest_ranks_full_overlap_above_none() {
        let scorer = forest();
        let full = calculate_match(&scorer, "Experienced in Python, Django, Flask, Docker.", JOB);
        let none = calculate_match(&scorer, "Experienced in Figma, Canva, Photoshop, Jira.", JOB);

        assert_eq!(full.matching_skills, vec!["Python".to_string(), "Django".to_string()]);
        assert!(none.matching_skills.is_empty());
        assert!(full.probability > none.probability, "{} vs {}", full.probability, none.probability);
        assert!(none.probability < 60.0, "{}", none.probability);
        assert_ne!(none.confidence, Confidence::MediumHigh);
        assert_ne!(none.confidence, Confidence::High);

        let job = "Python Developer with Django, SQL, Flask";
        let full = calculate_match(&scorer, "Python, Django, SQL and Flask. 3 years", job);
        let none = calculate_match(&scorer, "Photoshop, Canva, Figma 3 years", job);
        assert!(full.probability > none.probability, "{} vs {}", full.probability, none.probability);
    }

    #[test]
    fn test_skill_match_percentage_exact() {
        let result = calculate_match(
            &RuleBasedScorer,
            "Python and SQL",
            "Python, Django and SQL required",
        );
        assert_eq!(result.skill_match_percentage, 66.7);
        assert_eq!(result.missing_skills, vec!["Django".to_string()]);
    }

    #[test]
    fn test_no_job_skills() {
        let result = calculate_match(&RuleBasedScorer, "Python", "Office Manager");
        assert_eq!(result.skill_match_percentage, 0.0);
        assert_eq!(result.probability, 0.0);
        assert!(result.job_required_skills.is_empty());
    }

    #[test]
    fn test_education_bachelors_match() {
        let result = calculate_match(&RuleBasedScorer, "B.Tech CS graduate", "requires Bachelors");
        assert!(result.education_analysis.is_match);
    }

    #[test]
    fn test_education_missing_degree() {
        let result = calculate_match(&RuleBasedScorer, "Self taught", "PhD required");
        assert!(!result.education_analysis.is_match);
        let result = calculate_match(&RuleBasedScorer, "Self taught", "Engineer");
        assert!(result.education_analysis.is_match);
    }

    #[test]
    fn test_experience_statuses() {
        let status = |r: &str, j: &str| {
            calculate_match(&RuleBasedScorer, r, j).experience_analysis.status
        };
        assert_eq!(status("5 years experience", "3 years required"), ExperienceStatus::Exceeds);
        assert_eq!(status("4 years experience", "3 years required"), ExperienceStatus::Match);
        assert_eq!(status("3 years experience", "3 years required"), ExperienceStatus::Match);
        assert_eq!(status("1 year experience", "3 years required"), ExperienceStatus::Gap);
    }

    #[test]
    fn test_inference_is_idempotent() {
        let scorer = forest();
        let a = calculate_match(&scorer, RESUME, JOB);
        let b = calculate_match(&scorer, RESUME, JOB);
        assert_eq!(a, b);
    }

    #[test]
    fn test_roadmap_and_resources_attached() {
        let result = calculate_match(&RuleBasedScorer, "Python", "Python, Docker, Kubernetes, AWS");
        assert_eq!(result.roadmap.phases.len(), 4);
        assert_eq!(result.roadmap.total_duration, "12 Months");
        assert!(result.resource_materials.len() >= 3);
        assert!(result.resource_materials.len() <= 8);
        assert!(result.resource_materials.iter().any(|r| r.name == "Docker Mastery"));
    }

    #[test]
    fn test_display_lists_truncated() {
        let every_skill: Vec<&str> = SKILL_VOCABULARY.iter().map(|(pattern, _)| *pattern).collect();
        let job = every_skill.join(", ");

        let result = calculate_match(&RuleBasedScorer, &job, &job);
        assert!(result.user_skills.len() <= 20);
        assert!(result.total_skills_found > 20);

        let result = calculate_match(&RuleBasedScorer, "", &job);
        assert!(result.missing_skills.len() <= 10);
        assert!(result.skill_recommendations.len() <= 10);
        assert!(result.job_required_skills.len() > 10);
    }

    #[test]
    fn test_non_finite_score_degrades() {
        let result = calculate_match(&FixedScorer(f64::NAN), RESUME, JOB);
        assert_eq!(result.probability, 0.0);
        assert_eq!(result.model_used, "None");
        assert!(result.error.is_some());
    }

    #[test]
    fn test_panic_degrades_to_error_result() {
        let result = calculate_match(&PanickingScorer, RESUME, JOB);
        assert_eq!(result.probability, 0.0);
        assert_eq!(result.model_used, "None");
        let reason = result.error.unwrap();
        assert!(reason.contains("tree index out of bounds"), "{reason}");
    }
}
