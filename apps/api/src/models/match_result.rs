use serde::{Deserialize, Serialize};

use crate::career::{generate_roadmap, Resource, Roadmap};
use crate::matching::profile::DegreeLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    Low,
    Medium,
    #[serde(rename = "Medium-High")]
    MediumHigh,
    High,
}

impl Confidence {
    /// Buckets a probability in [0, 100] into a confidence level and message.
    pub fn from_probability(probability: f64) -> (Self, &'static str) {
        if probability >= 80.0 {
            (
                Confidence::High,
                "Excellent match! Your profile aligns perfectly.",
            )
        } else if probability >= 60.0 {
            (
                Confidence::MediumHigh,
                "Good match! You have strong potential.",
            )
        } else if probability >= 40.0 {
            (Confidence::Medium, "Decent match, but some gaps exist.")
        } else {
            (
                Confidence::Low,
                "Significant skill gaps found. Recommended upskilling.",
            )
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceStatus {
    Gap,
    Match,
    Exceeds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceAnalysis {
    pub resume_years: u32,
    pub job_years_required: u32,
    pub status: ExperienceStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationAnalysis {
    pub detected_degrees: Vec<DegreeLevel>,
    pub job_requirements: Vec<DegreeLevel>,
    #[serde(rename = "match")]
    pub is_match: bool,
}

/// Full response of a resume/job match. Built fresh per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub probability: f64, // 0 – 100, 2 decimals
    pub confidence: Confidence,
    pub message: String,
    pub user_skills: Vec<String>,
    pub job_required_skills: Vec<String>,
    pub matching_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub skill_recommendations: Vec<String>,
    pub skill_match_percentage: f64, // 1 decimal
    pub total_skills_found: usize,
    pub model_used: String,
    pub experience_analysis: ExperienceAnalysis,
    pub education_analysis: EducationAnalysis,
    pub soft_skills: Vec<String>,
    pub roadmap: Roadmap,
    pub resource_materials: Vec<Resource>,
    /// Set only on the degraded result produced when the pipeline faults.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl MatchResult {
    /// Zero-valued result carrying the failure reason.
    pub fn failed(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        MatchResult {
            probability: 0.0,
            confidence: Confidence::Low,
            message: reason.clone(),
            user_skills: vec![],
            job_required_skills: vec![],
            matching_skills: vec![],
            missing_skills: vec![],
            skill_recommendations: vec![],
            skill_match_percentage: 0.0,
            total_skills_found: 0,
            model_used: "None".to_string(),
            experience_analysis: ExperienceAnalysis {
                resume_years: 0,
                job_years_required: 0,
                status: ExperienceStatus::Match,
            },
            education_analysis: EducationAnalysis {
                detected_degrees: vec![],
                job_requirements: vec![],
                is_match: true,
            },
            soft_skills: vec![],
            roadmap: generate_roadmap(&[], 0),
            resource_materials: vec![],
            error: Some(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_buckets() {
        assert_eq!(Confidence::from_probability(95.0).0, Confidence::High);
        assert_eq!(Confidence::from_probability(80.0).0, Confidence::High);
        assert_eq!(Confidence::from_probability(79.99).0, Confidence::MediumHigh);
        assert_eq!(Confidence::from_probability(60.0).0, Confidence::MediumHigh);
        assert_eq!(Confidence::from_probability(40.0).0, Confidence::Medium);
        assert_eq!(Confidence::from_probability(39.9).0, Confidence::Low);
        assert_eq!(Confidence::from_probability(0.0).0, Confidence::Low);
    }

    #[test]
    fn test_confidence_serializes_with_hyphen() {
        let json = serde_json::to_string(&Confidence::MediumHigh).unwrap();
        assert_eq!(json, r#""Medium-High""#);
    }

    #[test]
    fn test_failed_result_is_well_formed() {
        let result = MatchResult::failed("boom");
        assert_eq!(result.probability, 0.0);
        assert_eq!(result.message, "boom");
        assert_eq!(result.error.as_deref(), Some("boom"));
        assert_eq!(result.model_used, "None");
        assert_eq!(result.roadmap.phases.len(), 4);
    }

    #[test]
    fn test_education_match_field_name() {
        let edu = EducationAnalysis {
            detected_degrees: vec![DegreeLevel::Bachelors],
            job_requirements: vec![],
            is_match: true,
        };
        let value = serde_json::to_value(&edu).unwrap();
        assert_eq!(value["match"], true);
        assert_eq!(value["detected_degrees"][0], "Bachelors");
    }
}
