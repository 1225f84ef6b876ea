//! Roadmap Generator: a fixed four-phase learning plan built from missing skills.

use serde::{Deserialize, Serialize};

/// Skills treated as prerequisites and scheduled first.
const FOUNDATIONAL_SKILLS: &[&str] = &["Python", "Java", "SQL", "HTML", "CSS", "JavaScript"];
const CORE_LIMIT: usize = 4;
const ADVANCED_LIMIT: usize = 4;

/// `(minimum years, total duration)`; the largest threshold not above the
/// candidate's years wins.
const DURATION_BUCKETS: &[(u32, &str)] = &[
    (0, "12 Months"),
    (1, "9 Months"),
    (3, "6 Months"),
    (5, "3 Months"),
];
const DEFAULT_DURATION: &str = "12 Months";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapPhase {
    pub title: String,
    pub period: String,
    pub focus: Vec<String>,
    pub tasks: Vec<String>,
    pub milestone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roadmap {
    pub total_duration: String,
    pub phases: Vec<RoadmapPhase>,
}

/// Builds the roadmap. Deterministic: same inputs, same plan.
pub fn generate_roadmap(missing_skills: &[String], years_experience: u32) -> Roadmap {
    let foundations: Vec<String> = missing_skills
        .iter()
        .filter(|s| FOUNDATIONAL_SKILLS.contains(&s.as_str()))
        .cloned()
        .collect();

    let core: Vec<String> = missing_skills
        .iter()
        .filter(|s| !foundations.contains(s))
        .take(CORE_LIMIT)
        .cloned()
        .collect();

    let advanced: Vec<String> = missing_skills
        .iter()
        .filter(|s| !foundations.contains(s) && !core.contains(s))
        .take(ADVANCED_LIMIT)
        .cloned()
        .collect();

    let foundation_tasks = {
        let subject = if foundations.is_empty() {
            "programming basics".to_string()
        } else {
            foundations.join(", ")
        };
        vec![
            format!("Deep dive into {subject}"),
            "Build 3 mini-utility projects".to_string(),
            "Master debugging and Git workflow".to_string(),
        ]
    };

    let core_tasks = if core.is_empty() {
        vec!["Learn and apply Industry Frameworks".to_string()]
    } else {
        core.iter().map(|s| format!("Learn and apply {s}")).collect()
    };

    let phases = vec![
        RoadmapPhase {
            title: "Phase 1: Foundations & Prerequisites".to_string(),
            period: "Months 1-2".to_string(),
            focus: or_placeholder(foundations, "Core Fundamentals"),
            tasks: foundation_tasks,
            milestone: "Portfolio Site & Basic Scripts deployed".to_string(),
        },
        RoadmapPhase {
            title: "Phase 2: Core Professional Skills".to_string(),
            period: "Months 3-5".to_string(),
            focus: or_placeholder(core, "Frameworks & Tools"),
            tasks: core_tasks,
            milestone: "Complete an end-to-end CRUD application".to_string(),
        },
        RoadmapPhase {
            title: "Phase 3: Deep Specialization".to_string(),
            period: "Months 6-8".to_string(),
            focus: or_placeholder(advanced, "Advanced Systems"),
            tasks: vec![
                "System Design fundamentals".to_string(),
                "Performance optimization".to_string(),
                "Advanced certifications".to_string(),
            ],
            milestone: "Full-stack project with cloud deployment".to_string(),
        },
        RoadmapPhase {
            title: "Phase 4: Interview & Placement".to_string(),
            period: "Months 9-12".to_string(),
            focus: vec![
                "DSA".to_string(),
                "System Design".to_string(),
                "Behavioral".to_string(),
            ],
            tasks: vec![
                "LeetCode Medium (50+ problems)".to_string(),
                "Mock Interviews".to_string(),
                "Resume optimization".to_string(),
            ],
            milestone: "Ready for high-tier company interviews".to_string(),
        },
    ];

    Roadmap {
        total_duration: total_duration(years_experience).to_string(),
        phases,
    }
}

/// Duration string for the candidate's experience bucket.
pub fn total_duration(years_experience: u32) -> &'static str {
    DURATION_BUCKETS
        .iter()
        .filter(|(threshold, _)| *threshold <= years_experience)
        .max_by_key(|(threshold, _)| *threshold)
        .map(|(_, duration)| *duration)
        .unwrap_or(DEFAULT_DURATION)
}

fn or_placeholder(skills: Vec<String>, placeholder: &str) -> Vec<String> {
    if skills.is_empty() {
        vec![placeholder.to_string()]
    } else {
        skills
    }
}
