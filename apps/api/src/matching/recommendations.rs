//! Skill recommendations: the first few missing skills, then domain staples
//! for any role keyword found in the job text.

pub const MAX_RECOMMENDATIONS: usize = 10;
const MISSING_FIRST: usize = 6;

/// Role keyword (matched as a substring of the lowercased job text) → skills.
const DOMAIN_SKILLS: &[(&str, &[&str])] = &[
    ("data scientist", &["Python", "Machine Learning", "SQL", "Pandas", "TensorFlow", "Statistics"]),
    ("data analyst", &["Excel", "SQL", "Python", "Tableau", "Power BI"]),
    ("frontend", &["React", "JavaScript", "HTML", "CSS", "TypeScript", "Redux", "Figma"]),
    ("react", &["Redux", "TypeScript", "Next.js", "Tailwind"]),
    ("backend", &["Python", "Java", "Node.js", "SQL", "Docker", "API"]),
    ("full stack", &["React", "Node.js", "SQL", "Docker", "Git"]),
    ("devops", &["AWS", "Docker", "Kubernetes", "CI/CD", "Linux", "Terraform"]),
    ("java", &["Spring Boot", "Hibernate", "Microservices", "SQL", "Maven"]),
    ("python", &["Django", "Flask", "SQL", "Pandas", "API"]),
    ("android", &["Kotlin", "Java", "Android SDK", "Firebase", "MVVM"]),
    ("ios", &["Swift", "SwiftUI", "Xcode", "Core Data"]),
];

pub fn recommend_skills(
    user_skills: &[String],
    missing_skills: &[String],
    job_text: &str,
) -> Vec<String> {
    let mut recommended: Vec<String> = missing_skills.iter().take(MISSING_FIRST).cloned().collect();
    let job_lower = job_text.to_lowercase();

    let known = |skill: &str, recommended: &[String]| -> bool {
        user_skills
            .iter()
            .chain(recommended)
            .any(|s| s.eq_ignore_ascii_case(skill))
    };

    for (role, skills) in DOMAIN_SKILLS {
        if !job_lower.contains(*role) {
            continue;
        }
        for &skill in skills.iter() {
            if !known(skill, &recommended) {
                recommended.push(skill.to_string());
            }
        }
    }

    recommended.truncate(MAX_RECOMMENDATIONS);
    recommended
}
