//! Synthetic Data Generator: stratified, labeled (resume, job posting, score)
//! rows for when the real dataset is too small to train on.
//!
//! Each row pairs a short posting for one role (the role plus a few of its
//! skills) with a resume. Three scenarios keep every score band represented:
//! - high match (~60%): at least 70% of the posting's skills, score 75–98
//! - medium match (~28%): some but under 70% of them, score 45–70
//! - low match (~12%): another role's skills, none shared, score 10–35
//!
//! Every scenario writes its resume from the same phrase pool, so only the
//! skill overlap and the years carry the label.

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::matching::skills::{extract_skills, SKILL_VOCABULARY};
use crate::models::training::TrainingExample;

/// Canonical roles and the skills a strong candidate for each would list.
/// Every skill here is a vocabulary entry.
pub const ROLE_TEMPLATES: &[(&str, &[&str])] = &[
    (
        "Python Developer",
        &["Python", "Django", "Flask", "SQL", "REST API", "Redis", "Celery", "PostgreSQL"],
    ),
    (
        "Java Developer",
        &["Java", "Spring Boot", "Hibernate", "Microservices", "Maven", "Kafka", "JUnit"],
    ),
    (
        "Frontend Developer",
        &["React", "JavaScript", "HTML5", "CSS3", "Redux", "TypeScript", "Webpack", "Figma"],
    ),
    (
        "Data Scientist",
        &["Python", "Pandas", "NumPy", "Scikit-learn", "TensorFlow", "PyTorch", "Jupyter", "Statistics"],
    ),
    (
        "DevOps Engineer",
        &["Docker", "Kubernetes", "AWS", "Terraform", "Jenkins", "Linux", "Bash", "CI/CD"],
    ),
    (
        "Mobile Developer",
        &["Flutter", "Dart", "Firebase", "Android", "iOS", "Swift", "Kotlin", "Ionic"],
    ),
    (
        "QA Engineer",
        &["Selenium", "Python", "Java", "JMeter", "TestNG", "Appium", "Cypress", "Jira"],
    ),
    (
        "Cloud Architect",
        &["AWS", "Azure", "Google Cloud", "System Design", "Serverless", "Networking", "Load Balancing"],
    ),
    (
        "Cyber Security",
        &["Network Security", "Ethical Hacking", "Firewalls", "Wireshark", "Cryptography", "Linux", "Bash"],
    ),
    (
        "Full Stack Developer",
        &["React", "Node.js", "Express", "MongoDB", "Python", "AWS", "Git", "REST API"],
    ),
];

/// `(min years, max years)` for start, junior, mid, senior and lead levels.
const EXPERIENCE_LEVELS: &[(u32, u32)] = &[(0, 1), (1, 3), (3, 5), (5, 8), (8, 15)];

const JOB_PHRASES: &[&str] = &[
    "{role} required with experience in {skills}.",
    "Hiring a {role} skilled in {skills}.",
    "{role}. Must know {skills}.",
    "We are looking for a {role} familiar with {skills}.",
];

const RESUME_PHRASES: &[&str] = &[
    "Experienced in {skills}.",
    "Proficient in {skills}.",
    "Skilled engineer with {years} years of experience. Tech stack: {skills}.",
    "Professional summary: {years}+ years in industry working with {skills}.",
    "Looking for a challenging role. Key skills: {skills}.",
    "Software engineer, {years} yrs. Hands-on with {skills}.",
    "Background in software development. Familiar with {skills}.",
];

/// Number of role skills a generated posting lists.
const MIN_JOB_SKILLS: usize = 2;
const MAX_JOB_SKILLS: usize = 5;

const HIGH_MATCH_CUTOFF: f64 = 0.4;
const MEDIUM_MATCH_CUTOFF: f64 = 0.3;

/// Every vocabulary display name with the skills it extracts to.
static VOCABULARY_SKILLS: Lazy<Vec<(&'static str, Vec<String>)>> = Lazy::new(|| {
    SKILL_VOCABULARY
        .iter()
        .map(|(_, name)| (*name, extract_skills(name)))
        .collect()
});

/// Seeded generator: the same seed always produces the same rows.
pub struct SyntheticGenerator {
    rng: StdRng,
}

impl SyntheticGenerator {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn generate(&mut self, count: usize) -> Vec<TrainingExample> {
        (0..count).map(|_| self.next_example()).collect()
    }

    fn next_example(&mut self) -> TrainingExample {
        let role_idx = self.rng.gen_range(0..ROLE_TEMPLATES.len());
        let (role, skills) = ROLE_TEMPLATES[role_idx];

        let listed = self.rng.gen_range(MIN_JOB_SKILLS..=MAX_JOB_SKILLS.min(skills.len()));
        let listed = self.sample(skills, listed);
        let job_text = self.fill(JOB_PHRASES, role, 0, &listed);
        let required = extract_skills(&job_text);

        let (resume_text, match_score) = if self.rng.gen::<f64>() > HIGH_MATCH_CUTOFF {
            self.high_match(&required)
        } else if self.rng.gen::<f64>() > MEDIUM_MATCH_CUTOFF {
            self.medium_match(&required)
        } else {
            self.low_match(role_idx, &required)
        };

        TrainingExample {
            resume_text,
            job_title: job_text,
            match_score,
        }
    }

    fn high_match(&mut self, required: &[String]) -> (String, f64) {
        let n = required.len();
        let min_k = ((n as f64 * 0.7).ceil() as usize).min(n);
        let k = self.rng.gen_range(min_k..=n);
        let mut picked = self.sample(required, k);

        let extras = self.rng.gen_range(1..=3);
        picked.extend(self.unrelated(required, extras));
        picked.shuffle(&mut self.rng);

        let years = self.years_between(2, EXPERIENCE_LEVELS.len());
        let score = self.rng.gen_range(75..=98) as f64;
        (self.fill(RESUME_PHRASES, "", years, &picked), score)
    }

    fn medium_match(&mut self, required: &[String]) -> (String, f64) {
        let n = required.len();
        let min_k = ((n as f64 * 0.4) as usize).max(1);
        let max_k = ((n as f64 * 0.6) as usize).max(min_k);
        let k = self.rng.gen_range(min_k..=max_k);
        let mut picked = self.sample(required, k);

        let extras = self.rng.gen_range(0..=2);
        picked.extend(self.unrelated(required, extras));
        picked.shuffle(&mut self.rng);

        let years = self.years_between(0, 3);
        let score = self.rng.gen_range(45..=70) as f64;
        (self.fill(RESUME_PHRASES, "", years, &picked), score)
    }

    /// Resume written for a different role than the target, sharing none of
    /// the posting's skills.
    fn low_match(&mut self, target_idx: usize, required: &[String]) -> (String, f64) {
        let others: Vec<usize> = (0..ROLE_TEMPLATES.len()).filter(|i| *i != target_idx).collect();
        let other_idx = *others.choose(&mut self.rng).unwrap_or(&target_idx);
        let (_, other_skills) = ROLE_TEMPLATES[other_idx];

        let pool: Vec<&str> = other_skills
            .iter()
            .copied()
            .filter(|skill| !overlaps(&extract_skills(skill), required))
            .collect();
        let k = self.rng.gen_range(2..=4);
        let mut picked = self.sample(&pool, k);
        if picked.len() < k {
            let short = k - picked.len();
            picked.extend(self.unrelated(required, short));
        }

        let years = self.rng.gen_range(0..=5);
        let score = self.rng.gen_range(10..=35) as f64;
        (self.fill(RESUME_PHRASES, "", years, &picked), score)
    }

    /// Vocabulary skills that extract to nothing in `required`.
    fn unrelated(&mut self, required: &[String], count: usize) -> Vec<String> {
        let pool: Vec<&str> = VOCABULARY_SKILLS
            .iter()
            .filter(|(_, extracted)| !overlaps(extracted, required))
            .map(|(name, _)| *name)
            .collect();
        self.sample(&pool, count)
    }

    /// Years drawn from a random level in `EXPERIENCE_LEVELS[from..to]`.
    fn years_between(&mut self, from: usize, to: usize) -> u32 {
        let (min_y, max_y) = EXPERIENCE_LEVELS[self.rng.gen_range(from..to)];
        self.rng.gen_range(min_y..=max_y)
    }

    fn sample<S: AsRef<str>>(&mut self, pool: &[S], k: usize) -> Vec<String> {
        pool.choose_multiple(&mut self.rng, k)
            .map(|s| s.as_ref().to_string())
            .collect()
    }

    fn fill(&mut self, phrases: &[&str], role: &str, years: u32, skills: &[String]) -> String {
        let phrase = phrases.choose(&mut self.rng).copied().unwrap_or("{skills}");
        phrase
            .replace("{role}", role)
            .replace("{years}", &years.to_string())
            .replace("{skills}", &skills.join(", "))
    }
}

fn overlaps(skills: &[String], required: &[String]) -> bool {
    skills.iter().any(|s| required.contains(s))
}
