//! Skill Extractor: maps free text onto a fixed skill vocabulary.
//!
//! Matching is whole-word over normalized text: both the text and each
//! vocabulary entry go through the same normalization, so `node.js` in a resume
//! matches the `node.js` entry as `node js`, and `java` never matches inside
//! `javascript`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::matching::normalize::normalize;

/// `(pattern, display name)` pairs. Order is the output order of `extract_skills`.
pub const SKILL_VOCABULARY: &[(&str, &str)] = &[
    // Programming
    ("python", "Python"),
    ("java", "Java"),
    ("javascript", "JavaScript"),
    ("c++", "C++"),
    ("c#", "C#"),
    ("ruby", "Ruby"),
    ("php", "PHP"),
    ("swift", "Swift"),
    ("kotlin", "Kotlin"),
    ("go", "Go"),
    ("golang", "Golang"),
    ("rust", "Rust"),
    ("typescript", "TypeScript"),
    ("scala", "Scala"),
    ("r programming", "R Programming"),
    ("dart", "Dart"),
    ("assembly", "Assembly"),
    // Web
    ("html", "HTML"),
    ("html5", "HTML5"),
    ("css", "CSS"),
    ("css3", "CSS3"),
    ("react", "React"),
    ("angular", "Angular"),
    ("vue", "Vue"),
    ("vue.js", "Vue.js"),
    ("node.js", "Node.js"),
    ("express", "Express"),
    ("django", "Django"),
    ("flask", "Flask"),
    ("fastapi", "FastAPI"),
    ("spring boot", "Spring Boot"),
    ("hibernate", "Hibernate"),
    ("maven", "Maven"),
    ("asp.net", "ASP.NET"),
    ("laravel", "Laravel"),
    ("next.js", "Next.js"),
    ("nuxt", "Nuxt"),
    ("redux", "Redux"),
    ("graphql", "GraphQL"),
    ("rest api", "REST API"),
    ("webpack", "Webpack"),
    ("babel", "Babel"),
    ("tailwind", "Tailwind"),
    // Mobile
    ("android", "Android"),
    ("ios", "iOS"),
    ("flutter", "Flutter"),
    ("react native", "React Native"),
    ("xamarin", "Xamarin"),
    ("ionic", "Ionic"),
    // Data science
    ("machine learning", "Machine Learning"),
    ("deep learning", "Deep Learning"),
    ("data science", "Data Science"),
    ("data analysis", "Data Analysis"),
    ("statistics", "Statistics"),
    ("pandas", "Pandas"),
    ("numpy", "NumPy"),
    ("scipy", "SciPy"),
    ("matplotlib", "Matplotlib"),
    ("seaborn", "Seaborn"),
    ("tensorflow", "TensorFlow"),
    ("pytorch", "PyTorch"),
    ("keras", "Keras"),
    ("scikit-learn", "Scikit-Learn"),
    ("jupyter", "Jupyter"),
    ("xgboost", "XGBoost"),
    ("computer vision", "Computer Vision"),
    ("nlp", "NLP"),
    ("opencv", "OpenCV"),
    ("natural language processing", "Natural Language Processing"),
    ("neural networks", "Neural Networks"),
    ("cnn", "CNN"),
    ("rnn", "RNN"),
    ("lstm", "LSTM"),
    ("bert", "BERT"),
    ("llm", "LLM"),
    // Databases
    ("sql", "SQL"),
    ("mysql", "MySQL"),
    ("postgresql", "PostgreSQL"),
    ("mongodb", "MongoDB"),
    ("redis", "Redis"),
    ("kafka", "Kafka"),
    ("celery", "Celery"),
    ("cassandra", "Cassandra"),
    ("oracle", "Oracle"),
    ("dynamodb", "DynamoDB"),
    ("elasticsearch", "Elasticsearch"),
    ("firebase", "Firebase"),
    ("sqlite", "SQLite"),
    ("neo4j", "Neo4j"),
    // Cloud & DevOps
    ("aws", "AWS"),
    ("azure", "Azure"),
    ("gcp", "GCP"),
    ("google cloud", "Google Cloud"),
    ("docker", "Docker"),
    ("kubernetes", "Kubernetes"),
    ("jenkins", "Jenkins"),
    ("ci/cd", "CI/CD"),
    ("terraform", "Terraform"),
    ("ansible", "Ansible"),
    ("gitlab", "GitLab"),
    ("github actions", "GitHub Actions"),
    ("ec2", "EC2"),
    ("s3", "S3"),
    ("lambda", "Lambda"),
    ("cloudformation", "CloudFormation"),
    ("microservices", "Microservices"),
    ("serverless", "Serverless"),
    ("prometheus", "Prometheus"),
    ("grafana", "Grafana"),
    ("system design", "System Design"),
    ("load balancing", "Load Balancing"),
    ("networking", "Networking"),
    // Security
    ("network security", "Network Security"),
    ("penetration testing", "Penetration Testing"),
    ("ethical hacking", "Ethical Hacking"),
    ("cryptography", "Cryptography"),
    ("firewalls", "Firewalls"),
    ("wireshark", "Wireshark"),
    // Tools
    ("git", "Git"),
    ("github", "GitHub"),
    ("jira", "Jira"),
    ("postman", "Postman"),
    ("swagger", "Swagger"),
    ("linux", "Linux"),
    ("bash", "Bash"),
    ("vim", "Vim"),
    ("vscode", "VSCode"),
    // Quality assurance
    ("selenium", "Selenium"),
    ("junit", "JUnit"),
    ("pytest", "Pytest"),
    ("jest", "Jest"),
    ("cypress", "Cypress"),
    ("testing", "Testing"),
    ("tdd", "TDD"),
    ("bdd", "BDD"),
    ("manual testing", "Manual Testing"),
    ("jmeter", "JMeter"),
    ("testng", "TestNG"),
    ("appium", "Appium"),
    // Soft skills & management
    ("agile", "Agile"),
    ("scrum", "Scrum"),
    ("leadership", "Leadership"),
    ("communication", "Communication"),
    ("problem solving", "Problem Solving"),
    ("project management", "Project Management"),
    ("ui/ux", "UI/UX"),
    ("figma", "Figma"),
    ("canva", "Canva"),
    ("photoshop", "Photoshop"),
];

const SOFT_SKILLS: &[&str] = &[
    "communication",
    "leadership",
    "teamwork",
    "problem solving",
    "adaptability",
    "critical thinking",
    "time management",
    "collaboration",
    "creativity",
    "mentoring",
    "agile",
    "scrum",
    "presentation",
];

// `c++` and `c#` lose their punctuation during normalization; rewrite them to
// word tokens first so they do not collapse into a bare `c`.
static CPP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bc\+\+").expect("valid c++ pattern"));
static CSHARP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bc#").expect("valid c# pattern"));

/// Vocabulary entries pre-normalized into their padded match form (`" node js "`).
static MATCH_FORMS: Lazy<Vec<(String, &'static str)>> = Lazy::new(|| {
    SKILL_VOCABULARY
        .iter()
        .map(|(pattern, display)| (padded(&skill_text(pattern)), *display))
        .collect()
});

/// Normalizes text for skill matching, keeping `c++`/`c#` as distinct tokens.
pub fn skill_text(text: &str) -> String {
    let lower = text.to_lowercase();
    let protected = CPP_RE.replace_all(&lower, " cplusplus ");
    let protected = CSHARP_RE.replace_all(&protected, " csharp ");
    normalize(&protected)
}

/// Collapses whitespace and pads with single spaces so `contains(" x ")` is a
/// whole-word test.
fn padded(normalized: &str) -> String {
    let joined = normalized.split_whitespace().collect::<Vec<_>>().join(" ");
    format!(" {joined} ")
}

/// Extracts the canonical names of every vocabulary skill mentioned in `text`.
///
/// Output follows vocabulary order and contains no duplicates.
pub fn extract_skills(text: &str) -> Vec<String> {
    let haystack = padded(&skill_text(text));
    if haystack.trim().is_empty() {
        return Vec::new();
    }

    let mut found: Vec<String> = Vec::new();
    for (form, display) in MATCH_FORMS.iter() {
        if form.trim().is_empty() {
            continue;
        }
        if haystack.contains(form.as_str()) && !found.iter().any(|s| s.as_str() == *display) {
            found.push((*display).to_string());
        }
    }
    found
}

/// Substring scan for soft skills, returned title-cased.
pub fn extract_soft_skills(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    SOFT_SKILLS
        .iter()
        .filter(|skill| lower.contains(*skill))
        .map(|skill| title_case(skill))
        .collect()
}

/// `"problem solving"` → `"Problem Solving"`.
pub fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Skills present in both sets, in `job_skills` order.
pub fn intersection(resume_skills: &[String], job_skills: &[String]) -> Vec<String> {
    job_skills
        .iter()
        .filter(|s| resume_skills.contains(s))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_vocabulary_entry_is_found_in_a_sentence() {
        for (pattern, display) in SKILL_VOCABULARY {
            let found = extract_skills(&format!("I know {pattern}"));
            assert!(
                found.iter().any(|s| s == display),
                "'{pattern}' should yield '{display}', got {found:?}"
            );
        }
    }

    #[test]
    fn test_javascripter_does_not_match_java() {
        let found = extract_skills("javascripter");
        assert!(!found.contains(&"Java".to_string()));
    }

    #[test]
    fn test_javascript_does_not_imply_java() {
        let found = extract_skills("Senior JavaScript engineer");
        assert!(found.contains(&"JavaScript".to_string()));
        assert!(!found.contains(&"Java".to_string()));
    }

    #[test]
    fn test_slash_joined_skills_are_separated() {
        let found = extract_skills("Python/Django");
        assert!(found.contains(&"Python".to_string()));
        assert!(found.contains(&"Django".to_string()));
    }

    #[test]
    fn test_cpp_and_csharp_stay_distinct() {
        let found = extract_skills("Worked in C++ daily");
        assert!(found.contains(&"C++".to_string()));
        assert!(!found.contains(&"C#".to_string()));

        let found = extract_skills("Built services in C#.");
        assert!(found.contains(&"C#".to_string()));
        assert!(!found.contains(&"C++".to_string()));
    }

    #[test]
    fn test_case_insensitive() {
        let found = extract_skills("KUBERNETES and docker");
        assert_eq!(found, vec!["Docker".to_string(), "Kubernetes".to_string()]);
    }

    #[test]
    fn test_no_duplicates() {
        let found = extract_skills("python python PYTHON");
        assert_eq!(found, vec!["Python".to_string()]);
    }

    #[test]
    fn test_empty_text_has_no_skills() {
        assert!(extract_skills("").is_empty());
        assert!(extract_skills("!!! ???").is_empty());
    }

    #[test]
    fn test_soft_skills_substring_scan() {
        let found = extract_soft_skills("Strong Communication and team leadership; agile mentoring.");
        assert_eq!(
            found,
            vec!["Communication", "Leadership", "Mentoring", "Agile"]
                .into_iter()
                .map(String::from)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("problem solving"), "Problem Solving");
        assert_eq!(title_case("agile"), "Agile");
    }

    #[test]
    fn test_intersection_preserves_job_order() {
        let resume = vec!["SQL".to_string(), "Python".to_string()];
        let job = vec!["Python".to_string(), "Docker".to_string(), "SQL".to_string()];
        assert_eq!(intersection(&resume, &job), vec!["Python", "SQL"]);
    }
}
