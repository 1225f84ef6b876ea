//! Resource Mapper: curated study material per skill.

use serde::{Deserialize, Serialize};

pub const MAX_RESOURCES: usize = 8;
const MIN_RESOURCES: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    pub platform: String,
    pub url: String,
}

/// `skill → [(name, platform, url)]`, keyed by canonical skill display name.
const RESOURCE_TABLE: &[(&str, &[(&str, &str, &str)])] = &[
    (
        "Python",
        &[
            ("Python for Everybody Specialization", "Coursera", "https://www.coursera.org/specializations/python"),
            ("Automate the Boring Stuff with Python", "Book/Online", "https://automatetheboringstuff.com/"),
        ],
    ),
    (
        "Django",
        &[
            ("Django for Beginners", "Book", "https://djangoforbeginners.com/"),
            ("Django Certification Training", "Edureka", "https://www.edureka.co/django-certification-training"),
        ],
    ),
    (
        "Machine Learning",
        &[
            ("Machine Learning Specialization (Andrew Ng)", "Coursera", "https://www.coursera.org/specializations/machine-learning-introduction"),
            ("Practical Deep Learning for Coders", "Fast.ai", "https://www.fast.ai/"),
        ],
    ),
    (
        "Data Science",
        &[
            ("Google Data Analytics Professional Certificate", "Coursera", "https://www.coursera.org/professional-certificates/google-data-analytics"),
            ("Data Science A-Z", "Udemy", "https://www.udemy.com/course/datascience/"),
        ],
    ),
    (
        "React",
        &[
            ("Modern React with Redux", "Udemy", "https://www.udemy.com/course/react-redux/"),
            ("React Documentation", "Official", "https://react.dev/"),
        ],
    ),
    (
        "AWS",
        &[
            ("AWS Certified Solutions Architect", "A Cloud Guru", "https://www.pluralsight.com/cloud-computing/cloud-guru"),
            ("AWS Cloud Practitioner Essentials", "AWS Training", "https://explore.skillbuilder.aws/"),
        ],
    ),
    (
        "Docker",
        &[
            ("Docker Mastery", "Udemy", "https://www.udemy.com/course/docker-mastery/"),
            ("Docker for Beginners", "Docker Docs", "https://docs.docker.com/get-started/"),
        ],
    ),
    (
        "Kubernetes",
        &[
            ("Certified Kubernetes Administrator (CKA)", "KodeKloud", "https://kodekloud.com/courses/certified-kubernetes-administrator-cka/"),
            ("Kubernetes Basics", "Official", "https://kubernetes.io/docs/tutorials/kubernetes-basics/"),
        ],
    ),
    (
        "SQL",
        &[
            ("SQL for Data Science", "Coursera", "https://www.coursera.org/learn/sql-for-data-science"),
            ("Complete SQL Bootcamp", "Udemy", "https://www.udemy.com/course/the-complete-sql-bootcamp/"),
        ],
    ),
    (
        "Java",
        &[
            ("Java Programming and Software Engineering Fundamentals", "Coursera", "https://www.coursera.org/specializations/java-programming"),
            ("Spring Framework 6 & Spring Boot 3", "Udemy", "https://www.udemy.com/course/spring-hibernate-tutorial/"),
        ],
    ),
    (
        "TensorFlow",
        &[(
            "TensorFlow Developer Professional Certificate",
            "Coursera",
            "https://www.coursera.org/professional-certificates/tensorflow-in-practice",
        )],
    ),
    (
        "Cyber Security",
        &[
            ("Google Cybersecurity Professional Certificate", "Coursera", "https://www.coursera.org/professional-certificates/google-cybersecurity"),
            ("CompTIA Security+ (SY0-701) Complete Course", "Udemy", "https://www.udemy.com/course/securityplus/"),
        ],
    ),
];

const FALLBACK_RESOURCES: &[(&str, &str, &str)] = &[
    ("LeetCode", "Practice", "https://leetcode.com"),
    ("FreeCodeCamp", "Courses", "https://www.freecodecamp.org"),
];

/// Maps skills to curated resources, de-duplicated by name.
///
/// Pads with generic resources when fewer than 3 match; never returns more than 8.
pub fn map_resources(skills: &[String]) -> Vec<Resource> {
    let mut resources: Vec<Resource> = Vec::new();

    for skill in skills {
        let Some((_, entries)) = RESOURCE_TABLE
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(skill))
        else {
            continue;
        };
        for entry in entries.iter() {
            if !resources.iter().any(|r| r.name == entry.0) {
                resources.push(to_resource(entry));
            }
        }
    }

    if resources.len() < MIN_RESOURCES {
        for entry in FALLBACK_RESOURCES {
            if !resources.iter().any(|r| r.name == entry.0) {
                resources.push(to_resource(entry));
            }
        }
    }

    resources.truncate(MAX_RESOURCES);
    resources
}

fn to_resource((name, platform, url): &(&str, &str, &str)) -> Resource {
    Resource {
        name: name.to_string(),
        platform: platform.to_string(),
        url: url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_known_skill_maps_to_entries() {
        let res = map_resources(&skills(&["Docker", "Kubernetes"]));
        assert_eq!(res.len(), 4);
        assert_eq!(res[0].name, "Docker Mastery");
        assert!(res.iter().all(|r| r.url.starts_with("https://")));
    }

    #[test]
    fn test_unknown_skills_get_fallbacks() {
        let res = map_resources(&skills(&["Cobol"]));
        let names: Vec<&str> = res.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["LeetCode", "FreeCodeCamp"]);
    }

    #[test]
    fn test_few_matches_are_padded() {
        let res = map_resources(&skills(&["TensorFlow"]));
        assert_eq!(res.len(), 3);
        assert_eq!(res[1].name, "LeetCode");
    }

    #[test]
    fn test_duplicates_removed() {
        let res = map_resources(&skills(&["SQL", "SQL", "sql"]));
        assert_eq!(res.len(), 2);
    }

    #[test]
    fn test_capped_at_eight() {
        let res = map_resources(&skills(&[
            "Python", "Django", "Machine Learning", "React", "AWS", "Docker",
        ]));
        assert_eq!(res.len(), MAX_RESOURCES);
        assert_eq!(res[0].name, "Python for Everybody Specialization");
    }
}
