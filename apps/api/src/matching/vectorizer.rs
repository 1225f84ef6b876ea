//! TF-IDF vectorizer fitted once by the trainer and shipped inside the model
//! artifact, so inference reuses the exact vocabulary and IDF weights.

use std::collections::{BTreeMap, HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::matching::features::FeatureError;

pub const DEFAULT_MAX_FEATURES: usize = 2000;

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("valid token pattern"));

const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "either",
    "etc", "few", "for", "from", "further", "had", "has", "have", "having", "he", "her", "here",
    "hers", "herself", "him", "himself", "his", "how", "however", "if", "in", "into", "is", "it",
    "its", "itself", "just", "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of",
    "off", "on", "once", "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own",
    "same", "she", "should", "so", "some", "such", "than", "that", "the", "their", "theirs",
    "them", "themselves", "then", "there", "these", "they", "this", "those", "through", "to",
    "too", "under", "until", "up", "very", "was", "we", "well", "were", "what", "when", "where",
    "which", "while", "who", "whom", "why", "will", "with", "within", "would", "you", "your",
    "yours", "yourself", "yourselves",
];

static STOP_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| STOP_WORDS.iter().copied().collect());

/// Sparse TF-IDF vector: `(term index, weight)` sorted by index, L2-normalized.
pub type SparseVector = Vec<(usize, f64)>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    /// term → column index
    vocabulary: BTreeMap<String, usize>,
    /// IDF weight per column
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Fits unigram + bigram vocabulary and smoothed IDF over `documents`.
    ///
    /// Keeps the `max_features` most frequent terms across the corpus, ties
    /// broken alphabetically.
    pub fn fit<S: AsRef<str>>(documents: &[S], max_features: usize) -> Self {
        let n_docs = documents.len() as f64;
        let mut term_freq: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let terms = analyze(doc.as_ref());
            let mut seen: HashSet<&str> = HashSet::new();
            for term in &terms {
                *term_freq.entry(term.clone()).or_insert(0) += 1;
                if seen.insert(term.as_str()) {
                    *doc_freq.entry(term.clone()).or_insert(0) += 1;
                }
            }
        }

        let mut ranked: Vec<(String, usize)> = term_freq.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(max_features);

        let mut kept: Vec<String> = ranked.into_iter().map(|(term, _)| term).collect();
        kept.sort();

        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(kept.len());
        for (idx, term) in kept.into_iter().enumerate() {
            let df = doc_freq.get(&term).copied().unwrap_or(0) as f64;
            idf.push(((1.0 + n_docs) / (1.0 + df)).ln() + 1.0);
            vocabulary.insert(term, idx);
        }

        Self { vocabulary, idf }
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Transforms one document into its L2-normalized TF-IDF vector.
    pub fn transform(&self, text: &str) -> Result<SparseVector, FeatureError> {
        if self.vocabulary.is_empty() {
            return Err(FeatureError::EmptyVocabulary);
        }

        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in analyze(text) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let mut vector: SparseVector = counts
            .into_iter()
            .map(|(idx, tf)| (idx, tf * self.idf[idx]))
            .collect();

        let norm = vector.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm == 0.0 {
            return Err(FeatureError::NoKnownTerms);
        }
        for (_, w) in vector.iter_mut() {
            *w /= norm;
        }
        Ok(vector)
    }

    /// Cosine similarity of two documents under the fitted vocabulary.
    pub fn similarity(&self, left: &str, right: &str) -> Result<f64, FeatureError> {
        let a = self.transform(left)?;
        let b = self.transform(right)?;
        Ok(sparse_dot(&a, &b))
    }
}

/// Dot product of two index-sorted sparse vectors.
fn sparse_dot(a: &SparseVector, b: &SparseVector) -> f64 {
    let (mut i, mut j) = (0, 0);
    let mut dot = 0.0;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                dot += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    dot
}

/// Lowercased tokens of 2+ word characters, stop words removed, followed by
/// the bigrams of that filtered token stream.
fn analyze(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let unigrams: Vec<&str> = TOKEN_RE
        .find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|t| !STOP_SET.contains(*t))
        .collect();

    let mut terms: Vec<String> = unigrams.iter().map(|t| t.to_string()).collect();
    terms.extend(unigrams.windows(2).map(|w| format!("{} {}", w[0], w[1])));
    terms
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<&'static str> {
        vec![
            "python developer with django and sql",
            "java developer with spring boot",
            "frontend developer react javascript",
            "Python Developer",
        ]
    }

    #[test]
    fn test_analyze_drops_stop_words_and_single_chars() {
        let terms = analyze("I am a Python developer");
        assert_eq!(terms, vec!["python", "developer", "python developer"]);
    }

    #[test]
    fn test_fit_respects_max_features() {
        let vec = TfidfVectorizer::fit(&corpus(), 5);
        assert_eq!(vec.vocabulary_size(), 5);
        // "developer" appears in every document, so it must survive the cut
        assert!(vec.vocabulary.contains_key("developer"));
    }

    #[test]
    fn test_identical_documents_have_similarity_one() {
        let vec = TfidfVectorizer::fit(&corpus(), DEFAULT_MAX_FEATURES);
        let sim = vec
            .similarity("python developer django", "python developer django")
            .unwrap();
        assert!((sim - 1.0).abs() < 1e-9, "sim was {sim}");
    }

    #[test]
    fn test_related_beats_unrelated() {
        let vec = TfidfVectorizer::fit(&corpus(), DEFAULT_MAX_FEATURES);
        let related = vec
            .similarity("python developer with django", "Python Developer")
            .unwrap();
        let unrelated = vec
            .similarity("java spring boot", "Python Developer")
            .unwrap_or(0.0);
        assert!(related > unrelated);
    }

    #[test]
    fn test_unknown_vocabulary_is_an_error() {
        let vec = TfidfVectorizer::fit(&corpus(), DEFAULT_MAX_FEATURES);
        assert_eq!(
            vec.transform("zzz qqq"),
            Err(FeatureError::NoKnownTerms)
        );
    }

    #[test]
    fn test_empty_vectorizer_is_an_error() {
        let empty: Vec<&str> = vec![];
        let vec = TfidfVectorizer::fit(&empty, DEFAULT_MAX_FEATURES);
        assert_eq!(vec.transform("python"), Err(FeatureError::EmptyVocabulary));
    }

    #[test]
    fn test_transform_is_unit_length() {
        let vec = TfidfVectorizer::fit(&corpus(), DEFAULT_MAX_FEATURES);
        let v = vec.transform("python developer with django and sql").unwrap();
        let norm: f64 = v.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
    }
}
