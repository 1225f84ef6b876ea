//! Semantic encoder: dense document vectors for the semantic-similarity feature.
//!
//! `SemanticEncoder` is the seam: the default `HashedEncoder` needs no model
//! download and is fully deterministic. Whatever encoder trains an artifact
//! must also serve it, so the encoder `id()` is recorded in the artifact.

use std::hash::{Hash, Hasher};

use siphasher::sip::SipHasher13;

use crate::matching::features::FeatureError;
use crate::matching::normalize::tokens;

/// Fixed SipHash keys. Changing them changes every vector: bump `ENCODER_VERSION`.
const HASH_KEY_0: u64 = 0x5eed_1a7e_c0de_0001;
const HASH_KEY_1: u64 = 0x0bad_cafe_f00d_0002;
const ENCODER_VERSION: &str = "v1";
const DEFAULT_DIMENSION: usize = 256;
const TRIGRAM_WEIGHT: f64 = 0.5;

pub trait SemanticEncoder: Send + Sync {
    /// Stable identifier, persisted with trained artifacts.
    fn id(&self) -> String;

    /// Encodes normalized text into a dense document vector.
    fn encode(&self, normalized: &str) -> Result<Vec<f64>, FeatureError>;

    /// Cosine similarity of two documents, in [-1, 1].
    fn similarity(&self, left: &str, right: &str) -> Result<f64, FeatureError> {
        let a = self.encode(left)?;
        let b = self.encode(right)?;
        cosine_similarity(&a, &b)
    }
}

/// Feature-hashing encoder: each word contributes its own hashed feature plus
/// its character trigrams, so inflections (`develop`/`developer`) land close
/// together. The document vector is the mean of the word vectors.
#[derive(Debug, Clone)]
pub struct HashedEncoder {
    dimension: usize,
}

impl Default for HashedEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

impl HashedEncoder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn hash(&self, feature: &str) -> u64 {
        let mut hasher = SipHasher13::new_with_keys(HASH_KEY_0, HASH_KEY_1);
        feature.hash(&mut hasher);
        hasher.finish()
    }

    fn add_feature(&self, vector: &mut [f64], feature: &str, weight: f64) {
        let h = self.hash(feature);
        let idx = (h % self.dimension as u64) as usize;
        // high bit picks the sign so collisions partially cancel
        let sign = if h >> 63 == 0 { 1.0 } else { -1.0 };
        vector[idx] += sign * weight;
    }

    fn word_vector(&self, word: &str) -> Vec<f64> {
        let mut vector = vec![0.0; self.dimension];
        self.add_feature(&mut vector, word, 1.0);

        let padded: Vec<char> = format!("<{word}>").chars().collect();
        for tri in padded.windows(3) {
            let gram: String = tri.iter().collect();
            self.add_feature(&mut vector, &gram, TRIGRAM_WEIGHT);
        }

        let norm = vector.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

impl SemanticEncoder for HashedEncoder {
    fn id(&self) -> String {
        format!("hashed-{}-{}", ENCODER_VERSION, self.dimension)
    }

    fn encode(&self, normalized: &str) -> Result<Vec<f64>, FeatureError> {
        let words = tokens(normalized);
        if words.is_empty() {
            return Err(FeatureError::EmptyDocument);
        }

        let mut doc = vec![0.0; self.dimension];
        for word in &words {
            for (acc, v) in doc.iter_mut().zip(self.word_vector(word)) {
                *acc += v;
            }
        }
        let n = words.len() as f64;
        for v in &mut doc {
            *v /= n;
        }
        Ok(doc)
    }
}

/// Plain cosine similarity. Zero vectors and mismatched lengths are errors.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> Result<f64, FeatureError> {
    if a.len() != b.len() {
        return Err(FeatureError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(FeatureError::EmptyDocument);
    }

    Ok((dot / (norm_a * norm_b)).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_documents_similarity_one() {
        let enc = HashedEncoder::default();
        let sim = enc
            .similarity("python developer django", "python developer django")
            .unwrap();
        assert!((sim - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let a = HashedEncoder::default().encode("rust systems engineer").unwrap();
        let b = HashedEncoder::default().encode("rust systems engineer").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_shared_words_score_higher() {
        let enc = HashedEncoder::default();
        let close = enc
            .similarity("senior python developer", "python developer")
            .unwrap();
        let far = enc
            .similarity("registered nurse hospital", "python developer")
            .unwrap();
        assert!(close > far, "close={close} far={far}");
    }

    #[test]
    fn test_empty_document_is_an_error() {
        let enc = HashedEncoder::default();
        assert_eq!(enc.encode(""), Err(FeatureError::EmptyDocument));
        assert!(enc.similarity("", "python").is_err());
    }

    #[test]
    fn test_cosine_dimension_mismatch() {
        assert_eq!(
            cosine_similarity(&[1.0, 0.0], &[1.0]),
            Err(FeatureError::DimensionMismatch { left: 2, right: 1 })
        );
    }

    #[test]
    fn test_id_includes_dimension() {
        assert_eq!(HashedEncoder::new(64).id(), "hashed-v1-64");
    }
}
