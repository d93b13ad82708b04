//! Embedding-backed intent matching.
//!
//! Wraps a local embedding model behind a Ready/Unavailable status. The
//! keyword groups stay authoritative for clear signals; the embedding path
//! only sees messages every group missed, nearest-matching them against a
//! small root-verb vocabulary. Inference uses deterministic local hashed
//! embeddings so the agent stays fully offline and testable.

use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::Path;

use serde::Deserialize;

use super::keyword::{intent_for, match_keywords};
use super::IntentStrategy;
use crate::types::{ActionToken, ChatIntent};

const DIMENSION: usize = 384;

/// Minimum cosine similarity before a vocabulary match counts.
const SIMILARITY_THRESHOLD: f32 = 0.35;

/// One vocabulary entry: a root verb plus example phrasings.
#[derive(Debug, Deserialize)]
pub struct VerbEntry {
    pub verb: String,
    pub phrases: Vec<String>,
}

/// A verb prototype with its precomputed embedding.
#[derive(Debug)]
struct Prototype {
    verb: String,
    action: Option<ActionToken>,
    embedding: Vec<f32>,
}

/// Root verbs that map onto a supported action token. Everything else in
/// the vocabulary (approve, review, process) falls through to the
/// acknowledge default.
fn action_for_verb(verb: &str) -> Option<ActionToken> {
    match verb {
        "send" => Some(ActionToken::Send),
        "schedule" => Some(ActionToken::Schedule),
        "complete" => Some(ActionToken::Complete),
        "reassign" => Some(ActionToken::Reassign),
        _ => None,
    }
}

pub struct SemanticClassifier {
    prototypes: Vec<Prototype>,
}

impl SemanticClassifier {
    /// Initialize from the vocabulary asset. A missing, empty, or
    /// unparseable file leaves the backend unavailable — the caller falls
    /// back to the keyword matcher.
    pub fn initialize(vocabulary_path: &Path) -> Result<Self, String> {
        if !vocabulary_path.exists() {
            return Err(format!(
                "intent vocabulary not found: {}",
                vocabulary_path.display()
            ));
        }

        let content = fs::read_to_string(vocabulary_path)
            .map_err(|e| format!("failed to read intent vocabulary: {e}"))?;
        let entries: Vec<VerbEntry> = serde_json::from_str(&content)
            .map_err(|e| format!("failed to parse intent vocabulary: {e}"))?;
        if entries.is_empty() {
            return Err(format!(
                "intent vocabulary is empty: {}",
                vocabulary_path.display()
            ));
        }

        let prototypes = entries
            .iter()
            .map(|entry| Prototype {
                verb: entry.verb.clone(),
                action: action_for_verb(&entry.verb),
                embedding: embed_phrases(&entry.phrases),
            })
            .collect();

        Ok(Self { prototypes })
    }

    /// Nearest vocabulary verb for a message, if close enough.
    fn nearest_verb(&self, message: &str) -> Option<&Prototype> {
        let embedding = hash_embed(message);
        self.prototypes
            .iter()
            .map(|p| (p, cosine_similarity(&embedding, &p.embedding)))
            .filter(|(_, similarity)| *similarity >= SIMILARITY_THRESHOLD)
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(prototype, _)| prototype)
    }
}

impl IntentStrategy for SemanticClassifier {
    fn name(&self) -> &'static str {
        "semantic"
    }

    fn classify(&self, task_description: &str, task_owner: &str, user_message: &str)
        -> ChatIntent {
        let text = user_message.to_lowercase();

        // Keyword groups first: clear signals stay deterministic no matter
        // which backend is active.
        if let Some(action) = match_keywords(&text) {
            return intent_for(action, task_description, task_owner);
        }

        let action = match self.nearest_verb(&text) {
            Some(prototype) => {
                log::debug!("vocabulary verb '{}' matched", prototype.verb);
                prototype.action.unwrap_or(ActionToken::Acknowledge)
            }
            None => ActionToken::Acknowledge,
        };
        intent_for(action, task_description, task_owner)
    }
}

// =============================================================================
// Hashed embeddings
// =============================================================================

/// Deterministic signed bag-of-words embedding, L2-normalized.
fn hash_embed(text: &str) -> Vec<f32> {
    let mut vec = vec![0.0_f32; DIMENSION];
    let mut seen = 0usize;

    for token in text.split_whitespace() {
        let token: String = token
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        if token.is_empty() {
            continue;
        }
        let mut hasher = DefaultHasher::new();
        token.hash(&mut hasher);
        let hash = hasher.finish();
        let idx = (hash as usize) % DIMENSION;
        let sign = if (hash & 1) == 0 { 1.0 } else { -1.0 };
        vec[idx] += sign;
        seen += 1;
    }

    if seen == 0 {
        return vec;
    }

    let norm = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in &mut vec {
            *value /= norm;
        }
    }
    vec
}

/// Mean of the phrase embeddings, renormalized.
fn embed_phrases(phrases: &[String]) -> Vec<f32> {
    let mut sum = vec![0.0_f32; DIMENSION];
    for phrase in phrases {
        for (slot, value) in sum.iter_mut().zip(hash_embed(phrase)) {
            *slot += value;
        }
    }
    let norm = sum.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in &mut sum {
            *value /= norm;
        }
    }
    sum
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0_f32;
    let mut norm_a = 0.0_f32;
    let mut norm_b = 0.0_f32;
    for (va, vb) in a.iter().zip(b.iter()) {
        dot += va * vb;
        norm_a += va * va;
        norm_b += vb * vb;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::types::Confidence;

    fn write_vocabulary(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(json.as_bytes()).expect("write");
        file
    }

    fn test_classifier() -> SemanticClassifier {
        let vocab = write_vocabulary(
            r#"[
                {"verb": "send", "phrases": ["forward the report to them"]},
                {"verb": "complete", "phrases": ["wrap this up now"]},
                {"verb": "review", "phrases": ["look over the changes again"]}
            ]"#,
        );
        SemanticClassifier::initialize(vocab.path()).expect("initialize")
    }

    #[test]
    fn test_initialize_rejects_missing_and_empty() {
        assert!(SemanticClassifier::initialize(Path::new("/nope/vocab.json")).is_err());
        let empty = write_vocabulary("[]");
        assert!(SemanticClassifier::initialize(empty.path()).is_err());
        let garbage = write_vocabulary("not json");
        assert!(SemanticClassifier::initialize(garbage.path()).is_err());
    }

    #[test]
    fn test_keyword_groups_stay_authoritative() {
        let classifier = test_classifier();
        let intent = classifier.classify("Check server logs", "You", "I'm done with this");
        assert_eq!(intent.action, ActionToken::Complete);
        assert_eq!(intent.confidence, Confidence::High);
    }

    #[test]
    fn test_vocabulary_match_on_keyword_miss() {
        // No keyword group word appears; "forward the report" overlaps the
        // send prototype heavily.
        let classifier = test_classifier();
        let intent = classifier.classify("Check server logs", "You", "forward the report");
        assert_eq!(intent.action, ActionToken::Send);
    }

    #[test]
    fn test_unsupported_verb_acknowledges() {
        // Nearest prototype is "review", which has no action token.
        let classifier = test_classifier();
        let intent =
            classifier.classify("Check server logs", "You", "look over the changes again");
        assert_eq!(intent.action, ActionToken::Acknowledge);
    }

    #[test]
    fn test_low_similarity_acknowledges() {
        let classifier = test_classifier();
        let intent =
            classifier.classify("Check server logs", "You", "banana split dessert recipe");
        assert_eq!(intent.action, ActionToken::Acknowledge);
        assert_eq!(intent.confidence, Confidence::Low);
    }
}
