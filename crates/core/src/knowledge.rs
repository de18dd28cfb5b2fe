//! Knowledge store: the read-only HIPAA reference content.
//!
//! The store is loaded once at startup from a JSON object mapping topic keys
//! to text sections, then shared behind an `Arc` for the process lifetime.
//! Nothing writes to it after construction.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::KnowledgeError;

/// Keys the static-lookup tools read from the knowledge base.
pub const REQUIRED_KEYS: [&str; 8] = [
    "do_i_need_to_be_hipaa_compliant?",
    "becoming_hipaa_compliant",
    "what_is_hipaa?",
    "hipaa_security_rule",
    "mobile_and_wearable_applications",
    "hipaa_fines",
    "who_validates_hipaa_compliance",
    "developer_considerations",
];

/// Immutable topic-key → text mapping.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeStore {
    sections: BTreeMap<String, String>,
}

impl KnowledgeStore {
    /// Load the knowledge base from a JSON file.
    pub fn load(path: &Path) -> Result<Self, KnowledgeError> {
        let content = std::fs::read_to_string(path).map_err(|e| KnowledgeError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let sections: BTreeMap<String, String> =
            serde_json::from_str(&content).map_err(|e| KnowledgeError::Parse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        tracing::debug!(path = %path.display(), sections = sections.len(), "Knowledge base loaded");
        Ok(Self { sections })
    }

    /// Parse a knowledge base from an in-memory JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, KnowledgeError> {
        let sections = serde_json::from_str(json).map_err(|e| KnowledgeError::Parse {
            path: "<memory>".into(),
            reason: e.to_string(),
        })?;
        Ok(Self { sections })
    }

    /// Build a store directly from key/text pairs.
    pub fn from_sections<I, K, V>(sections: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            sections: sections
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Look up a section by key.
    pub fn get(&self, key: &str) -> Result<&str, KnowledgeError> {
        self.sections
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| KnowledgeError::KeyNotFound(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.sections.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// The subset of `expected` that this store has no section for.
    pub fn missing_keys<'a>(&self, expected: &[&'a str]) -> Vec<&'a str> {
        expected
            .iter()
            .copied()
            .filter(|k| !self.contains(k))
            .collect()
    }
}
