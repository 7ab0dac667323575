//! Guardrail policy document.
//!
//! The document is a small JSON file of deny/allow regex rules plus extra
//! off-topic keywords. Loading can fail; checking cannot. Callers that fail
//! to load a document hand the screener `None` and it degrades to
//! keyword-only screening.

use std::path::Path;

use regex::Regex;
use serde::Deserialize;

use super::types::{PolicyError, PolicyProvider, PolicyVerdict};

/// Policy versions this loader understands.
const SUPPORTED_VERSIONS: &[&str] = &["1"];

/// Reason reported when a deny rule carries none of its own.
const DEFAULT_DENY_REASON: &str = "Message violates the assistant's usage policy.";

#[derive(Debug, Deserialize)]
struct RawPolicy {
    #[serde(default = "default_version")]
    version: String,
    #[serde(default)]
    deny: Vec<RawRule>,
    #[serde(default)]
    allow: Vec<RawRule>,
    #[serde(default)]
    off_topic_keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawRule {
    pattern: String,
    #[serde(default)]
    reason: Option<String>,
}

fn default_version() -> String {
    "1".to_string()
}

struct PolicyRule {
    regex: Regex,
    reason: Option<String>,
}

/// A validated, compiled policy document.
pub struct PolicyDocument {
    version: String,
    deny: Vec<PolicyRule>,
    allow: Vec<PolicyRule>,
    off_topic_keywords: Vec<String>,
}

impl std::fmt::Debug for PolicyDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyDocument")
            .field("version", &self.version)
            .field("deny_rules", &self.deny.len())
            .field("allow_rules", &self.allow.len())
            .field("off_topic_keywords", &self.off_topic_keywords.len())
            .finish()
    }
}

impl PolicyDocument {
    /// Parse and compile a policy from its JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, PolicyError> {
        let raw: RawPolicy = serde_json::from_str(json)?;

        if !SUPPORTED_VERSIONS.contains(&raw.version.as_str()) {
            return Err(PolicyError::UnsupportedVersion(raw.version));
        }

        let deny = compile_rules(raw.deny)?;
        let allow = compile_rules(raw.allow)?;
        let off_topic_keywords = raw
            .off_topic_keywords
            .into_iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        Ok(Self {
            version: raw.version,
            deny,
            allow,
            off_topic_keywords,
        })
    }

    /// Read and compile a policy file.
    pub fn from_path(path: &Path) -> Result<Self, PolicyError> {
        let json = std::fs::read_to_string(path)?;
        let doc = Self::from_json_str(&json)?;
        tracing::info!(
            version = %doc.version,
            deny_rules = doc.deny.len(),
            allow_rules = doc.allow.len(),
            "Policy document loaded"
        );
        Ok(doc)
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl PolicyProvider for PolicyDocument {
    fn check(&self, text: &str) -> PolicyVerdict {
        // Explicit allow wins over deny.
        if self.allow.iter().any(|r| r.regex.is_match(text)) {
            return PolicyVerdict::allow();
        }
        match self.deny.iter().find(|r| r.regex.is_match(text)) {
            Some(rule) => PolicyVerdict::deny(
                rule.reason
                    .clone()
                    .unwrap_or_else(|| DEFAULT_DENY_REASON.to_string()),
            ),
            None => PolicyVerdict::allow(),
        }
    }

    fn off_topic_keywords(&self) -> &[String] {
        &self.off_topic_keywords
    }
}

fn compile_rules(raw: Vec<RawRule>) -> Result<Vec<PolicyRule>, PolicyError> {
    raw.into_iter()
        .map(|r| {
            let regex = Regex::new(&r.pattern).map_err(|source| PolicyError::InvalidPattern {
                pattern: r.pattern.clone(),
                source,
            })?;
            Ok(PolicyRule {
                regex,
                reason: r.reason,
            })
        })
        .collect()
}
