use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result of input sanitization (pre-triage).
#[derive(Debug, Clone)]
pub struct SanitizedInput {
    /// The cleaned, safe message text.
    pub text: String,
    /// Whether any modifications were made.
    pub was_modified: bool,
    /// What was stripped (for audit, no user text).
    pub modifications: Vec<InputModification>,
}

/// A modification made during input sanitization.
#[derive(Debug, Clone)]
pub struct InputModification {
    pub kind: InputModificationKind,
    pub description: String,
}

/// Types of input sanitization applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputModificationKind {
    InvisibleUnicodeRemoved,
    ControlCharacterReplaced,
    ExcessiveLengthTruncated,
}

/// Answer from a policy document for one piece of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyVerdict {
    pub allowed: bool,
    pub reason: Option<String>,
}

impl PolicyVerdict {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
        }
    }
}

/// External allow/deny rule set consulted by the scope screener.
pub trait PolicyProvider: Send + Sync {
    fn check(&self, text: &str) -> PolicyVerdict;

    /// Extra off-topic keywords contributed by the policy.
    fn off_topic_keywords(&self) -> &[String] {
        &[]
    }
}

/// Which evidence the screener had available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreeningMode {
    /// Policy document consulted, then keyword sets.
    Policy,
    /// No usable policy: keyword sets only.
    KeywordOnly,
}

impl ScreeningMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Policy => "policy",
            Self::KeywordOnly => "keyword_only",
        }
    }
}

/// Verdict of the scope screener. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeDecision {
    pub in_scope: bool,
    pub sanitized_text: String,
    pub reason: Option<String>,
    pub mode: ScreeningMode,
    /// Domain keywords seen in the text, first-seen order.
    pub domain_keywords: Vec<String>,
}

/// Policy document loading errors. Raised only while loading; the screener
/// itself never fails.
#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("Policy file unreadable: {0}")]
    Io(#[from] std::io::Error),

    #[error("Policy document malformed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid policy pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Unsupported policy version: {0}")]
    UnsupportedVersion(String),
}

/// Rejection reason used when off-topic words appear without any first-aid signal.
pub const SCOPE_REJECTION_REASON: &str =
    "This assistant can only respond to first-aid emergencies and treatments.";

/// Rejection reason for empty or whitespace-only messages.
pub const EMPTY_INPUT_REASON: &str = "Message is empty; describe the injury or emergency.";
