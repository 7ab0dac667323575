use serde::{Deserialize, Serialize};

use crate::models::{Message, Severity, Trend};

/// Emergency classifier verdict for one message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Specific emergency category, `None` when nothing matched.
    pub category: Option<String>,
    /// `min(1.0, 0.45 + 0.15 × hits)`, or 0.0 without hits.
    pub confidence: f64,
    pub is_first_aid: bool,
    /// Distinct allow-list hits, first-seen order.
    pub keywords: Vec<String>,
    /// Static category hint, raised to high by escalation markers.
    pub severity_hint: Option<Severity>,
}

impl ClassificationResult {
    pub fn empty() -> Self {
        Self {
            category: None,
            confidence: 0.0,
            is_first_aid: false,
            keywords: Vec::new(),
            severity_hint: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryResult {
    pub recovered: bool,
    /// Text span that justified the verdict.
    pub evidence: Option<String>,
}

impl RecoveryResult {
    pub fn not_recovered() -> Self {
        Self {
            recovered: false,
            evidence: None,
        }
    }

    pub fn recovered(evidence: impl Into<String>) -> Self {
        Self {
            recovered: true,
            evidence: Some(evidence.into()),
        }
    }
}

/// A disambiguation question for a token that looks like a misspelled term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clarification {
    pub token: String,
    pub suggestion: String,
    pub similarity: f64,
    pub prompt: String,
}

/// Numbered remediation steps replacing repeated base instructions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TailoredInstructions {
    /// Which script produced the steps (e.g. "bleeding_escalation", "taper_care").
    pub script: String,
    pub steps: Vec<String>,
    pub escalated: bool,
}

impl TailoredInstructions {
    /// Steps rendered as "1. ...\n2. ..." text.
    pub fn render(&self) -> String {
        self.steps
            .iter()
            .enumerate()
            .map(|(i, step)| format!("{}. {}", i + 1, step))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// One incoming turn.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriageRequest {
    pub user_input: String,
    #[serde(default)]
    pub history: Vec<Message>,
    #[serde(default)]
    pub session_id: Option<String>,
    /// Set by the caller when the base instructions it is about to show
    /// are a verbatim repeat of an earlier turn.
    #[serde(default)]
    pub repeated_instructions: bool,
}

impl TriageRequest {
    pub fn new(user_input: impl Into<String>) -> Self {
        Self {
            user_input: user_input.into(),
            ..Default::default()
        }
    }

    pub fn with_history(mut self, history: Vec<Message>) -> Self {
        self.history = history;
        self
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_repeated_instructions(mut self, repeated: bool) -> Self {
        self.repeated_instructions = repeated;
        self
    }
}

/// Merged per-turn verdict. Rebuilt on every turn, never cached.
///
/// When `in_scope` is false every emergency field is empty: out-of-scope
/// messages never carry medical content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageOutcome {
    pub session_id: String,
    pub in_scope: bool,
    pub rejection_reason: Option<String>,
    pub sanitized_text: String,
    pub category: Option<String>,
    pub confidence: f64,
    pub is_first_aid: bool,
    pub keywords: Vec<String>,
    pub severity: Option<Severity>,
    pub trend: Trend,
    pub recovered: bool,
    pub recovery_evidence: Option<String>,
    pub location_known: bool,
    pub follow_up: Option<String>,
    pub clarification: Option<Clarification>,
    pub instructions: Option<TailoredInstructions>,
}

impl TriageOutcome {
    /// Outcome for a message the core refuses to handle.
    pub fn rejected(session_id: String, sanitized_text: String, reason: String) -> Self {
        Self {
            session_id,
            in_scope: false,
            rejection_reason: Some(reason),
            sanitized_text,
            category: None,
            confidence: 0.0,
            is_first_aid: false,
            keywords: Vec::new(),
            severity: None,
            trend: Trend::Unknown,
            recovered: false,
            recovery_evidence: None,
            location_known: false,
            follow_up: None,
            clarification: None,
            instructions: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_outcome_carries_no_medical_content() {
        let outcome = TriageOutcome::rejected("s1".into(), "stocks?".into(), "off topic".into());
        assert!(!outcome.in_scope);
        assert!(outcome.category.is_none());
        assert!(outcome.severity.is_none());
        assert!(outcome.follow_up.is_none());
        assert!(outcome.instructions.is_none());
        assert!(outcome.keywords.is_empty());
    }

    #[test]
    fn outcome_serializes_enums_lowercase() {
        let mut outcome = TriageOutcome::rejected("s1".into(), String::new(), "x".into());
        outcome.trend = Trend::Better;
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["trend"], "better");
        assert_eq!(json["in_scope"], false);
    }

    #[test]
    fn request_builder_and_wire_defaults() {
        let req = TriageRequest::new("help")
            .with_session("abc")
            .with_repeated_instructions(true);
        assert_eq!(req.session_id.as_deref(), Some("abc"));
        assert!(req.repeated_instructions);

        let wire: TriageRequest = serde_json::from_str(r#"{"user_input":"cut finger"}"#).unwrap();
        assert!(wire.history.is_empty());
        assert!(!wire.repeated_instructions);
    }

    #[test]
    fn instructions_render_numbered() {
        let ins = TailoredInstructions {
            script: "maintain_course".into(),
            steps: vec!["Keep pressure on.".into(), "Stay still.".into()],
            escalated: false,
        };
        assert_eq!(ins.render(), "1. Keep pressure on.\n2. Stay still.");
    }
}
