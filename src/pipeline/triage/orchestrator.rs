//! Per-turn triage orchestration.
//!
//! Runs every stage over one incoming message and merges the stage verdicts
//! into a single [`TriageOutcome`]. Stage order:
//!
//! 1. sanitize the raw input
//! 2. scope screening + emergency classification, merged by [`merge_scope`]
//! 3. recovery, trend and location over the conversation
//! 4. severity via [`merge_severity`]
//! 5. clarification, follow-up question and tailored instructions
//!
//! Handling a message never fails. Anything the pipeline cannot place is
//! rejected as out of scope.

use std::path::Path;
use std::sync::Arc;

use uuid::Uuid;

use crate::config::TriageConfig;
use crate::models::conversation::combined_user_text;
use crate::models::{Message, Severity, Trend};
use crate::pipeline::safety::sanitize::{normalize_text, sanitize_user_input};
use crate::pipeline::safety::types::{PolicyProvider, ScopeDecision, SCOPE_REJECTION_REASON};
use crate::pipeline::safety::{PolicyDocument, ScopeScreener};

use super::clarify::ClarificationDetector;
use super::classify::EmergencyClassifier;
use super::followup::{select_follow_up, FollowUpContext};
use super::instructions::InstructionTailor;
use super::location::LocationDetector;
use super::recovery::RecoveryDetector;
use super::tables::TriageTables;
use super::trend::TrendDetector;
use super::types::{ClassificationResult, TriageOutcome, TriageRequest};
use super::TriageError;

/// Why a message was accepted into scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeBasis {
    /// The screener saw an allow-list word.
    DomainKeywords,
    /// The classifier crossed the gate on an explicit category stem.
    CategoryRule,
    /// The message continues a conversation that is already about first aid.
    History,
    /// The message holds a likely misspelling of a first-aid term.
    Clarification,
}

impl ScopeBasis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DomainKeywords => "domain_keywords",
            Self::CategoryRule => "category_rule",
            Self::History => "history",
            Self::Clarification => "clarification",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeVerdict {
    In(ScopeBasis),
    Out(String),
}

/// Everything [`merge_scope`] looks at.
#[derive(Debug, Clone, Copy)]
pub struct ScopeSignals<'a> {
    pub screener: &'a ScopeDecision,
    /// Classifier crossed the first-aid gate AND a category rule matched.
    pub rule_backed_first_aid: bool,
    pub history_in_scope: bool,
    pub clarification_available: bool,
}

/// Scope precedence, first match wins:
///
/// 1. screener rejected → out, with the screener's reason
/// 2. screener saw domain keywords → in
/// 3. rule-backed first-aid classification → in
/// 4. an earlier in-scope first-aid turn → in
/// 5. a clarification can be asked → in
/// 6. otherwise → out
pub fn merge_scope(signals: &ScopeSignals<'_>) -> ScopeVerdict {
    if !signals.screener.in_scope {
        let reason = signals
            .screener
            .reason
            .clone()
            .unwrap_or_else(|| SCOPE_REJECTION_REASON.to_string());
        return ScopeVerdict::Out(reason);
    }
    if !signals.screener.domain_keywords.is_empty() {
        return ScopeVerdict::In(ScopeBasis::DomainKeywords);
    }
    if signals.rule_backed_first_aid {
        return ScopeVerdict::In(ScopeBasis::CategoryRule);
    }
    if signals.history_in_scope {
        return ScopeVerdict::In(ScopeBasis::History);
    }
    if signals.clarification_available {
        return ScopeVerdict::In(ScopeBasis::Clarification);
    }
    ScopeVerdict::Out(SCOPE_REJECTION_REASON.to_string())
}

/// Severity from the classifier hint, low when a category exists without a
/// hint, raised one step when the user reports it getting worse.
pub fn merge_severity(classification: &ClassificationResult, trend: Trend) -> Option<Severity> {
    let base = match (classification.severity_hint, &classification.category) {
        (Some(hint), _) => Some(hint),
        (None, Some(_)) => Some(Severity::Low),
        (None, None) => None,
    };
    match trend {
        Trend::Worse => base.map(Severity::escalated),
        _ => base,
    }
}

/// The triage pipeline. Immutable after construction and safe to share
/// across threads behind an `Arc`.
pub struct TriageOrchestrator {
    screener: ScopeScreener,
    classifier: EmergencyClassifier,
    recovery: RecoveryDetector,
    trend: TrendDetector,
    location: LocationDetector,
    clarifier: ClarificationDetector,
    tailor: InstructionTailor,
    max_input_length: usize,
}

impl TriageOrchestrator {
    /// Build from explicit tables, config and an optional policy.
    ///
    /// Fails only when caller-supplied tables or config are invalid.
    pub fn new(
        tables: &TriageTables,
        config: &TriageConfig,
        policy: Option<Arc<dyn PolicyProvider>>,
    ) -> Result<Self, TriageError> {
        config.validate()?;
        Ok(Self {
            screener: ScopeScreener::new(tables, policy),
            classifier: EmergencyClassifier::new(tables),
            recovery: RecoveryDetector::new(&tables.recovery)?,
            trend: TrendDetector::new(&tables.trend)?,
            location: LocationDetector::new(tables),
            clarifier: ClarificationDetector::new(tables, config.clarification_cutoff),
            tailor: InstructionTailor::new(config.emergency_contact.clone()),
            max_input_length: config.max_input_length,
        })
    }

    /// Built-in tables with the policy named by `config`, if it loads.
    pub fn from_config(config: &TriageConfig) -> Result<Self, TriageError> {
        let policy = config
            .load_policy()
            .map(|doc| Arc::new(doc) as Arc<dyn PolicyProvider>);
        Self::new(&TriageTables::default(), config, policy)
    }

    /// Built-in tables with a policy that must load. Unlike
    /// [`from_config`](Self::from_config), a bad policy file is an error.
    pub fn with_policy_file(config: &TriageConfig, path: &Path) -> Result<Self, TriageError> {
        let doc = PolicyDocument::from_path(path)?;
        Self::new(&TriageTables::default(), config, Some(Arc::new(doc)))
    }

    /// Built-in tables and default config, keyword-only screening.
    pub fn with_defaults() -> Self {
        Self::new(&TriageTables::default(), &TriageConfig::default(), None)
            .expect("built-in tables and default config are valid")
    }

    pub fn handle_message(
        &self,
        user_input: &str,
        history: &[Message],
        session_id: Option<&str>,
    ) -> TriageOutcome {
        self.run(user_input, history, session_id, false)
    }

    pub fn handle_request(&self, request: &TriageRequest) -> TriageOutcome {
        self.run(
            &request.user_input,
            &request.history,
            request.session_id.as_deref(),
            request.repeated_instructions,
        )
    }

    fn run(
        &self,
        user_input: &str,
        history: &[Message],
        session_id: Option<&str>,
        repeated_instructions: bool,
    ) -> TriageOutcome {
        let session_id = resolve_session_id(session_id);

        let sanitized = sanitize_user_input(user_input, self.max_input_length);
        if sanitized.was_modified {
            tracing::debug!(
                stage = "sanitize",
                modification_count = sanitized.modifications.len(),
                "Triage: input sanitized"
            );
        }
        let text = sanitized.text;

        // Stage 2: scope + classification
        let scope = self.screener.screen(&text);
        let latest = self.classifier.classify(&text);
        let rule_backed = self.classifier.rule_matches(&text);
        let grounded = !scope.domain_keywords.is_empty() || rule_backed;

        tracing::debug!(
            stage = "scope",
            in_scope = scope.in_scope,
            mode = scope.mode.as_str(),
            hit_count = scope.domain_keywords.len(),
            "Triage: scope screened"
        );
        tracing::debug!(
            stage = "classify",
            category = latest.category.as_deref().unwrap_or("none"),
            hit_count = latest.keywords.len(),
            is_first_aid = latest.is_first_aid,
            "Triage: message classified"
        );

        let clarification = if grounded {
            None
        } else {
            self.clarifier.detect(&text)
        };
        let history_in_scope = !grounded && self.history_in_scope(history, &text);

        let verdict = merge_scope(&ScopeSignals {
            screener: &scope,
            rule_backed_first_aid: rule_backed && latest.is_first_aid,
            history_in_scope,
            clarification_available: clarification.is_some(),
        });

        let basis = match verdict {
            ScopeVerdict::Out(reason) => {
                tracing::warn!(
                    stage = "merge",
                    in_scope = false,
                    mode = scope.mode.as_str(),
                    "Triage: message rejected as out of scope"
                );
                return TriageOutcome::rejected(session_id, text, reason);
            }
            ScopeVerdict::In(basis) => basis,
        };

        // A turn with no grounded signal of its own inherits its category
        // from the conversation so far.
        let combined = combined_user_text(history, &text);
        let classification = match basis {
            ScopeBasis::DomainKeywords | ScopeBasis::CategoryRule => latest,
            ScopeBasis::History => self.classifier.classify(&combined),
            ScopeBasis::Clarification => ClassificationResult::empty(),
        };

        // Stage 3: conversation state
        let recovery = self.recovery.detect(history, &text);
        let trend = self.trend.detect(&combined);
        let location_known = self.location.is_known(&combined);

        // Stage 4: severity
        let severity = merge_severity(&classification, trend);

        // Stage 5: what to surface next
        let follow_up = if clarification.is_some() {
            None
        } else {
            select_follow_up(&FollowUpContext {
                category: classification.category.as_deref(),
                severity,
                location_known,
                trend,
                recovered: recovery.recovered,
            })
        };
        let instructions = self.tailor.tailor(
            classification.category.as_deref(),
            trend,
            severity,
            repeated_instructions,
        );

        tracing::info!(
            stage = "outcome",
            in_scope = true,
            basis = basis.as_str(),
            category = classification.category.as_deref().unwrap_or("none"),
            severity = severity.map(|s| s.as_str()).unwrap_or("none"),
            trend = trend.as_str(),
            recovered = recovery.recovered,
            location_known,
            clarification = clarification.is_some(),
            follow_up = ?follow_up.map(|f| f.kind),
            instructions = instructions.as_ref().map(|i| i.script.as_str()).unwrap_or("none"),
            "Triage: turn complete"
        );

        TriageOutcome {
            session_id,
            in_scope: true,
            rejection_reason: None,
            sanitized_text: text,
            category: classification.category,
            confidence: classification.confidence,
            is_first_aid: classification.is_first_aid,
            keywords: classification.keywords,
            severity,
            trend,
            recovered: recovery.recovered,
            recovery_evidence: recovery.evidence,
            location_known,
            follow_up: follow_up.map(|f| f.question.to_string()),
            clarification,
            instructions,
        }
    }

    /// Whether an earlier user turn was itself an in-scope first-aid message.
    fn history_in_scope(&self, history: &[Message], current: &str) -> bool {
        history
            .iter()
            .filter(|m| m.is_user())
            .map(|m| normalize_text(&m.content))
            .filter(|prior| !prior.is_empty() && prior != current)
            .any(|prior| {
                let decision = self.screener.screen(&prior);
                decision.in_scope
                    && (!decision.domain_keywords.is_empty() || self.classifier.rule_matches(&prior))
            })
    }
}

impl Default for TriageOrchestrator {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn resolve_session_id(session_id: Option<&str>) -> String {
    match session_id.map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => Uuid::new_v4().to_string(),
    }
}
