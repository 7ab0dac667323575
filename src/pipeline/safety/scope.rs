use std::sync::Arc;

use crate::pipeline::triage::tables::TriageTables;
use crate::pipeline::triage::text::{exact_keyword_hits, tokenize};

use super::types::{
    PolicyProvider, ScopeDecision, ScreeningMode, EMPTY_INPUT_REASON, SCOPE_REJECTION_REASON,
};

/// Decides whether a sanitized message is about first aid at all.
///
/// Pure over its construction-time state. A missing policy never fails a
/// request; the screener runs keyword-only instead.
pub struct ScopeScreener {
    policy: Option<Arc<dyn PolicyProvider>>,
    domain_keywords: Vec<String>,
    off_topic_keywords: Vec<String>,
}

impl ScopeScreener {
    pub fn new(tables: &TriageTables, policy: Option<Arc<dyn PolicyProvider>>) -> Self {
        let mut off_topic_keywords: Vec<String> = tables
            .off_topic_keywords
            .iter()
            .map(|k| k.to_lowercase())
            .collect();

        match &policy {
            Some(p) => {
                for kw in p.off_topic_keywords() {
                    if !off_topic_keywords.contains(kw) {
                        off_topic_keywords.push(kw.clone());
                    }
                }
            }
            None => {
                tracing::warn!(
                    mode = "keyword_only",
                    "Scope screener: no policy document, degrading to keyword-only screening"
                );
            }
        }

        Self {
            policy,
            domain_keywords: tables
                .first_aid_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
            off_topic_keywords,
        }
    }

    pub fn mode(&self) -> ScreeningMode {
        if self.policy.is_some() {
            ScreeningMode::Policy
        } else {
            ScreeningMode::KeywordOnly
        }
    }

    pub fn screen(&self, sanitized_text: &str) -> ScopeDecision {
        let mode = self.mode();
        let decision = |in_scope: bool, reason: Option<String>, domain: Vec<String>| ScopeDecision {
            in_scope,
            sanitized_text: sanitized_text.to_string(),
            reason,
            mode,
            domain_keywords: domain,
        };

        if sanitized_text.trim().is_empty() {
            return decision(false, Some(EMPTY_INPUT_REASON.to_string()), Vec::new());
        }

        // (a) Explicit policy deny
        if let Some(policy) = &self.policy {
            let verdict = policy.check(sanitized_text);
            if !verdict.allowed {
                let reason = verdict
                    .reason
                    .unwrap_or_else(|| SCOPE_REJECTION_REASON.to_string());
                return decision(false, Some(reason), Vec::new());
            }
        }

        // (b) Off-topic words with no first-aid word present
        let lower = sanitized_text.to_lowercase();
        let tokens = tokenize(&lower);
        let domain = exact_keyword_hits(&tokens, &lower, &self.domain_keywords);
        let off_topic = exact_keyword_hits(&tokens, &lower, &self.off_topic_keywords);

        if !off_topic.is_empty() && domain.is_empty() {
            return decision(false, Some(SCOPE_REJECTION_REASON.to_string()), domain);
        }

        // (c) Nothing disqualifying
        decision(true, None, domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::safety::policy::PolicyDocument;
    use crate::pipeline::safety::types::PolicyVerdict;

    fn keyword_only() -> ScopeScreener {
        ScopeScreener::new(&TriageTables::default(), None)
    }

    fn with_policy(json: &str) -> ScopeScreener {
        let doc = PolicyDocument::from_json_str(json).unwrap();
        ScopeScreener::new(&TriageTables::default(), Some(Arc::new(doc)))
    }

    /// Policy that allows everything, to prove keyword checks still run.
    struct AllowAll;

    impl PolicyProvider for AllowAll {
        fn check(&self, _text: &str) -> PolicyVerdict {
            PolicyVerdict::allow()
        }
    }

    // =================================================================
    // KEYWORD-ONLY MODE
    // =================================================================

    #[test]
    fn first_aid_message_in_scope() {
        let d = keyword_only().screen("my arm is bleeding");
        assert!(d.in_scope);
        assert_eq!(d.mode, ScreeningMode::KeywordOnly);
        assert_eq!(d.domain_keywords, vec!["bleeding".to_string()]);
        assert!(d.reason.is_none());
    }

    #[test]
    fn off_topic_without_domain_word_rejected() {
        let d = keyword_only().screen("what's the weather tomorrow");
        assert!(!d.in_scope);
        assert_eq!(d.reason.as_deref(), Some(SCOPE_REJECTION_REASON));
    }

    #[test]
    fn off_topic_with_domain_word_stays_in_scope() {
        let d = keyword_only().screen("I cut my hand while cooking a recipe");
        assert!(d.in_scope);
    }

    #[test]
    fn neutral_text_is_not_rejected_by_screener() {
        let d = keyword_only().screen("it stopped now");
        assert!(d.in_scope);
        assert!(d.domain_keywords.is_empty());
    }

    #[test]
    fn empty_text_rejected() {
        for text in ["", "   "] {
            let d = keyword_only().screen(text);
            assert!(!d.in_scope);
            assert_eq!(d.reason.as_deref(), Some(EMPTY_INPUT_REASON));
        }
    }

    // =================================================================
    // POLICY MODE
    // =================================================================

    #[test]
    fn policy_deny_wins_with_its_reason() {
        let s = with_policy(
            r#"{"deny":[{"pattern":"(?i)\\bbomb\\b","reason":"Weapons are out of scope."}]}"#,
        );
        let d = s.screen("burn from a bomb");
        assert!(!d.in_scope);
        assert_eq!(d.reason.as_deref(), Some("Weapons are out of scope."));
        assert_eq!(d.mode, ScreeningMode::Policy);
    }

    #[test]
    fn policy_off_topic_keywords_extend_builtin_set() {
        let s = with_policy(r#"{"off_topic_keywords":["chess"]}"#);
        assert!(!s.screen("best chess opening").in_scope);
        assert!(!s.screen("will it rain, weather please").in_scope);
    }

    #[test]
    fn off_topic_rejected_regardless_of_policy_state() {
        let screeners = [
            keyword_only(),
            ScopeScreener::new(&TriageTables::default(), Some(Arc::new(AllowAll))),
            with_policy("{}"),
        ];
        for s in &screeners {
            assert!(!s.screen("tell me a joke about stocks").in_scope);
        }
    }
}
