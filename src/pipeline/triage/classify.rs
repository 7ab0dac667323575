//! Emergency classifier: allow-list gate followed by category rules.

use crate::models::Severity;

use super::tables::{CategoryRule, TriageTables};
use super::text::{exact_keyword_hits, is_phrase, push_unique, tokenize};
use super::types::ClassificationResult;

/// Confidence with one or more hits starts here...
const CONFIDENCE_BASE: f64 = 0.45;
/// ...and grows by this much per distinct hit.
const CONFIDENCE_STEP: f64 = 0.15;
/// Confidence at or above which the text counts as a first-aid topic.
pub const FIRST_AID_THRESHOLD: f64 = 0.6;
/// Keywords shorter than this only match exactly.
const FUZZY_MIN_KEYWORD_LEN: usize = 4;

/// Deterministic keyword classifier. Holds its tables; no I/O.
#[derive(Debug, Clone)]
pub struct EmergencyClassifier {
    words: Vec<String>,
    phrases: Vec<String>,
    categories: Vec<CategoryRule>,
    escalation_markers: Vec<String>,
}

impl EmergencyClassifier {
    pub fn new(tables: &TriageTables) -> Self {
        let (phrases, words): (Vec<String>, Vec<String>) = tables
            .first_aid_keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .partition(|k| is_phrase(k));

        Self {
            words,
            phrases,
            categories: tables.categories.clone(),
            escalation_markers: tables
                .escalation_markers
                .iter()
                .map(|m| m.to_lowercase())
                .collect(),
        }
    }

    pub fn classify(&self, text: &str) -> ClassificationResult {
        let lower = text.to_lowercase();
        let keywords = self.keyword_hits(&lower);
        if keywords.is_empty() {
            return ClassificationResult::empty();
        }

        let confidence = confidence_for(keywords.len());
        let rule = self.category_rule(&lower);
        let category = match rule {
            Some(r) => Some(r.category.clone()),
            None => keywords.first().cloned(),
        };

        let escalated = self.has_escalation_marker(&lower);
        let severity_hint = if escalated {
            Some(Severity::High)
        } else {
            match rule {
                Some(r) => r.severity,
                // A fallback label may still name a hinted category.
                None => category.as_deref().and_then(|c| self.static_hint(c)),
            }
        };

        ClassificationResult {
            category,
            confidence,
            is_first_aid: meets_threshold(confidence),
            keywords,
            severity_hint,
        }
    }

    /// Allow-list hits in first-seen order.
    ///
    /// A token hits a keyword on exact match, or, for keywords of at least
    /// four letters, when either one contains the other. Phrases are plain
    /// substring matches over the whole text and come after token hits.
    pub fn keyword_hits(&self, lower_text: &str) -> Vec<String> {
        let mut hits = Vec::new();
        for token in tokenize(lower_text) {
            for kw in &self.words {
                let fuzzy = kw.len() >= FUZZY_MIN_KEYWORD_LEN
                    && (token.contains(kw.as_str()) || kw.contains(token.as_str()));
                if token == *kw || fuzzy {
                    push_unique(&mut hits, kw);
                }
            }
        }
        for phrase in &self.phrases {
            if lower_text.contains(phrase.as_str()) {
                push_unique(&mut hits, phrase);
            }
        }
        hits
    }

    /// Whether any category rule stem appears in the text. Unlike a
    /// fallback label, a rule match is grounded in an explicit stem.
    pub fn rule_matches(&self, text: &str) -> bool {
        self.category_rule(&text.to_lowercase()).is_some()
    }

    /// Single-word markers match whole tokens; phrases match as substrings.
    fn has_escalation_marker(&self, lower_text: &str) -> bool {
        !exact_keyword_hits(&tokenize(lower_text), lower_text, &self.escalation_markers).is_empty()
    }

    fn static_hint(&self, category: &str) -> Option<Severity> {
        self.categories
            .iter()
            .find(|r| r.category == category)
            .and_then(|r| r.severity)
    }

    /// First category rule with a stem present in the text.
    fn category_rule(&self, lower_text: &str) -> Option<&CategoryRule> {
        self.categories.iter().find(|rule| {
            rule.stems
                .iter()
                .any(|stem| lower_text.contains(stem.to_lowercase().as_str()))
        })
    }
}

/// `min(1.0, 0.45 + 0.15 × hits)` for one or more hits, else 0.0.
pub fn confidence_for(hit_count: usize) -> f64 {
    if hit_count == 0 {
        return 0.0;
    }
    (CONFIDENCE_BASE + CONFIDENCE_STEP * hit_count as f64).min(1.0)
}

// Tolerates float noise around the threshold.
fn meets_threshold(confidence: f64) -> bool {
    confidence + 1e-9 >= FIRST_AID_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> EmergencyClassifier {
        EmergencyClassifier::new(&TriageTables::default())
    }

    // =================================================================
    // CATEGORY + SEVERITY
    // =================================================================

    #[test]
    fn cannot_breathe_feel_faint_is_high_severity_fainting() {
        let result = classifier().classify("cannot breathe feel faint");
        assert_eq!(result.category.as_deref(), Some("fainting"));
        assert_eq!(result.severity_hint, Some(Severity::High));
    }

    #[test]
    fn heavy_bleeding_escalates_to_high() {
        let result = classifier().classify("bleeding heavy from arm wound");
        assert_eq!(result.category.as_deref(), Some("bleeding"));
        assert_eq!(result.severity_hint, Some(Severity::High));
        assert!(result.is_first_aid);
    }

    #[test]
    fn plain_bleeding_keeps_medium_hint() {
        let result = classifier().classify("small cut on my finger is bleeding");
        assert_eq!(result.category.as_deref(), Some("bleeding"));
        assert_eq!(result.severity_hint, Some(Severity::Medium));
    }

    #[test]
    fn burn_category_from_stem() {
        let result = classifier().classify("I burned my hand on the stove");
        assert_eq!(result.category.as_deref(), Some("burn"));
        assert_eq!(result.severity_hint, Some(Severity::Medium));
    }

    #[test]
    fn sprain_has_no_static_hint() {
        let result = classifier().classify("twisted ankle, some swelling");
        // "swelling" maps to allergic reaction only if no earlier rule matches
        assert_eq!(result.category.as_deref(), Some("allergic reaction"));
        let result = classifier().classify("I think I sprained my wrist");
        assert_eq!(result.category.as_deref(), Some("sprain"));
        assert_eq!(result.severity_hint, None);
    }

    #[test]
    fn fallback_label_keeps_its_category_hint() {
        // "i" fuzzily hits "bleeding" first; no stem is present
        let result = classifier().classify("I hurt my arm");
        assert_eq!(result.category.as_deref(), Some("bleeding"));
        assert_eq!(result.severity_hint, Some(Severity::Medium));
    }

    #[test]
    fn escalation_markers_respect_word_boundaries() {
        let c = classifier();
        assert_eq!(c.classify("bleeding persevere").severity_hint, Some(Severity::Medium));
        assert_eq!(c.classify("severe bleeding").severity_hint, Some(Severity::High));
        assert_eq!(c.classify("the burn won't stop hurting").severity_hint, Some(Severity::High));
    }

    #[test]
    fn falls_back_to_first_hit_label() {
        let result = classifier().classify("fever since morning");
        assert_eq!(result.category.as_deref(), Some("fever"));
        assert_eq!(result.keywords.first().map(String::as_str), Some("fever"));
    }

    // =================================================================
    // CONFIDENCE + GATE
    // =================================================================

    #[test]
    fn no_hits_means_zero_confidence() {
        let result = classifier().classify("hello world");
        assert_eq!(result, ClassificationResult::empty());
        assert_eq!(result.confidence, 0.0);
        assert!(!result.is_first_aid);
    }

    #[test]
    fn two_families_cross_the_gate() {
        let result = classifier().classify("burn and sting");
        assert!(result.keywords.len() >= 2);
        assert!(result.is_first_aid);
    }

    #[test]
    fn confidence_formula() {
        assert_eq!(confidence_for(0), 0.0);
        assert!((confidence_for(1) - 0.60).abs() < 1e-9);
        assert!((confidence_for(2) - 0.75).abs() < 1e-9);
        assert_eq!(confidence_for(4), 1.0);
        assert_eq!(confidence_for(40), 1.0);
    }

    #[test]
    fn confidence_is_monotonic_in_hits() {
        let mut last = 0.0;
        for n in 0..12 {
            let c = confidence_for(n);
            assert!(c >= last);
            assert!(c <= 1.0);
            last = c;
        }
    }

    // =================================================================
    // MATCHING HEURISTIC
    // =================================================================

    #[test]
    fn fuzzy_match_in_both_directions() {
        let c = classifier();
        // keyword inside token
        assert!(c.keyword_hits("bleeding").contains(&"bleed".to_string()));
        // token inside keyword
        assert!(c.keyword_hits("bleed").contains(&"bleeding".to_string()));
    }

    #[test]
    fn short_keywords_match_exactly_only() {
        let c = classifier();
        assert!(!c.keyword_hits("cute").contains(&"cut".to_string()));
        assert!(c.keyword_hits("cut").contains(&"cut".to_string()));
    }

    #[test]
    fn phrases_match_as_substrings() {
        let hits = classifier().keyword_hits("where is the first aid kit");
        assert!(hits.contains(&"first aid".to_string()));
    }

    #[test]
    fn hits_are_deduplicated_in_order() {
        let hits = classifier().keyword_hits("burn burn burn");
        assert_eq!(hits.iter().filter(|h| *h == "burn").count(), 1);
        assert_eq!(hits[0], "burn");
    }

    #[test]
    fn classification_is_deterministic() {
        let c = classifier();
        let text = "my child is choking and turning blue";
        assert_eq!(c.classify(text), c.classify(text));
    }

    #[test]
    fn rule_match_is_separate_from_fallback_label() {
        let c = classifier();
        // "is" fuzzily hits "poisoning" but no stem is present
        assert!(c.classify("what is the capital").is_first_aid);
        assert!(!c.rule_matches("what is the capital"));
        assert!(c.rule_matches("Deep CUT on my palm"));
    }

    #[test]
    fn custom_tables_are_honored() {
        let mut tables = TriageTables::default();
        tables.first_aid_keywords = vec!["zap".to_string()];
        tables.categories = vec![CategoryRule {
            category: "electric shock".into(),
            stems: vec!["zap".into()],
            severity: Some(Severity::High),
        }];
        let result = EmergencyClassifier::new(&tables).classify("got a zap");
        assert_eq!(result.category.as_deref(), Some("electric shock"));
        assert_eq!(result.severity_hint, Some(Severity::High));
    }
}
