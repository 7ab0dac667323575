//! Clarification for tokens that look like misspelled emergency terms.

use super::tables::{KnownTerm, TriageTables};
use super::text::{singular, tokenize};
use super::types::Clarification;

/// Similarity a token needs before we ask about it.
pub const DEFAULT_SIMILARITY_CUTOFF: f64 = 0.78;
/// Shorter tokens are never considered ambiguous.
const MIN_TOKEN_LEN: usize = 4;

#[derive(Debug, Clone)]
pub struct ClarificationDetector {
    terms: Vec<KnownTerm>,
    cutoff: f64,
}

impl ClarificationDetector {
    pub fn new(tables: &TriageTables, cutoff: f64) -> Self {
        Self {
            terms: tables.known_terms.clone(),
            cutoff,
        }
    }

    /// At most one prompt per message: the first token that clears the cutoff.
    pub fn detect(&self, text: &str) -> Option<Clarification> {
        tokenize(text)
            .into_iter()
            .filter(|t| t.chars().count() >= MIN_TOKEN_LEN)
            .filter(|t| !self.is_known_term(t))
            .find_map(|token| {
                let (term, similarity) = self.closest_term(&token)?;
                Some(Clarification {
                    prompt: format!(
                        "Did you mean \"{}\" ({}) when you wrote \"{}\"? \
                         Please confirm so I can give you the right guidance.",
                        term.term, term.definition, token
                    ),
                    suggestion: term.term.clone(),
                    similarity,
                    token,
                })
            })
    }

    /// Exact known term, or a plain plural of one.
    fn is_known_term(&self, token: &str) -> bool {
        let plural_of = singular(token);
        self.terms
            .iter()
            .any(|k| k.term == token || Some(k.term.as_str()) == plural_of)
    }

    /// Best-scoring known term at or above the cutoff; earlier terms win ties.
    fn closest_term(&self, token: &str) -> Option<(&KnownTerm, f64)> {
        let mut best: Option<(&KnownTerm, f64)> = None;
        for term in &self.terms {
            let score = similarity_ratio(token, &term.term);
            if score < self.cutoff {
                continue;
            }
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((term, score));
            }
        }
        best
    }
}

/// Ratcliff/Obershelp similarity: `2·M / T`, where M counts characters in
/// recursively found longest common blocks and T is the combined length.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (i, j, len) = longest_common_block(a, b);
    if len == 0 {
        return 0;
    }
    len + matching_chars(&a[..i], &b[..j]) + matching_chars(&a[i + len..], &b[j + len..])
}

/// Longest common contiguous block as (start in a, start in b, length).
/// Among equal lengths the earliest in `a`, then in `b`, wins.
fn longest_common_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut prev = vec![0usize; b.len() + 1];
    for i in 0..a.len() {
        let mut row = vec![0usize; b.len() + 1];
        for j in 0..b.len() {
            if a[i] == b[j] {
                row[j + 1] = prev[j] + 1;
                if row[j + 1] > best.2 {
                    best = (i + 1 - row[j + 1], j + 1 - row[j + 1], row[j + 1]);
                }
            }
        }
        prev = row;
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> ClarificationDetector {
        ClarificationDetector::new(&TriageTables::default(), DEFAULT_SIMILARITY_CUTOFF)
    }

    // =================================================================
    // SIMILARITY
    // =================================================================

    #[test]
    fn ratio_matches_gestalt_examples() {
        assert!((similarity_ratio("brused", "bruise") - 10.0 / 12.0).abs() < 1e-9);
        assert_eq!(similarity_ratio("burn", "burn"), 1.0);
        assert_eq!(similarity_ratio("abc", "xyz"), 0.0);
        assert_eq!(similarity_ratio("", ""), 1.0);
    }

    #[test]
    fn ratio_is_symmetric_for_simple_cases() {
        assert!((similarity_ratio("sprian", "sprain") - similarity_ratio("sprain", "sprian")).abs() < 1e-9);
    }

    // =================================================================
    // DETECTION
    // =================================================================

    #[test]
    fn misspelled_bruise_gets_prompt() {
        let c = detector().detect("I have a brused knee").unwrap();
        assert_eq!(c.token, "brused");
        assert_eq!(c.suggestion, "bruise");
        assert!(c.similarity >= DEFAULT_SIMILARITY_CUTOFF);
        assert!(c.prompt.contains("brused"));
        assert!(c.prompt.contains("bruise"));
        assert!(c.prompt.contains("skin"));
    }

    #[test]
    fn exact_term_needs_no_clarification() {
        assert!(detector().detect("bruise").is_none());
        assert!(detector().detect("I have a bruise on my knee").is_none());
    }

    #[test]
    fn plural_of_known_term_needs_no_clarification() {
        assert!(detector().detect("my back pains").is_none());
        assert!(detector().detect("two deep wounds").is_none());
    }

    #[test]
    fn unrelated_words_need_no_clarification() {
        assert!(detector().detect("hello there friend").is_none());
    }

    #[test]
    fn short_tokens_are_skipped() {
        // "cutt" is long enough, "ct" is not
        assert!(detector().detect("ct").is_none());
        assert_eq!(detector().detect("cutt").unwrap().suggestion, "cut");
    }

    #[test]
    fn first_ambiguous_token_wins() {
        let c = detector().detect("maybe a sprian or a brused shin").unwrap();
        assert_eq!(c.token, "sprian");
        assert_eq!(c.suggestion, "sprain");
    }

    #[test]
    fn cutoff_is_configurable() {
        let strict = ClarificationDetector::new(&TriageTables::default(), 0.95);
        assert!(strict.detect("brused").is_none());
    }
}
