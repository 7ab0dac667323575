use regex::{Regex, RegexBuilder};

use super::TriageError;

/// Split text into lowercase alphabetic runs.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphabetic())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Multi-word keywords are matched as substrings of the whole text.
pub fn is_phrase(keyword: &str) -> bool {
    keyword.contains(' ')
}

pub fn push_unique(list: &mut Vec<String>, item: &str) {
    if !list.iter().any(|existing| existing == item) {
        list.push(item.to_string());
    }
}

/// Token with a plain plural "s" removed, if it had one.
pub fn singular(token: &str) -> Option<&str> {
    token.strip_suffix('s').filter(|t| !t.is_empty())
}

/// Keywords present as whole tokens (single words, plain plurals allowed)
/// or substrings (phrases), deduplicated in first-seen order: tokens first,
/// then phrases.
pub fn exact_keyword_hits(tokens: &[String], lower_text: &str, keywords: &[String]) -> Vec<String> {
    let mut hits = Vec::new();
    for token in tokens {
        let plural_of = singular(token);
        if let Some(kw) = keywords
            .iter()
            .find(|k| !is_phrase(k) && (*k == token || Some(k.as_str()) == plural_of))
        {
            push_unique(&mut hits, kw);
        }
    }
    for kw in keywords.iter().filter(|k| is_phrase(k)) {
        if lower_text.contains(kw.as_str()) {
            push_unique(&mut hits, kw);
        }
    }
    hits
}

/// Compile case-insensitive patterns, reporting the first one that fails.
pub fn compile_patterns(sources: &[String]) -> Result<Vec<Regex>, TriageError> {
    sources
        .iter()
        .map(|src| {
            RegexBuilder::new(src)
                .case_insensitive(true)
                .build()
                .map_err(|source| TriageError::InvalidPattern {
                    pattern: src.clone(),
                    source,
                })
        })
        .collect()
}
