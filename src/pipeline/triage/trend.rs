use regex::Regex;

use crate::models::Trend;

use super::tables::TrendPatterns;
use super::text::compile_patterns;
use super::TriageError;

/// Classifies reported change as worse / better / same.
///
/// Families are tried in urgency order, so text that mentions both
/// "worse" and "better" reads as worse.
#[derive(Debug, Clone)]
pub struct TrendDetector {
    families: [(Trend, Vec<Regex>); 3],
}

impl TrendDetector {
    pub fn new(patterns: &TrendPatterns) -> Result<Self, TriageError> {
        Ok(Self {
            families: [
                (Trend::Worse, compile_patterns(&patterns.worse)?),
                (Trend::Better, compile_patterns(&patterns.better)?),
                (Trend::Same, compile_patterns(&patterns.same)?),
            ],
        })
    }

    pub fn detect(&self, combined_text: &str) -> Trend {
        self.families
            .iter()
            .find(|(_, patterns)| patterns.iter().any(|re| re.is_match(combined_text)))
            .map(|(trend, _)| *trend)
            .unwrap_or(Trend::Unknown)
    }
}

impl Default for TrendDetector {
    fn default() -> Self {
        Self::new(&TrendPatterns::default()).expect("built-in trend patterns compile")
    }
}
