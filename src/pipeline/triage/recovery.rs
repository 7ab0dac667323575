//! Recovery detection: does the user say the problem has resolved?

use regex::Regex;

use crate::models::conversation::{last_assistant_message, previous_user_message};
use crate::models::Message;

use super::tables::RecoveryPatterns;
use super::text::compile_patterns;
use super::types::RecoveryResult;
use super::TriageError;

#[derive(Debug, Clone)]
pub struct RecoveryDetector {
    resolution: Vec<Regex>,
    confirmation: Vec<Regex>,
    resolution_question: Vec<Regex>,
}

impl RecoveryDetector {
    pub fn new(patterns: &RecoveryPatterns) -> Result<Self, TriageError> {
        Ok(Self {
            resolution: compile_patterns(&patterns.resolution)?,
            confirmation: compile_patterns(&patterns.confirmation)?,
            resolution_question: compile_patterns(&patterns.resolution_question)?,
        })
    }

    /// Recovered only on explicit resolution language, and never without an
    /// earlier user turn describing something to recover from.
    pub fn detect(&self, history: &[Message], latest: &str) -> RecoveryResult {
        if previous_user_message(history, latest).is_none() {
            return RecoveryResult::not_recovered();
        }

        if let Some(m) = self.resolution.iter().find_map(|re| re.find(latest)) {
            return RecoveryResult::recovered(m.as_str());
        }

        // A bare "yes" only confirms recovery when we just asked about it.
        if self.is_confirmation_only(latest) && self.last_question_asked_about_resolution(history) {
            return RecoveryResult::recovered(latest.trim());
        }

        RecoveryResult::not_recovered()
    }

    /// True when the text holds nothing but acknowledgements and punctuation.
    pub fn is_confirmation_only(&self, text: &str) -> bool {
        if !self.confirmation.iter().any(|re| re.is_match(text)) {
            return false;
        }
        let mut rest = text.to_string();
        for re in &self.confirmation {
            rest = re.replace_all(&rest, " ").into_owned();
        }
        !rest.chars().any(char::is_alphanumeric)
    }

    fn last_question_asked_about_resolution(&self, history: &[Message]) -> bool {
        last_assistant_message(history)
            .map(|m| self.resolution_question.iter().any(|re| re.is_match(&m.content)))
            .unwrap_or(false)
    }
}

impl Default for RecoveryDetector {
    fn default() -> Self {
        Self::new(&RecoveryPatterns::default()).expect("built-in recovery patterns compile")
    }
}
