use serde::{Deserialize, Serialize};

use super::enums::MessageRole;

/// One turn of a conversation. The caller owns the history; the core only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }
}

/// Most recent user message whose text differs from `current`.
///
/// The caller may or may not have appended the current input to the history
/// already, so an identical trailing user turn is skipped.
pub fn previous_user_message<'a>(history: &'a [Message], current: &str) -> Option<&'a Message> {
    let current = current.trim();
    history
        .iter()
        .rev()
        .filter(|m| m.is_user())
        .find(|m| m.content.trim() != current)
}

/// Most recent assistant message, if any.
pub fn last_assistant_message(history: &[Message]) -> Option<&Message> {
    history
        .iter()
        .rev()
        .find(|m| m.role == MessageRole::Assistant)
}

/// All user turns joined with the latest input, oldest first.
pub fn combined_user_text(history: &[Message], latest: &str) -> String {
    let latest = latest.trim();
    let mut parts: Vec<&str> = history
        .iter()
        .filter(|m| m.is_user())
        .map(|m| m.content.trim())
        .filter(|c| !c.is_empty())
        .collect();
    if parts.last() != Some(&latest) && !latest.is_empty() {
        parts.push(latest);
    }
    parts.join(" ")
}
