use serde::{Deserialize, Serialize};

use crate::pipeline::triage::TriageError;

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = TriageError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(TriageError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(MessageRole {
    User => "user",
    Assistant => "assistant",
    System => "system",
});

// Declaration order is the escalation order: Low < Medium < High.
str_enum!(Severity {
    Low => "low",
    Medium => "medium",
    High => "high",
});

str_enum!(Trend {
    Worse => "worse",
    Better => "better",
    Same => "same",
    Unknown => "unknown",
});

impl Severity {
    /// One step up the scale, saturating at `High`.
    pub fn escalated(self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium | Self::High => Self::High,
        }
    }
}

impl Trend {
    pub fn is_known(&self) -> bool {
        *self != Self::Unknown
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn role_round_trips_through_str() {
        for role in [MessageRole::User, MessageRole::Assistant, MessageRole::System] {
            assert_eq!(MessageRole::from_str(role.as_str()).unwrap(), role);
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        let err = MessageRole::from_str("patient").unwrap_err();
        assert!(err.to_string().contains("MessageRole"));
        assert!(err.to_string().contains("patient"));
    }

    #[test]
    fn severity_is_ordered_low_to_high() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert_eq!(Severity::Low.escalated(), Severity::Medium);
        assert_eq!(Severity::High.escalated(), Severity::High);
    }

    #[test]
    fn trend_serializes_lowercase() {
        let json = serde_json::to_string(&Trend::Worse).unwrap();
        assert_eq!(json, "\"worse\"");
        let back: Trend = serde_json::from_str("\"same\"").unwrap();
        assert_eq!(back, Trend::Same);
        assert!(!Trend::Unknown.is_known());
    }
}
