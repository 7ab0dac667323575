use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::pipeline::safety::PolicyDocument;
use crate::pipeline::safety::sanitize::MAX_MESSAGE_LENGTH;
use crate::pipeline::triage::clarify::DEFAULT_SIMILARITY_CUTOFF;
use crate::pipeline::triage::TriageError;

/// Application-level constants
pub const APP_NAME: &str = "MedTriage";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "medtriage_lib=info,warn"
}

/// Runtime knobs for the triage pipeline.
///
/// Every field has a default, so a config file only needs the values it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageConfig {
    /// Number named in escalation scripts ("Call 911 now").
    pub emergency_contact: String,
    /// Input longer than this (characters) is truncated at a word boundary.
    pub max_input_length: usize,
    /// Minimum similarity before a token triggers a clarification prompt.
    pub clarification_cutoff: f64,
    /// Optional JSON guardrail policy document.
    pub policy_path: Option<PathBuf>,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            emergency_contact: "911".to_string(),
            max_input_length: MAX_MESSAGE_LENGTH,
            clarification_cutoff: DEFAULT_SIMILARITY_CUTOFF,
            policy_path: None,
        }
    }
}

impl TriageConfig {
    /// Load and validate a JSON config file.
    pub fn from_path(path: &Path) -> Result<Self, TriageError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            TriageError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|e| TriageError::Config(format!("malformed {}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), TriageError> {
        if self.emergency_contact.trim().is_empty() {
            return Err(TriageError::Config("emergency_contact is empty".into()));
        }
        if self.max_input_length == 0 {
            return Err(TriageError::Config("max_input_length must be positive".into()));
        }
        if !(self.clarification_cutoff > 0.0 && self.clarification_cutoff <= 1.0) {
            return Err(TriageError::Config(format!(
                "clarification_cutoff must be in (0, 1], got {}",
                self.clarification_cutoff
            )));
        }
        Ok(())
    }

    /// Load the configured policy document.
    ///
    /// Failures are logged and yield `None`: the screener then runs
    /// keyword-only instead of failing requests.
    pub fn load_policy(&self) -> Option<PolicyDocument> {
        let path = self.policy_path.as_deref()?;
        match PolicyDocument::from_path(path) {
            Ok(doc) => Some(doc),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    mode = "keyword_only",
                    "Policy document unavailable"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn app_name_is_medtriage() {
        assert_eq!(APP_NAME, "MedTriage");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn defaults_are_valid() {
        let config = TriageConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.emergency_contact, "911");
        assert_eq!(config.max_input_length, 2_000);
        assert!(config.policy_path.is_none());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let file = write_temp(r#"{"emergency_contact":"112"}"#);
        let config = TriageConfig::from_path(file.path()).unwrap();
        assert_eq!(config.emergency_contact, "112");
        assert_eq!(config.clarification_cutoff, DEFAULT_SIMILARITY_CUTOFF);
    }

    #[test]
    fn malformed_or_missing_file_is_config_error() {
        let file = write_temp("{not json");
        assert!(matches!(
            TriageConfig::from_path(file.path()),
            Err(TriageError::Config(_))
        ));
        assert!(matches!(
            TriageConfig::from_path(Path::new("/nonexistent/medtriage.json")),
            Err(TriageError::Config(_))
        ));
    }

    #[test]
    fn out_of_range_values_rejected() {
        let bad = [
            TriageConfig { emergency_contact: " ".into(), ..TriageConfig::default() },
            TriageConfig { max_input_length: 0, ..TriageConfig::default() },
            TriageConfig { clarification_cutoff: 0.0, ..TriageConfig::default() },
            TriageConfig { clarification_cutoff: f64::NAN, ..TriageConfig::default() },
        ];
        for config in &bad {
            assert!(config.validate().is_err(), "{config:?}");
        }
    }

    #[test]
    fn load_policy_degrades_to_none() {
        let missing = TriageConfig {
            policy_path: Some(PathBuf::from("/nonexistent/policy.json")),
            ..TriageConfig::default()
        };
        assert!(missing.load_policy().is_none());

        let malformed = write_temp(r#"{"deny":[{"pattern":"(unclosed"}]}"#);
        let config = TriageConfig {
            policy_path: Some(malformed.path().to_path_buf()),
            ..TriageConfig::default()
        };
        assert!(config.load_policy().is_none());
    }

    #[test]
    fn load_policy_reads_valid_document() {
        let file = write_temp(r#"{"version":"1","off_topic_keywords":["chess"]}"#);
        let config = TriageConfig {
            policy_path: Some(file.path().to_path_buf()),
            ..TriageConfig::default()
        };
        assert!(config.load_policy().is_some());
        assert!(TriageConfig::default().load_policy().is_none());
    }
}
