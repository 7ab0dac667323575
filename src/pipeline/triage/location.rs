use super::tables::TriageTables;
use super::text::{singular, tokenize};

/// Finds body-part mentions in conversation text.
#[derive(Debug, Clone)]
pub struct LocationDetector {
    body_parts: Vec<String>,
}

impl LocationDetector {
    pub fn new(tables: &TriageTables) -> Self {
        Self {
            body_parts: tables.body_parts.iter().map(|p| p.to_lowercase()).collect(),
        }
    }

    /// First body part mentioned, accepting a plain plural ("fingers").
    pub fn find(&self, combined_text: &str) -> Option<&str> {
        tokenize(combined_text).iter().find_map(|token| {
            let plural_of = singular(token).unwrap_or(token.as_str());
            self.body_parts
                .iter()
                .find(|part| *part == token || *part == plural_of)
                .map(String::as_str)
        })
    }

    pub fn is_known(&self, combined_text: &str) -> bool {
        self.find(combined_text).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> LocationDetector {
        LocationDetector::new(&TriageTables::default())
    }

    #[test]
    fn finds_body_part_tokens() {
        assert_eq!(detector().find("my arm is bleeding"), Some("arm"));
        assert_eq!(detector().find("Burned two FINGERS"), Some("finger"));
    }

    #[test]
    fn partial_words_do_not_count() {
        // "harm" and "charming" contain "arm" but are not body parts
        assert!(!detector().is_known("no harm done, charming"));
    }

    #[test]
    fn nothing_found() {
        assert!(!detector().is_known("it is bleeding a lot"));
        assert!(!detector().is_known(""));
    }
}
