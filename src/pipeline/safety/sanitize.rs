use super::types::{InputModification, InputModificationKind, SanitizedInput};

/// Maximum user message length in characters.
pub const MAX_MESSAGE_LENGTH: usize = 2_000;

/// Replace every control character (U+0000..=U+001F, U+007F) with a single
/// space, then trim. Idempotent.
pub fn normalize_text(raw: &str) -> String {
    let replaced: String = raw
        .chars()
        .map(|c| if is_low_control(c) { ' ' } else { c })
        .collect();
    replaced.trim().to_string()
}

/// Sanitize a user message before any stage sees it.
pub fn sanitize_user_input(raw: &str, max_length: usize) -> SanitizedInput {
    let mut text = raw.to_string();
    let mut modifications = Vec::new();

    // Step 1: Remove non-visible Unicode characters
    let before = text.clone();
    text = remove_invisible_unicode(&text);
    if text != before {
        modifications.push(InputModification {
            kind: InputModificationKind::InvisibleUnicodeRemoved,
            description: "Stripped non-visible Unicode characters".to_string(),
        });
    }

    // Step 2: Control characters become spaces, outer whitespace trimmed
    if raw.chars().any(is_low_control) {
        modifications.push(InputModification {
            kind: InputModificationKind::ControlCharacterReplaced,
            description: "Replaced control characters with spaces".to_string(),
        });
    }
    text = normalize_text(&text);

    // Step 3: Truncate to maximum length
    if text.chars().count() > max_length {
        let original_len = text.chars().count();
        text = truncate_at_word_boundary(&text, max_length);
        modifications.push(InputModification {
            kind: InputModificationKind::ExcessiveLengthTruncated,
            description: format!(
                "Truncated from {} to {} characters",
                original_len,
                text.chars().count()
            ),
        });
    }

    let was_modified = !modifications.is_empty();

    SanitizedInput {
        text,
        was_modified,
        modifications,
    }
}

fn is_low_control(c: char) -> bool {
    matches!(c, '\u{0000}'..='\u{001F}' | '\u{007F}')
}

/// Remove zero-width and invisible Unicode characters.
fn remove_invisible_unicode(text: &str) -> String {
    text.chars()
        .filter(|c| {
            !matches!(
                *c,
                '\u{200B}'..='\u{200F}'  // Zero-width chars
                | '\u{202A}'..='\u{202E}' // Directional formatting
                | '\u{2060}'..='\u{2064}' // Invisible operators
                | '\u{2066}'..='\u{2069}' // Directional isolates
                | '\u{FEFF}'              // BOM
                | '\u{00AD}'              // Soft hyphen
            )
        })
        .collect()
}

/// Truncate text at a word boundary, counting characters not bytes.
fn truncate_at_word_boundary(text: &str, max: usize) -> String {
    let truncated: String = text.chars().take(max).collect();
    match truncated.rfind(char::is_whitespace) {
        Some(pos) => truncated[..pos].trim_end().to_string(),
        None => truncated,
    }
}
