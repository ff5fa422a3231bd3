//! Human-readable conversation labels

use super::record::{ConversationRecord, Role};
use crate::utils::truncate_chars;

/// Longest title, in characters, including the ellipsis
pub const MAX_TITLE_CHARS: usize = 50;

/// Label used when a record has no user turn yet
pub const UNTITLED: &str = "untitled";

/// Compute a title from the first user turn.
pub fn derive_title(record: &ConversationRecord) -> String {
    record
        .turns()
        .iter()
        .find(|turn| turn.role() == Role::User)
        .map(|turn| truncate_chars(turn.content(), MAX_TITLE_CHARS))
        .unwrap_or_else(|| UNTITLED.to_string())
}

/// Stored title if the system turn carries one, otherwise a derived one.
pub fn lookup_title(record: &ConversationRecord) -> String {
    record
        .stored_title()
        .map(str::to_string)
        .unwrap_or_else(|| derive_title(record))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_message_is_unchanged() {
        let mut record = ConversationRecord::new("sys");
        record.push_user("hi, how are you?");
        assert_eq!(derive_title(&record), "hi, how are you?");
    }

    #[test]
    fn test_exactly_fifty_chars_is_unchanged() {
        let text = "x".repeat(50);
        let mut record = ConversationRecord::new("sys");
        record.push_user(text.clone());
        assert_eq!(derive_title(&record), text);
    }

    #[test]
    fn test_long_message_is_cut_to_fifty() {
        let text = "abcdefghij".repeat(6);
        let mut record = ConversationRecord::new("sys");
        record.push_user(text.clone());

        let title = derive_title(&record);
        assert_eq!(title.chars().count(), 50);
        assert_eq!(&title[..47], &text[..47]);
        assert!(title.ends_with("..."));
    }

    #[test]
    fn test_uses_first_user_turn_only() {
        let mut record = ConversationRecord::new("sys");
        record.push_user("first");
        record.push_assistant("reply");
        record.push_user("second");
        assert_eq!(derive_title(&record), "first");
    }

    #[test]
    fn test_no_user_turn_is_untitled() {
        let record = ConversationRecord::new("sys");
        assert_eq!(derive_title(&record), UNTITLED);
        assert_eq!(lookup_title(&record), UNTITLED);
    }

    #[test]
    fn test_lookup_prefers_stored_title() {
        let mut record = ConversationRecord::new("sys");
        record.push_user("what the deriver would say");
        record.set_title("renamed by hand");
        assert_eq!(lookup_title(&record), "renamed by hand");
    }

    #[test]
    fn test_lookup_falls_back_for_older_records() {
        let record: ConversationRecord = serde_json::from_str(
            r#"[{"role": "system", "content": "sys"}, {"role": "user", "content": "legacy"}]"#,
        )
        .unwrap();
        assert_eq!(lookup_title(&record), "legacy");
    }
}
