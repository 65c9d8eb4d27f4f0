use std::path::Path;

use anyhow::Result;
use llmapi::{LLMMessage, LLMMessageType};

use crate::constants::{DESCRIBE_PROMPT, ENFORCEMENT_PROMPT, FILENAME_SEPARATORS};

/// Derives a readable hint from an image file name.
///
/// The last extension is dropped. Then the prefix list is walked once, in
/// order, and each prefix the current name starts with is removed from the
/// front. A later prefix is checked against the already-stripped name, but the
/// list is never re-scanned. Finally, underscores and hyphens become spaces.
pub fn filename_hint(file_name: &str, prefixes: &[String]) -> String {
    let mut name = Path::new(file_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(file_name);

    for prefix in prefixes {
        if let Some(rest) = name.strip_prefix(prefix.as_str()) {
            name = rest;
        }
    }

    name.replace(FILENAME_SEPARATORS, " ")
}

pub fn build_user_prompt(filename_hint: Option<&str>) -> String {
    let mut user_message = DESCRIBE_PROMPT.to_string();

    if let Some(hint) = filename_hint.filter(|hint| !hint.is_empty()) {
        user_message.push_str(&format!(
            "\nContext info: The file is named '{hint}'. Use this context to identify the object if it is ambiguous, but describe what you see visually."
        ));
    }

    format!("{user_message} {ENFORCEMENT_PROMPT}")
}

/// System instruction followed by a user turn carrying the prompt and image.
pub fn build_caption_messages(
    system_instruction: &str,
    image_path: &Path,
    filename_hint: Option<&str>,
) -> Result<Vec<LLMMessage>> {
    let image = LLMMessageType::image(image_path)?;

    Ok(vec![
        LLMMessage::system(system_instruction),
        LLMMessage::new(
            None,
            "user",
            vec![LLMMessageType::text(build_user_prompt(filename_hint)), image],
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use llmapi::LLMUserType;

    fn prefixes(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn hint_strips_prefix_and_separators() {
        assert_eq!(filename_hint("my_cat-01.png", &prefixes(&["my_"])), "cat 01");
    }

    #[test]
    fn hint_without_prefixes_keeps_name() {
        assert_eq!(filename_hint("red_fox.jpeg", &[]), "red fox");
        assert_eq!(filename_hint("plain", &[]), "plain");
    }

    #[test]
    fn hint_drops_only_last_extension() {
        assert_eq!(filename_hint("photo.final.png", &[]), "photo.final");
    }

    #[test]
    fn hint_removes_each_prefix_once_in_list_order() {
        // Both apply because "b_" is checked after "a_" is gone.
        assert_eq!(filename_hint("a_b_name.png", &prefixes(&["a_", "b_"])), "name");
        // "b_" is checked first and does not match; the list is not re-scanned.
        assert_eq!(filename_hint("a_b_name.png", &prefixes(&["b_", "a_"])), "b name");
        // A repeated prefix is only removed once per list entry.
        assert_eq!(filename_hint("x_x_dog.png", &prefixes(&["x_"])), "x dog");
    }

    #[test]
    fn hint_prefix_must_match_at_start() {
        assert_eq!(filename_hint("cat_my_01.png", &prefixes(&["my_"])), "cat my 01");
    }

    #[test]
    fn hint_may_be_empty() {
        assert_eq!(filename_hint("IMG_.png", &prefixes(&["IMG_"])), "");
    }

    #[test]
    fn user_prompt_without_hint() {
        assert_eq!(
            build_user_prompt(None),
            "Describe this image. \nIMPORTANT: Output ONLY the raw caption text. Do not add conversational filler like 'Here is the description'."
        );
        assert_eq!(build_user_prompt(Some("")), build_user_prompt(None));
    }

    #[test]
    fn user_prompt_with_hint() {
        let prompt = build_user_prompt(Some("cat 01"));
        assert!(prompt.starts_with(
            "Describe this image.\nContext info: The file is named 'cat 01'. Use this context"
        ));
        assert!(prompt.ends_with("but describe what you see visually. \nIMPORTANT: Output ONLY the raw caption text. Do not add conversational filler like 'Here is the description'."));
    }

    #[test]
    fn caption_messages_carry_system_and_image() {
        let dir = tempfile::tempdir().unwrap();
        let image_path = dir.path().join("cat.png");
        std::fs::write(&image_path, b"png").unwrap();

        let messages = build_caption_messages("Be terse.", &image_path, Some("cat")).unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, LLMUserType::System);
        assert_eq!(messages[0].text(), "Be terse.");
        assert_eq!(messages[1].role, LLMUserType::Human);
        assert!(messages[1].text().contains("'cat'"));
        assert!(matches!(
            &messages[1].content[1],
            LLMMessageType::IMAGE { data_b64, .. } if data_b64 == "cG5n"
        ));
    }

    #[test]
    fn caption_messages_fail_for_unreadable_image() {
        let dir = tempfile::tempdir().unwrap();
        let result = build_caption_messages("Be terse.", &dir.path().join("gone.png"), None);
        assert!(result.is_err());
    }
}
