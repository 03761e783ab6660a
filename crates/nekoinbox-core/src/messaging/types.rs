use crate::domain::{Category, MessageRef, Sender};

/// A parsed command trigger handed to the pipeline by the host adapter.
#[derive(Clone, Debug)]
pub struct Invocation {
    pub origin: MessageRef,
    pub sender: Sender,
    pub category: Category,
    /// Raw argument string after the command word (not yet trimmed).
    pub args: String,
}

/// Usage text shown for `/start` and `/help`.
pub fn usage_text() -> String {
    let lines = Category::ALL
        .iter()
        .map(|c| format!("{} [内容]  (/{})", c.trigger(), c.command()))
        .collect::<Vec<_>>()
        .join("\n");
    format!("喵喵信箱：收集大家的反馈与建议~\n\n{lines}")
}

/// Telegram's cap on message text, in characters.
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// Split `text` into pieces of at most `max_chars` characters.
///
/// Cuts after the last line break inside the window when there is one,
/// otherwise at the character limit. Concatenating the pieces yields `text`.
pub fn split_message(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut out = Vec::new();
    let mut rest = text;

    while let Some((cut, _)) = rest.char_indices().nth(max_chars) {
        let window = &rest[..cut];
        let split_at = match window.rfind('\n') {
            Some(i) if i > 0 => i + 1,
            _ => cut,
        };
        out.push(window[..split_at].to_string());
        rest = &rest[split_at..];
    }

    if !rest.is_empty() || out.is_empty() {
        out.push(rest.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Submission, UserId},
        notify::admin_notice,
    };

    fn chars(s: &str) -> usize {
        s.chars().count()
    }

    #[test]
    fn short_text_is_one_piece() {
        assert_eq!(split_message("hello", MAX_MESSAGE_CHARS), vec!["hello".to_string()]);
        assert_eq!(split_message("", MAX_MESSAGE_CHARS), vec![String::new()]);
        let exact = "猫".repeat(MAX_MESSAGE_CHARS);
        assert_eq!(split_message(&exact, MAX_MESSAGE_CHARS), vec![exact.clone()]);
    }

    #[test]
    fn notice_for_maximum_length_body_fits_in_pieces() {
        let sender = crate::domain::Sender {
            user_id: UserId(42),
            group_alias: None,
            profile_name: Some("Alice".to_string()),
        };
        let body = "喵".repeat(MAX_MESSAGE_CHARS);
        let sub = Submission::new(Category::Feedback, &sender, &body).unwrap();
        let notice = admin_notice(&sub);
        assert!(chars(&notice) > MAX_MESSAGE_CHARS);

        let pieces = split_message(&notice, MAX_MESSAGE_CHARS);
        assert!(pieces.len() >= 2);
        assert!(pieces.iter().all(|p| chars(p) <= MAX_MESSAGE_CHARS && !p.is_empty()));
        assert_eq!(pieces.concat(), notice);
    }

    #[test]
    fn prefers_line_breaks() {
        let text = format!("{}\n{}", "a".repeat(6), "b".repeat(6));
        assert_eq!(
            split_message(&text, 10),
            vec!["aaaaaa\n".to_string(), "bbbbbb".to_string()]
        );
        assert_eq!(
            split_message(&"x".repeat(25), 10),
            vec!["x".repeat(10), "x".repeat(10), "x".repeat(5)]
        );
    }

    #[test]
    fn usage_lists_every_trigger() {
        let text = usage_text();
        for c in Category::ALL {
            assert!(text.contains(c.trigger()));
            assert!(text.contains(&format!("/{}", c.command())));
        }
    }
}
