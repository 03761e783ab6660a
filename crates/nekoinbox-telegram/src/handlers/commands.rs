use nekoinbox_core::domain::Category;

/// What an incoming text asks the bot to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Trigger {
    Help,
    Submit { category: Category, args: String },
}

fn parse_command(text: &str) -> (String, String) {
    // Telegram may send `/cmd@botname arg1 ...`
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").to_string();

    let cmd = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase();

    (cmd, rest)
}

/// Recognize `/feedback`-style commands and the bare Chinese triggers.
///
/// Chinese triggers may be followed by the content with or without a space,
/// with an optional leading `/`.
pub fn parse_trigger(text: &str) -> Option<Trigger> {
    let trimmed = text.trim_start();

    let bare = trimmed.strip_prefix('/').unwrap_or(trimmed);
    for category in Category::ALL {
        if let Some(rest) = bare.strip_prefix(category.trigger()) {
            return Some(Trigger::Submit {
                category,
                args: rest.to_string(),
            });
        }
    }

    if !trimmed.starts_with('/') {
        return None;
    }

    let (cmd, args) = parse_command(trimmed);
    match cmd.as_str() {
        "start" | "help" => Some(Trigger::Help),
        other => Category::from_command(other).map(|category| Trigger::Submit { category, args }),
    }
}
