use std::fmt;

/// Platform user id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Platform chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Platform message id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub i32);

/// A stable reference to a chat message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

/// Label used when a tag is not one of the known categories.
pub const FALLBACK_LABEL: &str = "消息";

/// Kind of submission a user can send.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Feedback,
    Suggestion,
    Letter,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Feedback, Category::Suggestion, Category::Letter];

    /// Tag the backend stores. Letters are stored as `message`.
    pub fn wire_tag(self) -> &'static str {
        match self {
            Category::Feedback => "feedback",
            Category::Suggestion => "suggestion",
            Category::Letter => "message",
        }
    }

    /// ASCII command name the bot registers for this category.
    pub fn command(self) -> &'static str {
        match self {
            Category::Feedback => "feedback",
            Category::Suggestion => "suggestion",
            Category::Letter => "letter",
        }
    }

    /// Chinese text trigger (usable without the `/` prefix).
    pub fn trigger(self) -> &'static str {
        match self {
            Category::Feedback => "反馈",
            Category::Suggestion => "建议",
            Category::Letter => "投信",
        }
    }

    pub fn label(self) -> &'static str {
        category_label(self.wire_tag())
    }

    pub fn from_command(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|c| {
            c.command().eq_ignore_ascii_case(name) || c.trigger() == name
        })
    }
}

/// Human label for an internal category tag.
pub fn category_label(tag: &str) -> &'static str {
    match tag {
        "feedback" => "反馈",
        "suggestion" => "建议",
        "message" => "信件",
        _ => FALLBACK_LABEL,
    }
}

/// Who sent a command, with the display-name candidates the host resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sender {
    pub user_id: UserId,
    pub group_alias: Option<String>,
    pub profile_name: Option<String>,
}

impl Sender {
    /// Group alias, then profile name, then the raw id.
    pub fn display_name(&self) -> String {
        [&self.group_alias, &self.profile_name]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.user_id.to_string())
    }
}

/// One user-originated feedback/suggestion/letter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    pub category: Category,
    pub author_display_name: String,
    pub author_id: String,
    pub body: String,
}

impl Submission {
    /// Returns `None` when the text is empty after trimming.
    pub fn new(category: Category, sender: &Sender, raw_text: &str) -> Option<Self> {
        let body = raw_text.trim();
        if body.is_empty() {
            return None;
        }
        Some(Self {
            category,
            author_display_name: sender.display_name(),
            author_id: sender.user_id.to_string(),
            body: body.to_string(),
        })
    }
}
