use async_trait::async_trait;

use crate::{
    domain::{MessageRef, Submission, UserId},
    Result,
};

/// Host messaging capabilities the pipeline consumes.
///
/// Telegram is the only implementation today; sends are plain text.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    /// Reply in the conversation `origin` belongs to.
    async fn reply(&self, origin: MessageRef, text: &str) -> Result<MessageRef>;

    /// Private message to a single user.
    async fn send_private(&self, user: UserId, text: &str) -> Result<MessageRef>;
}

/// Durable write of one submission to the remote backend.
///
/// Implementations must contain every failure and report it as `false`.
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn deliver(&self, submission: &Submission) -> bool;
}
