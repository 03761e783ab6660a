//! One command invocation end to end:
//! config check, validation, admin fan-out, delivery, reply.

use std::sync::Arc;

use crate::{
    domain::{Category, Submission, UserId},
    messaging::{
        port::{MessagingPort, SubmissionSink},
        types::Invocation,
    },
    notify::{admin_notice, notify_admins},
};

pub const NOT_CONFIGURED_REPLY: &str = "喵喵信箱的后端服务好像还没配置好，请联系管理员哦~";
pub const DELIVERY_FAILED_REPLY: &str = "抱歉，信息发送失败了，请稍后再试或联系管理员~";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    NotConfigured,
    EmptyContent(Category),
    Delivered(Category),
    DeliveryFailed,
}

impl Outcome {
    pub fn reply_text(&self, frontend_url: &str) -> String {
        match self {
            Outcome::NotConfigured => NOT_CONFIGURED_REPLY.to_string(),
            Outcome::EmptyContent(c) => format!("{}内容不能为空哦~", c.label()),
            Outcome::Delivered(c) => format!(
                "你的{}已经送到喵喵信箱啦，感谢你的支持！\n可以在这里查看哦: {frontend_url}",
                c.label()
            ),
            Outcome::DeliveryFailed => DELIVERY_FAILED_REPLY.to_string(),
        }
    }
}

pub struct SubmissionPipeline {
    messenger: Arc<dyn MessagingPort>,
    /// `None` when the backend endpoint or credential is missing.
    sink: Option<Arc<dyn SubmissionSink>>,
    admins: Vec<UserId>,
    frontend_url: String,
}

impl SubmissionPipeline {
    pub fn new(
        messenger: Arc<dyn MessagingPort>,
        sink: Option<Arc<dyn SubmissionSink>>,
        admins: Vec<UserId>,
        frontend_url: impl Into<String>,
    ) -> Self {
        Self {
            messenger,
            sink,
            admins,
            frontend_url: frontend_url.into(),
        }
    }

    /// Run the invocation and send exactly one reply to its origin.
    pub async fn handle(&self, inv: &Invocation) -> Outcome {
        let outcome = self.process(inv).await;

        let reply = outcome.reply_text(&self.frontend_url);
        if let Err(e) = self.messenger.reply(inv.origin, &reply).await {
            tracing::warn!(
                chat_id = inv.origin.chat_id.0,
                error = %e,
                "failed to send reply to submitter"
            );
        }

        outcome
    }

    async fn process(&self, inv: &Invocation) -> Outcome {
        let Some(sink) = &self.sink else {
            return Outcome::NotConfigured;
        };

        let Some(submission) = Submission::new(inv.category, &inv.sender, &inv.args) else {
            tracing::debug!(
                category = inv.category.wire_tag(),
                user_id = %inv.sender.user_id,
                "empty submission rejected"
            );
            return Outcome::EmptyContent(inv.category);
        };

        notify_admins(
            self.messenger.as_ref(),
            &self.admins,
            &admin_notice(&submission),
        )
        .await;

        let delivered = sink.deliver(&submission).await;

        tracing::info!(
            category = submission.category.wire_tag(),
            user_name = %submission.author_display_name,
            user_id = %submission.author_id,
            content = %submission.body,
            delivered,
            "received submission"
        );

        if delivered {
            Outcome::Delivered(submission.category)
        } else {
            Outcome::DeliveryFailed
        }
    }
}
