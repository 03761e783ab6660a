use crate::{
    domain::{Submission, UserId},
    messaging::port::MessagingPort,
};

/// Private notice sent to every administrator.
pub fn admin_notice(submission: &Submission) -> String {
    format!(
        "📬 [NekoInbox] 收到来自 {}({}) 的新{}：\n{}",
        submission.author_display_name,
        submission.author_id,
        submission.category.label(),
        submission.body
    )
}

/// Best-effort private notification to each admin, one at a time, in list order.
///
/// A failed send is logged and skipped. Nothing is retried or returned.
pub async fn notify_admins(messenger: &dyn MessagingPort, admins: &[UserId], text: &str) {
    if admins.is_empty() {
        tracing::warn!("no admin target configured; skipping admin notification");
        return;
    }

    for &admin in admins {
        match messenger.send_private(admin, text).await {
            Ok(_) => tracing::debug!(admin = %admin, "admin notified"),
            Err(e) => tracing::warn!(admin = %admin, error = %e, "failed to notify admin"),
        }
    }
}
