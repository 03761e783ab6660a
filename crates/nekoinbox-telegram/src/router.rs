use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*, types::BotCommand};

use nekoinbox_core::{
    config::Config,
    domain::Category,
    messaging::port::{MessagingPort, SubmissionSink},
    pipeline::SubmissionPipeline,
};

use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    pub messenger: Arc<dyn MessagingPort>,
    pub pipeline: Arc<SubmissionPipeline>,
}

fn bot_commands() -> Vec<BotCommand> {
    let mut out = Category::ALL
        .iter()
        .map(|c| BotCommand::new(c.command(), format!("{} [内容]", c.trigger())))
        .collect::<Vec<_>>();
    out.push(BotCommand::new("help", "使用说明"));
    out
}

/// Long-poll Telegram until shutdown (Ctrl-C).
///
/// `sink` is `None` when the backend is not configured; submissions are then
/// refused with a friendly reply.
pub async fn run_polling(
    cfg: Arc<Config>,
    sink: Option<Arc<dyn SubmissionSink>>,
) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    // Basic startup info.
    if let Ok(me) = bot.get_me().await {
        tracing::info!(username = %me.username(), "nekoinbox started");
    }
    tracing::info!(
        admins = cfg.admin_ids.len(),
        backend = sink.is_some(),
        frontend_url = %cfg.frontend_url,
        "relay configured"
    );

    if let Err(e) = bot.set_my_commands(bot_commands()).await {
        tracing::warn!(error = %e, "failed to register bot commands");
    }

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let pipeline = Arc::new(SubmissionPipeline::new(
        messenger.clone(),
        sink,
        cfg.admin_ids.clone(),
        cfg.frontend_url.clone(),
    ));

    let state = Arc::new(AppState {
        messenger,
        pipeline,
    });

    let handler =
        dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    tracing::info!("dispatcher stopped");
    Ok(())
}
