//! Telegram update handlers.
//!
//! Text messages are matched against the submission triggers; everything else
//! is ignored. Matching messages become an [`Invocation`] for the core pipeline.

use std::sync::Arc;

use teloxide::{prelude::*, types::Message};

use nekoinbox_core::{
    domain::{ChatId, MessageId, MessageRef, Sender, UserId},
    messaging::{
        port::MessagingPort,
        types::{usage_text, Invocation},
    },
};

use crate::router::AppState;

mod commands;

pub use commands::{parse_trigger, Trigger};

fn message_ref(msg: &Message) -> MessageRef {
    MessageRef {
        chat_id: ChatId(msg.chat.id.0),
        message_id: MessageId(msg.id.0),
    }
}

fn sender_of(msg: &Message) -> Option<Sender> {
    let user = msg.from()?;
    let profile_name = user.full_name();
    Some(Sender {
        user_id: UserId(user.id.0 as i64),
        // Telegram does not expose per-group nicknames on messages.
        group_alias: None,
        profile_name: (!profile_name.trim().is_empty()).then_some(profile_name),
    })
}

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let Some(trigger) = parse_trigger(text) else {
        return Ok(());
    };
    let origin = message_ref(&msg);

    match trigger {
        Trigger::Help => {
            if let Err(e) = state.messenger.reply(origin, &usage_text()).await {
                tracing::warn!(chat_id = origin.chat_id.0, error = %e, "failed to send usage");
            }
        }
        Trigger::Submit { category, args } => {
            let Some(sender) = sender_of(&msg) else {
                return Ok(());
            };
            let inv = Invocation {
                origin,
                sender,
                category,
                args,
            };
            state.pipeline.handle(&inv).await;
        }
    }

    Ok(())
}
