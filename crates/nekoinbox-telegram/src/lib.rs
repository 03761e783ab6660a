//! Telegram adapter (teloxide).
//!
//! This crate implements the `nekoinbox-core` MessagingPort over the Telegram
//! Bot API and turns incoming messages into pipeline invocations.

use async_trait::async_trait;

use teloxide::prelude::*;

use tokio::time::sleep;

pub mod handlers;
pub mod router;

use nekoinbox_core::{
    domain::{ChatId, MessageId, MessageRef, UserId},
    errors::Error,
    messaging::{
        port::MessagingPort,
        types::{split_message, MAX_MESSAGE_CHARS},
    },
    Result,
};

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn tg_msg_id(message_id: MessageId) -> teloxide::types::MessageId {
        teloxide::types::MessageId(message_id.0)
    }

    fn map_err(e: teloxide::RequestError) -> Error {
        Error::External(format!("telegram error: {e}"))
    }

    /// Honors a single `RetryAfter` (flood control); every other error is returned.
    async fn with_retry<T, Fut>(&self, mut op: impl FnMut() -> Fut) -> Result<T>
    where
        Fut: std::future::IntoFuture<Output = std::result::Result<T, teloxide::RequestError>>,
        Fut::IntoFuture: Send,
    {
        const MAX_RETRIES: usize = 1;
        let mut attempts = 0usize;
        loop {
            match op().await {
                Ok(v) => return Ok(v),
                Err(e) => match e {
                    teloxide::RequestError::RetryAfter(d) if attempts < MAX_RETRIES => {
                        attempts += 1;
                        sleep(d).await;
                        continue;
                    }
                    other => return Err(Self::map_err(other)),
                },
            }
        }
    }
}

#[async_trait]
impl MessagingPort for TelegramMessenger {
    async fn reply(&self, origin: MessageRef, text: &str) -> Result<MessageRef> {
        let mut last = None;
        for piece in split_message(text, MAX_MESSAGE_CHARS) {
            let msg = self
                .with_retry(|| {
                    self.bot
                        .send_message(Self::tg_chat(origin.chat_id), piece.clone())
                        .reply_to_message_id(Self::tg_msg_id(origin.message_id))
                        .allow_sending_without_reply(true)
                })
                .await?;
            last = Some(MessageRef {
                chat_id: origin.chat_id,
                message_id: MessageId(msg.id.0),
            });
        }
        last.ok_or_else(|| Error::External("empty reply".to_string()))
    }

    /// Single attempt per piece: fan-out never retries, not even on flood control.
    async fn send_private(&self, user: UserId, text: &str) -> Result<MessageRef> {
        // A private chat with a user shares the user's id.
        let chat_id = ChatId(user.0);
        let mut last = None;
        for piece in split_message(text, MAX_MESSAGE_CHARS) {
            let msg = self
                .bot
                .send_message(Self::tg_chat(chat_id), piece)
                .await
                .map_err(Self::map_err)?;
            last = Some(MessageRef {
                chat_id,
                message_id: MessageId(msg.id.0),
            });
        }
        last.ok_or_else(|| Error::External("empty private message".to_string()))
    }
}
