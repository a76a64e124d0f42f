use teloxide::prelude::*;
use teloxide::types::ChatId;

use super::{NotificationError, NotificationGateway};
use crate::config::TelegramConfig;

/// Delivers alerts as Telegram bot messages; destinations are chat ids
#[derive(Clone)]
pub struct TelegramGateway {
    bot: Bot,
}

impl std::fmt::Debug for TelegramGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramGateway").finish_non_exhaustive()
    }
}

impl TelegramGateway {
    pub fn new(config: &TelegramConfig) -> Self {
        Self {
            bot: Bot::new(&config.bot_token),
        }
    }
}

/// Parse a chat id such as `-1001234567890`
fn parse_chat_id(destination: &str) -> Result<ChatId, NotificationError> {
    destination
        .trim()
        .parse::<i64>()
        .map(ChatId)
        .map_err(|_| NotificationError::InvalidDestination(destination.to_string()))
}

impl NotificationGateway for TelegramGateway {
    async fn send(&self, destination: &str, message: &str) -> Result<(), NotificationError> {
        let chat_id = parse_chat_id(destination)?;
        self.bot
            .send_message(chat_id, message.to_string())
            .await
            .map_err(|e| NotificationError::Network(e.to_string()))?;
        Ok(())
    }
}
