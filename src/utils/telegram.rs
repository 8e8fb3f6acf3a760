use async_trait::async_trait;
use log::info;
use teloxide::Bot;
use teloxide::prelude::{ChatId, Requester};
use crate::utils::share::{ShareError, SharePayload, ShareTarget};

// Builds the chat message announcing the calculator link.
pub fn share_message(payload: &SharePayload) -> String {
    let mut message = format!("🎓 {} 🎓\n\n", payload.title);
    message.push_str(&payload.text);
    message.push('\n');
    message.push_str(payload.url.as_str());
    message
}

/// Shares through a Telegram bot into a fixed chat.
pub struct TelegramShare {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramShare {
    pub fn new(bot_token: &str, chat_id: i64) -> Self {
        TelegramShare { bot: Bot::new(bot_token), chat_id: ChatId(chat_id) }
    }
}

#[async_trait]
impl ShareTarget for TelegramShare {
    async fn share(&self, payload: &SharePayload) -> Result<(), ShareError> {
        match self.bot.send_message(self.chat_id, share_message(payload)).await {
            Ok(message) => {
                info!("Text message sent successfully {:?}", message.id);
                Ok(())
            }
            Err(e) => Err(ShareError::Failed(e.to_string())),
        }
    }
}
