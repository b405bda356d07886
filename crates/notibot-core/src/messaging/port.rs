use async_trait::async_trait;

use crate::{domain::ChatId, Result};

/// Outbound message sink.
///
/// Telegram is the only implementation; replies are rendered as Telegram HTML.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<()>;
}
