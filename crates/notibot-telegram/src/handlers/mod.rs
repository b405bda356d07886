//! Telegram update handlers.
//!
//! Only text `/commands` are acted on; every other message is ignored.

use std::sync::Arc;

use teloxide::{prelude::*, types::Message};

use crate::router::AppState;

mod commands;

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(text) = msg.text().and_then(command_text) else {
        return Ok(());
    };
    commands::handle_command(&msg, text, &state).await;
    Ok(())
}

/// The message text, if it is a `/command`.
fn command_text(text: &str) -> Option<&str> {
    let text = text.trim_start();
    text.starts_with('/').then_some(text)
}
