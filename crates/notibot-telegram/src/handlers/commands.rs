use teloxide::types::Message;

use notibot_core::{domain::ChatId, messaging::types::Command};

use crate::router::AppState;

/// Hand a `/command` to the core dispatcher, which answers through the messenger.
///
/// Nothing is returned: failures are rendered as replies or logged, so the
/// teloxide handler chain never sees them.
pub(super) async fn handle_command(msg: &Message, text: &str, state: &AppState) {
    let Some(cmd) = Command::parse(ChatId(msg.chat.id.0), text) else {
        return;
    };

    let username = msg.from().and_then(|u| u.username.as_deref());
    tracing::debug!(command = %cmd.name, chat_id = cmd.chat_id.0, ?username, "command received");

    state.commands.handle(&cmd, state.messenger.as_ref()).await;
}
