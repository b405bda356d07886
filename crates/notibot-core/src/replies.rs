//! Reply templates (Telegram HTML).
//!
//! Wording is presentation only; the outcome-to-template mapping is what the
//! dispatcher guarantees.

use crate::{formatting::escape_html, linking::BindOutcome, status::LinkStatus};

pub fn welcome() -> String {
    "🤖 <b>Chat notifications bot</b>\n\n\
Commands:\n\
/bind CODE - Link your account\n\
/status - Check link status\n\
/help - Help\n\n\
<i>Get notified about new messages from your chat app.</i>"
        .to_string()
}

pub fn help() -> String {
    "📖 <b>Help</b>\n\n\
<b>How to link your account:</b>\n\
1. Open the app\n\
2. Go to Telegram settings\n\
3. Copy the bind code\n\
4. Send the bot /bind CODE\n\n\
<b>Notifications:</b>\n\
You will be notified when:\n\
• you receive a new message\n\
• someone mentions you in a chat\n\n\
<b>Commands:</b>\n\
/start - Getting started\n\
/bind CODE - Link your account\n\
/status - Check link status\n\
/help - This help"
        .to_string()
}

pub fn bind_usage() -> String {
    "ℹ️ <b>Usage:</b> /bind CODE\n\nCopy the code from the app's Telegram settings.".to_string()
}

pub fn bind(outcome: &BindOutcome) -> String {
    match outcome {
        BindOutcome::Bound { name } => format!(
            "✅ <b>Account linked!</b>\n\nHi, {}! You will now receive notifications about new messages.",
            escape_html(name)
        ),
        BindOutcome::InvalidCode => {
            "❌ <b>Invalid or expired code</b>\n\nCheck the code and try again.".to_string()
        }
        BindOutcome::UpdateFailed => {
            "❌ <b>Linking failed</b>\n\nPlease try again later or contact support.".to_string()
        }
    }
}

pub fn status(status: &LinkStatus) -> String {
    match status {
        LinkStatus::Linked { name, identity } => format!(
            "✅ <b>Status: Linked</b>\n\nAccount: <b>{}</b>\nChat ID: <code>{}</code>",
            escape_html(name),
            escape_html(identity.as_str())
        ),
        LinkStatus::NotLinked => {
            "❌ <b>Status: Not linked</b>\n\nUse /bind CODE to link your account.".to_string()
        }
    }
}

pub fn failure() -> String {
    "⚠️ <b>Something went wrong</b>\n\nPlease try again later.".to_string()
}
