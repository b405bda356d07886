use crate::domain::{ChatId, ExternalIdentity};

/// Inbound command, already stripped of transport details.
#[derive(Clone, Debug)]
pub struct Command {
    pub chat_id: ChatId,
    pub identity: ExternalIdentity,
    /// Lowercased command name without the leading `/` or `@botname`.
    pub name: String,
    /// Everything after the command name, trimmed.
    pub args: String,
}

impl Command {
    /// Builds a command from raw message text, or `None` if it is not a `/command`.
    pub fn parse(chat_id: ChatId, text: &str) -> Option<Self> {
        let (name, args) = parse_command(text)?;
        Some(Self {
            chat_id,
            identity: ExternalIdentity::from(chat_id),
            name,
            args,
        })
    }
}

/// Splits `/cmd@botname arg1 ...` into `("cmd", "arg1 ...")`.
pub fn parse_command(text: &str) -> Option<(String, String)> {
    let text = text.trim();
    let rest = text.strip_prefix('/')?;

    let mut parts = rest.splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim().to_string();

    let name = first.split('@').next().unwrap_or("").to_lowercase();
    if name.is_empty() {
        return None;
    }

    Some((name, args))
}
