//! Per-message command router.
//!
//! There is no session state: every command is handled on its own and answered
//! with exactly one reply, except unknown commands which get none.

use std::{future::Future, sync::Arc, time::Duration};

use crate::{
    errors::Error,
    linking::AccountLinker,
    messaging::{port::MessagingPort, types::Command},
    replies,
    status::StatusResolver,
    Result,
};

/// What an inbound command asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    Start,
    Help,
    Bind { code: String },
    BindUsage,
    Status,
    /// Unrecognised command: no reply.
    Ignore,
}

impl Intent {
    pub fn of(cmd: &Command) -> Self {
        match cmd.name.as_str() {
            "start" => Self::Start,
            "help" => Self::Help,
            "status" => Self::Status,
            "bind" if cmd.args.is_empty() => Self::BindUsage,
            "bind" => Self::Bind {
                code: cmd.args.clone(),
            },
            _ => Self::Ignore,
        }
    }
}

pub struct CommandDispatcher {
    linker: Arc<AccountLinker>,
    resolver: Arc<StatusResolver>,
    timeout: Duration,
}

impl CommandDispatcher {
    pub fn new(linker: Arc<AccountLinker>, resolver: Arc<StatusResolver>, timeout: Duration) -> Self {
        Self {
            linker,
            resolver,
            timeout,
        }
    }

    /// Render the reply for `cmd`, or `None` when the command is ignored.
    pub async fn dispatch(&self, cmd: &Command) -> Option<String> {
        let reply = match Intent::of(cmd) {
            Intent::Start => replies::welcome(),
            Intent::Help => replies::help(),
            Intent::BindUsage => replies::bind_usage(),
            Intent::Bind { code } => {
                let linker = self.linker.clone();
                let identity = cmd.identity.clone();
                match self
                    .guarded("bind", async move { linker.bind(&identity, &code).await })
                    .await
                {
                    Ok(outcome) => replies::bind(&outcome),
                    Err(e) => self.failure(cmd, &e),
                }
            }
            Intent::Status => {
                let resolver = self.resolver.clone();
                let identity = cmd.identity.clone();
                match self
                    .guarded("status", async move { resolver.resolve(&identity).await })
                    .await
                {
                    Ok(status) => replies::status(&status),
                    Err(e) => self.failure(cmd, &e),
                }
            }
            Intent::Ignore => {
                tracing::debug!(command = %cmd.name, chat_id = cmd.chat_id.0, "ignoring unknown command");
                return None;
            }
        };
        Some(reply)
    }

    /// Dispatch and deliver the reply. Delivery failures are logged, never returned.
    pub async fn handle(&self, cmd: &Command, messenger: &dyn MessagingPort) {
        let Some(reply) = self.dispatch(cmd).await else {
            return;
        };
        if let Err(e) = messenger.send_html(cmd.chat_id, &reply).await {
            tracing::warn!(chat_id = cmd.chat_id.0, error = %e, "failed to deliver reply");
        }
    }

    /// Run `fut` on its own task, bounded by the command timeout.
    ///
    /// A panic or an elapsed timeout becomes an error instead of unwinding into
    /// the transport. A timed-out task keeps running to completion.
    async fn guarded<T, F>(&self, op: &str, fut: F) -> Result<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let task = tokio::spawn(fut);
        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(v)) => Ok(v),
            Ok(Err(join)) => Err(Error::Dispatch(format!("{op} task failed: {join}"))),
            Err(_) => Err(Error::Timeout(op.to_string())),
        }
    }

    fn failure(&self, cmd: &Command, e: &Error) -> String {
        tracing::error!(
            command = %cmd.name,
            identity = %cmd.identity,
            error = %e,
            "command failed"
        );
        replies::failure()
    }
}
