use std::sync::Arc;

use crate::{domain::ExternalIdentity, ports::UserRepository};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinkStatus {
    Linked {
        name: String,
        identity: ExternalIdentity,
    },
    NotLinked,
}

/// Reports whether an external identity is linked, and to whom.
///
/// Lookup failures are reported as `NotLinked`; there is no separate error state.
#[derive(Clone)]
pub struct StatusResolver {
    users: Arc<dyn UserRepository>,
    fallback_name: String,
}

impl StatusResolver {
    /// `fallback_name` is shown for linked users without a display name.
    pub fn new(users: Arc<dyn UserRepository>, fallback_name: impl Into<String>) -> Self {
        Self {
            users,
            fallback_name: fallback_name.into(),
        }
    }

    pub async fn resolve(&self, identity: &ExternalIdentity) -> LinkStatus {
        match self.users.find_user_by_external_id(identity).await {
            Ok(Some(user)) => LinkStatus::Linked {
                name: user
                    .name
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| self.fallback_name.clone()),
                identity: user.external_chat_id,
            },
            Ok(None) => LinkStatus::NotLinked,
            Err(e) => {
                tracing::warn!(%identity, error = %e, "status lookup failed");
                LinkStatus::NotLinked
            }
        }
    }
}
