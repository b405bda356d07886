use std::sync::Arc;

use crate::{
    codes::CodeStore,
    domain::{BindCode, ExternalIdentity},
    ports::UserRepository,
};

/// Sequential store calls in one `bind`: lookup, update, delete, name.
pub const MAX_STORE_CALLS: u32 = 4;

/// Result of redeeming a bind code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindOutcome {
    /// Identity linked; `name` is the user's display name (or the fallback).
    Bound { name: String },
    /// Wrong or expired code. The two are deliberately indistinguishable.
    InvalidCode,
    /// The user record could not be updated; the code was left in place.
    UpdateFailed,
}

/// Redeems one-time codes and links an external identity to the code's user.
#[derive(Clone)]
pub struct AccountLinker {
    codes: CodeStore,
    users: Arc<dyn UserRepository>,
    fallback_name: String,
}

impl AccountLinker {
    pub fn new(
        codes: CodeStore,
        users: Arc<dyn UserRepository>,
        fallback_name: impl Into<String>,
    ) -> Self {
        Self {
            codes,
            users,
            fallback_name: fallback_name.into(),
        }
    }

    /// Update-then-delete is not atomic: if the delete fails after a
    /// successful update, the code stays redeemable until it expires.
    pub async fn bind(&self, identity: &ExternalIdentity, submitted: &str) -> BindOutcome {
        let code = BindCode::canonicalize(submitted);
        if code.is_empty() {
            return BindOutcome::InvalidCode;
        }

        tracing::info!(%identity, code = %code, "bind attempt");

        let Some(bind_code) = self.codes.lookup_valid_code(&code).await else {
            tracing::info!(%identity, code = %code, "bind rejected: invalid or expired code");
            return BindOutcome::InvalidCode;
        };
        let user_id = bind_code.user_id;

        if let Err(e) = self.users.update_user_external_id(&user_id, identity).await {
            tracing::warn!(%identity, user_id = %user_id, error = %e, "bind update failed");
            return BindOutcome::UpdateFailed;
        }

        if let Err(e) = self.codes.delete_code(&code).await {
            tracing::warn!(
                code = %code,
                user_id = %user_id,
                error = %e,
                "bound but failed to delete bind code; it stays redeemable"
            );
        }

        let name = match self.users.find_user_name(&user_id).await {
            Ok(Some(name)) if !name.trim().is_empty() => name,
            Ok(_) => self.fallback_name.clone(),
            Err(e) => {
                tracing::debug!(user_id = %user_id, error = %e, "name lookup failed");
                self.fallback_name.clone()
            }
        };

        tracing::info!(%identity, user_id = %user_id, "bind succeeded");
        BindOutcome::Bound { name }
    }
}
