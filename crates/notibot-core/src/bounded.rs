//! Per-call deadline around any repository.
//!
//! Wrapping the store adapter here puts a hard upper bound on every store
//! call, so the worst case of a whole bind is known up front
//! (`linking::MAX_STORE_CALLS` calls). An elapsed call becomes
//! `StoreError::Timeout` and is handled like any other store failure.

use std::{future::Future, sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    domain::{BindCode, ExternalIdentity, LinkedUser, UserId},
    errors::{StoreError, StoreResult},
    ports::{BindCodeRepository, UserRepository},
};

pub struct BoundedStore<R> {
    inner: Arc<R>,
    limit: Duration,
}

impl<R> BoundedStore<R> {
    pub fn new(inner: Arc<R>, limit: Duration) -> Self {
        Self { inner, limit }
    }

    async fn within<T>(
        &self,
        op: &str,
        fut: impl Future<Output = StoreResult<T>>,
    ) -> StoreResult<T> {
        match tokio::time::timeout(self.limit, fut).await {
            Ok(res) => res,
            Err(_) => {
                tracing::debug!(op, limit_ms = self.limit.as_millis() as u64, "store call deadline hit");
                Err(StoreError::Timeout(format!("{op}: no answer within {:?}", self.limit)))
            }
        }
    }
}

#[async_trait]
impl<R: BindCodeRepository + 'static> BindCodeRepository for BoundedStore<R> {
    async fn find_valid_bind_code(
        &self,
        code: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<BindCode>> {
        self.within("find_valid_bind_code", self.inner.find_valid_bind_code(code, now))
            .await
    }

    async fn delete_bind_code(&self, code: &str) -> StoreResult<()> {
        self.within("delete_bind_code", self.inner.delete_bind_code(code))
            .await
    }
}

#[async_trait]
impl<R: UserRepository + 'static> UserRepository for BoundedStore<R> {
    async fn update_user_external_id(
        &self,
        user_id: &UserId,
        identity: &ExternalIdentity,
    ) -> StoreResult<()> {
        self.within(
            "update_user_external_id",
            self.inner.update_user_external_id(user_id, identity),
        )
        .await
    }

    async fn find_user_name(&self, user_id: &UserId) -> StoreResult<Option<String>> {
        self.within("find_user_name", self.inner.find_user_name(user_id))
            .await
    }

    async fn find_user_by_external_id(
        &self,
        identity: &ExternalIdentity,
    ) -> StoreResult<Option<LinkedUser>> {
        self.within(
            "find_user_by_external_id",
            self.inner.find_user_by_external_id(identity),
        )
        .await
    }
}
