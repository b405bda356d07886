//! Supabase adapter (PostgREST over HTTP).
//!
//! Implements the core bind-code and user repositories against the
//! `/rest/v1/{table}` endpoints.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;

use notibot_core::{
    config::Config,
    domain::{BindCode, ExternalIdentity, LinkedUser, UserId},
    errors::{Error, StoreError, StoreResult},
    formatting::truncate_chars,
    ports::{BindCodeRepository, UserRepository},
    Result,
};

mod rows;

use rows::{parse_timestamp, BindCodeRow, LinkedUserRow, UserNameRow};

#[derive(Clone, Debug)]
pub struct SupabaseConfig {
    pub url: String,
    pub api_key: String,
    pub bind_codes_table: String,
    pub users_table: String,
    pub timeout: Duration,
}

impl From<&Config> for SupabaseConfig {
    fn from(cfg: &Config) -> Self {
        Self {
            url: cfg.supabase_url.clone(),
            api_key: cfg.supabase_key.clone(),
            bind_codes_table: cfg.bind_codes_table.clone(),
            users_table: cfg.users_table.clone(),
            timeout: cfg.store_timeout,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SupabaseStore {
    cfg: SupabaseConfig,
    http: reqwest::Client,
}

impl SupabaseStore {
    pub fn new(cfg: SupabaseConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .user_agent("notibot/0.1")
            .build()
            .map_err(|e| Error::External(format!("http client build failed: {e}")))?;
        Ok(Self { cfg, http })
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        let url = format!("{}/rest/v1/{}", self.cfg.url.trim_end_matches('/'), table);
        self.http
            .request(method, url)
            .header("apikey", &self.cfg.api_key)
            .bearer_auth(&self.cfg.api_key)
    }

    async fn fetch_rows<T: DeserializeOwned>(&self, op: &str, req: RequestBuilder) -> StoreResult<Vec<T>> {
        let body = self.send(op, req).await?;
        serde_json::from_slice(&body)
            .map_err(|e| StoreError::Malformed(format!("{op}: {e}")))
    }

    async fn send(&self, op: &str, req: RequestBuilder) -> StoreResult<Vec<u8>> {
        let resp = req.send().await.map_err(|e| map_transport(op, e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                body: truncate_chars(&body, 200),
            });
        }

        let bytes = resp.bytes().await.map_err(|e| map_transport(op, e))?;
        Ok(bytes.to_vec())
    }
}

fn map_transport(op: &str, e: reqwest::Error) -> StoreError {
    if e.is_timeout() {
        StoreError::Timeout(format!("{op}: {e}"))
    } else {
        StoreError::Unavailable(format!("{op}: {e}"))
    }
}

fn eq(value: &str) -> String {
    format!("eq.{value}")
}

fn gt_timestamp(at: DateTime<Utc>) -> String {
    format!("gt.{}", at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[async_trait]
impl BindCodeRepository for SupabaseStore {
    async fn find_valid_bind_code(
        &self,
        code: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<BindCode>> {
        let req = self
            .request(Method::GET, &self.cfg.bind_codes_table)
            .query(&[
                ("select", "bind_code,user_id,expires_at".to_string()),
                ("bind_code", eq(code)),
                ("expires_at", gt_timestamp(now)),
                ("limit", "1".to_string()),
            ]);
        let rows: Vec<BindCodeRow> = self.fetch_rows("find_valid_bind_code", req).await?;
        let Some(row) = rows.into_iter().next() else {
            return Ok(None);
        };

        let expires_at = parse_timestamp(&row.expires_at).ok_or_else(|| {
            StoreError::Malformed(format!("find_valid_bind_code: bad expires_at {:?}", row.expires_at))
        })?;

        Ok(Some(BindCode {
            code: row.bind_code,
            user_id: UserId(row.user_id),
            expires_at,
        }))
    }

    async fn delete_bind_code(&self, code: &str) -> StoreResult<()> {
        let req = self
            .request(Method::DELETE, &self.cfg.bind_codes_table)
            .query(&[("bind_code", eq(code))]);
        self.send("delete_bind_code", req).await?;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for SupabaseStore {
    async fn update_user_external_id(
        &self,
        user_id: &UserId,
        identity: &ExternalIdentity,
    ) -> StoreResult<()> {
        let req = self
            .request(Method::PATCH, &self.cfg.users_table)
            .query(&[("id", eq(user_id.as_str())), ("select", "id".to_string())])
            .header("Prefer", "return=representation")
            .json(&serde_json::json!({ "telegram_chat_id": identity.as_str() }));
        let rows: Vec<serde_json::Value> = self.fetch_rows("update_user_external_id", req).await?;
        if rows.is_empty() {
            return Err(StoreError::NotFound(format!("user {user_id}")));
        }
        Ok(())
    }

    async fn find_user_name(&self, user_id: &UserId) -> StoreResult<Option<String>> {
        let req = self
            .request(Method::GET, &self.cfg.users_table)
            .query(&[
                ("select", "name".to_string()),
                ("id", eq(user_id.as_str())),
                ("limit", "1".to_string()),
            ]);
        let rows: Vec<UserNameRow> = self.fetch_rows("find_user_name", req).await?;
        Ok(rows.into_iter().next().and_then(|r| r.name))
    }

    async fn find_user_by_external_id(
        &self,
        identity: &ExternalIdentity,
    ) -> StoreResult<Option<LinkedUser>> {
        // Two rows are enough to notice a duplicated link.
        let req = self
            .request(Method::GET, &self.cfg.users_table)
            .query(&[
                ("select", "name,telegram_chat_id".to_string()),
                ("telegram_chat_id", eq(identity.as_str())),
                ("limit", "2".to_string()),
            ]);
        let rows: Vec<LinkedUserRow> = self.fetch_rows("find_user_by_external_id", req).await?;
        if rows.len() > 1 {
            tracing::warn!(%identity, "identity is linked to more than one user");
        }

        Ok(rows.into_iter().next().map(|r| LinkedUser {
            name: r.name,
            external_chat_id: ExternalIdentity(r.telegram_chat_id),
        }))
    }
}
