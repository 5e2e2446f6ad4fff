//! Supabase-style store: GoTrue for the session, PostgREST for inserts.
//!
//! - Session: `GET {url}/auth/v1/user` with the configured access token.
//!   401/403 means the token is gone or expired, which is "no session",
//!   not an error.
//! - Insert: `POST {url}/rest/v1/{table}` with `Prefer: return=minimal`.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::StatusCode;
use serde::Deserialize;

use super::{Session, SessionStore, StoreError};

#[derive(Deserialize, Debug)]
struct AuthUser {
    id: String,
}

pub struct SupabaseStore {
    base_url: String,
    anon_key: String,
    access_token: Option<String>,
    client: reqwest::Client,
}

impl SupabaseStore {
    pub fn new(base_url: String, anon_key: String, access_token: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
            access_token: access_token.filter(|t| !t.is_empty()),
            client: reqwest::Client::new(),
        }
    }

    /// Bearer token for PostgREST: the user's token when signed in, else the anon key.
    fn bearer(&self) -> &str {
        self.access_token.as_deref().unwrap_or(&self.anon_key)
    }
}

async fn error_from(response: reqwest::Response) -> StoreError {
    let status = response.status().as_u16();
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    StoreError::Api { status, message }
}

#[async_trait]
impl SessionStore for SupabaseStore {
    async fn get_session(&self) -> Result<Option<Session>, StoreError> {
        let Some(token) = self.access_token.as_deref() else {
            debug!("No access token configured, no session");
            return Ok(None);
        };

        let response = self
            .client
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                warn!("Access token rejected by store ({}), treating as signed out", response.status());
                Ok(None)
            }
            status if status.is_success() => {
                let user: AuthUser = response
                    .json()
                    .await
                    .map_err(|e| StoreError::Parse(e.to_string()))?;
                Ok(Some(Session {
                    user_id: user.id,
                    access_token: token.to_string(),
                }))
            }
            _ => Err(error_from(response).await),
        }
    }

    async fn insert(&self, table: &str, record: &serde_json::Value) -> Result<(), StoreError> {
        let response = self
            .client
            .post(format!("{}/rest/v1/{}", self.base_url, table))
            .header("apikey", &self.anon_key)
            .header("Prefer", "return=minimal")
            .bearer_auth(self.bearer())
            .json(record)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(error_from(response).await);
        }
        debug!("Inserted row into {}", table);
        Ok(())
    }
}
