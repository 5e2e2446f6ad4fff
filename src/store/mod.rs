//! # Session Client
//!
//! A thin authenticated handle to the remote backing store. The only thing
//! this client ever does with it is write analysis history, best-effort.
//!
//! ```text
//! SessionStore
//! ├── get_session()          → Option<Session>
//! └── insert(table, record)  → ()
//! ```

pub mod supabase;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use log::info;

use crate::core::config::ResolvedConfig;

pub use supabase::SupabaseStore;

/// An authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub access_token: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Network-level failure reaching the store.
    Network(String),
    /// The store rejected the call.
    Api { status: u16, message: String },
    /// A body couldn't be encoded or decoded.
    Parse(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Network(msg) => write!(f, "store network error: {msg}"),
            StoreError::Api { status, message } => {
                write!(f, "store error (HTTP {status}): {message}")
            }
            StoreError::Parse(msg) => write!(f, "store parse error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// The current authenticated session, if there is one.
    async fn get_session(&self) -> Result<Option<Session>, StoreError>;

    /// Insert one row into `table`.
    async fn insert(&self, table: &str, record: &serde_json::Value) -> Result<(), StoreError>;
}

/// Used when no store is configured: never has a session, never writes.
pub struct NoStore;

#[async_trait]
impl SessionStore for NoStore {
    async fn get_session(&self) -> Result<Option<Session>, StoreError> {
        Ok(None)
    }

    async fn insert(&self, _table: &str, _record: &serde_json::Value) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Build the store from config. Falls back to [`NoStore`] when the store
/// URL or anon key is missing.
pub fn from_config(config: &ResolvedConfig) -> Arc<dyn SessionStore> {
    match &config.store {
        Some(settings) => {
            info!("History store configured at {}", settings.url);
            Arc::new(SupabaseStore::new(
                settings.url.clone(),
                settings.anon_key.clone(),
                settings.access_token.clone(),
            ))
        }
        None => {
            info!("No history store configured; analyses will not be persisted");
            Arc::new(NoStore)
        }
    }
}
