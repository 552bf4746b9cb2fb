//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! ## Architecture
//!
//! AppState holds:
//! - **Boards, replies, users**: the board's own records, keyed by numeric id
//! - **Sessions**: per-visitor session records, keyed by session id
//! - **Flash store**: one read-once redirect message per session
//! - **Renderer**: turns a view id and its model into an HTML page
//! - **User client**: optional typed client for the user info API. When
//!   absent, writer names resolve from the local user table.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::response::{Html, IntoResponse, Response};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::credentials::PasswordDigest;
use crate::error::AppError;
use crate::flash::FlashStore;
use crate::session::SessionRecord;
use crate::view::{ModelRenderer, View, ViewRenderer};

// -- Generic In-Memory Store --------------------------------------------------

/// Thread-safe, cloneable in-memory key-value store.
///
/// All operations are synchronous (the RwLock is `parking_lot`, not `tokio::sync`)
/// because the lock is never held across `.await` points.
#[derive(Debug)]
pub struct Store<K, T> {
    data: Arc<RwLock<HashMap<K, T>>>,
}

impl<K, T> Clone for Store<K, T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<K: Eq + Hash, T: Clone + Send + Sync> Store<K, T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a record, returning the previous value if the key existed.
    pub fn insert(&self, id: K, value: T) -> Option<T> {
        self.data.write().insert(id, value)
    }

    /// Insert a record unless an existing one `conflicts` with it.
    ///
    /// The check and the insert happen under one write lock, so of two
    /// concurrent callers inserting conflicting records exactly one wins.
    /// Returns `false`, leaving the store unchanged, on conflict.
    pub fn insert_unless(&self, id: K, value: T, mut conflicts: impl FnMut(&T) -> bool) -> bool {
        let mut guard = self.data.write();
        if guard.values().any(|existing| conflicts(existing)) {
            return false;
        }
        guard.insert(id, value);
        true
    }

    /// Retrieve a record by key.
    pub fn get(&self, id: &K) -> Option<T> {
        self.data.read().get(id).cloned()
    }

    /// List all records, in no particular order.
    pub fn list(&self) -> Vec<T> {
        self.data.read().values().cloned().collect()
    }

    /// Update a record in place. Returns the updated record, or `None` if not found.
    pub fn update(&self, id: &K, f: impl FnOnce(&mut T)) -> Option<T> {
        let mut guard = self.data.write();
        if let Some(entry) = guard.get_mut(id) {
            f(entry);
            Some(entry.clone())
        } else {
            None
        }
    }

    /// Remove a record by key. The removal is atomic: of two concurrent
    /// callers removing the same key, exactly one receives the record.
    pub fn remove(&self, id: &K) -> Option<T> {
        self.data.write().remove(id)
    }

    /// Remove every record matching the predicate, returning how many went.
    pub fn remove_where(&self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        let mut guard = self.data.write();
        let before = guard.len();
        guard.retain(|_, v| !predicate(v));
        before - guard.len()
    }

    /// Find the first record matching the predicate.
    pub fn find(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<T> {
        self.data.read().values().find(|v| predicate(v)).cloned()
    }

    /// Return the number of records.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: Eq + Hash, T: Clone + Send + Sync> Default for Store<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Monotonic id allocator for one table. Ids start at 1.
#[derive(Debug, Clone, Default)]
pub struct IdSequence(Arc<AtomicI64>);

impl IdSequence {
    pub fn next(&self) -> i64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }
}

// -- Records ------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct BoardRecord {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub writer_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ReplyRecord {
    pub id: i64,
    pub board_id: i64,
    pub writer_id: i64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// A registered user. The password is only ever held as a salted digest.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: i64,
    pub user_name: String,
    pub email: String,
    pub password: PasswordDigest,
    pub created_at: DateTime<Utc>,
}

// -- Configuration --------------------------------------------------------------

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// How long an unread flash message stays readable.
    pub flash_ttl: Duration,
    /// Name of the cookie carrying the session id.
    pub session_cookie: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            flash_ttl: Duration::from_secs(300),
            session_cookie: "BOARD_SESSION".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `PORT` (default: 8080)
    /// - `FLASH_TTL_SECS` (default: 300)
    /// - `SESSION_COOKIE` (default: `BOARD_SESSION`)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            flash_ttl: std::env::var("FLASH_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.flash_ttl),
            session_cookie: std::env::var("SESSION_COOKIE")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.session_cookie),
        }
    }

    /// Base URL of this application's own listener, used as the user info
    /// API default when `BOARD_USER_API_URL` is unset.
    pub fn local_base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }
}

// -- Application State ----------------------------------------------------------

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub boards: Store<i64, BoardRecord>,
    pub replies: Store<i64, ReplyRecord>,
    pub users: Store<i64, UserRecord>,
    pub board_ids: IdSequence,
    pub reply_ids: IdSequence,
    pub user_ids: IdSequence,

    pub sessions: Store<Uuid, SessionRecord>,
    pub flash: FlashStore,

    pub renderer: Arc<dyn ViewRenderer>,
    pub user_client: Option<board_user_client::UserClient>,

    pub config: AppConfig,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("boards", &self.boards.len())
            .field("replies", &self.replies.len())
            .field("users", &self.users.len())
            .field("sessions", &self.sessions.len())
            .field("user_client", &self.user_client.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl AppState {
    /// Create a new application state with default configuration and no user client.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default(), None)
    }

    /// Create a new application state with the given configuration and optional user client.
    pub fn with_config(
        config: AppConfig,
        user_client: Option<board_user_client::UserClient>,
    ) -> Self {
        Self {
            boards: Store::new(),
            replies: Store::new(),
            users: Store::new(),
            board_ids: IdSequence::default(),
            reply_ids: IdSequence::default(),
            user_ids: IdSequence::default(),
            sessions: Store::new(),
            flash: FlashStore::new(config.flash_ttl),
            renderer: Arc::new(ModelRenderer),
            user_client,
            config,
        }
    }

    /// Swap the view renderer.
    pub fn with_renderer(mut self, renderer: Arc<dyn ViewRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Render `view` with `model` as a 200 HTML page.
    pub fn render(&self, view: View, model: &serde_json::Value) -> Result<Response, AppError> {
        let html = self
            .renderer
            .render(view, model)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        Ok(Html(html).into_response())
    }

    /// Resolve a writer's display name.
    ///
    /// Goes through the user info API when a client is configured, so
    /// upstream failures surface as upstream failure kinds. Otherwise reads
    /// the local user table.
    pub async fn writer_name(&self, writer_id: i64) -> Result<String, AppError> {
        match &self.user_client {
            Some(client) => Ok(client.writer_info(writer_id).await?.name),
            None => self
                .users
                .get(&writer_id)
                .map(|u| u.user_name)
                .ok_or_else(|| AppError::NotFound(crate::routes::users::USER_NOT_FOUND.into())),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
