//! Web widget server
//!
//! Serves the single chat page and a small JSON API. Each browser session
//! maps to one [`ChatSession`] held in an in-memory registry; a turn locks
//! only its own session for the duration of the remote call. Sessions left
//! unused for longer than the idle timeout are evicted when a new one is
//! created.

mod handlers;
pub mod page;

use crate::config::{Config, IngestConfig};
use crate::error::{Result, TroubleshootError};
use crate::providers::CompletionAdapter;
use crate::session::ChatSession;
use crate::turn::TurnHandler;
use axum::{
    routing::{get, post},
    Router,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// Shared handle to one live session
pub type SessionHandle = Arc<Mutex<ChatSession>>;

struct SessionEntry {
    handle: SessionHandle,
    last_active: Instant,
}

/// Server state shared by every request
pub struct AppState {
    turns: TurnHandler,
    system_prompt: String,
    ingest: IngestConfig,
    session_idle: Duration,
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
}

impl AppState {
    /// Build the state from configuration and the process-wide adapter
    pub fn new(config: &Config, adapter: Arc<dyn CompletionAdapter>) -> Self {
        Self {
            turns: TurnHandler::from_config(adapter, config),
            system_prompt: config.chat.system_prompt.clone(),
            ingest: config.ingest.clone(),
            session_idle: Duration::from_secs(config.server.session_idle_secs),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Override the idle timeout after which sessions are evicted
    pub fn with_session_idle(mut self, idle: Duration) -> Self {
        self.session_idle = idle;
        self
    }

    /// Start a new session and register it
    ///
    /// Idle sessions are swept first.
    pub async fn create_session(&self) -> Uuid {
        let evicted = self.evict_idle_sessions().await;
        if evicted > 0 {
            tracing::info!("Evicted {} idle web sessions", evicted);
        }

        let session = ChatSession::new(self.system_prompt.clone());
        let id = session.id();
        self.sessions.write().await.insert(
            id,
            SessionEntry {
                handle: Arc::new(Mutex::new(session)),
                last_active: Instant::now(),
            },
        );
        id
    }

    /// Look up a live session and mark it active
    ///
    /// # Errors
    ///
    /// Returns [`TroubleshootError::SessionNotFound`] for an unknown id
    pub async fn session(&self, id: Uuid) -> Result<SessionHandle> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions
            .get_mut(&id)
            .ok_or_else(|| TroubleshootError::SessionNotFound(id.to_string()))?;
        entry.last_active = Instant::now();
        Ok(entry.handle.clone())
    }

    /// Drop a session; returns whether it existed
    pub async fn remove_session(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    /// Drop sessions unused for longer than the idle timeout
    ///
    /// A session whose lock is held (a turn in flight) is kept. Returns the
    /// number of sessions removed.
    pub async fn evict_idle_sessions(&self) -> usize {
        let idle = self.session_idle;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, entry| {
            let keep = entry.last_active.elapsed() <= idle || entry.handle.try_lock().is_err();
            if !keep {
                tracing::debug!("Evicting idle web session {}", id);
            }
            keep
        });
        before - sessions.len()
    }

    /// Number of live sessions
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Turn handler shared by every session
    pub fn turns(&self) -> &TurnHandler {
        &self.turns
    }

    /// Log ingestion settings
    pub fn ingest(&self) -> &IngestConfig {
        &self.ingest
    }
}

/// Build the widget router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/sessions", post(handlers::create_session))
        .route(
            "/api/sessions/:id",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route("/api/sessions/:id/messages", post(handlers::post_message))
        .route("/api/logs", post(handlers::upload_log))
        .with_state(state)
}

/// Bind the configured address and serve until Ctrl-C
///
/// # Errors
///
/// Returns error if the address is invalid or cannot be bound
pub async fn serve(config: &Config, adapter: Arc<dyn CompletionAdapter>) -> Result<()> {
    let addr: SocketAddr = config.server.bind.parse().map_err(|e| {
        TroubleshootError::Config(format!("Invalid bind address {}: {}", config.server.bind, e))
    })?;

    let state = Arc::new(AppState::new(config, adapter));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        "Serving troubleshooting widget on http://{}",
        listener.local_addr()?
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
