//! VeriFact HTTP service
//!
//! `POST /api/fact-check` runs the engine over `{ "text": ... }` and returns a
//! fact-check report; `GET /health` names the active checker.

pub mod handlers;
pub mod session;
pub mod store;

use handlers::{create_router, AppState};
use session::{AnonymousSessions, SessionProvider, StaticTokenSessions};
use std::sync::Arc;
use store::InMemoryReportStore;
use tokio::net::TcpListener;
use tracing::info;
use verifact_common::VerifactError;
use verifact_config::{ServerSettings, VerifactConfig};
use verifact_core::FactChecker;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Engine error: {0}")]
    Engine(#[from] VerifactError),

    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    #[error("Server error: {0}")]
    Server(String),
}

/// State with the built-in collaborators.
///
/// Callers are resolved against `settings.tokens`. Without tokens every
/// caller is anonymous, unless sessions are required, in which case nobody
/// gets in. Reports go to a bounded in-memory store.
pub fn default_state(checker: FactChecker, settings: &ServerSettings) -> AppState {
    let tokens = settings.session_tokens();
    let sessions: Arc<dyn SessionProvider> = if tokens.is_empty() && !settings.require_session {
        Arc::new(AnonymousSessions)
    } else {
        Arc::new(StaticTokenSessions::new(tokens))
    };
    AppState {
        checker: Arc::new(checker),
        sessions,
        store: Arc::new(InMemoryReportStore::with_capacity(settings.report_history)),
        require_session: settings.require_session,
    }
}

/// Build the engine from `config` and serve until the listener fails.
pub async fn start_server(config: VerifactConfig) -> Result<(), ServerError> {
    let checker = FactChecker::from_config(&config).await?;
    info!(
        bind = %config.server.bind,
        checker = checker.checker_name(),
        require_session = config.server.require_session,
        "server.starting"
    );

    let app = create_router(default_state(checker, &config.server));
    let listener = TcpListener::bind(&config.server.bind).await?;
    info!(addr = ?listener.local_addr().ok(), "server.listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))
}
