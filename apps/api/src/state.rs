use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::mailer::MailTransport;
use crate::storage::ResumeStorage;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub storage: ResumeStorage,
    /// Pluggable outbound email transport. SMTP in production, a
    /// recording mock in tests.
    pub mailer: Arc<dyn MailTransport>,
    pub config: Config,
}
