mod auth;
mod config;
mod db;
mod errors;
mod leads;
mod mailer;
mod models;
mod routes;
mod state;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, DEFAULT_API_KEY};
use crate::db::{create_pool, init_schema};
use crate::mailer::{MailTransport, NullMailer, SmtpMailer};
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::ResumeStorage;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; everything else reads from the struct.
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Leadgate API v{}", env!("CARGO_PKG_VERSION"));

    if config.api_key == DEFAULT_API_KEY {
        warn!("API_KEY is the insecure default; override it in any real deployment");
    }

    // Initialize SQLite and apply the schema
    let db = create_pool(&config.database_url).await?;
    init_schema(&db).await?;

    // Initialize local resume storage
    let storage = ResumeStorage::new(&config.upload_dir)
        .await
        .map_err(|e| anyhow::anyhow!("failed to open upload directory: {e}"))?;
    info!("Resume storage ready at {}", config.upload_dir);

    // Initialize the outbound mail transport
    let mailer = build_mailer(&config)?;

    let state = AppState {
        db,
        storage,
        mailer,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// SMTP when the MAIL_* variables are configured, otherwise a null
/// transport whose failures the dispatcher logs and swallows.
fn build_mailer(config: &Config) -> Result<Arc<dyn MailTransport>> {
    match &config.mail {
        Some(mail) => {
            let mailer = SmtpMailer::from_config(mail)?;
            info!("SMTP transport configured for {}:{}", mail.server, mail.port);
            Ok(Arc::new(mailer))
        }
        None => {
            warn!("MAIL_* variables not fully set; outgoing email is disabled");
            Ok(Arc::new(NullMailer))
        }
    }
}
