use anyhow::{Context, Result};

pub const DEFAULT_API_KEY: &str = "default-api-key";

/// Application configuration loaded from environment variables.
/// Built once in `main` and carried in `AppState`; nothing else reads env.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Admin secret compared against the `X-API-Key` header.
    pub api_key: String,
    /// Directory resumes are written into.
    pub upload_dir: String,
    /// Internal notification recipient. When unset, outgoing emails are
    /// disabled entirely (see `mailer::notify`).
    pub attorney_email: Option<String>,
    /// SMTP settings; `None` when the required MAIL_* variables are absent.
    pub mail: Option<MailConfig>,
    pub port: u16,
    pub rust_log: String,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub server: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
    pub from_name: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: env_or("DATABASE_URL", "sqlite://leads.db"),
            api_key: env_or("API_KEY", DEFAULT_API_KEY),
            upload_dir: env_or("UPLOAD_DIR", "./uploads"),
            attorney_email: optional_env("ATTORNEY_EMAIL"),
            mail: MailConfig::from_env()?,
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

impl MailConfig {
    /// Returns `None` unless every required MAIL_* variable is set.
    fn from_env() -> Result<Option<Self>> {
        let (Some(server), Some(username), Some(password), Some(from)) = (
            optional_env("MAIL_SERVER"),
            optional_env("MAIL_USERNAME"),
            optional_env("MAIL_PASSWORD"),
            optional_env("MAIL_FROM"),
        ) else {
            return Ok(None);
        };

        Ok(Some(MailConfig {
            server,
            port: env_or("MAIL_PORT", "587")
                .parse::<u16>()
                .context("MAIL_PORT must be a valid port number")?,
            username,
            password,
            from,
            from_name: optional_env("MAIL_FROM_NAME"),
        }))
    }

    /// The From mailbox, `Name <addr>` when MAIL_FROM_NAME is set.
    pub fn sender(&self) -> String {
        match &self.from_name {
            Some(name) => format!("{name} <{}>", self.from),
            None => self.from.clone(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
