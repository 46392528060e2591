//! Lead Intake Service — orchestrates a public submission:
//! validate → store resume → persist row → schedule notification.

use bytes::Bytes;
use lettre::Address;
use tracing::info;

use crate::errors::AppError;
use crate::leads::store::{self, NewLead};
use crate::mailer::notify::Notifier;
use crate::models::lead::Lead;
use crate::state::AppState;

/// A parsed multipart submission from the public endpoint.
#[derive(Debug)]
pub struct LeadSubmission {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub filename: String,
    pub resume: Bytes,
}

/// Accepts a submission and returns the persisted lead.
///
/// The notification task is spawned after the row is committed and never
/// awaited: its outcome cannot delay the response or roll back the lead.
pub async fn submit(state: &AppState, submission: LeadSubmission) -> Result<Lead, AppError> {
    validate_email(&submission.email)?;

    // Early exit only; the UNIQUE constraint in `insert` is the real
    // guard against a concurrent duplicate.
    if store::exists_by_email(&state.db, &submission.email).await? {
        return Err(AppError::Conflict("Email already registered.".to_string()));
    }

    let resume_path = state
        .storage
        .store(&submission.filename, &submission.resume)
        .await?;

    let lead = store::insert(
        &state.db,
        NewLead {
            first_name: submission.first_name,
            last_name: submission.last_name,
            email: submission.email,
            resume_path,
        },
    )
    .await?;

    info!("Lead {} created for {}", lead.id, lead.email);

    let notifier = Notifier::new(
        state.mailer.clone(),
        state.config.attorney_email.clone(),
    );
    let snapshot = lead.clone();
    tokio::spawn(async move {
        notifier.send_new_lead_emails(&snapshot).await;
    });

    Ok(lead)
}

/// Syntactic email validation via lettre's address grammar.
pub fn validate_email(email: &str) -> Result<(), AppError> {
    email
        .parse::<Address>()
        .map(|_| ())
        .map_err(|_| AppError::Validation(format!("'{email}' is not a valid email address")))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::config::Config;
    use crate::leads::store::test_pool;
    use crate::mailer::{MailTransport, OutboundEmail, TransportError};
    use crate::models::lead::LeadState;
    use crate::storage::ResumeStorage;

    struct DroppingMailer;

    #[async_trait]
    impl MailTransport for DroppingMailer {
        async fn send(&self, _email: OutboundEmail) -> Result<(), TransportError> {
            Ok(())
        }
    }

    fn test_config() -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            api_key: "test-key".to_string(),
            upload_dir: String::new(),
            attorney_email: None,
            mail: None,
            port: 0,
            rust_log: "info".to_string(),
        }
    }

    async fn test_state(upload_dir: &std::path::Path) -> AppState {
        AppState {
            db: test_pool().await,
            storage: ResumeStorage::new(upload_dir).await.unwrap(),
            mailer: Arc::new(DroppingMailer),
            config: test_config(),
        }
    }

    fn submission(email: &str) -> LeadSubmission {
        LeadSubmission {
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: email.to_string(),
            filename: "resume.pdf".to_string(),
            resume: Bytes::from_static(b"%PDF-1.4 fake resume"),
        }
    }

    #[test]
    fn validate_email_accepts_plain_addresses() {
        assert!(validate_email("john.doe@example.com").is_ok());
    }

    #[test]
    fn validate_email_rejects_garbage() {
        for bad in ["", "not-an-email", "missing@domain@twice", "spaces in@x.com"] {
            assert!(
                matches!(validate_email(bad), Err(AppError::Validation(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn submit_returns_pending_lead_with_locator() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;

        let lead = submit(&state, submission("john.doe@example.com"))
            .await
            .unwrap();

        assert_eq!(lead.state, LeadState::Pending);
        assert!(!lead.resume_path.is_empty());
        let stored = tokio::fs::read(&lead.resume_path).await.unwrap();
        assert_eq!(stored, b"%PDF-1.4 fake resume");
    }

    #[tokio::test]
    async fn malformed_email_is_rejected_before_side_effects() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;

        let err = submit(&state, submission("not-an-email")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        // No file written, no row inserted.
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
        assert!(store::list_all(&state.db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;

        submit(&state, submission("john.doe@example.com"))
            .await
            .unwrap();
        let err = submit(&state, submission("john.doe@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(store::list_all(&state.db).await.unwrap().len(), 1);
    }
}
