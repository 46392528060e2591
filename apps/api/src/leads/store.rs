//! Lead Record Store — the single source of truth for lead persistence.
//!
//! The email UNIQUE constraint is the final authority on duplicates;
//! callers may pre-check with `exists_by_email` but must treat the
//! constraint violation from `insert` as the real verdict under
//! concurrent submissions.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::errors::AppError;
use crate::models::lead::{Lead, LeadState};

const LEAD_COLUMNS: &str = "id, first_name, last_name, email, resume_path, state, created_at";

/// Fields supplied by the intake service; id and created_at are assigned
/// here.
#[derive(Debug)]
pub struct NewLead {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub resume_path: String,
}

pub async fn exists_by_email(pool: &SqlitePool, email: &str) -> Result<bool, AppError> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM leads WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}

/// Inserts a new lead with state `PENDING`, assigning id and timestamp.
/// A unique violation on email maps to `Conflict`.
pub async fn insert(pool: &SqlitePool, new_lead: NewLead) -> Result<Lead, AppError> {
    let query = format!(
        "INSERT INTO leads (first_name, last_name, email, resume_path, state, created_at) \
         VALUES (?, ?, ?, ?, ?, ?) \
         RETURNING {LEAD_COLUMNS}"
    );

    let result = sqlx::query_as::<_, Lead>(&query)
        .bind(&new_lead.first_name)
        .bind(&new_lead.last_name)
        .bind(&new_lead.email)
        .bind(&new_lead.resume_path)
        .bind(LeadState::Pending)
        .bind(Utc::now())
        .fetch_one(pool)
        .await;

    match result {
        Ok(lead) => Ok(lead),
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(AppError::Conflict(
            "Email already registered.".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}

/// All leads in id (insertion) order.
pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Lead>, AppError> {
    let query = format!("SELECT {LEAD_COLUMNS} FROM leads ORDER BY id");
    let leads = sqlx::query_as::<_, Lead>(&query).fetch_all(pool).await?;
    Ok(leads)
}

pub async fn get_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Lead>, AppError> {
    let query = format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = ?");
    let lead = sqlx::query_as::<_, Lead>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(lead)
}

/// Persists a new review state and returns the updated lead. Only the
/// state column is touched.
pub async fn update_state(
    pool: &SqlitePool,
    id: i64,
    new_state: LeadState,
) -> Result<Lead, AppError> {
    let query = format!("UPDATE leads SET state = ? WHERE id = ? RETURNING {LEAD_COLUMNS}");
    let updated = sqlx::query_as::<_, Lead>(&query)
        .bind(new_state)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    updated.ok_or_else(|| AppError::NotFound("Lead not found".to_string()))
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    use sqlx::sqlite::SqlitePoolOptions;

    // One connection: each in-memory SQLite connection is its own database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    crate::db::init_schema(&pool).await.expect("schema");
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_lead(email: &str) -> NewLead {
        NewLead {
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: email.to_string(),
            resume_path: "./uploads/abc_resume.pdf".to_string(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_id_state_and_timestamp() {
        let pool = test_pool().await;

        let lead = insert(&pool, new_lead("john@example.com")).await.unwrap();

        assert!(lead.id > 0);
        assert_eq!(lead.state, LeadState::Pending);
        assert_eq!(lead.email, "john@example.com");
        assert!(!lead.resume_path.is_empty());
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict_and_leaves_one_row() {
        let pool = test_pool().await;

        insert(&pool, new_lead("john@example.com")).await.unwrap();
        let err = insert(&pool, new_lead("john@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(list_all(&pool).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn exists_by_email_reflects_inserts() {
        let pool = test_pool().await;

        assert!(!exists_by_email(&pool, "john@example.com").await.unwrap());
        insert(&pool, new_lead("john@example.com")).await.unwrap();
        assert!(exists_by_email(&pool, "john@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn list_all_returns_insertion_order() {
        let pool = test_pool().await;

        insert(&pool, new_lead("a@example.com")).await.unwrap();
        insert(&pool, new_lead("b@example.com")).await.unwrap();
        insert(&pool, new_lead("c@example.com")).await.unwrap();

        let emails: Vec<String> = list_all(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.email)
            .collect();
        assert_eq!(emails, ["a@example.com", "b@example.com", "c@example.com"]);
    }

    #[tokio::test]
    async fn get_by_id_missing_returns_none() {
        let pool = test_pool().await;
        assert!(get_by_id(&pool, 42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_state_changes_only_the_state() {
        let pool = test_pool().await;
        let lead = insert(&pool, new_lead("john@example.com")).await.unwrap();

        let updated = update_state(&pool, lead.id, LeadState::ReachedOut)
            .await
            .unwrap();
        assert_eq!(updated.state, LeadState::ReachedOut);

        let fetched = get_by_id(&pool, lead.id).await.unwrap().unwrap();
        assert_eq!(fetched.state, LeadState::ReachedOut);
        assert_eq!(fetched.email, lead.email);
        assert_eq!(fetched.resume_path, lead.resume_path);
        assert_eq!(fetched.created_at, lead.created_at);

        // Free toggle: moving back to PENDING is allowed.
        let back = update_state(&pool, lead.id, LeadState::Pending).await.unwrap();
        assert_eq!(back.state, LeadState::Pending);
    }

    #[tokio::test]
    async fn update_state_on_missing_id_is_not_found() {
        let pool = test_pool().await;
        let err = update_state(&pool, 42, LeadState::ReachedOut)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
