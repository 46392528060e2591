use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Review status of a lead. Stored as TEXT; the two values are a free
/// toggle, not a one-way progression.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadState {
    #[default]
    Pending,
    ReachedOut,
}

/// A persisted lead. Only `state` is mutable after creation; leads are
/// never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Lead {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Locator of the stored resume, assigned once at creation.
    pub resume_path: String,
    pub state: LeadState,
    pub created_at: DateTime<Utc>,
}
