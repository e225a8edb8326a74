//! Admin identity model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A club member allowed to perform privileged operations.
///
/// Membership is the whole authorization model: a verified email either
/// matches a row here or it does not.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AdminUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
