//! Admin user entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::AdminUser;

/// Database row mapping for the admin_users table.
#[derive(Debug, Clone, FromRow)]
pub struct AdminUserEntity {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<AdminUserEntity> for AdminUser {
    fn from(e: AdminUserEntity) -> Self {
        AdminUser {
            id: e.id,
            email: e.email,
            name: e.name,
            created_at: e.created_at,
        }
    }
}
