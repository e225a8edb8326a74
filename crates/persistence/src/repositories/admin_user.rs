//! Admin user repository for database operations.

use sqlx::PgPool;

use crate::entities::AdminUserEntity;
use crate::metrics::QueryTimer;

/// Repository for admin membership lookups.
#[derive(Clone)]
pub struct AdminUserRepository {
    pool: PgPool,
}

impl AdminUserRepository {
    /// Creates a new AdminUserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an admin by normalized email.
    pub async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<AdminUserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_admin_by_email");
        let result = sqlx::query_as::<_, AdminUserEntity>(
            r#"
            SELECT id, email, name, created_at
            FROM admin_users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Whether a normalized email belongs to an admin.
    pub async fn is_admin(&self, email: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("is_admin");
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM admin_users WHERE email = $1)",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Add an admin. The email must already be normalized.
    pub async fn create(&self, email: &str, name: &str) -> Result<AdminUserEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_admin_user");
        let result = sqlx::query_as::<_, AdminUserEntity>(
            r#"
            INSERT INTO admin_users (email, name)
            VALUES ($1, $2)
            RETURNING id, email, name, created_at
            "#,
        )
        .bind(email)
        .bind(name)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
