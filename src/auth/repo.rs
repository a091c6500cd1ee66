use crate::auth::repo_types::{ExistingContact, NewUser, User};
use sqlx::PgExecutor;

const USER_COLUMNS: &str = "id, first_name, last_name, email, phone_number, \
     password_hash, transaction_pin, date_of_birth, created_at";

impl User {
    /// Existence probe for the registration uniqueness check. Runs on the
    /// registration transaction so the check and the insert are atomic.
    pub async fn find_by_email_or_phone<'e, E>(
        db: E,
        email: &str,
        phone: &str,
    ) -> anyhow::Result<Option<ExistingContact>>
    where
        E: PgExecutor<'e>,
    {
        let existing = sqlx::query_as::<_, ExistingContact>(
            r#"
            SELECT email, phone_number
            FROM users
            WHERE email = $1 OR phone_number = $2
            "#,
        )
        .bind(email)
        .bind(phone)
        .fetch_optional(db)
        .await?;
        Ok(existing)
    }

    /// Find a user by email.
    pub async fn find_by_email<'e, E>(db: E, email: &str) -> anyhow::Result<Option<User>>
    where
        E: PgExecutor<'e>,
    {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Persist a new user. Callers pre-validate uniqueness; the table's unique
    /// constraints still back-stop concurrent inserts, surfacing as
    /// `sqlx::Error` with SQLSTATE 23505.
    pub async fn insert<'e, E>(db: E, new_user: &NewUser<'_>) -> Result<User, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (
                first_name, last_name, email, phone_number,
                password_hash, transaction_pin, date_of_birth
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(new_user.first_name)
        .bind(new_user.last_name)
        .bind(new_user.email)
        .bind(new_user.phone_number)
        .bind(new_user.password_hash)
        .bind(new_user.transaction_pin)
        .bind(new_user.date_of_birth)
        .fetch_one(db)
        .await
    }

    /// Bare existence check for `/api/check-user`.
    pub async fn exists_by_email<'e, E>(db: E, email: &str) -> anyhow::Result<bool>
    where
        E: PgExecutor<'e>,
    {
        let id: Option<(uuid::Uuid,)> =
            sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(db)
                .await?;
        Ok(id.is_some())
    }
}
