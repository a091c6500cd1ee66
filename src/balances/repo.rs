use sqlx::types::Decimal;
use sqlx::{FromRow, PgExecutor};
use uuid::Uuid;

/// One asset balance row for a user.
#[derive(Debug, Clone, FromRow)]
pub struct Balance {
    pub crypto: String,
    pub balance: Decimal,
}

impl Balance {
    pub async fn list_for_user<'e, E>(db: E, user_id: Uuid) -> anyhow::Result<Vec<Balance>>
    where
        E: PgExecutor<'e>,
    {
        let rows = sqlx::query_as::<_, Balance>(
            r#"
            SELECT crypto, balance
            FROM user_balances
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
