use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// User record at rest. Credential digests stay internal; nothing here is
/// serialized to clients directly.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub password_hash: String,
    pub transaction_pin: String,
    pub date_of_birth: Date,
    pub created_at: OffsetDateTime,
}

/// Columns fetched by the registration uniqueness probe.
#[derive(Debug, FromRow)]
pub struct ExistingContact {
    pub email: String,
    pub phone_number: String,
}

/// Insert payload for registration. Both hash fields are bcrypt digests, never
/// plaintext.
#[derive(Debug)]
pub struct NewUser<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub phone_number: &'a str,
    pub password_hash: &'a str,
    pub transaction_pin: &'a str,
    pub date_of_birth: Date,
}
