use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// JSON error body: `{status, message}`, plus `isNewUser` for the
/// federated-login signup redirect.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: u16,
    pub message: String,
    #[serde(rename = "isNewUser", skip_serializing_if = "Option::is_none")]
    pub is_new_user: Option<bool>,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    /// Shared by unknown-email and wrong-password so both render the exact
    /// same bytes (enumeration resistance).
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email not verified with Google")]
    EmailNotVerified,

    #[error("Please sign up first")]
    SignupRequired,

    #[error("No balances found for this user")]
    NoBalances,

    #[error("{0}")]
    Processing(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::InvalidCredentials | Self::EmailNotVerified => StatusCode::UNAUTHORIZED,
            Self::SignupRequired | Self::NoBalances => StatusCode::NOT_FOUND,
            Self::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if matches!(self, Self::Processing(_)) {
            tracing::error!(error = %self, "internal error");
        }

        let body = ErrorBody {
            status: status.as_u16(),
            message: self.to_string(),
            is_new_user: matches!(self, Self::SignupRequired).then_some(true),
        };

        (status, Json(body)).into_response()
    }
}

/// Maps a unique-violation error raised by the database constraints to the
/// colliding field name. The constraints are the last line of defense when two
/// registrations race past the pre-insert probe.
pub fn unique_violation_field(err: &sqlx::Error) -> Option<&'static str> {
    let db = err.as_database_error()?;
    if db.code().as_deref() != Some("23505") {
        return None;
    }
    match db.constraint() {
        Some("users_phone_number_key") => Some("phone number"),
        _ => Some("email"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_bytes(err: ApiError) -> (StatusCode, Vec<u8>) {
        let res = err.into_response();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("body");
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn invalid_credentials_renders_generic_401() {
        let (status, bytes) = body_bytes(ApiError::InvalidCredentials).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], 401);
        assert_eq!(json["message"], "Invalid email or password");
        assert!(json.get("isNewUser").is_none());
    }

    #[tokio::test]
    async fn invalid_credentials_is_byte_identical_regardless_of_cause() {
        // Unknown email and wrong password both surface this same variant;
        // rendering it twice must produce the same bytes.
        let (s1, b1) = body_bytes(ApiError::InvalidCredentials).await;
        let (s2, b2) = body_bytes(ApiError::InvalidCredentials).await;
        assert_eq!(s1, s2);
        assert_eq!(b1, b2);
    }

    #[tokio::test]
    async fn signup_required_carries_is_new_user_flag() {
        let (status, bytes) = body_bytes(ApiError::SignupRequired).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["isNewUser"], true);
        assert_eq!(json["message"], "Please sign up first");
    }

    #[tokio::test]
    async fn validation_and_conflict_statuses() {
        let (status, _) = body_bytes(ApiError::Validation("Email is required".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, bytes) =
            body_bytes(ApiError::Conflict("User with this email already exists".into())).await;
        assert_eq!(status, StatusCode::CONFLICT);
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(json["message"].as_str().unwrap().contains("email"));
    }
}
