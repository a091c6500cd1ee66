use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for registration. Fields are optional at the serde layer so
/// missing ones surface as our own 400, not an extractor rejection.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub fname: Option<String>,
    pub lname: Option<String>,
    pub password: Option<String>,
    pub trx_pin: Option<String>,
    #[serde(rename = "dateOfBirth")]
    pub date_of_birth: Option<String>,
}

/// Request body for password login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body for Google federated login.
#[derive(Debug, Deserialize)]
pub struct GoogleLoginRequest {
    #[serde(rename = "idToken")]
    pub id_token: Option<String>,
}

/// Request body for the email existence check.
#[derive(Debug, Deserialize)]
pub struct CheckUserRequest {
    pub email: Option<String>,
}

/// Response returned after registration.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub token: String,
}

/// Denormalized profile view returned with login responses.
#[derive(Debug, Serialize)]
pub struct UserData {
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub email: String,
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
}

/// Response returned after password or federated login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub token: String,
    #[serde(rename = "userData")]
    pub user_data: UserData,
}

#[derive(Debug, Serialize)]
pub struct CheckUserResponse {
    pub exists: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    #[serde(rename = "isResponding")]
    pub is_responding: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_response_uses_camel_case_wire_names() {
        let response = RegisterResponse {
            success: true,
            user_id: Uuid::new_v4(),
            token: "jwt".into(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert!(json.get("userId").is_some());
        assert!(json.get("user_id").is_none());
    }

    #[test]
    fn login_response_nests_user_data() {
        let response = LoginResponse {
            success: true,
            user_id: Uuid::new_v4(),
            token: "jwt".into(),
            user_data: UserData {
                first_name: "A".into(),
                last_name: "B".into(),
                email: "a@x.com".into(),
                phone_number: "1".into(),
            },
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["userData"]["firstName"], "A");
        assert_eq!(json["userData"]["phoneNumber"], "1");
    }

    #[test]
    fn register_request_accepts_partial_bodies() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"email":"a@x.com"}"#).expect("partial body parses");
        assert_eq!(req.email.as_deref(), Some("a@x.com"));
        assert!(req.password.is_none());
        assert!(req.date_of_birth.is_none());
    }

    #[test]
    fn google_login_request_reads_id_token() {
        let req: GoogleLoginRequest =
            serde_json::from_str(r#"{"idToken":"abc"}"#).expect("body parses");
        assert_eq!(req.id_token.as_deref(), Some("abc"));
    }
}
