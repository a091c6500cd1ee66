use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::Json;
use lazy_static::lazy_static;
use regex::Regex;
use time::macros::{date, format_description};
use time::{Date, OffsetDateTime};
use tracing::{error, info, instrument, warn};

use crate::auth::dto::{
    CheckUserRequest, CheckUserResponse, GoogleLoginRequest, HealthResponse, LoginRequest,
    LoginResponse, RegisterRequest, RegisterResponse, UserData,
};
use crate::auth::jwt::JwtKeys;
use crate::auth::password::{hash_secret, verify_secret};
use crate::auth::repo_types::{NewUser, User};
use crate::error::{unique_violation_field, ApiError};
use crate::state::AppState;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// An empty or whitespace-only field counts as missing, like the absent key.
fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.trim().is_empty())
}

const DOB_MIN: Date = date!(1900 - 01 - 01);

/// Parse and bound-check a date of birth. Must be `YYYY-MM-DD` and lie within
/// [1900-01-01, today].
fn parse_date_of_birth(raw: Option<&str>) -> Result<Date, ApiError> {
    let format = format_description!("[year]-[month]-[day]");
    let parsed = raw
        .and_then(|s| Date::parse(s, &format).ok())
        .ok_or_else(|| ApiError::Validation("Invalid date format. Use YYYY-MM-DD".into()))?;

    let today = OffsetDateTime::now_utc().date();
    if parsed > today || parsed < DOB_MIN {
        return Err(ApiError::Validation("Invalid date of birth".into()));
    }
    Ok(parsed)
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        is_responding: true,
        message: "Cryptify server up and running".into(),
    })
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let (Some(email), Some(phone), Some(fname), Some(lname), Some(password), Some(trx_pin)) = (
        non_empty(payload.email),
        non_empty(payload.phone),
        non_empty(payload.fname),
        non_empty(payload.lname),
        non_empty(payload.password),
        non_empty(payload.trx_pin),
    ) else {
        return Err(ApiError::Validation(
            "All fields (email, phone, fname, lname, password, trx_pin) are required".into(),
        ));
    };

    let email = email.trim().to_lowercase();
    if !is_valid_email(&email) {
        warn!("register: invalid email format");
        return Err(ApiError::Validation("Invalid email".into()));
    }

    let date_of_birth = parse_date_of_birth(payload.date_of_birth.as_deref())?;

    // The existence probe and the insert share one transaction; the unique
    // constraints close the remaining race at commit time.
    let mut tx = state.db.begin().await.map_err(|e| {
        error!(error = %e, "failed to begin registration transaction");
        ApiError::Processing("Database transaction failed".into())
    })?;

    if let Some(existing) = User::find_by_email_or_phone(&mut *tx, &email, &phone)
        .await
        .map_err(|e| {
            error!(error = %e, "uniqueness probe failed");
            ApiError::Processing("An unexpected error occurred".into())
        })?
    {
        // Email takes precedence when both collide; if the email did not
        // match, the probe hit the phone number.
        let field = if existing.email == email {
            "email"
        } else {
            debug_assert_eq!(existing.phone_number, phone);
            "phone number"
        };
        warn!(field, "register: duplicate user");
        return Err(ApiError::Conflict(format!(
            "User with this {field} already exists"
        )));
    }

    let (password_hash, pin_hash) = hash_secret(&password)
        .and_then(|p| hash_secret(&trx_pin).map(|t| (p, t)))
        .map_err(|e| {
            error!(error = %e, "error hashing credentials");
            ApiError::Processing("Error processing credentials".into())
        })?;

    let new_user = NewUser {
        first_name: &fname,
        last_name: &lname,
        email: &email,
        phone_number: &phone,
        password_hash: &password_hash,
        transaction_pin: &pin_hash,
        date_of_birth,
    };

    let user = match User::insert(&mut *tx, &new_user).await {
        Ok(u) => u,
        Err(e) => {
            if let Some(field) = unique_violation_field(&e) {
                warn!(field, "register: duplicate user at constraint layer");
                return Err(ApiError::Conflict(format!(
                    "User with this {field} already exists"
                )));
            }
            error!(error = %e, "database error during user creation");
            return Err(ApiError::Processing("Error creating user account".into()));
        }
    };

    tx.commit().await.map_err(|e| {
        if let Some(field) = unique_violation_field(&e) {
            warn!(field, "register: duplicate user at commit");
            return ApiError::Conflict(format!("User with this {field} already exists"));
        }
        error!(error = %e, "registration transaction commit failed");
        ApiError::Processing("Database transaction failed".into())
    })?;

    // The account is durable from here on. Token issuance is best-effort: a
    // signing failure reports an error but does not roll the account back.
    let token = JwtKeys::from_ref(&state)
        .sign(user.id, &user.email, None)
        .map_err(|e| {
            error!(error = %e, user_id = %user.id, "error generating token");
            ApiError::Processing("Error generating access token".into())
        })?;

    info!(user_id = %user.id, "new user created successfully");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: true,
            user_id: user.id,
            token,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (Some(email), Some(password)) = (non_empty(payload.email), non_empty(payload.password))
    else {
        return Err(ApiError::Validation("Email and password are required".into()));
    };
    let email = email.trim().to_lowercase();

    let user = User::find_by_email(&state.db, &email)
        .await
        .map_err(|e| {
            error!(error = %e, "login lookup failed");
            ApiError::Processing("An unexpected error occurred".into())
        })?
        // Unknown email and wrong password must be indistinguishable.
        .ok_or(ApiError::InvalidCredentials)?;

    let password_ok = verify_secret(&password, &user.password_hash).map_err(|e| {
        error!(error = %e, "error verifying password");
        ApiError::Processing("Error processing credentials".into())
    })?;
    if !password_ok {
        warn!(user_id = %user.id, "login: invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let token = JwtKeys::from_ref(&state)
        .sign(user.id, &user.email, None)
        .map_err(|e| {
            error!(error = %e, user_id = %user.id, "error generating token");
            ApiError::Processing("Error generating access token".into())
        })?;

    info!(user_id = %user.id, "user logged in successfully");

    Ok(Json(LoginResponse {
        success: true,
        user_id: user.id,
        token,
        user_data: UserData {
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            phone_number: user.phone_number,
        },
    }))
}

#[instrument(skip(state, payload))]
pub async fn google_login(
    State(state): State<AppState>,
    Json(payload): Json<GoogleLoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Some(id_token) = non_empty(payload.id_token) else {
        return Err(ApiError::Validation("Google ID token is required".into()));
    };
    info!("google login request received");

    let google_user = state.google.verify(&id_token).await.map_err(|e| {
        // Verifier failures (issuer rejection, audience mismatch, network)
        // are recoverable authentication failures, never crashes.
        error!(error = %e, "google token verification failed");
        ApiError::Processing("Authentication failed".into())
    })?;

    if !google_user.email_verified {
        warn!("google login: email not verified");
        return Err(ApiError::EmailNotVerified);
    }

    let user = User::find_by_email(&state.db, &google_user.email.trim().to_lowercase())
        .await
        .map_err(|e| {
            error!(error = %e, "google login lookup failed");
            ApiError::Processing("Authentication failed".into())
        })?
        // Federated login never auto-registers.
        .ok_or(ApiError::SignupRequired)?;

    let token = JwtKeys::from_ref(&state)
        .sign(user.id, &user.email, Some(&google_user.google_id))
        .map_err(|e| {
            error!(error = %e, user_id = %user.id, "error generating token");
            ApiError::Processing("Error generating access token".into())
        })?;

    info!(user_id = %user.id, "google login successful");

    Ok(Json(LoginResponse {
        success: true,
        user_id: user.id,
        token,
        user_data: UserData {
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            phone_number: user.phone_number,
        },
    }))
}

#[instrument(skip(state, payload))]
pub async fn check_user(
    State(state): State<AppState>,
    Json(payload): Json<CheckUserRequest>,
) -> Result<Json<CheckUserResponse>, ApiError> {
    let Some(email) = non_empty(payload.email) else {
        return Err(ApiError::Validation("Email is required".into()));
    };
    let email = email.trim().to_lowercase();

    let exists = User::exists_by_email(&state.db, &email).await.map_err(|e| {
        error!(error = %e, "error checking user existence");
        ApiError::Processing("An unexpected error occurred".into())
    })?;

    if exists {
        info!("user exists");
    }
    Ok(Json(CheckUserResponse { exists }))
}
