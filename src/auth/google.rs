use anyhow::anyhow;
use axum::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::error;

static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Identity claim extracted from a verified Google ID token. Ephemeral, used
/// only within one request.
#[derive(Debug, Clone)]
pub struct GoogleClaims {
    pub email: String,
    pub email_verified: bool,
    pub google_id: String,
    pub name: Option<String>,
    pub picture: Option<String>,
}

/// Verifies externally issued identity tokens. Behind a trait so handlers can
/// run against a substituted verifier in tests.
#[async_trait]
pub trait GoogleVerifier: Send + Sync {
    async fn verify(&self, id_token: &str) -> anyhow::Result<GoogleClaims>;
}

/// Payload of Google's tokeninfo endpoint. Boolean fields come back as the
/// strings "true"/"false".
#[derive(Debug, Deserialize)]
struct TokenInfo {
    aud: String,
    sub: String,
    email: String,
    email_verified: String,
    name: Option<String>,
    picture: Option<String>,
}

pub struct GoogleAuth {
    client: Client,
    client_id: String,
}

impl GoogleAuth {
    pub fn new(client_id: String) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client, client_id })
    }
}

#[async_trait]
impl GoogleVerifier for GoogleAuth {
    async fn verify(&self, id_token: &str) -> anyhow::Result<GoogleClaims> {
        let response = self
            .client
            .get(TOKENINFO_URL)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "google tokeninfo request failed");
                anyhow!("Invalid Google token")
            })?;

        if !response.status().is_success() {
            error!(status = %response.status(), "google rejected id token");
            return Err(anyhow!("Invalid Google token"));
        }

        let info: TokenInfo = response.json().await.map_err(|e| {
            error!(error = %e, "google tokeninfo parse failed");
            anyhow!("Invalid Google token")
        })?;

        if info.aud != self.client_id {
            error!("google token audience mismatch");
            return Err(anyhow!("Invalid Google token"));
        }

        Ok(GoogleClaims {
            email: info.email,
            email_verified: info.email_verified == "true",
            google_id: info.sub,
            name: info.name,
            picture: info.picture,
        })
    }
}
