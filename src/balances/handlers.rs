use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use sqlx::types::Decimal;
use tracing::{error, instrument};
use uuid::Uuid;

use crate::balances::repo::Balance;
use crate::error::ApiError;
use crate::state::AppState;

/// Balances keyed by asset symbol. NUMERIC serializes as a string, matching
/// the wire format clients already consume.
#[derive(Debug, Serialize)]
pub struct BalancesResponse {
    pub success: bool,
    pub balances: HashMap<String, Decimal>,
}

#[instrument(skip(state))]
pub async fn get_balance(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<BalancesResponse>, ApiError> {
    // Parse the id ourselves so a malformed value gets the same
    // `{status, message}` body as every other error, not the extractor's
    // plain-text rejection.
    let user_id = Uuid::parse_str(user_id.trim())
        .map_err(|_| ApiError::Validation("Invalid user ID".into()))?;

    let rows = Balance::list_for_user(&state.db, user_id)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %user_id, "error fetching user balance");
            ApiError::Processing("Failed to fetch balance".into())
        })?;

    if rows.is_empty() {
        return Err(ApiError::NoBalances);
    }

    let balances = rows
        .into_iter()
        .map(|row| (row.crypto, row.balance))
        .collect();

    Ok(Json(BalancesResponse {
        success: true,
        balances,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[tokio::test]
    async fn get_balance_rejects_malformed_user_id_with_json_error() {
        // Must fail validation before any query against the (never-connecting)
        // fake pool.
        let state = AppState::fake();
        let err = get_balance(State(state), Path("not-a-uuid".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(err.to_string(), "Invalid user ID");
    }

    #[test]
    fn balances_serialize_keyed_by_asset() {
        let mut balances = HashMap::new();
        balances.insert("BTC".to_string(), Decimal::from_str("0.5").unwrap());
        balances.insert("ETH".to_string(), Decimal::from_str("12.25").unwrap());
        let json = serde_json::to_value(&BalancesResponse {
            success: true,
            balances,
        })
        .unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["balances"]["BTC"], "0.5");
        assert_eq!(json["balances"]["ETH"], "12.25");
    }
}
