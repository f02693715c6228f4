use crate::api::rest::state::AppState;
use crate::error::ApiResult;
use axum::{extract::State, Json};
use laundry_types::LaundryStats;

/// Dashboard numbers, the same body `statsUpdated` carries
pub async fn get_stats(State(state): State<AppState>) -> ApiResult<Json<LaundryStats>> {
    Ok(Json(state.stats().await?))
}
