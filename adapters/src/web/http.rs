use std::sync::Arc;

use axum::Json;
use axum::extract::State;

use domain::RegistrySnapshot;

use super::state::AppState;

pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<RegistrySnapshot> {
    Json(state.matchmaker.snapshot().await)
}
