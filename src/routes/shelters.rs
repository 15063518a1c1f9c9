use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};

use super::{check_id, created};
use crate::error::AppResult;
use crate::state::AppState;
use crate::types::{RegisterShelterRequest, ShelterDetailResponse};

pub async fn register_shelter(
    State(state): State<AppState>,
    Json(request): Json<RegisterShelterRequest>,
) -> AppResult<impl IntoResponse> {
    let id = state.services.shelters.register_shelter(request).await?;
    Ok(created(format!("/api/shelters/{}", id), id))
}

pub async fn find_shelter_detail(
    State(state): State<AppState>,
    Path(shelter_id): Path<i64>,
) -> AppResult<Json<ShelterDetailResponse>> {
    let shelter_id = check_id("shelter_id", shelter_id)?;
    Ok(Json(state.services.shelters.find_shelter_detail(shelter_id).await?))
}
