use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use super::created;
use crate::error::AppResult;
use crate::middleware::LoginVolunteer;
use crate::state::AppState;
use crate::types::{RegisterVolunteerRequest, UpdateVolunteerInfoRequest, VolunteerMyPageResponse};

pub async fn register_volunteer(
    State(state): State<AppState>,
    Json(request): Json<RegisterVolunteerRequest>,
) -> AppResult<impl IntoResponse> {
    let id = state.services.volunteers.register_volunteer(request).await?;
    Ok(created("/api/volunteers/me".to_string(), id))
}

pub async fn find_volunteer_my_page(
    State(state): State<AppState>,
    LoginVolunteer(volunteer_id): LoginVolunteer,
) -> AppResult<Json<VolunteerMyPageResponse>> {
    Ok(Json(state.services.volunteers.find_volunteer_my_page(volunteer_id).await?))
}

pub async fn update_volunteer_info(
    State(state): State<AppState>,
    LoginVolunteer(volunteer_id): LoginVolunteer,
    Json(request): Json<UpdateVolunteerInfoRequest>,
) -> AppResult<StatusCode> {
    state.services.volunteers.update_volunteer_info(volunteer_id, request).await?;
    Ok(StatusCode::NO_CONTENT)
}
