use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use super::{check_id, created};
use crate::error::AppResult;
use crate::middleware::ip::MaybeRemoteAddr;
use crate::middleware::{LoginShelter, LoginVolunteer};
use crate::state::AppState;
use crate::types::{ApplyingVolunteersResponse, ApprovedApplicantsResponse, UpdateApplicantStatusRequest};

pub async fn register_applicant(
    State(state): State<AppState>,
    LoginVolunteer(volunteer_id): LoginVolunteer,
    MaybeRemoteAddr(remote): MaybeRemoteAddr,
    Path(recruitment_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let recruitment_id = check_id("recruitment_id", recruitment_id)?;
    tracing::debug!(volunteer_id, recruitment_id, remote = ?remote, "apply request");
    let id = state.services.applicants.register_applicant(recruitment_id, volunteer_id).await?;
    Ok(created("/api/volunteers/applicants".to_string(), id))
}

pub async fn find_applying_volunteers(
    State(state): State<AppState>,
    LoginVolunteer(volunteer_id): LoginVolunteer,
) -> AppResult<Json<ApplyingVolunteersResponse>> {
    Ok(Json(state.services.applicants.find_applying_volunteers(volunteer_id).await?))
}

pub async fn find_applicants_approved(
    State(state): State<AppState>,
    LoginShelter(shelter_id): LoginShelter,
    Path(recruitment_id): Path<i64>,
) -> AppResult<Json<ApprovedApplicantsResponse>> {
    let recruitment_id = check_id("recruitment_id", recruitment_id)?;
    Ok(Json(state.services.applicants.find_applicants_approved(shelter_id, recruitment_id).await?))
}

pub async fn update_applicant_status(
    State(state): State<AppState>,
    LoginShelter(shelter_id): LoginShelter,
    Path(applicant_id): Path<i64>,
    Json(request): Json<UpdateApplicantStatusRequest>,
) -> AppResult<StatusCode> {
    let applicant_id = check_id("applicant_id", applicant_id)?;
    state.services.applicants.update_applicant_status(shelter_id, applicant_id, request.status).await?;
    Ok(StatusCode::NO_CONTENT)
}
