use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use super::{check_id, created};
use crate::error::AppResult;
use crate::filter::KeywordCondition;
use crate::middleware::{LoginShelter, LoginVolunteer};
use crate::pagination::PageParams;
use crate::state::AppState;
use crate::types::{
    CompletedRecruitmentPageResponse, RecruitmentCursorParams, RecruitmentDetailResponse, RecruitmentPageResponse,
    RecruitmentSearchParams, RegisterRecruitmentRequest,
};

pub async fn register_recruitment(
    State(state): State<AppState>,
    LoginShelter(shelter_id): LoginShelter,
    Json(request): Json<RegisterRecruitmentRequest>,
) -> AppResult<impl IntoResponse> {
    let id = state.services.recruitments.register_recruitment(shelter_id, request).await?;
    Ok(created(format!("/api/recruitments/{}", id), id))
}

pub async fn find_recruitment_detail(
    State(state): State<AppState>,
    Path(recruitment_id): Path<i64>,
) -> AppResult<Json<RecruitmentDetailResponse>> {
    let recruitment_id = check_id("recruitment_id", recruitment_id)?;
    Ok(Json(state.services.recruitments.find_recruitment_detail(recruitment_id).await?))
}

// Shelter side: keyword defaults to title and content
pub async fn find_recruitments_by_shelter(
    State(state): State<AppState>,
    LoginShelter(shelter_id): LoginShelter,
    Query(params): Query<RecruitmentSearchParams>,
    Query(page): Query<PageParams>,
) -> AppResult<Json<RecruitmentPageResponse>> {
    let filter = params.into_filter(KeywordCondition::default());
    let page = page.resolve(&state.config.pagination);
    Ok(Json(state.services.recruitments.find_recruitments_by_shelter(shelter_id, &filter, &page).await?))
}

// Volunteer side: keyword defaults to title, content and shelter name
pub async fn find_recruitments(
    State(state): State<AppState>,
    Query(params): Query<RecruitmentSearchParams>,
    Query(page): Query<PageParams>,
) -> AppResult<Json<RecruitmentPageResponse>> {
    let filter = params.into_filter(KeywordCondition::all());
    let page = page.resolve(&state.config.pagination);
    Ok(Json(state.services.recruitments.find_recruitments(&filter, &page).await?))
}

// Same filters as `find_recruitments`, paged by the last row seen instead of a page number
pub async fn find_recruitments_v2(
    State(state): State<AppState>,
    Query(params): Query<RecruitmentSearchParams>,
    Query(cursor): Query<RecruitmentCursorParams>,
    Query(page): Query<PageParams>,
) -> AppResult<Json<RecruitmentPageResponse>> {
    let filter = params.into_filter(KeywordCondition::all());
    let cursor = cursor.into_cursor()?;
    let page = page.resolve(&state.config.pagination);
    Ok(Json(state.services.recruitments.find_recruitments_v2(&filter, cursor, &page).await?))
}

pub async fn find_completed_recruitments(
    State(state): State<AppState>,
    LoginVolunteer(volunteer_id): LoginVolunteer,
    Query(page): Query<PageParams>,
) -> AppResult<Json<CompletedRecruitmentPageResponse>> {
    let page = page.resolve(&state.config.pagination);
    Ok(Json(state.services.recruitments.find_completed_recruitments(volunteer_id, &page).await?))
}

pub async fn close_recruitment(
    State(state): State<AppState>,
    LoginShelter(shelter_id): LoginShelter,
    Path(recruitment_id): Path<i64>,
) -> AppResult<StatusCode> {
    let recruitment_id = check_id("recruitment_id", recruitment_id)?;
    state.services.recruitments.close_recruitment(shelter_id, recruitment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_recruitment(
    State(state): State<AppState>,
    LoginShelter(shelter_id): LoginShelter,
    Path(recruitment_id): Path<i64>,
) -> AppResult<StatusCode> {
    let recruitment_id = check_id("recruitment_id", recruitment_id)?;
    state.services.recruitments.delete_recruitment(shelter_id, recruitment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
