use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};

use super::{check_id, created};
use crate::error::AppResult;
use crate::middleware::LoginVolunteer;
use crate::pagination::PageParams;
use crate::state::AppState;
use crate::types::{
    RegisterReviewRequest, ReviewPageResponse, ReviewResponse, ShelterReviewResponse, VolunteerReviewResponse,
};

pub async fn register_review(
    State(state): State<AppState>,
    LoginVolunteer(volunteer_id): LoginVolunteer,
    Json(request): Json<RegisterReviewRequest>,
) -> AppResult<impl IntoResponse> {
    let id = state.services.reviews.register_review(volunteer_id, request).await?;
    Ok(created(format!("/api/volunteers/reviews/{}", id), id))
}

pub async fn find_review(
    State(state): State<AppState>,
    LoginVolunteer(volunteer_id): LoginVolunteer,
    Path(review_id): Path<i64>,
) -> AppResult<Json<ReviewResponse>> {
    let review_id = check_id("review_id", review_id)?;
    Ok(Json(state.services.reviews.find_review(volunteer_id, review_id).await?))
}

pub async fn find_shelter_reviews(
    State(state): State<AppState>,
    Path(shelter_id): Path<i64>,
    Query(page): Query<PageParams>,
) -> AppResult<Json<ReviewPageResponse<ShelterReviewResponse>>> {
    let shelter_id = check_id("shelter_id", shelter_id)?;
    let page = page.resolve(&state.config.pagination);
    Ok(Json(state.services.reviews.find_shelter_reviews(shelter_id, &page).await?))
}

pub async fn find_volunteer_reviews(
    State(state): State<AppState>,
    Path(volunteer_id): Path<i64>,
    Query(page): Query<PageParams>,
) -> AppResult<Json<ReviewPageResponse<VolunteerReviewResponse>>> {
    let volunteer_id = check_id("volunteer_id", volunteer_id)?;
    let page = page.resolve(&state.config.pagination);
    Ok(Json(state.services.reviews.find_volunteer_reviews(volunteer_id, &page).await?))
}
