//! HTTP route handlers for the anifriends API.
//!
//! Handlers extract the caller, path, query and body, delegate to
//! [`crate::services`] and map the result to a response. Every handler returns
//! [`crate::error::AppResult`] so failures render through `AppError`.

pub mod animals;
pub mod applicants;
pub mod health;
pub mod recruitments;
pub mod reviews;
pub mod shelters;
pub mod volunteers;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, StatusCode};
use axum::middleware::from_fn_with_state;
use axum::response::IntoResponse;
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::error::{AppError, AppResult};
use crate::middleware;
use crate::state::AppState;
use crate::types::CreatedResponse;

const MAX_BODY_BYTES: usize = 1024 * 1024;

/// The full application: `/api` routes, operational endpoints and middleware.
pub fn router(state: AppState) -> Router {
    let cfg = state.config.clone();
    let app = Router::new()
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz))
        .route("/metrics", get(health::metrics))
        .route("/metrics/prometheus", get(health::metrics_prometheus))
        .route("/version", get(health::version))
        .route("/api/shelters", post(shelters::register_shelter))
        .route("/api/shelters/{shelter_id}", get(shelters::find_shelter_detail))
        .route("/api/shelters/{shelter_id}/reviews", get(reviews::find_shelter_reviews))
        .route(
            "/api/shelters/recruitments",
            post(recruitments::register_recruitment).get(recruitments::find_recruitments_by_shelter),
        )
        .route("/api/shelters/recruitments/{recruitment_id}", delete(recruitments::delete_recruitment))
        .route("/api/shelters/recruitments/{recruitment_id}/close", patch(recruitments::close_recruitment))
        .route("/api/shelters/recruitments/{recruitment_id}/approval", get(applicants::find_applicants_approved))
        .route("/api/shelters/applicants/{applicant_id}/status", patch(applicants::update_applicant_status))
        .route("/api/shelters/animals", post(animals::register_animal).get(animals::find_animals_by_shelter))
        .route("/api/shelters/animals/{animal_id}", patch(animals::update_animal).delete(animals::delete_animal))
        .route("/api/shelters/animals/{animal_id}/status", patch(animals::update_animal_adopt_status))
        .route("/api/volunteers", post(volunteers::register_volunteer))
        .route("/api/volunteers/me", get(volunteers::find_volunteer_my_page).patch(volunteers::update_volunteer_info))
        .route("/api/volunteers/{volunteer_id}/reviews", get(reviews::find_volunteer_reviews))
        .route("/api/volunteers/recruitments/{recruitment_id}/apply", post(applicants::register_applicant))
        .route("/api/volunteers/recruitments/completed", get(recruitments::find_completed_recruitments))
        .route("/api/volunteers/applicants", get(applicants::find_applying_volunteers))
        .route("/api/volunteers/reviews", post(reviews::register_review))
        .route("/api/volunteers/reviews/{review_id}", get(reviews::find_review))
        .route("/api/recruitments", get(recruitments::find_recruitments))
        .route("/api/recruitments/{recruitment_id}", get(recruitments::find_recruitment_detail))
        .route("/api/v2/recruitments", get(recruitments::find_recruitments_v2))
        .route("/api/animals", get(animals::find_animals))
        .route("/api/animals/{animal_id}", get(animals::find_animal_detail))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(from_fn_with_state(state.clone(), middleware::rate_limit::rate_limit_middleware))
        .with_state(state)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(from_fn_with_state(cfg, middleware::security_headers::security_headers_middleware));

    // Permissive CORS only for local development against a separately served UI.
    if cfg!(debug_assertions) {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// `201 Created` with a `Location` header and the new id.
pub(crate) fn created(location: String, id: i64) -> impl IntoResponse {
    (StatusCode::CREATED, [(header::LOCATION, location)], Json(CreatedResponse { id }))
}

/// Path ids are positive row ids.
pub(crate) fn check_id(field: &str, id: i64) -> AppResult<i64> {
    if id <= 0 {
        return Err(AppError::ValidationError { field: field.to_string(), message: "must be a positive id".to_string() });
    }
    Ok(id)
}
