use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use super::{check_id, created};
use crate::error::AppResult;
use crate::filter::AnimalFilter;
use crate::middleware::LoginShelter;
use crate::pagination::PageParams;
use crate::state::AppState;
use crate::types::{
    AdoptableAnimalSummary, AnimalDetailResponse, AnimalPageResponse, AnimalRequest, AnimalSearchParams,
    ShelterAnimalSummary, UpdateAnimalAdoptStatusRequest,
};

pub async fn register_animal(
    State(state): State<AppState>,
    LoginShelter(shelter_id): LoginShelter,
    Json(request): Json<AnimalRequest>,
) -> AppResult<impl IntoResponse> {
    let id = state.services.animals.register_animal(shelter_id, request).await?;
    Ok(created(format!("/api/animals/{}", id), id))
}

pub async fn find_animal_detail(
    State(state): State<AppState>,
    Path(animal_id): Path<i64>,
) -> AppResult<Json<AnimalDetailResponse>> {
    let animal_id = check_id("animal_id", animal_id)?;
    Ok(Json(state.services.animals.find_animal_detail(animal_id).await?))
}

pub async fn find_animals_by_shelter(
    State(state): State<AppState>,
    LoginShelter(shelter_id): LoginShelter,
    Query(params): Query<AnimalSearchParams>,
    Query(page): Query<PageParams>,
) -> AppResult<Json<AnimalPageResponse<ShelterAnimalSummary>>> {
    let filter = AnimalFilter::from(params);
    let page = page.resolve(&state.config.pagination);
    Ok(Json(state.services.animals.find_animals_by_shelter(shelter_id, &filter, &page).await?))
}

pub async fn find_animals(
    State(state): State<AppState>,
    Query(params): Query<AnimalSearchParams>,
    Query(page): Query<PageParams>,
) -> AppResult<Json<AnimalPageResponse<AdoptableAnimalSummary>>> {
    let filter = AnimalFilter::from(params);
    let page = page.resolve(&state.config.pagination);
    Ok(Json(state.services.animals.find_animals(&filter, &page).await?))
}

pub async fn update_animal(
    State(state): State<AppState>,
    LoginShelter(shelter_id): LoginShelter,
    Path(animal_id): Path<i64>,
    Json(request): Json<AnimalRequest>,
) -> AppResult<StatusCode> {
    let animal_id = check_id("animal_id", animal_id)?;
    state.services.animals.update_animal(shelter_id, animal_id, request).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_animal_adopt_status(
    State(state): State<AppState>,
    LoginShelter(shelter_id): LoginShelter,
    Path(animal_id): Path<i64>,
    Json(request): Json<UpdateAnimalAdoptStatusRequest>,
) -> AppResult<StatusCode> {
    let animal_id = check_id("animal_id", animal_id)?;
    state.services.animals.update_animal_adopt_status(shelter_id, animal_id, request.is_adopted).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_animal(
    State(state): State<AppState>,
    LoginShelter(shelter_id): LoginShelter,
    Path(animal_id): Path<i64>,
) -> AppResult<StatusCode> {
    let animal_id = check_id("animal_id", animal_id)?;
    state.services.animals.delete_animal(shelter_id, animal_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
