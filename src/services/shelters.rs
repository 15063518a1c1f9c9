use crate::error::{AppError, AppResult, OptionExt};
use crate::models::{NewShelter, ShelterAddressInfo};
use crate::repository::ShelterRepository;
use crate::types::{RegisterShelterRequest, ShelterDetailResponse};

use super::now;

#[derive(Clone)]
pub struct ShelterService {
    shelters: ShelterRepository,
}

impl ShelterService {
    pub fn new(shelters: ShelterRepository) -> Self {
        Self { shelters }
    }

    pub async fn register_shelter(&self, request: RegisterShelterRequest) -> AppResult<i64> {
        let address =
            ShelterAddressInfo::new(&request.address, &request.address_detail, request.is_opened_address)?;
        let shelter =
            NewShelter::new(&request.email, &request.name, address, &request.phone_number, request.image_url)?;
        let id = self.shelters.insert(&shelter, now()).await.map_err(|e| match e {
            AppError::Conflict(_) => AppError::Conflict("Email is already registered".to_string()),
            other => other,
        })?;
        tracing::info!(shelter_id = id, "shelter registered");
        Ok(id)
    }

    pub async fn find_shelter_detail(&self, shelter_id: i64) -> AppResult<ShelterDetailResponse> {
        let shelter = self.shelters.find_by_id(shelter_id).await?.ok_or_not_found("Shelter")?;
        let address_detail = shelter.is_opened_address.then_some(shelter.address_detail);
        Ok(ShelterDetailResponse {
            shelter_id: shelter.id,
            email: shelter.email,
            name: shelter.name,
            address: shelter.address,
            address_detail,
            phone_number: shelter.phone_number,
            image_url: shelter.image_url,
        })
    }
}
