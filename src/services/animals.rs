use crate::error::{AppResult, OptionExt};
use crate::filter::AnimalFilter;
use crate::models::AnimalDraft;
use crate::pagination::{PageInfo, PageRequest};
use crate::repository::{AnimalRepository, ShelterRepository};
use crate::types::{
    AdoptableAnimalSummary, AnimalDetailResponse, AnimalPageResponse, AnimalRequest, ShelterAnimalSummary,
};

use super::{now, today};

#[derive(Clone)]
pub struct AnimalService {
    animals: AnimalRepository,
    shelters: ShelterRepository,
}

fn draft_from(request: AnimalRequest) -> AppResult<AnimalDraft> {
    Ok(AnimalDraft::new(
        &request.name,
        request.birth_date,
        request.animal_type,
        &request.breed,
        request.gender,
        request.is_neutered,
        request.active,
        request.weight,
        &request.information,
        request.image_urls,
    )?)
}

impl AnimalService {
    pub fn new(animals: AnimalRepository, shelters: ShelterRepository) -> Self {
        Self { animals, shelters }
    }

    pub async fn register_animal(&self, shelter_id: i64, request: AnimalRequest) -> AppResult<i64> {
        self.shelters.find_by_id(shelter_id).await?.ok_or_not_found("Shelter")?;
        let draft = draft_from(request)?;
        let id = self.animals.insert(shelter_id, &draft, now()).await?;
        tracing::info!(shelter_id, animal_id = id, "animal registered");
        Ok(id)
    }

    pub async fn find_animal_detail(&self, animal_id: i64) -> AppResult<AnimalDetailResponse> {
        let row = self.animals.find_by_id(animal_id).await?.ok_or_not_found("Animal")?;
        Ok(row.into())
    }

    pub async fn find_animals_by_shelter(
        &self,
        shelter_id: i64,
        filter: &AnimalFilter,
        page: &PageRequest,
    ) -> AppResult<AnimalPageResponse<ShelterAnimalSummary>> {
        let today = today();
        let rows = self.animals.find_animals(Some(shelter_id), false, filter, today, page).await?;
        let total = self.animals.count_animals(Some(shelter_id), false, filter, today).await?;
        Ok(AnimalPageResponse {
            page_info: PageInfo::of(total, rows.has_next),
            animals: rows.items.into_iter().map(Into::into).collect(),
        })
    }

    /// Animals still up for adoption, across shelters. The keyword is not applied here.
    pub async fn find_animals(
        &self,
        filter: &AnimalFilter,
        page: &PageRequest,
    ) -> AppResult<AnimalPageResponse<AdoptableAnimalSummary>> {
        let filter = AnimalFilter { keyword: None, ..filter.clone() };
        let today = today();
        let rows = self.animals.find_animals(None, true, &filter, today, page).await?;
        let total = self.animals.count_animals(None, true, &filter, today).await?;
        Ok(AnimalPageResponse {
            page_info: PageInfo::of(total, rows.has_next),
            animals: rows.items.into_iter().map(Into::into).collect(),
        })
    }

    pub async fn update_animal_adopt_status(&self, shelter_id: i64, animal_id: i64, is_adopted: bool) -> AppResult<()> {
        self.animals.find_by_id_and_shelter(animal_id, shelter_id).await?.ok_or_not_found("Animal")?;
        self.animals.update_adopt_status(animal_id, is_adopted).await
    }

    pub async fn update_animal(&self, shelter_id: i64, animal_id: i64, request: AnimalRequest) -> AppResult<()> {
        self.animals.find_by_id_and_shelter(animal_id, shelter_id).await?.ok_or_not_found("Animal")?;
        let draft = draft_from(request)?;
        self.animals.update(animal_id, &draft).await?;
        tracing::info!(shelter_id, animal_id, "animal updated");
        Ok(())
    }

    pub async fn delete_animal(&self, shelter_id: i64, animal_id: i64) -> AppResult<()> {
        self.animals.find_by_id_and_shelter(animal_id, shelter_id).await?.ok_or_not_found("Animal")?;
        self.animals.delete(animal_id).await?;
        tracing::info!(shelter_id, animal_id, "animal deleted");
        Ok(())
    }
}
