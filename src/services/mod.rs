//! Application services.
//!
//! Each service owns the repositories it needs and is cheap to clone. Handlers call
//! into [`Services`] held by [`crate::state::AppState`]; services check that the
//! entities a request refers to exist and belong to the caller before writing.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use sqlx::SqlitePool;

use crate::cache::{CountStore, RecruitmentCountCache};
use crate::config::AppConfig;
use crate::metrics::Metrics;
use crate::repository::{
    AnimalRepository, ApplicantRepository, RecruitmentRepository, ReviewRepository, ShelterRepository,
    VolunteerRepository,
};

pub mod animals;
pub mod applicants;
pub mod recruitments;
pub mod reviews;
pub mod shelters;
pub mod volunteers;

pub use animals::AnimalService;
pub use applicants::ApplicantService;
pub use recruitments::RecruitmentService;
pub use reviews::ReviewService;
pub use shelters::ShelterService;
pub use volunteers::VolunteerService;

#[derive(Clone)]
pub struct Services {
    pub shelters: ShelterService,
    pub volunteers: VolunteerService,
    pub recruitments: RecruitmentService,
    pub applicants: ApplicantService,
    pub reviews: ReviewService,
    pub animals: AnimalService,
}

impl Services {
    pub fn new(db: SqlitePool, config: &AppConfig, metrics: Metrics, count_store: Arc<dyn CountStore>) -> Self {
        let shelters = ShelterRepository::new(db.clone());
        let volunteers = VolunteerRepository::new(db.clone());
        let recruitments = RecruitmentRepository::new(db.clone());
        let applicants = ApplicantRepository::new(db.clone());
        let reviews = ReviewRepository::new(db.clone());
        let animals = AnimalRepository::new(db);

        let count_cache = RecruitmentCountCache::new(count_store, recruitments.clone(), metrics.clone());

        Self {
            shelters: ShelterService::new(shelters.clone()),
            volunteers: VolunteerService::new(volunteers.clone()),
            recruitments: RecruitmentService::new(
                recruitments.clone(),
                shelters.clone(),
                volunteers.clone(),
                count_cache,
                config.cache.recruitment_count_key.clone(),
                metrics.clone(),
            ),
            applicants: ApplicantService::new(applicants.clone(), recruitments, volunteers.clone(), metrics.clone()),
            reviews: ReviewService::new(reviews, applicants, shelters.clone(), volunteers, metrics),
            animals: AnimalService::new(animals, shelters),
        }
    }
}

/// Creation timestamp for new rows.
pub(crate) fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}
