//! Search filters for recruitments and animals, translated into [`Predicate`] trees.
//!
//! Column names assume the aliases used by the repositories: `r` for recruitments,
//! `s` for shelters and `a` for animals.

use chrono::{NaiveDate, NaiveDateTime};

use crate::models::{AnimalActive, AnimalAge, AnimalSize, AnimalType, Gender};
use crate::query::Predicate;

/// Which text fields a recruitment keyword is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordCondition {
    pub title: bool,
    pub content: bool,
    pub shelter_name: bool,
}

impl KeywordCondition {
    pub fn all() -> Self {
        Self { title: true, content: true, shelter_name: true }
    }

    pub fn none() -> Self {
        Self { title: false, content: false, shelter_name: false }
    }
}

impl Default for KeywordCondition {
    fn default() -> Self {
        Self { title: true, content: true, shelter_name: false }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecruitmentFilter {
    pub keyword: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_closed: Option<bool>,
    pub keyword_condition: KeywordCondition,
}

impl RecruitmentFilter {
    /// True when no clause would constrain the result.
    pub fn is_unfiltered(&self) -> bool {
        keyword_of(self.keyword.as_deref()).is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.is_closed.is_none()
    }

    /// Full predicate: scope AND date AND keyword AND closed.
    pub fn to_predicate(&self, shelter_id: Option<i64>) -> Predicate {
        scope_condition(shelter_id)
            .and(date_condition(self.start_date, self.end_date))
            .and(keyword_condition(self.keyword.as_deref(), self.keyword_condition))
            .and(closed_condition(self.is_closed))
    }
}

/// Position of the last row of the previous slice in newest-first order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecruitmentCursor {
    pub created_at: NaiveDateTime,
    pub recruitment_id: i64,
}

impl RecruitmentCursor {
    /// Rows strictly after the cursor: older, or equally old with a smaller id.
    pub fn to_predicate(&self) -> Predicate {
        Predicate::lt("r.created_at", self.created_at)
            .or(Predicate::eq("r.created_at", self.created_at).and(Predicate::lt("r.id", self.recruitment_id)))
    }
}

/// The keyword as typed, or `None` when it is absent or blank. Whitespace is kept.
fn keyword_of(keyword: Option<&str>) -> Option<&str> {
    keyword.filter(|k| !k.trim().is_empty())
}

pub fn scope_condition(shelter_id: Option<i64>) -> Predicate {
    match shelter_id {
        Some(id) => Predicate::eq("r.shelter_id", id),
        None => Predicate::True,
    }
}

/// Bounds on the start time. Each date is compared at the start of that day.
pub fn date_condition(start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) -> Predicate {
    let mut predicate = Predicate::True;
    if let Some(start) = start_date {
        predicate = predicate.and(Predicate::ge("r.start_time", start.and_time(chrono::NaiveTime::MIN)));
    }
    if let Some(end) = end_date {
        predicate = predicate.and(Predicate::le("r.start_time", end.and_time(chrono::NaiveTime::MIN)));
    }
    predicate
}

/// OR over the selected fields. A keyword with no field selected matches everything.
pub fn keyword_condition(keyword: Option<&str>, condition: KeywordCondition) -> Predicate {
    let Some(keyword) = keyword_of(keyword) else {
        return Predicate::True;
    };
    let mut clauses = Vec::with_capacity(3);
    if condition.content {
        clauses.push(Predicate::contains("r.content", keyword));
    }
    if condition.title {
        clauses.push(Predicate::contains("r.title", keyword));
    }
    if condition.shelter_name {
        clauses.push(Predicate::contains("s.name", keyword));
    }
    Predicate::any(clauses)
}

pub fn closed_condition(is_closed: Option<bool>) -> Predicate {
    match is_closed {
        Some(closed) => Predicate::eq("r.is_closed", closed),
        None => Predicate::True,
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnimalFilter {
    /// Matched against the animal name; only used by the shelter-side listing.
    pub keyword: Option<String>,
    pub animal_type: Option<AnimalType>,
    pub gender: Option<Gender>,
    pub is_neutered: Option<bool>,
    pub active: Option<AnimalActive>,
    pub size: Option<AnimalSize>,
    pub age: Option<AnimalAge>,
}

impl AnimalFilter {
    /// `shelter_id` scopes to one shelter; `adoptable_only` hides adopted animals.
    pub fn to_predicate(&self, shelter_id: Option<i64>, adoptable_only: bool, today: NaiveDate) -> Predicate {
        let mut clauses = Vec::new();
        if let Some(id) = shelter_id {
            clauses.push(Predicate::eq("a.shelter_id", id));
        }
        if adoptable_only {
            clauses.push(Predicate::eq("a.is_adopted", false));
        }
        if let Some(keyword) = keyword_of(self.keyword.as_deref()) {
            clauses.push(Predicate::contains("a.name", keyword));
        }
        if let Some(t) = self.animal_type {
            clauses.push(Predicate::eq("a.animal_type", t.as_str()));
        }
        if let Some(g) = self.gender {
            clauses.push(Predicate::eq("a.gender", g.as_str()));
        }
        if let Some(n) = self.is_neutered {
            clauses.push(Predicate::eq("a.is_neutered", n));
        }
        if let Some(a) = self.active {
            clauses.push(Predicate::eq("a.active", a.as_str()));
        }
        if let Some(size) = self.size {
            let (min, max) = size.weight_range();
            clauses.push(Predicate::ge("a.weight", min));
            if let Some(max) = max {
                clauses.push(Predicate::lt("a.weight", max));
            }
        }
        if let Some(age) = self.age {
            let (earliest, latest) = age.birth_date_bounds(today);
            clauses.push(Predicate::le("a.birth_date", latest));
            if let Some(earliest) = earliest {
                clauses.push(Predicate::gt("a.birth_date", earliest));
            }
        }
        Predicate::all(clauses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn cursor_breaks_timestamp_ties_by_id() {
        let created_at = day(2024, 3, 1).and_hms_opt(10, 0, 0).unwrap();
        let cursor = RecruitmentCursor { created_at, recruitment_id: 7 };
        assert_eq!(
            cursor.to_predicate(),
            Predicate::Or(vec![
                Predicate::lt("r.created_at", created_at),
                Predicate::And(vec![Predicate::eq("r.created_at", created_at), Predicate::lt("r.id", 7)]),
            ])
        );
    }

    #[test]
    fn blank_keyword_is_unconstrained() {
        assert!(keyword_condition(None, KeywordCondition::all()).is_true());
        assert!(keyword_condition(Some("   "), KeywordCondition::all()).is_true());
    }

    #[test]
    fn keyword_with_no_selected_field_matches_everything() {
        assert!(keyword_condition(Some("ab"), KeywordCondition::none()).is_true());
    }

    #[test]
    fn keyword_title_only() {
        let cond = KeywordCondition { title: true, content: false, shelter_name: false };
        assert_eq!(keyword_condition(Some("ab"), cond), Predicate::contains("r.title", "ab"));
    }

    #[test]
    fn keyword_keeps_surrounding_whitespace() {
        let cond = KeywordCondition { title: true, content: false, shelter_name: false };
        assert_eq!(keyword_condition(Some(" ab"), cond), Predicate::contains("r.title", " ab"));

        let filter = AnimalFilter { keyword: Some("nabi ".into()), ..Default::default() };
        assert_eq!(filter.to_predicate(None, false, day(2024, 1, 1)), Predicate::contains("a.name", "nabi "));
    }

    #[test]
    fn date_bounds_are_optional_per_side() {
        assert!(date_condition(None, None).is_true());
        let from = date_condition(Some(day(2024, 3, 1)), None);
        assert_eq!(from, Predicate::ge("r.start_time", day(2024, 3, 1).and_hms_opt(0, 0, 0).unwrap()));
        let both = date_condition(Some(day(2024, 3, 1)), Some(day(2024, 4, 1)));
        assert!(matches!(both, Predicate::And(ref parts) if parts.len() == 2));
    }

    #[test]
    fn unfiltered_detection() {
        assert!(RecruitmentFilter::default().is_unfiltered());
        let filter = RecruitmentFilter { keyword: Some(" ".into()), ..Default::default() };
        assert!(filter.is_unfiltered());
        let filter = RecruitmentFilter { is_closed: Some(false), ..Default::default() };
        assert!(!filter.is_unfiltered());
    }

    #[test]
    fn scoped_unfiltered_predicate_is_scope_only() {
        let p = RecruitmentFilter::default().to_predicate(Some(9));
        assert_eq!(p, Predicate::eq("r.shelter_id", 9_i64));
        assert!(RecruitmentFilter::default().to_predicate(None).is_true());
    }

    #[test]
    fn animal_size_adds_half_open_weight_range() {
        let filter = AnimalFilter { size: Some(AnimalSize::Medium), ..Default::default() };
        let p = filter.to_predicate(None, false, day(2024, 1, 1));
        assert_eq!(p, Predicate::ge("a.weight", 7.0).and(Predicate::lt("a.weight", 15.0)));
    }
}
