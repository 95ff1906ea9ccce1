use serde::{Deserialize, Serialize};

use super::domain::{Candidate, WorkAvailability};

/// Inclusive bounds applied to full-time salary expectations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: u64,
    pub max: u64,
}

impl SalaryRange {
    pub fn contains(&self, amount: u64) -> bool {
        amount >= self.min && amount <= self.max
    }
}

/// Independently optional predicates; a candidate passes when every supplied predicate holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    pub search: String,
    pub selected_only: bool,
    pub skills: Vec<String>,
    pub locations: Vec<String>,
    pub availability: Vec<WorkAvailability>,
    pub education_levels: Vec<String>,
    pub experience_companies: Vec<String>,
    pub role_names: Vec<String>,
    pub subjects: Vec<String>,
    pub schools: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_range: Option<SalaryRange>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
            && !self.selected_only
            && self.skills.is_empty()
            && self.locations.is_empty()
            && self.availability.is_empty()
            && self.education_levels.is_empty()
            && self.experience_companies.is_empty()
            && self.role_names.is_empty()
            && self.subjects.is_empty()
            && self.schools.is_empty()
            && self.salary_range.is_none()
    }

    pub fn matches(&self, candidate: &Candidate) -> bool {
        self.matches_search(candidate)
            && (!self.selected_only || candidate.is_selected)
            && self.matches_skills(candidate)
            && (self.locations.is_empty() || self.locations.contains(&candidate.location))
            && self.matches_availability(candidate)
            && (self.education_levels.is_empty()
                || self
                    .education_levels
                    .contains(&candidate.education.highest_level))
            && (self.experience_companies.is_empty()
                || candidate
                    .work_experiences
                    .iter()
                    .any(|exp| self.experience_companies.contains(&exp.company)))
            && (self.role_names.is_empty()
                || candidate
                    .work_experiences
                    .iter()
                    .any(|exp| self.role_names.contains(&exp.role_name)))
            && (self.subjects.is_empty()
                || candidate
                    .education
                    .degrees
                    .iter()
                    .any(|degree| self.subjects.contains(&degree.subject)))
            && (self.schools.is_empty()
                || candidate
                    .education
                    .degrees
                    .iter()
                    .any(|degree| self.schools.contains(&degree.original_school)))
            && self.matches_salary(candidate)
    }

    fn matches_search(&self, candidate: &Candidate) -> bool {
        if self.search.is_empty() {
            return true;
        }

        let needle = self.search.to_lowercase();
        let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);

        contains(&candidate.name)
            || contains(&candidate.email)
            || contains(&candidate.location)
            || candidate.skills.iter().any(|skill| contains(skill))
            || candidate
                .work_experiences
                .iter()
                .any(|exp| contains(&exp.company) || contains(&exp.role_name))
    }

    // Every requested skill must appear in at least one candidate skill.
    fn matches_skills(&self, candidate: &Candidate) -> bool {
        self.skills.iter().all(|wanted| {
            let wanted = wanted.to_lowercase();
            candidate
                .skills
                .iter()
                .any(|skill| skill.to_lowercase().contains(&wanted))
        })
    }

    fn matches_availability(&self, candidate: &Candidate) -> bool {
        self.availability.is_empty()
            || self
                .availability
                .iter()
                .any(|kind| candidate.is_available_for(*kind))
    }

    fn matches_salary(&self, candidate: &Candidate) -> bool {
        match (self.salary_range, candidate.full_time_salary()) {
            (Some(range), Some(amount)) => range.contains(amount),
            _ => true,
        }
    }
}

/// Returns the candidates passing `criteria`, in their original order.
pub fn filter(candidates: &[Candidate], criteria: &FilterCriteria) -> Vec<Candidate> {
    candidates
        .iter()
        .filter(|candidate| criteria.matches(candidate))
        .cloned()
        .collect()
}

/// Parses a currency string such as `"$120,000"` into whole units.
///
/// `$` and `,` are stripped and the leading run of digits is read; no digits at all is 0.
/// Amounts too large for `u64` saturate at `u64::MAX` so they still fall outside any range.
pub fn parse_salary(raw: &str) -> u64 {
    let cleaned: String = raw.chars().filter(|c| *c != '$' && *c != ',').collect();
    cleaned
        .trim_start()
        .trim_start_matches('+')
        .chars()
        .map_while(|c| c.to_digit(10))
        .fold(0u64, |amount, digit| {
            amount.saturating_mul(10).saturating_add(u64::from(digit))
        })
}
