use std::collections::BTreeSet;

use serde::Serialize;

use super::domain::Candidate;

pub const DEFAULT_SALARY_FLOOR: u64 = 0;
pub const DEFAULT_SALARY_CEILING: u64 = 200_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SalaryBounds {
    pub min: u64,
    pub max: u64,
}

impl Default for SalaryBounds {
    fn default() -> Self {
        Self {
            min: DEFAULT_SALARY_FLOOR,
            max: DEFAULT_SALARY_CEILING,
        }
    }
}

/// Distinct values available to each filter, sorted for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub locations: Vec<String>,
    pub skills: Vec<String>,
    pub education_levels: Vec<String>,
    pub companies: Vec<String>,
    pub role_names: Vec<String>,
    pub subjects: Vec<String>,
    pub schools: Vec<String>,
    pub salary_bounds: SalaryBounds,
}

impl FilterOptions {
    pub fn from_candidates(candidates: &[Candidate]) -> Self {
        let locations = distinct(candidates.iter().map(|c| c.location.as_str()));
        let skills = distinct(
            candidates
                .iter()
                .flat_map(|c| c.skills.iter().map(String::as_str)),
        );
        let education_levels =
            distinct(candidates.iter().map(|c| c.education.highest_level.as_str()));
        let companies = distinct(
            candidates
                .iter()
                .flat_map(|c| c.work_experiences.iter().map(|exp| exp.company.as_str())),
        );
        let role_names = distinct(
            candidates
                .iter()
                .flat_map(|c| c.work_experiences.iter().map(|exp| exp.role_name.as_str())),
        );
        let subjects = distinct(
            candidates
                .iter()
                .flat_map(|c| c.education.degrees.iter().map(|d| d.subject.as_str())),
        );
        let schools = distinct(
            candidates
                .iter()
                .flat_map(|c| c.education.degrees.iter().map(|d| d.original_school.as_str())),
        );

        Self {
            locations,
            skills,
            education_levels,
            companies,
            role_names,
            subjects,
            schools,
            salary_bounds: salary_bounds(candidates),
        }
    }

    /// Narrows every option list to the values containing `needle`, ignoring case.
    ///
    /// A blank needle leaves the lists untouched; salary bounds are never narrowed.
    pub fn narrowed(mut self, needle: &str) -> Self {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return self;
        }

        for values in [
            &mut self.locations,
            &mut self.skills,
            &mut self.education_levels,
            &mut self.companies,
            &mut self.role_names,
            &mut self.subjects,
            &mut self.schools,
        ] {
            values.retain(|value| value.to_lowercase().contains(&needle));
        }
        self
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .filter(|value| !value.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Range of positive full-time expectations, falling back to the panel defaults.
pub fn salary_bounds(candidates: &[Candidate]) -> SalaryBounds {
    let salaries: Vec<u64> = candidates
        .iter()
        .filter_map(Candidate::full_time_salary)
        .filter(|amount| *amount > 0)
        .collect();

    SalaryBounds {
        min: salaries
            .iter()
            .copied()
            .min()
            .unwrap_or(DEFAULT_SALARY_FLOOR),
        max: salaries
            .iter()
            .copied()
            .max()
            .unwrap_or(DEFAULT_SALARY_CEILING),
    }
}
