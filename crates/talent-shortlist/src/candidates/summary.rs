use std::collections::BTreeMap;

use serde::Serialize;

use super::domain::Candidate;
use super::scoring::ScoredCandidate;
use super::selection::MAX_SELECTED;

pub const TOP_SKILL_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributionEntry {
    pub label: String,
    pub count: usize,
}

/// Dashboard statistics over the currently selected candidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortlistSummary {
    pub total_selected: usize,
    pub capacity: usize,
    pub remaining_slots: usize,
    /// Mean score rounded to the nearest point; `None` with an empty shortlist.
    pub average_score: Option<u32>,
    /// Mean over selected candidates that state a full-time expectation.
    pub average_full_time_salary: Option<u64>,
    pub location_distribution: Vec<DistributionEntry>,
    pub education_distribution: Vec<DistributionEntry>,
    pub top_skills: Vec<DistributionEntry>,
    pub candidates: Vec<ScoredCandidate>,
}

impl ShortlistSummary {
    pub fn from_candidates(candidates: &[Candidate]) -> Self {
        let selected: Vec<ScoredCandidate> = candidates
            .iter()
            .filter(|candidate| candidate.is_selected)
            .cloned()
            .map(ScoredCandidate::new)
            .collect();

        let total_selected = selected.len();
        let average_score = rounded_mean(selected.iter().map(|row| u64::from(row.score)))
            .map(|mean| mean as u32);
        let average_full_time_salary =
            rounded_mean(selected.iter().filter_map(|row| row.candidate.full_time_salary()));

        let location_distribution =
            distribution(selected.iter().map(|row| row.candidate.location.as_str()));
        let education_distribution = distribution(
            selected
                .iter()
                .map(|row| row.candidate.education.highest_level.as_str()),
        );
        let mut top_skills = distribution(
            selected
                .iter()
                .flat_map(|row| row.candidate.skills.iter().map(String::as_str)),
        );
        top_skills.truncate(TOP_SKILL_LIMIT);

        Self {
            total_selected,
            capacity: MAX_SELECTED,
            remaining_slots: MAX_SELECTED.saturating_sub(total_selected),
            average_score,
            average_full_time_salary,
            location_distribution,
            education_distribution,
            top_skills,
            candidates: selected,
        }
    }
}

fn rounded_mean(values: impl Iterator<Item = u64>) -> Option<u64> {
    let (sum, count) = values.fold((0u64, 0u64), |(sum, count), value| {
        (sum.saturating_add(value), count + 1)
    });
    if count == 0 {
        return None;
    }
    Some((sum.saturating_mul(2) + count) / (count * 2))
}

// Counts descending, ties broken alphabetically so the output is deterministic.
fn distribution<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<DistributionEntry> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for label in labels {
        *counts.entry(label).or_default() += 1;
    }

    let mut entries: Vec<DistributionEntry> = counts
        .into_iter()
        .map(|(label, count)| DistributionEntry {
            label: label.to_string(),
            count,
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    entries
}
