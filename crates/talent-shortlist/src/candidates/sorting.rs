use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::scoring::ScoredCandidate;

/// Columns the candidate table can be ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Score,
    Name,
    Location,
    Salary,
    Experience,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortOrder {
    pub key: SortKey,
    pub descending: bool,
}

impl Default for SortOrder {
    fn default() -> Self {
        Self {
            key: SortKey::Score,
            descending: true,
        }
    }
}

/// Stable sort, so rows with equal keys keep their filtered order.
pub fn sort_scored(rows: &mut [ScoredCandidate], order: SortOrder) {
    rows.sort_by(|a, b| {
        let ordering = compare(a, b, order.key);
        if order.descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

fn compare(a: &ScoredCandidate, b: &ScoredCandidate, key: SortKey) -> Ordering {
    match key {
        SortKey::Score => a.score.cmp(&b.score),
        SortKey::Name => a
            .candidate
            .name
            .to_lowercase()
            .cmp(&b.candidate.name.to_lowercase()),
        SortKey::Location => a
            .candidate
            .location
            .to_lowercase()
            .cmp(&b.candidate.location.to_lowercase()),
        SortKey::Salary => a
            .candidate
            .full_time_salary()
            .unwrap_or(0)
            .cmp(&b.candidate.full_time_salary().unwrap_or(0)),
        SortKey::Experience => a
            .candidate
            .work_experiences
            .len()
            .cmp(&b.candidate.work_experiences.len()),
    }
}
