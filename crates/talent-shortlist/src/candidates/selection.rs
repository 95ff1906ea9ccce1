use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use super::domain::{Candidate, CandidateId};
use super::repository::{CandidateRepository, RepositoryError};

/// Upper bound on simultaneously selected candidates.
pub const MAX_SELECTED: usize = 5;

/// Result of a single `select` call. A full shortlist is a refused mutation, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SelectionOutcome {
    Selected { candidate: Candidate },
    AlreadySelected { candidate: Candidate },
    CapacityReached { selected_count: usize },
}

impl SelectionOutcome {
    pub fn is_refused(&self) -> bool {
        matches!(self, SelectionOutcome::CapacityReached { .. })
    }

    pub fn candidate(&self) -> Option<&Candidate> {
        match self {
            SelectionOutcome::Selected { candidate }
            | SelectionOutcome::AlreadySelected { candidate } => Some(candidate),
            SelectionOutcome::CapacityReached { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NotFound,
    CapacityReached,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedSelection {
    pub id: CandidateId,
    pub reason: SkipReason,
}

/// Best-effort bulk selection report; earlier successes are never rolled back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkSelection {
    pub succeeded: Vec<CandidateId>,
    pub skipped: Vec<SkippedSelection>,
}

#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error("candidate '{0}' not found")]
    NotFound(CandidateId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Enforces the shortlist cap on top of a candidate repository.
pub struct SelectionPolicy<R> {
    repository: Arc<R>,
}

impl<R> SelectionPolicy<R>
where
    R: CandidateRepository,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn select(&self, id: &CandidateId) -> Result<SelectionOutcome, SelectionError> {
        let outcome = self
            .repository
            .apply(|candidates| select_within(candidates, id))?
            .ok_or_else(|| SelectionError::NotFound(id.clone()))?;

        if let SelectionOutcome::CapacityReached { selected_count } = &outcome {
            warn!(candidate_id = %id, selected_count, "selection refused: shortlist is full");
        }
        Ok(outcome)
    }

    pub fn unselect(&self, id: &CandidateId) -> Result<Candidate, SelectionError> {
        self.repository
            .apply(|candidates| {
                candidates.iter_mut().find(|c| &c.id == id).map(|candidate| {
                    candidate.is_selected = false;
                    candidate.clone()
                })
            })?
            .ok_or_else(|| SelectionError::NotFound(id.clone()))
    }

    pub fn select_multiple(&self, ids: &[CandidateId]) -> Result<BulkSelection, SelectionError> {
        let report = self.repository.apply(|candidates| {
            let mut report = BulkSelection::default();
            for id in ids {
                match select_within(candidates, id) {
                    Some(outcome) if outcome.is_refused() => report.skipped.push(SkippedSelection {
                        id: id.clone(),
                        reason: SkipReason::CapacityReached,
                    }),
                    Some(_) => report.succeeded.push(id.clone()),
                    None => report.skipped.push(SkippedSelection {
                        id: id.clone(),
                        reason: SkipReason::NotFound,
                    }),
                }
            }
            report
        })?;

        debug!(
            succeeded = report.succeeded.len(),
            skipped = report.skipped.len(),
            "bulk selection applied"
        );
        Ok(report)
    }

    /// Clears every selection flag, returning how many were set.
    pub fn clear_all_selections(&self) -> Result<usize, SelectionError> {
        let cleared = self.repository.apply(|candidates| {
            let mut cleared = 0;
            for candidate in candidates.iter_mut().filter(|c| c.is_selected) {
                candidate.is_selected = false;
                cleared += 1;
            }
            cleared
        })?;
        Ok(cleared)
    }

    /// Empties the store entirely, candidate data included.
    pub fn reset(&self) -> Result<usize, SelectionError> {
        Ok(self.repository.clear()?)
    }
}

/// Applies the cap check and flag write against an already-locked collection.
///
/// Returns `None` when `id` is absent.
pub(crate) fn select_within(
    candidates: &mut [Candidate],
    id: &CandidateId,
) -> Option<SelectionOutcome> {
    let selected_count = candidates.iter().filter(|c| c.is_selected).count();
    let candidate = candidates.iter_mut().find(|c| &c.id == id)?;

    if candidate.is_selected {
        return Some(SelectionOutcome::AlreadySelected {
            candidate: candidate.clone(),
        });
    }
    if selected_count >= MAX_SELECTED {
        return Some(SelectionOutcome::CapacityReached { selected_count });
    }

    candidate.is_selected = true;
    Some(SelectionOutcome::Selected {
        candidate: candidate.clone(),
    })
}
