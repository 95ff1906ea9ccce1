use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use super::domain::{Candidate, CandidateId, CandidatePatch};
use super::filter::{filter, FilterCriteria};
use super::intake::{IngestFailure, UploadValidator};
use super::options::FilterOptions;
use super::repository::{CandidateRepository, RepositoryError};
use super::scoring::ScoredCandidate;
use super::selection::{
    BulkSelection, SelectionError, SelectionOutcome, SelectionPolicy, SkipReason, MAX_SELECTED,
};
use super::sorting::{sort_scored, SortOrder};
use super::summary::ShortlistSummary;

/// Mutations accepted by [`CandidateService::mutate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MutationAction {
    Select,
    Unselect,
    SelectMultiple,
    ClearAll,
    Reset,
}

impl MutationAction {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "select" => Some(Self::Select),
            "unselect" => Some(Self::Unselect),
            "selectMultiple" => Some(Self::SelectMultiple),
            "clearAll" => Some(Self::ClearAll),
            "reset" => Some(Self::Reset),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Unselect => "unselect",
            Self::SelectMultiple => "selectMultiple",
            Self::ClearAll => "clearAll",
            Self::Reset => "reset",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationRequest {
    pub action: String,
    #[serde(default)]
    pub candidate_id: Option<CandidateId>,
    #[serde(default)]
    pub candidate_ids: Option<Vec<CandidateId>>,
}

impl MutationRequest {
    pub fn new(action: MutationAction) -> Self {
        Self {
            action: action.as_str().to_string(),
            ..Self::default()
        }
    }

    pub fn for_candidate(action: MutationAction, id: impl Into<CandidateId>) -> Self {
        Self {
            candidate_id: Some(id.into()),
            ..Self::new(action)
        }
    }

    pub fn for_candidates(ids: Vec<CandidateId>) -> Self {
        Self {
            candidate_ids: Some(ids),
            ..Self::new(MutationAction::SelectMultiple)
        }
    }

    fn target(&self) -> Result<CandidateId, CandidateServiceError> {
        self.candidate_id
            .clone()
            .filter(|id| !id.as_str().is_empty())
            .ok_or(CandidateServiceError::MissingField("candidateId"))
    }
}

/// Collection state after a mutation, plus what the mutation did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MutationOutcome {
    pub success: bool,
    pub action: MutationAction,
    #[serde(rename = "selectedCount")]
    pub selected_count: usize,
    pub candidates: Vec<Candidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<SelectionOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bulk: Option<BulkSelection>,
    /// Flags cleared by `clearAll`, or candidates dropped by `reset`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleared: Option<usize>,
    pub capacity_reached: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateListing {
    pub candidates: Vec<Candidate>,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateOutcome {
    pub candidate: Candidate,
    /// Set when the patch asked to select the candidate while the shortlist was full;
    /// nothing was written in that case.
    pub capacity_reached: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadSummary {
    pub success: bool,
    pub message: String,
    pub accepted_count: usize,
    pub rejected_count: usize,
    pub rejection_reasons: Vec<String>,
    pub selections_cleared: usize,
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateQuery {
    pub filters: FilterCriteria,
    pub sort: SortOrder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryResult {
    pub candidates: Vec<ScoredCandidate>,
    /// Size of the whole store.
    pub total: usize,
    pub matched: usize,
}

/// Facade composing the store, the selection policy, and the upload validator.
pub struct CandidateService<R> {
    repository: Arc<R>,
    selection: SelectionPolicy<R>,
    validator: UploadValidator,
}

impl<R> CandidateService<R>
where
    R: CandidateRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_validator(repository, UploadValidator::default())
    }

    pub fn with_validator(repository: Arc<R>, validator: UploadValidator) -> Self {
        let selection = SelectionPolicy::new(repository.clone());
        Self {
            repository,
            selection,
            validator,
        }
    }

    pub fn list_candidates(
        &self,
        selected_only: bool,
    ) -> Result<CandidateListing, CandidateServiceError> {
        let mut candidates = self.repository.all()?;
        if selected_only {
            candidates.retain(|candidate| candidate.is_selected);
        }
        let total = candidates.len();
        Ok(CandidateListing { candidates, total })
    }

    pub fn mutate(
        &self,
        request: MutationRequest,
    ) -> Result<MutationOutcome, CandidateServiceError> {
        let action = MutationAction::parse(&request.action)
            .ok_or_else(|| CandidateServiceError::InvalidAction(request.action.clone()))?;

        let mut selection = None;
        let mut bulk = None;
        let mut cleared = None;
        let mut capacity_reached = false;

        match action {
            MutationAction::Select => {
                let outcome = self.selection.select(&request.target()?)?;
                capacity_reached = outcome.is_refused();
                selection = Some(outcome);
            }
            MutationAction::Unselect => {
                self.selection.unselect(&request.target()?)?;
            }
            MutationAction::SelectMultiple => {
                let ids = request.candidate_ids.unwrap_or_default();
                let report = self.selection.select_multiple(&ids)?;
                capacity_reached = report
                    .skipped
                    .iter()
                    .any(|skipped| skipped.reason == SkipReason::CapacityReached);
                bulk = Some(report);
            }
            MutationAction::ClearAll => {
                cleared = Some(self.selection.clear_all_selections()?);
            }
            MutationAction::Reset => {
                let removed = self.selection.reset()?;
                info!(removed, "candidate store reset");
                cleared = Some(removed);
            }
        }

        let candidates = self.repository.all()?;
        let selected_count = candidates.iter().filter(|c| c.is_selected).count();

        Ok(MutationOutcome {
            success: true,
            action,
            selected_count,
            candidates,
            selection,
            bulk,
            cleared,
            capacity_reached,
        })
    }

    /// Applies `patch` to the stored candidate; the id itself is never rewritten.
    pub fn update_candidate(
        &self,
        id: &CandidateId,
        patch: CandidatePatch,
    ) -> Result<UpdateOutcome, CandidateServiceError> {
        if matches!(&patch.work_availability, Some(kinds) if kinds.is_empty()) {
            return Err(CandidateServiceError::InvalidPatch(
                "work_availability cannot be empty".to_string(),
            ));
        }

        let wants_selection = patch.is_selected;
        let outcome = self
            .repository
            .apply(|candidates| {
                let selected_count = candidates.iter().filter(|c| c.is_selected).count();
                let candidate = candidates.iter_mut().find(|c| &c.id == id)?;

                if wants_selection == Some(true)
                    && !candidate.is_selected
                    && selected_count >= MAX_SELECTED
                {
                    return Some(UpdateOutcome {
                        candidate: candidate.clone(),
                        capacity_reached: true,
                    });
                }

                patch.apply_fields(candidate);
                if let Some(flag) = wants_selection {
                    candidate.is_selected = flag;
                }
                Some(UpdateOutcome {
                    candidate: candidate.clone(),
                    capacity_reached: false,
                })
            })?
            .ok_or_else(|| CandidateServiceError::NotFound(id.clone()))?;

        if outcome.capacity_reached {
            warn!(candidate_id = %id, "update refused: shortlist is full");
        }
        Ok(outcome)
    }

    /// Validates `raw` and, when at least one record survives, replaces the whole store with it.
    pub fn upload_candidates(&self, raw: &Value) -> Result<UploadSummary, CandidateServiceError> {
        let report = match self.validator.ingest(raw) {
            Ok(report) => report,
            Err(failure) => {
                warn!(error = %failure, "candidate upload rejected");
                return Err(failure.into());
            }
        };

        self.repository.replace_all(report.accepted.clone())?;

        info!(
            accepted = report.accepted.len(),
            rejected = report.rejected_count,
            selections_cleared = report.selections_cleared,
            "candidate upload stored"
        );
        if report.selections_cleared > 0 {
            warn!(
                cleared = report.selections_cleared,
                "upload exceeded the shortlist size; extra selections were cleared"
            );
        }

        Ok(UploadSummary {
            success: true,
            message: format!("Successfully uploaded {} candidates", report.accepted.len()),
            accepted_count: report.accepted.len(),
            rejected_count: report.rejected_count,
            rejection_reasons: report.rejection_reasons,
            selections_cleared: report.selections_cleared,
            candidates: report.accepted,
        })
    }

    /// Filtered, scored, and sorted table rows.
    pub fn query(&self, query: &CandidateQuery) -> Result<QueryResult, CandidateServiceError> {
        let candidates = self.repository.all()?;
        let total = candidates.len();
        let matching = if query.filters.is_empty() {
            candidates
        } else {
            filter(&candidates, &query.filters)
        };
        let mut rows: Vec<ScoredCandidate> =
            matching.into_iter().map(ScoredCandidate::new).collect();
        sort_scored(&mut rows, query.sort);

        Ok(QueryResult {
            total,
            matched: rows.len(),
            candidates: rows,
        })
    }

    /// Filter-panel option lists, optionally narrowed by the panel's search box.
    pub fn filter_options(
        &self,
        search: Option<&str>,
    ) -> Result<FilterOptions, CandidateServiceError> {
        let candidates = self.repository.all()?;
        let options = FilterOptions::from_candidates(&candidates);
        Ok(match search {
            Some(needle) => options.narrowed(needle),
            None => options,
        })
    }

    pub fn shortlist_summary(&self) -> Result<ShortlistSummary, CandidateServiceError> {
        let candidates = self.repository.all()?;
        Ok(ShortlistSummary::from_candidates(&candidates))
    }
}

/// Error raised by the candidate service.
#[derive(Debug, thiserror::Error)]
pub enum CandidateServiceError {
    #[error("candidate '{0}' not found")]
    NotFound(CandidateId),
    #[error("invalid action '{0}'")]
    InvalidAction(String),
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
    #[error(transparent)]
    Validation(#[from] IngestFailure),
    #[error("invalid update: {0}")]
    InvalidPatch(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<SelectionError> for CandidateServiceError {
    fn from(value: SelectionError) -> Self {
        match value {
            SelectionError::NotFound(id) => Self::NotFound(id),
            SelectionError::Repository(err) => Self::Repository(err),
        }
    }
}
