//! Candidate intake, scoring, filtering, and shortlist selection.
//!
//! Everything runs against one in-memory collection owned by a [`CandidateRepository`]; the
//! [`CandidateService`] facade is what the HTTP router and the CLI talk to.

pub mod domain;
pub mod export;
pub mod filter;
pub mod intake;
pub mod options;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod selection;
pub mod service;
pub mod sorting;
pub mod summary;

#[cfg(test)]
mod tests;

pub use domain::{
    Candidate, CandidateId, CandidatePatch, Degree, Education, SalaryExpectation,
    WorkAvailability, WorkExperience,
};
pub use export::{rank, write_ranked_csv, write_ranked_csv_to_path, ExportError};
pub use filter::{filter, parse_salary, FilterCriteria, SalaryRange};
pub use intake::{ingest, IngestFailure, IngestReport, RecordOutcome, UploadValidator};
pub use options::{FilterOptions, SalaryBounds};
pub use repository::{CandidateRepository, InMemoryCandidateRepository, RepositoryError};
pub use router::candidate_router;
pub use scoring::{score, score_breakdown, ScoreBreakdown, ScoreComponent, ScoreFactor, ScoredCandidate};
pub use selection::{
    BulkSelection, SelectionError, SelectionOutcome, SelectionPolicy, SkipReason,
    SkippedSelection, MAX_SELECTED,
};
pub use service::{
    CandidateListing, CandidateQuery, CandidateService, CandidateServiceError, MutationAction,
    MutationOutcome, MutationRequest, QueryResult, UpdateOutcome, UploadSummary,
};
pub use sorting::{sort_scored, SortKey, SortOrder};
pub use summary::{DistributionEntry, ShortlistSummary};
