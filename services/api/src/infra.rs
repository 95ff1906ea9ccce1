use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::Value;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use talent_shortlist::candidates::{
    Candidate, CandidateService, CandidateServiceError, InMemoryCandidateRepository,
    UploadValidator,
};
use talent_shortlist::config::ShortlistConfig;
use talent_shortlist::error::AppError;
use tracing::warn;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn candidate_service(
    config: &ShortlistConfig,
) -> Arc<CandidateService<InMemoryCandidateRepository>> {
    Arc::new(CandidateService::with_validator(
        Arc::new(InMemoryCandidateRepository::default()),
        UploadValidator::new(config.max_reported_rejections),
    ))
}

/// Reads an upload file (`{"candidates": [...]}` or a bare list) through the upload validator.
pub(crate) fn load_candidates<P: AsRef<Path>>(
    path: P,
    config: &ShortlistConfig,
) -> Result<Vec<Candidate>, AppError> {
    let raw = std::fs::read_to_string(path)?;
    parse_candidates(&raw, config)
}

pub(crate) fn parse_candidates(
    raw: &str,
    config: &ShortlistConfig,
) -> Result<Vec<Candidate>, AppError> {
    let document: Value = serde_json::from_str(raw)?;
    let records = match document {
        Value::Object(mut fields) => fields.remove("candidates").unwrap_or(Value::Null),
        other => other,
    };

    let report = UploadValidator::new(config.max_reported_rejections)
        .ingest(&records)
        .map_err(CandidateServiceError::from)?;

    if report.rejected_count > 0 {
        warn!(
            rejected = report.rejected_count,
            reasons = ?report.rejection_reasons,
            "skipped invalid candidate records"
        );
    }
    Ok(report.accepted)
}
