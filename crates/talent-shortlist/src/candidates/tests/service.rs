use super::common::*;
use crate::candidates::domain::{CandidateId, CandidatePatch, WorkAvailability};
use crate::candidates::filter::FilterCriteria;
use crate::candidates::intake::{IngestFailure, UploadValidator};
use crate::candidates::repository::{CandidateRepository, RepositoryError};
use crate::candidates::service::{
    CandidateQuery, CandidateService, CandidateServiceError, MutationAction, MutationRequest,
};
use crate::candidates::sorting::{SortKey, SortOrder};
use serde_json::json;
use std::sync::Arc;

#[test]
fn upload_replaces_store_in_input_order() {
    let (service, repository) = build_service(roster(3, 1));
    let mut first = raw_record("First");
    first["id"] = json!("u-1");
    let mut second = raw_record("Second");
    second["id"] = json!("u-2");

    let summary = service
        .upload_candidates(&json!([first, second]))
        .expect("upload succeeds");

    assert!(summary.success);
    assert_eq!(summary.accepted_count, 2);
    assert_eq!(summary.message, "Successfully uploaded 2 candidates");
    assert_eq!(ids(&repository.all().expect("store")), vec!["u-1", "u-2"]);
}

#[test]
fn failed_upload_leaves_store_untouched() {
    let (service, repository) = build_service(roster(3, 1));
    let before = repository.all().expect("store");

    match service.upload_candidates(&json!([{}])) {
        Err(CandidateServiceError::Validation(IngestFailure::NoValidRecords { reasons, .. })) => {
            assert!(reasons[0].contains("missing required"));
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
    assert_eq!(repository.all().expect("store"), before);
}

#[test]
fn upload_uses_configured_reason_limit() {
    let repository = repository_with(Vec::new());
    let service = CandidateService::with_validator(repository, UploadValidator::new(1));

    let summary = service
        .upload_candidates(&json!([{}, {}, raw_record("Ok")]))
        .expect("one record survives");

    assert_eq!(summary.rejected_count, 2);
    assert_eq!(summary.rejection_reasons.len(), 1);
}

#[test]
fn list_can_restrict_to_selected() {
    let (service, _) = build_service(roster(4, 2));

    let all = service.list_candidates(false).expect("list");
    let shortlisted = service.list_candidates(true).expect("list");

    assert_eq!(all.total, 4);
    assert_eq!(shortlisted.total, 2);
    assert_eq!(ids(&shortlisted.candidates), vec!["c-1", "c-2"]);
}

#[test]
fn mutate_rejects_unknown_actions() {
    let (service, _) = build_service(roster(2, 0));
    let request = MutationRequest {
        action: "promote".to_string(),
        ..MutationRequest::default()
    };

    match service.mutate(request) {
        Err(CandidateServiceError::InvalidAction(action)) => assert_eq!(action, "promote"),
        other => panic!("expected invalid action, got {other:?}"),
    }
}

#[test]
fn select_without_candidate_id_is_a_client_error() {
    let (service, _) = build_service(roster(2, 0));

    assert!(matches!(
        service.mutate(MutationRequest::new(MutationAction::Select)),
        Err(CandidateServiceError::MissingField("candidateId"))
    ));
}

#[test]
fn select_at_capacity_reports_refusal() {
    let (service, _) = build_service(roster(6, 5));

    let outcome = service
        .mutate(MutationRequest::for_candidate(MutationAction::Select, "c-6"))
        .expect("refusal is an outcome");

    assert!(outcome.capacity_reached);
    assert_eq!(outcome.selected_count, 5);
    assert!(!outcome.candidates[5].is_selected);
}

#[test]
fn select_unknown_candidate_is_not_found() {
    let (service, _) = build_service(roster(2, 0));

    match service.mutate(MutationRequest::for_candidate(MutationAction::Select, "nope")) {
        Err(CandidateServiceError::NotFound(id)) => assert_eq!(id.as_str(), "nope"),
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn bulk_clear_and_reset_flow() {
    let (service, repository) = build_service(roster(7, 0));

    let ids: Vec<CandidateId> = (1..=7).map(|i| CandidateId(format!("c-{i}"))).collect();
    let outcome = service
        .mutate(MutationRequest::for_candidates(ids))
        .expect("bulk");
    let bulk = outcome.bulk.expect("bulk report");
    assert_eq!(bulk.succeeded.len(), 5);
    assert_eq!(bulk.skipped.len(), 2);
    assert!(outcome.capacity_reached);
    assert_eq!(outcome.selected_count, 5);

    let outcome = service
        .mutate(MutationRequest::new(MutationAction::ClearAll))
        .expect("clear");
    assert_eq!(outcome.cleared, Some(5));
    assert_eq!(outcome.selected_count, 0);

    let outcome = service
        .mutate(MutationRequest::new(MutationAction::Reset))
        .expect("reset");
    assert!(outcome.candidates.is_empty());
    assert!(repository.all().expect("store").is_empty());
}

#[test]
fn select_multiple_without_ids_is_empty() {
    let (service, _) = build_service(roster(2, 0));

    let outcome = service
        .mutate(MutationRequest::new(MutationAction::SelectMultiple))
        .expect("no-op");

    assert_eq!(outcome.bulk.map(|b| b.succeeded.len()), Some(0));
    assert_eq!(outcome.selected_count, 0);
}

#[test]
fn update_applies_fields() {
    let (service, repository) = build_service(roster(2, 0));
    let patch = CandidatePatch {
        location: Some("Remote".to_string()),
        skills: Some(vec!["Rust".to_string(), "Go".to_string()]),
        work_availability: Some(vec![WorkAvailability::PartTime, WorkAvailability::PartTime]),
        ..CandidatePatch::default()
    };

    let outcome = service
        .update_candidate(&CandidateId::from("c-2"), patch)
        .expect("update");

    assert!(!outcome.capacity_reached);
    assert_eq!(outcome.candidate.location, "Remote");
    assert_eq!(
        outcome.candidate.work_availability,
        vec![WorkAvailability::PartTime]
    );
    let stored = repository.all().expect("store");
    assert_eq!(stored[1], outcome.candidate);
}

#[test]
fn update_unknown_candidate_is_not_found() {
    let (service, _) = build_service(roster(1, 0));

    assert!(matches!(
        service.update_candidate(&CandidateId::from("ghost"), CandidatePatch::default()),
        Err(CandidateServiceError::NotFound(_))
    ));
}

#[test]
fn update_rejects_empty_availability() {
    let (service, _) = build_service(roster(1, 0));
    let patch = CandidatePatch {
        work_availability: Some(Vec::new()),
        ..CandidatePatch::default()
    };

    assert!(matches!(
        service.update_candidate(&CandidateId::from("c-1"), patch),
        Err(CandidateServiceError::InvalidPatch(_))
    ));
}

#[test]
fn update_selection_respects_the_cap() {
    let (service, repository) = build_service(roster(6, 5));
    let patch = CandidatePatch {
        name: Some("Renamed".to_string()),
        is_selected: Some(true),
        ..CandidatePatch::default()
    };

    let outcome = service
        .update_candidate(&CandidateId::from("c-6"), patch)
        .expect("refusal is an outcome");

    assert!(outcome.capacity_reached);
    assert!(!outcome.candidate.is_selected);
    assert_eq!(outcome.candidate.name, "Candidate6");
    assert_eq!(selected_count(&repository), 5);
}

#[test]
fn query_filters_scores_and_sorts() {
    let candidates = vec![
        with_skills(candidate("a", "Ann"), &["Python"]),
        with_skills(candidate("b", "Bob"), &["Python", "AWS", "Docker"]),
        with_skills(candidate("c", "Cid"), &["Excel"]),
    ];
    let (service, _) = build_service(candidates);

    let result = service
        .query(&CandidateQuery {
            filters: FilterCriteria {
                skills: vec!["python".to_string()],
                ..FilterCriteria::default()
            },
            sort: SortOrder::default(),
        })
        .expect("query");

    assert_eq!(result.total, 3);
    assert_eq!(result.matched, 2);
    let order: Vec<&str> = result
        .candidates
        .iter()
        .map(|row| row.candidate.id.as_str())
        .collect();
    assert_eq!(order, vec!["b", "a"]);
    assert!(result.candidates[0].score > result.candidates[1].score);

    let result = service
        .query(&CandidateQuery {
            filters: FilterCriteria::default(),
            sort: SortOrder {
                key: SortKey::Name,
                descending: true,
            },
        })
        .expect("query");
    assert_eq!(result.candidates[0].candidate.name, "Cid");
}

#[test]
fn summary_covers_selected_candidates_only() {
    let mut candidates = vec![
        selected(with_salary(candidate("a", "Ann"), Some("$100,000"))),
        selected(with_salary(candidate("b", "Bob"), Some("$121,000"))),
        selected(with_salary(candidate("c", "Cid"), None)),
        with_salary(candidate("d", "Dee"), Some("$999,999")),
    ];
    candidates[2].location = "Austin".to_string();
    candidates[2].skills = vec!["SQL".to_string(), "Rust".to_string()];
    let (service, _) = build_service(candidates);

    let summary = service.shortlist_summary().expect("summary");

    assert_eq!(summary.total_selected, 3);
    assert_eq!(summary.remaining_slots, 2);
    assert_eq!(summary.average_full_time_salary, Some(110_500));
    assert_eq!(summary.average_score, Some(29));
    assert_eq!(summary.location_distribution[0].label, "New York");
    assert_eq!(summary.location_distribution[0].count, 2);
    assert_eq!(summary.top_skills[0].label, "SQL");
    assert_eq!(summary.top_skills[0].count, 3);
    assert_eq!(summary.candidates.len(), 3);
}

#[test]
fn filter_options_reflect_the_store() {
    let (service, _) = build_service(roster(3, 0));

    let options = service.filter_options(None).expect("options");
    assert_eq!(options.locations, vec!["New York"]);
    assert_eq!(options.education_levels, vec!["Bachelor's Degree"]);

    let narrowed = service.filter_options(Some("york")).expect("options");
    assert_eq!(narrowed.locations, vec!["New York"]);
    assert!(narrowed.skills.is_empty());
}

#[test]
fn repository_failures_surface_as_repository_errors() {
    let service = CandidateService::new(Arc::new(UnavailableRepository));

    assert!(matches!(
        service.list_candidates(false),
        Err(CandidateServiceError::Repository(RepositoryError::Unavailable(_)))
    ));
    assert!(matches!(
        service.upload_candidates(&json!([raw_record("A")])),
        Err(CandidateServiceError::Repository(_))
    ));
}
