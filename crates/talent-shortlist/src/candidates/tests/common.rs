use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use serde_json::{json, Value};

use crate::candidates::domain::{
    Candidate, CandidateId, Degree, Education, SalaryExpectation, WorkAvailability,
    WorkExperience,
};
use crate::candidates::repository::{
    CandidateRepository, InMemoryCandidateRepository, RepositoryError,
};
use crate::candidates::service::CandidateService;

pub(super) fn candidate(id: &str, name: &str) -> Candidate {
    Candidate {
        id: CandidateId::from(id),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        phone: String::new(),
        location: "New York".to_string(),
        submitted_at: "2025-01-10T09:00:00.000Z".to_string(),
        work_availability: vec![WorkAvailability::FullTime],
        annual_salary_expectation: SalaryExpectation {
            full_time: Some("$120,000".to_string()),
            part_time: None,
        },
        work_experiences: vec![WorkExperience {
            company: "Acme".to_string(),
            role_name: "Backend Engineer".to_string(),
        }],
        education: Education {
            highest_level: "Bachelor's Degree".to_string(),
            degrees: vec![Degree {
                degree: "Bachelor's Degree".to_string(),
                subject: "Computer Science".to_string(),
                school: "State University".to_string(),
                original_school: "State University".to_string(),
                ..Degree::default()
            }],
        },
        skills: vec!["SQL".to_string()],
        is_selected: false,
    }
}

pub(super) fn with_skills(mut candidate: Candidate, skills: &[&str]) -> Candidate {
    candidate.skills = skills.iter().map(|skill| skill.to_string()).collect();
    candidate
}

pub(super) fn with_salary(mut candidate: Candidate, full_time: Option<&str>) -> Candidate {
    candidate.annual_salary_expectation.full_time = full_time.map(str::to_string);
    candidate
}

pub(super) fn selected(mut candidate: Candidate) -> Candidate {
    candidate.is_selected = true;
    candidate
}

/// `count` candidates `c-1..=c-count`, the first `selected` of them already on the shortlist.
pub(super) fn roster(count: usize, selected_count: usize) -> Vec<Candidate> {
    (1..=count)
        .map(|index| {
            let mut entry = candidate(&format!("c-{index}"), &format!("Candidate{index}"));
            entry.is_selected = index <= selected_count;
            entry
        })
        .collect()
}

/// Minimal record that passes upload validation.
pub(super) fn raw_record(name: &str) -> Value {
    json!({
        "name": name,
        "email": format!("{}@x.com", name.to_lowercase()),
        "location": "NYC",
        "workAvailability": ["full-time"],
        "workExperiences": [],
        "education": {"highest_level": "Bachelor's Degree", "degrees": []},
        "skills": ["SQL"],
    })
}

pub(super) fn repository_with(candidates: Vec<Candidate>) -> Arc<InMemoryCandidateRepository> {
    Arc::new(InMemoryCandidateRepository::with_candidates(candidates))
}

pub(super) fn build_service(
    candidates: Vec<Candidate>,
) -> (
    CandidateService<InMemoryCandidateRepository>,
    Arc<InMemoryCandidateRepository>,
) {
    let repository = repository_with(candidates);
    let service = CandidateService::new(repository.clone());
    (service, repository)
}

pub(super) fn selected_count(repository: &InMemoryCandidateRepository) -> usize {
    repository
        .all()
        .expect("store readable")
        .iter()
        .filter(|c| c.is_selected)
        .count()
}

pub(super) fn ids(candidates: &[Candidate]) -> Vec<&str> {
    candidates.iter().map(|c| c.id.as_str()).collect()
}

pub(super) struct UnavailableRepository;

impl CandidateRepository for UnavailableRepository {
    fn apply<T, F>(&self, _mutation: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&mut Vec<Candidate>) -> T,
    {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).expect("serialize body")))
        .expect("request builds")
}

pub(super) fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
