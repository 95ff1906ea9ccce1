//! Upload validation: schema checks and normalization for externally supplied records.
//!
//! Each record is checked on its own and yields a tagged [`RecordOutcome`]; a batch is only a
//! hard failure when it is not a list or when nothing in it survives.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};

use super::domain::{
    dedup_availability, Candidate, CandidateId, Degree, Education, SalaryExpectation,
    WorkAvailability, WorkExperience,
};
use super::selection::MAX_SELECTED;

pub const DEFAULT_MAX_REPORTED_REJECTIONS: usize = 10;

static CANDIDATE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_candidate_id() -> CandidateId {
    let id = CANDIDATE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CandidateId(format!("candidate-{id:06}"))
}

/// Wire key plus the alternate spellings accepted for it.
struct FieldSpec {
    key: &'static str,
    aliases: &'static [&'static str],
}

const NAME: FieldSpec = FieldSpec {
    key: "name",
    aliases: &[],
};
const EMAIL: FieldSpec = FieldSpec {
    key: "email",
    aliases: &[],
};
const LOCATION: FieldSpec = FieldSpec {
    key: "location",
    aliases: &[],
};
const WORK_AVAILABILITY: FieldSpec = FieldSpec {
    key: "work_availability",
    aliases: &["workAvailability"],
};
const WORK_EXPERIENCES: FieldSpec = FieldSpec {
    key: "work_experiences",
    aliases: &["workExperiences"],
};
const EDUCATION: FieldSpec = FieldSpec {
    key: "education",
    aliases: &[],
};
const SKILLS: FieldSpec = FieldSpec {
    key: "skills",
    aliases: &[],
};

const REQUIRED_FIELDS: [FieldSpec; 7] = [
    NAME,
    EMAIL,
    LOCATION,
    WORK_AVAILABILITY,
    WORK_EXPERIENCES,
    EDUCATION,
    SKILLS,
];

const ID: FieldSpec = FieldSpec {
    key: "id",
    aliases: &[],
};
const PHONE: FieldSpec = FieldSpec {
    key: "phone",
    aliases: &[],
};
const SUBMITTED_AT: FieldSpec = FieldSpec {
    key: "submitted_at",
    aliases: &["submittedAt"],
};
const SALARY_EXPECTATION: FieldSpec = FieldSpec {
    key: "annual_salary_expectation",
    aliases: &["annualSalaryExpectation"],
};
const IS_SELECTED: FieldSpec = FieldSpec {
    key: "isSelected",
    aliases: &["is_selected"],
};
const HIGHEST_LEVEL: FieldSpec = FieldSpec {
    key: "highest_level",
    aliases: &["highestLevel"],
};
const DEGREES: FieldSpec = FieldSpec {
    key: "degrees",
    aliases: &[],
};

/// Per-record validation result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Accepted(Candidate),
    Rejected(String),
}

/// Accepted candidates plus a summary of what was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub accepted: Vec<Candidate>,
    pub rejected_count: usize,
    /// The first rejection reasons, capped by the validator configuration.
    pub rejection_reasons: Vec<String>,
    /// Selection flags cleared so the batch respects the shortlist cap.
    pub selections_cleared: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IngestFailure {
    #[error("invalid upload payload: not an array")]
    NotAnArray,
    #[error("no valid candidates in upload ({rejected_count} rejected)")]
    NoValidRecords {
        rejected_count: usize,
        reasons: Vec<String>,
    },
}

impl IngestFailure {
    pub fn reasons(&self) -> Vec<String> {
        match self {
            IngestFailure::NotAnArray => vec!["not an array".to_string()],
            IngestFailure::NoValidRecords { reasons, .. } => reasons.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadValidator {
    max_reported_rejections: usize,
}

impl Default for UploadValidator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REPORTED_REJECTIONS)
    }
}

impl UploadValidator {
    pub fn new(max_reported_rejections: usize) -> Self {
        Self {
            max_reported_rejections,
        }
    }

    /// Validates every record of `raw`, assigning ids to accepted records.
    pub fn check_records(&self, raw: &Value) -> Result<Vec<RecordOutcome>, IngestFailure> {
        let records = raw.as_array().ok_or(IngestFailure::NotAnArray)?;

        let mut drafts: Vec<Result<RecordDraft, String>> = records
            .iter()
            .enumerate()
            .map(|(index, record)| check_record(index + 1, record))
            .collect();

        let mut taken = HashSet::new();
        for (index, draft) in drafts.iter_mut().enumerate() {
            let duplicate = match draft.as_ref() {
                Ok(RecordDraft {
                    supplied_id: Some(id),
                    ..
                }) if !taken.insert(id.clone()) => {
                    Some(format!("record {}: duplicate id '{}'", index + 1, id))
                }
                _ => None,
            };
            if let Some(reason) = duplicate {
                *draft = Err(reason);
            }
        }

        let outcomes = drafts
            .into_iter()
            .map(|draft| match draft {
                Ok(draft) => {
                    let id = draft
                        .supplied_id
                        .clone()
                        .unwrap_or_else(|| allocate_id(&mut taken));
                    RecordOutcome::Accepted(draft.into_candidate(id))
                }
                Err(reason) => RecordOutcome::Rejected(reason),
            })
            .collect();

        Ok(outcomes)
    }

    pub fn ingest(&self, raw: &Value) -> Result<IngestReport, IngestFailure> {
        let mut accepted = Vec::new();
        let mut rejected_count = 0;
        let mut rejection_reasons = Vec::new();

        for outcome in self.check_records(raw)? {
            match outcome {
                RecordOutcome::Accepted(candidate) => accepted.push(candidate),
                RecordOutcome::Rejected(reason) => {
                    rejected_count += 1;
                    if rejection_reasons.len() < self.max_reported_rejections {
                        rejection_reasons.push(reason);
                    }
                }
            }
        }

        if accepted.is_empty() {
            return Err(IngestFailure::NoValidRecords {
                rejected_count,
                reasons: rejection_reasons,
            });
        }

        let selections_cleared = enforce_selection_cap(&mut accepted);

        Ok(IngestReport {
            accepted,
            rejected_count,
            rejection_reasons,
            selections_cleared,
        })
    }
}

/// Validates with the default rejection reporting limit.
pub fn ingest(raw: &Value) -> Result<IngestReport, IngestFailure> {
    UploadValidator::default().ingest(raw)
}

struct RecordDraft {
    supplied_id: Option<CandidateId>,
    candidate: Candidate,
}

impl RecordDraft {
    fn into_candidate(self, id: CandidateId) -> Candidate {
        Candidate { id, ..self.candidate }
    }
}

fn allocate_id(taken: &mut HashSet<CandidateId>) -> CandidateId {
    loop {
        let id = next_candidate_id();
        if taken.insert(id.clone()) {
            return id;
        }
    }
}

fn enforce_selection_cap(candidates: &mut [Candidate]) -> usize {
    let mut seen = 0;
    let mut cleared = 0;
    for candidate in candidates.iter_mut().filter(|c| c.is_selected) {
        seen += 1;
        if seen > MAX_SELECTED {
            candidate.is_selected = false;
            cleared += 1;
        }
    }
    cleared
}

fn check_record(position: usize, raw: &Value) -> Result<RecordDraft, String> {
    let record = raw
        .as_object()
        .ok_or_else(|| format!("record {position}: expected an object"))?;

    let missing: Vec<&str> = REQUIRED_FIELDS
        .iter()
        .filter(|field| !is_present(lookup(record, field)))
        .map(|field| field.key)
        .collect();
    if !missing.is_empty() {
        return Err(format!("record {position}: {}", describe_missing(&missing)));
    }

    build_draft(record).map_err(|detail| format!("record {position}: {detail}"))
}

fn build_draft(record: &Map<String, Value>) -> Result<RecordDraft, String> {
    let name = required_string(record, &NAME)?;
    let email = required_string(record, &EMAIL)?;
    let location = required_string(record, &LOCATION)?;
    let work_availability = check_availability(lookup(record, &WORK_AVAILABILITY))?;
    let work_experiences = check_experiences(lookup(record, &WORK_EXPERIENCES))?;
    let education = check_education(lookup(record, &EDUCATION))?;
    let skills = check_skills(lookup(record, &SKILLS))?;

    let supplied_id = check_id(lookup(record, &ID))?;
    let phone = optional_string(record, &PHONE)?;
    let submitted_at = optional_string(record, &SUBMITTED_AT)?;
    let submitted_at = if submitted_at.is_empty() {
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    } else {
        submitted_at
    };
    let annual_salary_expectation = check_salary_expectation(lookup(record, &SALARY_EXPECTATION))?;
    let is_selected = lookup(record, &IS_SELECTED)
        .and_then(Value::as_bool)
        .unwrap_or(false);

    Ok(RecordDraft {
        supplied_id,
        candidate: Candidate {
            id: CandidateId(String::new()),
            name,
            email,
            phone,
            location,
            submitted_at,
            work_availability,
            annual_salary_expectation,
            work_experiences,
            education,
            skills,
            is_selected,
        },
    })
}

fn lookup<'a>(record: &'a Map<String, Value>, field: &FieldSpec) -> Option<&'a Value> {
    std::iter::once(field.key)
        .chain(field.aliases.iter().copied())
        .filter_map(|key| record.get(key))
        .find(|value| !value.is_null())
}

// Null, empty strings, `false`, and zero count as absent; lists and objects always count.
fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().map(|n| n != 0.0).unwrap_or(true),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

fn describe_missing(missing: &[&str]) -> String {
    let quoted: Vec<String> = missing.iter().map(|key| format!("'{key}'")).collect();
    if quoted.len() == 1 {
        format!("missing required field {}", quoted[0])
    } else {
        format!("missing required fields {}", quoted.join(", "))
    }
}

fn required_string(record: &Map<String, Value>, field: &FieldSpec) -> Result<String, String> {
    match lookup(record, field) {
        Some(Value::String(text)) => Ok(text.clone()),
        _ => Err(format!("field '{}' must be a string", field.key)),
    }
}

fn optional_string(record: &Map<String, Value>, field: &FieldSpec) -> Result<String, String> {
    scalar_text(lookup(record, field)).ok_or_else(|| format!("field '{}' must be a string", field.key))
}

// Absent becomes empty; numbers are kept in their JSON spelling.
fn scalar_text(value: Option<&Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => Some(String::new()),
        Some(Value::String(text)) => Some(text.clone()),
        Some(Value::Number(number)) => Some(number.to_string()),
        Some(_) => None,
    }
}

fn check_id(value: Option<&Value>) -> Result<Option<CandidateId>, String> {
    let text = scalar_text(value).ok_or_else(|| "field 'id' must be a string".to_string())?;
    let text = text.trim();
    if text.is_empty() {
        Ok(None)
    } else {
        Ok(Some(CandidateId(text.to_string())))
    }
}

fn check_availability(value: Option<&Value>) -> Result<Vec<WorkAvailability>, String> {
    let items: Vec<&Value> = match value {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(other) => vec![other],
        None => Vec::new(),
    };

    let mut kinds = Vec::with_capacity(items.len());
    for item in items {
        let text = item
            .as_str()
            .ok_or("field 'work_availability' must contain strings")?;
        let kind = WorkAvailability::parse(text)
            .ok_or_else(|| format!("unsupported work availability '{text}'"))?;
        kinds.push(kind);
    }

    let kinds = dedup_availability(kinds);
    if kinds.is_empty() {
        return Err(
            "field 'work_availability' must list at least one of full-time, part-time".to_string(),
        );
    }
    Ok(kinds)
}

fn check_experiences(value: Option<&Value>) -> Result<Vec<WorkExperience>, String> {
    let items = value
        .and_then(Value::as_array)
        .ok_or("field 'work_experiences' must be a list")?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let entry = item
                .as_object()
                .ok_or_else(|| format!("work experience {} must be an object", index + 1))?;
            Ok(WorkExperience {
                company: optional_string(
                    entry,
                    &FieldSpec {
                        key: "company",
                        aliases: &[],
                    },
                )?,
                role_name: optional_string(
                    entry,
                    &FieldSpec {
                        key: "roleName",
                        aliases: &["role_name"],
                    },
                )?,
            })
        })
        .collect()
}

fn check_education(value: Option<&Value>) -> Result<Education, String> {
    let education = value
        .and_then(Value::as_object)
        .ok_or("field 'education' must be an object")?;

    let highest_level = match lookup(education, &HIGHEST_LEVEL) {
        Some(Value::String(level)) if !level.trim().is_empty() => level.clone(),
        _ => return Err("education requires a non-empty 'highest_level'".to_string()),
    };

    let degrees = lookup(education, &DEGREES)
        .and_then(Value::as_array)
        .ok_or("education requires a 'degrees' list")?
        .iter()
        .enumerate()
        .map(|(index, item)| check_degree(index + 1, item))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Education {
        highest_level,
        degrees,
    })
}

fn check_degree(position: usize, item: &Value) -> Result<Degree, String> {
    let entry = item
        .as_object()
        .ok_or_else(|| format!("degree {position} must be an object"))?;
    let text = |key: &'static str, aliases: &'static [&'static str]| {
        optional_string(entry, &FieldSpec { key, aliases })
            .map_err(|err| format!("degree {position}: {err}"))
    };

    let is_top50 = match lookup(
        entry,
        &FieldSpec {
            key: "isTop50",
            aliases: &["is_top50"],
        },
    ) {
        None => false,
        Some(Value::Bool(flag)) => *flag,
        Some(_) => return Err(format!("degree {position}: field 'isTop50' must be a boolean")),
    };

    Ok(Degree {
        degree: text("degree", &[])?,
        subject: text("subject", &[])?,
        school: text("school", &[])?,
        gpa: text("gpa", &[])?,
        start_date: text("startDate", &["start_date"])?,
        end_date: text("endDate", &["end_date"])?,
        original_school: text("originalSchool", &["original_school"])?,
        is_top50,
    })
}

fn check_skills(value: Option<&Value>) -> Result<Vec<String>, String> {
    value
        .and_then(Value::as_array)
        .ok_or("field 'skills' must be a list")?
        .iter()
        .map(|skill| {
            skill
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| "field 'skills' must contain strings".to_string())
        })
        .collect()
}

fn check_salary_expectation(value: Option<&Value>) -> Result<SalaryExpectation, String> {
    let Some(value) = value else {
        return Ok(SalaryExpectation::default());
    };
    let entries = value
        .as_object()
        .ok_or("field 'annual_salary_expectation' must be an object")?;

    let amount = |kind: WorkAvailability, alias: &'static str| {
        let text = scalar_text(
            entries
                .get(kind.label())
                .or_else(|| entries.get(alias)),
        )
        .ok_or_else(|| format!("salary expectation '{}' must be a string", kind.label()))?;
        Ok::<_, String>(Some(text).filter(|text| !text.is_empty()))
    };

    Ok(SalaryExpectation {
        full_time: amount(WorkAvailability::FullTime, "full_time")?,
        part_time: amount(WorkAvailability::PartTime, "part_time")?,
    })
}
