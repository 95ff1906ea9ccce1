use serde::{Deserialize, Serialize};

use super::filter::parse_salary;

/// Identifier wrapper for stored candidates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandidateId(pub String);

impl CandidateId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CandidateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CandidateId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Employment arrangements a candidate is open to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkAvailability {
    FullTime,
    PartTime,
}

impl WorkAvailability {
    pub const fn ordered() -> [Self; 2] {
        [Self::FullTime, Self::PartTime]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::FullTime => "full-time",
            Self::PartTime => "part-time",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "full-time" => Some(Self::FullTime),
            "part-time" => Some(Self::PartTime),
            _ => None,
        }
    }
}

/// Annual salary expectation per availability kind, kept as the raw currency strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryExpectation {
    #[serde(
        rename = "full-time",
        alias = "full_time",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub full_time: Option<String>,
    #[serde(
        rename = "part-time",
        alias = "part_time",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub part_time: Option<String>,
}

impl SalaryExpectation {
    pub fn get(&self, kind: WorkAvailability) -> Option<&str> {
        let value = match kind {
            WorkAvailability::FullTime => self.full_time.as_deref(),
            WorkAvailability::PartTime => self.part_time.as_deref(),
        };
        value.filter(|raw| !raw.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        WorkAvailability::ordered()
            .into_iter()
            .all(|kind| self.get(kind).is_none())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkExperience {
    pub company: String,
    #[serde(rename = "roleName", alias = "role_name")]
    pub role_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Degree {
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub gpa: String,
    #[serde(rename = "startDate", alias = "start_date", default)]
    pub start_date: String,
    #[serde(rename = "endDate", alias = "end_date", default)]
    pub end_date: String,
    #[serde(rename = "originalSchool", alias = "original_school", default)]
    pub original_school: String,
    #[serde(rename = "isTop50", alias = "is_top50", default)]
    pub is_top50: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
    #[serde(alias = "highestLevel")]
    pub highest_level: String,
    #[serde(default)]
    pub degrees: Vec<Degree>,
}

/// One applicant record held by the candidate store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub location: String,
    #[serde(alias = "submittedAt", default)]
    pub submitted_at: String,
    #[serde(alias = "workAvailability")]
    pub work_availability: Vec<WorkAvailability>,
    #[serde(alias = "annualSalaryExpectation", default)]
    pub annual_salary_expectation: SalaryExpectation,
    #[serde(alias = "workExperiences", default)]
    pub work_experiences: Vec<WorkExperience>,
    pub education: Education,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(rename = "isSelected", alias = "is_selected", default)]
    pub is_selected: bool,
}

impl Candidate {
    pub fn has_top50_degree(&self) -> bool {
        self.education.degrees.iter().any(|degree| degree.is_top50)
    }

    pub fn is_available_for(&self, kind: WorkAvailability) -> bool {
        self.work_availability.contains(&kind)
    }

    /// Numeric full-time expectation, `None` when the candidate did not state one.
    pub fn full_time_salary(&self) -> Option<u64> {
        self.annual_salary_expectation
            .get(WorkAvailability::FullTime)
            .map(parse_salary)
    }
}

/// Partial field update accepted by `update_candidate`.
///
/// Selection changes are routed through the selection policy, so `is_selected` is kept apart
/// from the plain field assignments in [`CandidatePatch::apply_fields`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(
        alias = "submittedAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub submitted_at: Option<String>,
    #[serde(
        alias = "workAvailability",
        default,
        deserialize_with = "one_or_many_availability",
        skip_serializing_if = "Option::is_none"
    )]
    pub work_availability: Option<Vec<WorkAvailability>>,
    #[serde(
        alias = "annualSalaryExpectation",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub annual_salary_expectation: Option<SalaryExpectation>,
    #[serde(
        alias = "workExperiences",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub work_experiences: Option<Vec<WorkExperience>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<Education>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(
        rename = "isSelected",
        alias = "is_selected",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub is_selected: Option<bool>,
}

impl CandidatePatch {
    pub fn apply_fields(self, candidate: &mut Candidate) {
        let CandidatePatch {
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
            is_selected: _,
        } = self;

        if let Some(name) = name {
            candidate.name = name;
        }
        if let Some(email) = email {
            candidate.email = email;
        }
        if let Some(phone) = phone {
            candidate.phone = phone;
        }
        if let Some(location) = location {
            candidate.location = location;
        }
        if let Some(submitted_at) = submitted_at {
            candidate.submitted_at = submitted_at;
        }
        if let Some(availability) = work_availability {
            candidate.work_availability = dedup_availability(availability);
        }
        if let Some(expectation) = annual_salary_expectation {
            candidate.annual_salary_expectation = expectation;
        }
        if let Some(experiences) = work_experiences {
            candidate.work_experiences = experiences;
        }
        if let Some(education) = education {
            candidate.education = education;
        }
        if let Some(skills) = skills {
            candidate.skills = skills;
        }
    }
}

/// Drops repeated availability kinds while keeping first-seen order.
pub(crate) fn dedup_availability(values: Vec<WorkAvailability>) -> Vec<WorkAvailability> {
    let mut unique = Vec::with_capacity(values.len());
    for value in values {
        if !unique.contains(&value) {
            unique.push(value);
        }
    }
    unique
}

/// Accepts a single availability string as well as a list, matching what upload tolerates.
fn one_or_many_availability<'de, D>(
    deserializer: D,
) -> Result<Option<Vec<WorkAvailability>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(WorkAvailability),
        Many(Vec<WorkAvailability>),
    }

    Ok(
        Option::<OneOrMany>::deserialize(deserializer)?.map(|value| match value {
            OneOrMany::One(kind) => vec![kind],
            OneOrMany::Many(kinds) => kinds,
        }),
    )
}
