use serde::{Deserialize, Serialize};

use super::domain::{Candidate, CandidateId};

/// Base points awarded for the highest completed education level.
pub const EDUCATION_POINTS: [(&str, u8); 5] = [
    ("High School", 10),
    ("Associate's Degree", 15),
    ("Bachelor's Degree", 20),
    ("Master's Degree", 25),
    ("Doctorate", 30),
];

pub const POINTS_PER_ROLE: usize = 5;
pub const MAX_EXPERIENCE_POINTS: usize = 35;
pub const POINTS_PER_SKILL: usize = 3;
pub const MAX_SKILL_POINTS: usize = 30;
pub const TOP_SCHOOL_BONUS: u8 = 5;

/// Rubric dimensions contributing to a candidate score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    Education,
    Experience,
    Skills,
    TopSchoolBonus,
}

/// Discrete contribution to a score so the ranking stays explainable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub points: u8,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub candidate_id: CandidateId,
    pub total: u8,
    pub components: Vec<ScoreComponent>,
}

/// Candidate row paired with its score, serialized flat the way the table consumes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub score: u8,
}

impl ScoredCandidate {
    pub fn new(candidate: Candidate) -> Self {
        let score = score(&candidate);
        Self { candidate, score }
    }
}

pub fn education_points(highest_level: &str) -> u8 {
    EDUCATION_POINTS
        .iter()
        .find(|(level, _)| *level == highest_level)
        .map(|(_, points)| *points)
        .unwrap_or(0)
}

pub fn experience_points(role_count: usize) -> u8 {
    role_count
        .saturating_mul(POINTS_PER_ROLE)
        .min(MAX_EXPERIENCE_POINTS) as u8
}

pub fn skill_points(skill_count: usize) -> u8 {
    skill_count
        .saturating_mul(POINTS_PER_SKILL)
        .min(MAX_SKILL_POINTS) as u8
}

/// Fixed-weight score in `0..=100`.
pub fn score(candidate: &Candidate) -> u8 {
    score_breakdown(candidate).total
}

pub fn score_breakdown(candidate: &Candidate) -> ScoreBreakdown {
    let mut components = Vec::with_capacity(4);

    let level = candidate.education.highest_level.as_str();
    let education = education_points(level);
    components.push(ScoreComponent {
        factor: ScoreFactor::Education,
        points: education,
        notes: if education == 0 {
            format!("unrecognized education level '{level}'")
        } else {
            format!("highest level {level}")
        },
    });

    let roles = candidate.work_experiences.len();
    components.push(ScoreComponent {
        factor: ScoreFactor::Experience,
        points: experience_points(roles),
        notes: format!("{roles} role(s), capped at {MAX_EXPERIENCE_POINTS}"),
    });

    let skills = candidate.skills.len();
    components.push(ScoreComponent {
        factor: ScoreFactor::Skills,
        points: skill_points(skills),
        notes: format!("{skills} skill(s), capped at {MAX_SKILL_POINTS}"),
    });

    let top_school = candidate.has_top50_degree();
    components.push(ScoreComponent {
        factor: ScoreFactor::TopSchoolBonus,
        points: if top_school { TOP_SCHOOL_BONUS } else { 0 },
        notes: if top_school {
            "degree from a top-50 school".to_string()
        } else {
            "no top-50 degree".to_string()
        },
    });

    let total = components.iter().map(|component| component.points).sum();

    ScoreBreakdown {
        candidate_id: candidate.id.clone(),
        total,
        components,
    }
}
