use std::io::Write;
use std::path::Path;

use serde::Serialize;

use super::domain::{Candidate, WorkAvailability};
use super::scoring::ScoredCandidate;
use super::sorting::{sort_scored, SortOrder};

#[derive(Debug)]
pub enum ExportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Io(err) => write!(f, "failed to write candidate export: {}", err),
            ExportError::Csv(err) => write!(f, "invalid candidate CSV output: {}", err),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io(err) => Some(err),
            ExportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    rank: usize,
    id: &'a str,
    name: &'a str,
    email: &'a str,
    location: &'a str,
    score: u8,
    highest_level: &'a str,
    roles: usize,
    skills: String,
    availability: String,
    full_time_salary: Option<u64>,
    selected: bool,
}

impl<'a> ExportRow<'a> {
    fn new(rank: usize, row: &'a ScoredCandidate) -> Self {
        let candidate = &row.candidate;
        Self {
            rank,
            id: candidate.id.as_str(),
            name: &candidate.name,
            email: &candidate.email,
            location: &candidate.location,
            score: row.score,
            highest_level: &candidate.education.highest_level,
            roles: candidate.work_experiences.len(),
            skills: candidate.skills.join("; "),
            availability: candidate
                .work_availability
                .iter()
                .copied()
                .map(WorkAvailability::label)
                .collect::<Vec<_>>()
                .join("; "),
            full_time_salary: candidate.full_time_salary(),
            selected: candidate.is_selected,
        }
    }
}

/// Scores and ranks `candidates` (highest score first), returning the ranked rows.
pub fn rank(candidates: &[Candidate]) -> Vec<ScoredCandidate> {
    let mut rows: Vec<ScoredCandidate> = candidates.iter().cloned().map(ScoredCandidate::new).collect();
    sort_scored(&mut rows, SortOrder::default());
    rows
}

/// Writes one CSV row per candidate in ranked order, with a header line.
pub fn write_ranked_csv<W: Write>(writer: W, candidates: &[Candidate]) -> Result<usize, ExportError> {
    let rows = rank(candidates);
    let mut csv_writer = csv::Writer::from_writer(writer);
    for (index, row) in rows.iter().enumerate() {
        csv_writer.serialize(ExportRow::new(index + 1, row))?;
    }
    csv_writer.flush()?;
    Ok(rows.len())
}

pub fn write_ranked_csv_to_path<P: AsRef<Path>>(
    path: P,
    candidates: &[Candidate],
) -> Result<usize, ExportError> {
    let file = std::fs::File::create(path)?;
    write_ranked_csv(file, candidates)
}
