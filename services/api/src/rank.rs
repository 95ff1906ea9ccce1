use crate::infra::load_candidates;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use talent_shortlist::candidates::{
    filter, rank, score_breakdown, write_ranked_csv, write_ranked_csv_to_path, Candidate,
    FilterCriteria, ScoreBreakdown,
};
use talent_shortlist::config::AppConfig;
use talent_shortlist::error::AppError;

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// JSON upload file (`{"candidates": [...]}` or a bare list)
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Number of candidates to print
    #[arg(long, default_value_t = 10)]
    pub(crate) top: usize,
    /// Only keep candidates having every listed skill (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub(crate) skills: Vec<String>,
    /// Emit JSON instead of the text table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// JSON upload file (`{"candidates": [...]}` or a bare list)
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Destination CSV path; stdout when omitted
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct RankedEntry {
    rank: usize,
    name: String,
    email: String,
    location: String,
    breakdown: ScoreBreakdown,
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let candidates = load_candidates(&args.input, &config.shortlist)?;
    let entries = ranked_entries(&candidates, &args.skills, args.top);

    if args.json {
        let rendered = serde_json::to_string_pretty(&entries)?;
        println!("{rendered}");
        return Ok(());
    }

    println!(
        "Ranked {} of {} candidate(s) from {}",
        entries.len(),
        candidates.len(),
        args.input.display()
    );
    if !args.skills.is_empty() {
        println!("Required skills: {}", args.skills.join(", "));
    }
    for entry in &entries {
        println!(
            "{:>3}. {:<28} {:>3}  {} | {}",
            entry.rank,
            entry.name,
            entry.breakdown.total,
            entry.location,
            entry.email
        );
        for component in &entry.breakdown.components {
            println!(
                "       {:<18} {:>3}  {}",
                format!("{:?}", component.factor),
                component.points,
                component.notes
            );
        }
    }
    Ok(())
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let candidates = load_candidates(&args.input, &config.shortlist)?;

    match args.output {
        Some(path) => {
            let written = write_ranked_csv_to_path(&path, &candidates)?;
            println!("Wrote {written} ranked candidate(s) to {}", path.display());
        }
        None => {
            write_ranked_csv(std::io::stdout().lock(), &candidates)?;
        }
    }
    Ok(())
}

fn ranked_entries(candidates: &[Candidate], skills: &[String], top: usize) -> Vec<RankedEntry> {
    let criteria = FilterCriteria {
        skills: skills
            .iter()
            .map(|skill| skill.trim().to_string())
            .filter(|skill| !skill.is_empty())
            .collect(),
        ..FilterCriteria::default()
    };

    rank(&filter(candidates, &criteria))
        .into_iter()
        .take(top)
        .enumerate()
        .map(|(index, row)| RankedEntry {
            rank: index + 1,
            breakdown: score_breakdown(&row.candidate),
            name: row.candidate.name,
            email: row.candidate.email,
            location: row.candidate.location,
        })
        .collect()
}
