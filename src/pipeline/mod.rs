//! The per-paper stages and the driver that runs them over a directory of
//! papers.
//!
//! Every stage reads the artifacts of the previous one and writes its own.
//! A paper whose artifact already exists is skipped, so an interrupted run
//! can be restarted. Failures are contained to the paper they happen in.

mod authors;
mod commands;
pub mod files;
mod matching;
mod organizations;

use anyhow::{Context, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{error, info, warn};
use rayon::prelude::*;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use strum::{AsRefStr, Display, EnumString};

use crate::matching::{AffiliationMatcher, DEFAULT_TOP_K, OrganizationIndex, ScoreWeights};

pub use self::authors::extract_paper_authors;
pub use self::commands::{collect_commands, extract_paper_commands};
pub use self::matching::{collect_affiliations, match_candidate, match_paper};
pub use self::organizations::OrganizationDataset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Stage {
    ExtractCommands,
    ExtractAuthors,
    Match,
    All,
}

impl Stage {
    /// The stages to run, in order.
    pub fn steps(self) -> &'static [Stage] {
        match self {
            Stage::ExtractCommands => &[Stage::ExtractCommands],
            Stage::ExtractAuthors => &[Stage::ExtractAuthors],
            Stage::Match => &[Stage::Match],
            Stage::All => &[Stage::ExtractCommands, Stage::ExtractAuthors, Stage::Match],
        }
    }
}

/// Everything a run needs to know.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub papers_dir: PathBuf,
    /// The prepared organization dataset (`ror.json`).
    pub ror_dataset: PathBuf,
    /// Worker threads; `None` uses one per CPU.
    pub threads: Option<usize>,
    pub weights: ScoreWeights,
    pub top_k: usize,
}

impl PipelineConfig {
    pub fn new(papers_dir: impl Into<PathBuf>, ror_dataset: impl Into<PathBuf>) -> Self {
        Self {
            papers_dir: papers_dir.into(),
            ror_dataset: ror_dataset.into(),
            threads: None,
            weights: ScoreWeights::default(),
            top_k: DEFAULT_TOP_K,
        }
    }
}

/// What a stage did with one paper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Written,
    /// The artifact already existed.
    Skipped,
    /// Nothing to write.
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageSummary {
    pub stage: Stage,
    pub written: usize,
    pub skipped: usize,
    pub empty: usize,
    pub failed: usize,
}

impl StageSummary {
    fn new(stage: Stage) -> Self {
        Self {
            stage,
            written: 0,
            skipped: 0,
            empty: 0,
            failed: 0,
        }
    }

    fn record(&mut self, outcome: Option<Outcome>) {
        match outcome {
            Some(Outcome::Written) => self.written += 1,
            Some(Outcome::Skipped) => self.skipped += 1,
            Some(Outcome::Empty) => self.empty += 1,
            None => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.written + self.skipped + self.empty + self.failed
    }
}

/// Runs `stage` over every paper below `config.papers_dir`.
///
/// Only a missing papers directory or an unusable organization dataset
/// fail the run; problems with single papers are logged.
pub fn run(config: &PipelineConfig, stage: Stage, progress: &MultiProgress) -> Result<Vec<StageSummary>> {
    let paper_dirs = files::paper_dirs(&config.papers_dir)?;
    info!("Found {} papers in {}", paper_dirs.len(), config.papers_dir.display());

    let pool = {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(threads) = config.threads {
            builder = builder.num_threads(threads);
        }
        builder.build().context("Failed to build the worker pool")?
    };

    pool.install(|| {
        stage
            .steps()
            .iter()
            .map(|step| run_step(config, *step, &paper_dirs, progress))
            .collect()
    })
}

fn run_step(config: &PipelineConfig, stage: Stage, paper_dirs: &[PathBuf], progress: &MultiProgress) -> Result<StageSummary> {
    info!("Running stage {}", stage);
    let summary = match stage {
        Stage::ExtractCommands => run_per_paper(stage, paper_dirs, progress, extract_paper_commands),
        Stage::ExtractAuthors => run_per_paper(stage, paper_dirs, progress, |paper_dir| {
            extract_paper_authors(paper_dir, &config.weights)
        }),
        Stage::Match => {
            let index = OrganizationIndex::load(&config.ror_dataset)?;
            info!(
                "Loaded {} organizations with {} names",
                index.organizations().len(),
                index.len()
            );
            let matcher = AffiliationMatcher::new(Arc::new(index), config.top_k);

            let affiliations = collect_affiliations(paper_dirs);
            info!("Matching {} distinct affiliations", affiliations.len());
            matcher.match_all(affiliations.iter().map(String::as_str));

            run_per_paper(stage, paper_dirs, progress, |paper_dir| match_paper(paper_dir, &matcher))
        }
        Stage::All => StageSummary::new(stage),
    };
    info!(
        "Stage {}: {} written, {} skipped, {} empty, {} failed",
        stage, summary.written, summary.skipped, summary.empty, summary.failed
    );
    Ok(summary)
}

/// Applies `work` to every paper in parallel. An error or a panic only
/// loses that paper's artifact.
fn run_per_paper<F>(stage: Stage, paper_dirs: &[PathBuf], progress: &MultiProgress, work: F) -> StageSummary
where
    F: Fn(&Path) -> Result<Outcome> + Sync,
{
    let progress_bar = progress.add(create_progress_bar(stage, paper_dirs.len()));

    let outcomes: Vec<Option<Outcome>> = paper_dirs
        .par_iter()
        .map(|paper_dir| {
            let outcome = match panic::catch_unwind(AssertUnwindSafe(|| work(paper_dir))) {
                Ok(Ok(outcome)) => Some(outcome),
                Ok(Err(err)) => {
                    warn!("{}: {:#}", files::paper_id(paper_dir), err);
                    None
                }
                Err(_) => {
                    error!("{}: stage {} panicked", files::paper_id(paper_dir), stage);
                    None
                }
            };
            progress_bar.inc(1);
            outcome
        })
        .collect();
    progress_bar.finish_and_clear();
    progress.remove(&progress_bar);

    let mut summary = StageSummary::new(stage);
    for outcome in outcomes {
        summary.record(outcome);
    }
    summary
}

fn create_progress_bar(stage: Stage, total: usize) -> ProgressBar {
    let progress_bar = ProgressBar::new(total as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} {prefix} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} papers ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    progress_bar.set_style(style);
    progress_bar.set_prefix(stage.to_string());
    progress_bar
}
