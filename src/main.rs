use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use env_logger::Env;
use indicatif::MultiProgress;
use indicatif_log_bridge::LogWrapper;
use log::info;

use affilmatch::cli::Cli;
use affilmatch::matching::ScoreWeights;
use affilmatch::pipeline::{self, OrganizationDataset, PipelineConfig, StageSummary};

fn main() {
    let progress = init_logging();
    if let Err(err) = run(&progress) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

/// Routes log records through the progress bars so they do not tear them.
fn init_logging() -> MultiProgress {
    let logger = env_logger::Builder::from_env(Env::default().default_filter_or("info")).build();
    let level = logger.filter();
    let progress = MultiProgress::new();
    if LogWrapper::new(progress.clone(), logger).try_init().is_ok() {
        log::set_max_level(level);
    }
    progress
}

fn run(progress: &MultiProgress) -> Result<()> {
    let cli = Cli::parse();
    let start_time = Utc::now();

    if let Some(raw) = &cli.ror_raw {
        let dataset = OrganizationDataset::from_ror_dump(raw)?;
        dataset.save(&cli.ror_dataset)?;
        info!(
            "Wrote {} organizations to {}",
            dataset.organizations().len(),
            cli.ror_dataset.display()
        );
    }

    let config = PipelineConfig {
        papers_dir: cli.papers_dir,
        ror_dataset: cli.ror_dataset,
        threads: cli.threads,
        weights: ScoreWeights::default(),
        top_k: cli.top_k,
    };
    let summaries = pipeline::run(&config, cli.stage, progress)?;

    let end_time = Utc::now();
    let duration = (end_time - start_time).num_milliseconds() as f64 / 1000.0;
    println!("{} in {:.2}s", summarize(&summaries), duration);
    Ok(())
}

fn summarize(summaries: &[StageSummary]) -> String {
    summaries
        .iter()
        .map(|summary| {
            format!(
                "{}: {}/{} written ({} skipped, {} failed)",
                summary.stage,
                summary.written,
                summary.total(),
                summary.skipped,
                summary.failed
            )
        })
        .collect::<Vec<_>>()
        .join("; ")
}
