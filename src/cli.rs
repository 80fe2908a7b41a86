use clap::Parser;
use std::path::PathBuf;

use crate::matching::DEFAULT_TOP_K;
use crate::pipeline::Stage;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory with one sub-directory per paper
    pub papers_dir: PathBuf,

    /// Stage to run (extract-commands, extract-authors, match, all)
    #[arg(short, long, default_value_t = Stage::All)]
    pub stage: Stage,

    /// Prepared organization dataset used by the match stage
    #[arg(long, default_value = "ror.json")]
    pub ror_dataset: PathBuf,

    /// Raw ROR schema v2 dump to build the organization dataset from
    #[arg(long)]
    pub ror_raw: Option<PathBuf>,

    /// Number of worker threads (defaults to one per CPU)
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Partial matches re-ranked per affiliation
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    pub top_k: usize,
}
