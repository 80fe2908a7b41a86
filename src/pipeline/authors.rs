//! Stage 2: run the extraction schemes over a paper's commands.

use anyhow::Result;
use log::debug;
use std::path::Path;

use crate::matching::ScoreWeights;
use crate::models::{DocumentCommands, ExtractionResult, PaperMetadata};
use crate::schemes::extract_authors;

use super::Outcome;
use super::files::{
    CMDS_FILE, EXTRACTED_DATA_FILE, METADATA_FILE, artifact_exists, paper_id, read_artifact, read_optional_artifact,
    write_artifact,
};

/// Writes `extracted_data.json` for one paper unless it already exists.
pub fn extract_paper_authors(paper_dir: &Path, weights: &ScoreWeights) -> Result<Outcome> {
    let id = paper_id(paper_dir);
    if artifact_exists(paper_dir, EXTRACTED_DATA_FILE) {
        debug!("{}: authors already extracted", id);
        return Ok(Outcome::Skipped);
    }

    let Some(commands) = read_optional_artifact::<DocumentCommands>(paper_dir, CMDS_FILE)? else {
        debug!("{}: no commands file", id);
        return Ok(Outcome::Empty);
    };
    if commands.commands.is_empty() {
        debug!("{}: no extracted commands", id);
        return Ok(Outcome::Empty);
    }
    let metadata: PaperMetadata = read_artifact(paper_dir, METADATA_FILE)?;

    let Some(result) = extract_authors(&commands.sanitized(), &metadata.authors, weights) else {
        debug!("{}: no scheme extracted any author", id);
        return Ok(Outcome::Empty);
    };
    log_scores(&id, &result);

    write_artifact(paper_dir, EXTRACTED_DATA_FILE, &result)?;
    Ok(Outcome::Written)
}

fn log_scores(id: &str, result: &ExtractionResult) {
    let scores: Vec<String> = result
        .ranked()
        .iter()
        .map(|candidate| format!("{}={:.3}", candidate.scheme_id, candidate.score))
        .collect();
    debug!(
        "{}: {} {} extractions, best to worst: {}",
        id,
        result.candidates.len(),
        result.kind,
        scores.join(", ")
    );
}
