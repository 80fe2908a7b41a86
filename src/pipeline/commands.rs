//! Stage 1: find author and affiliation commands in a paper's sources.

use anyhow::Result;
use log::debug;
use std::path::Path;

use crate::latex::{extract_commands, extract_document_class, remove_comments};
use crate::models::DocumentCommands;

use super::Outcome;
use super::files::{CMDS_FILE, artifact_exists, paper_id, read_tex, tex_files, write_artifact};

/// Writes `cmds.json` for one paper unless it already exists.
pub fn extract_paper_commands(paper_dir: &Path) -> Result<Outcome> {
    if artifact_exists(paper_dir, CMDS_FILE) {
        debug!("{}: commands already extracted", paper_id(paper_dir));
        return Ok(Outcome::Skipped);
    }

    let commands = collect_commands(paper_dir);
    if commands.is_empty() {
        debug!("{}: no commands found in the sources", paper_id(paper_dir));
        return Ok(Outcome::Empty);
    }

    write_artifact(paper_dir, CMDS_FILE, &commands)?;
    Ok(Outcome::Written)
}

/// Document classes and commands of every source file, in file order.
pub fn collect_commands(paper_dir: &Path) -> DocumentCommands {
    let mut collected = DocumentCommands::default();
    for path in tex_files(paper_dir) {
        let Some(tex) = read_tex(&path) else {
            continue;
        };
        let tex = remove_comments(&tex);
        if let Some(class) = extract_document_class(&tex) {
            collected.document_classes.push(class);
        }
        collected.commands.extend(extract_commands(&tex));
    }
    collected
}
