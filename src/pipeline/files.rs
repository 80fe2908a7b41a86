//! Paper directory layout and artifact I/O.
//!
//! ```text
//! <papers_dir>/
//! └─ <paper>/
//!    ├─ paper_metadata.json
//!    ├─ tex/**.tex
//!    ├─ cmds.json
//!    ├─ extracted_data.json
//!    └─ matched_data.json
//! ```

use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern, glob_with};
use log::warn;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

pub const METADATA_FILE: &str = "paper_metadata.json";
pub const CMDS_FILE: &str = "cmds.json";
pub const EXTRACTED_DATA_FILE: &str = "extracted_data.json";
pub const MATCHED_DATA_FILE: &str = "matched_data.json";
pub const ROR_DATASET_FILE: &str = "ror.json";
pub const TEX_DIR: &str = "tex";

/// Content of a source file that must not be searched.
const AUTO_IGNORE: &str = "%auto-ignore";

/// Every directory directly below `papers_dir`, sorted by name.
pub fn paper_dirs(papers_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(papers_dir)
        .with_context(|| format!("Failed to read papers directory {}", papers_dir.display()))?;
    let mut dirs: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();
    Ok(dirs)
}

/// Name of the paper directory, used to tag log messages.
pub fn paper_id(paper_dir: &Path) -> String {
    paper_dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| paper_dir.display().to_string())
}

/// All `.tex` files below `<paper>/tex`, in lexicographic order. Class
/// files saved as `*.cls.tex` are left out.
pub fn tex_files(paper_dir: &Path) -> Vec<PathBuf> {
    let tex_dir = paper_dir.join(TEX_DIR);
    let Some(tex_dir_str) = tex_dir.to_str() else {
        warn!("{}: source directory is not valid UTF-8", paper_id(paper_dir));
        return Vec::new();
    };
    let pattern = format!("{}/**/*.tex", Pattern::escape(tex_dir_str));
    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };

    let Ok(paths) = glob_with(&pattern, options) else {
        warn!("{}: invalid source pattern '{}'", paper_id(paper_dir), pattern);
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = paths
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(err) => {
                warn!("{}: {}", paper_id(paper_dir), err);
                None
            }
        })
        .filter(|path| path.is_file() && !is_class_file(path))
        .collect();
    files.sort();
    files
}

fn is_class_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase().ends_with(".cls.tex"))
        .unwrap_or(false)
}

/// Reads a source file, replacing invalid UTF-8. Returns `None` for
/// unreadable files and for files marked `%auto-ignore`.
pub fn read_tex(path: &Path) -> Option<String> {
    match fs::read(path) {
        Ok(bytes) => {
            let tex = String::from_utf8_lossy(&bytes).into_owned();
            (tex.trim() != AUTO_IGNORE).then_some(tex)
        }
        Err(err) => {
            warn!("Failed to read {}: {}", path.display(), err);
            None
        }
    }
}

pub fn artifact_exists(paper_dir: &Path, file_name: &str) -> bool {
    paper_dir.join(file_name).is_file()
}

pub fn read_artifact<T: DeserializeOwned>(paper_dir: &Path, file_name: &str) -> Result<T> {
    let path = paper_dir.join(file_name);
    let json = fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Reads an artifact that may legitimately be missing.
pub fn read_optional_artifact<T: DeserializeOwned>(paper_dir: &Path, file_name: &str) -> Result<Option<T>> {
    if !artifact_exists(paper_dir, file_name) {
        return Ok(None);
    }
    read_artifact(paper_dir, file_name).map(Some)
}

/// Writes `value` as pretty JSON. The file only appears under its final
/// name once it is complete, so an interrupted run never leaves an artifact
/// that a later run would skip.
pub fn write_artifact<T: Serialize>(paper_dir: &Path, file_name: &str, value: &T) -> Result<()> {
    let path = paper_dir.join(file_name);
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;

    let temp_path = paper_dir.join(format!(".{}.tmp-{}", file_name, std::process::id()));
    fs::write(&temp_path, json).with_context(|| format!("Failed to write {}", temp_path.display()))?;
    fs::rename(&temp_path, &path).map_err(|err| {
        let _ = fs::remove_file(&temp_path);
        anyhow::Error::new(err).context(format!("Failed to move {} into place", path.display()))
    })
}
