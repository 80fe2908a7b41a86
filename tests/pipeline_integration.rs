use affilmatch::models::{
    Author, DocumentCommands, ExtractionKind, ExtractionResult, MatchedPaper, PaperMetadata, ResearchOrganization,
};
use affilmatch::pipeline::files::{CMDS_FILE, EXTRACTED_DATA_FILE, MATCHED_DATA_FILE, METADATA_FILE, TEX_DIR};
use affilmatch::pipeline::{self, OrganizationDataset, PipelineConfig, Stage, StageSummary};
use indicatif::{MultiProgress, ProgressDrawTarget};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Creates `<root>/papers/<id>` with one source file and the declared authors.
fn create_paper(root: &Path, id: &str, tex: &str, authors: &[&str]) -> PathBuf {
    let paper_dir = root.join("papers").join(id);
    fs::create_dir_all(paper_dir.join(TEX_DIR)).unwrap();
    fs::write(paper_dir.join(TEX_DIR).join("main.tex"), tex).unwrap();

    let metadata = PaperMetadata {
        paper_id: id.to_string(),
        authors: authors.iter().map(|name| Author::without_affiliation(*name)).collect(),
        ..PaperMetadata::default()
    };
    fs::write(paper_dir.join(METADATA_FILE), serde_json::to_string_pretty(&metadata).unwrap()).unwrap();
    paper_dir
}

fn create_dataset(root: &Path) -> PathBuf {
    let organization = |id: &str, names: &[&str]| ResearchOrganization {
        id: id.to_string(),
        names: names.iter().map(|name| name.to_string()).collect(),
        locations: Vec::new(),
    };
    let dataset = OrganizationDataset::from_organizations([
        organization("https://ror.org/042nb2s44", &["Massachusetts Institute of Technology", "MIT"]),
        organization("https://ror.org/05a28rw58", &["ETH Zurich"]),
        organization("https://ror.org/03vek6s52", &["Harvard University"]),
    ]);
    let path = root.join("ror.json");
    dataset.save(&path).unwrap();
    path
}

fn read<T: DeserializeOwned>(paper_dir: &Path, file_name: &str) -> T {
    let json = fs::read_to_string(paper_dir.join(file_name))
        .unwrap_or_else(|err| panic!("{} should exist in {}: {err}", file_name, paper_dir.display()));
    serde_json::from_str(&json).unwrap()
}

fn run(config: &PipelineConfig, stage: Stage) -> Vec<StageSummary> {
    let progress = MultiProgress::with_draw_target(ProgressDrawTarget::hidden());
    pipeline::run(config, stage, &progress).expect("pipeline should run")
}

#[test]
fn test_full_pipeline() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let single = create_paper(
        root,
        "2401.00001",
        "\\documentclass{acmart}\n\\begin{document}\n\\author{Jane Doe\\affaddr{MIT}}\n\\maketitle\n\\end{document}\n",
        &["Jane Doe"],
    );
    let blocks = create_paper(
        root,
        "2401.00002",
        "\\author{\\IEEEauthorblockN{Jane Doe}\\IEEEauthorblockA{MIT} \\and \\IEEEauthorblockN{John Roe}\\IEEEauthorblockA{ETH Zurich}}\n",
        &["Jane Doe", "John Roe"],
    );
    let no_commands = create_paper(root, "2401.00003", "\\section{Introduction}\nNo authors here.\n", &["Ann Lee"]);

    let mut config = PipelineConfig::new(root.join("papers"), create_dataset(root));
    config.threads = Some(2);

    let summaries = run(&config, Stage::All);
    let stages: Vec<Stage> = summaries.iter().map(|summary| summary.stage).collect();
    assert_eq!(stages, vec![Stage::ExtractCommands, Stage::ExtractAuthors, Stage::Match]);
    assert!(summaries.iter().all(|summary| summary.failed == 0), "{summaries:?}");
    assert_eq!(summaries[0].written, 2, "two papers have author commands");

    let commands: DocumentCommands = read(&single, CMDS_FILE);
    assert_eq!(commands.document_classes, vec!["acmart"]);
    assert_eq!(commands.commands.len(), 1);

    let extracted: ExtractionResult = read(&single, EXTRACTED_DATA_FILE);
    assert_eq!(extracted.kind, ExtractionKind::Single);
    let best = extracted.best().expect("a candidate");
    assert_eq!(best.authors, vec![Author::new("Jane Doe", ["MIT"])]);
    assert!((best.score - 1.0).abs() < 1e-9, "score was {}", best.score);

    let matched: MatchedPaper = read(&single, MATCHED_DATA_FILE);
    assert_eq!(matched.matched_authors.len(), 1);
    let author = &matched.matched_authors[0];
    assert_eq!(author.declared_name, "Jane Doe");
    assert_eq!(author.extracted_name, "Jane Doe");
    assert_eq!(author.affiliations.len(), 1);
    assert_eq!(author.affiliations[0].organization.short_id(), "042nb2s44");

    let matched: MatchedPaper = read(&blocks, MATCHED_DATA_FILE);
    let names: Vec<&str> = matched
        .matched_authors
        .iter()
        .map(|author| author.declared_name.as_str())
        .collect();
    assert_eq!(names, vec!["Jane Doe", "John Roe"]);

    assert!(!no_commands.join(CMDS_FILE).exists());
    assert!(!no_commands.join(EXTRACTED_DATA_FILE).exists());
    assert!(!no_commands.join(MATCHED_DATA_FILE).exists());
}

#[test]
fn test_rerun_skips_existing_artifacts() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let paper = create_paper(root, "2401.00001", "\\author{Jane Doe\\affaddr{MIT}}\n", &["Jane Doe"]);
    let config = PipelineConfig::new(root.join("papers"), create_dataset(root));

    run(&config, Stage::All);
    let first = fs::read_to_string(paper.join(MATCHED_DATA_FILE)).unwrap();

    let summaries = run(&config, Stage::All);
    assert!(summaries.iter().all(|summary| summary.skipped == 1 && summary.written == 0), "{summaries:?}");
    assert_eq!(fs::read_to_string(paper.join(MATCHED_DATA_FILE)).unwrap(), first);
}

#[test]
fn test_broken_paper_does_not_stop_the_others() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let broken = create_paper(root, "2401.00001", "\\author{Jane Doe\\affaddr{MIT}}\n", &["Jane Doe"]);
    fs::write(broken.join(METADATA_FILE), "{ not json").unwrap();
    let healthy = create_paper(root, "2401.00002", "\\author{John Roe\\affaddr{ETH Zurich}}\n", &["John Roe"]);
    let config = PipelineConfig::new(root.join("papers"), create_dataset(root));

    let summaries = run(&config, Stage::ExtractCommands);
    assert_eq!(summaries[0].written, 2);

    let summaries = run(&config, Stage::ExtractAuthors);
    assert_eq!(summaries[0].failed, 1);
    assert_eq!(summaries[0].written, 1);
    assert!(!broken.join(EXTRACTED_DATA_FILE).exists());

    run(&config, Stage::Match);
    let matched: MatchedPaper = read(&healthy, MATCHED_DATA_FILE);
    assert_eq!(matched.matched_authors[0].affiliations[0].organization.short_id(), "05a28rw58");
}

#[test]
fn test_match_stage_needs_a_valid_dataset() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    create_paper(root, "2401.00001", "\\author{Jane Doe\\affaddr{MIT}}\n", &["Jane Doe"]);
    let config = PipelineConfig::new(root.join("papers"), root.join("missing.json"));

    let progress = MultiProgress::with_draw_target(ProgressDrawTarget::hidden());
    assert!(pipeline::run(&config, Stage::Match, &progress).is_err());
    assert!(pipeline::run(&config, Stage::ExtractCommands, &progress).is_ok());
}
