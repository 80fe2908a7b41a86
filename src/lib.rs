pub mod cli;
pub mod latex;
pub mod matching;
pub mod models;
pub mod pipeline;
pub mod schemes;

pub use matching::{AffiliationMatcher, OrganizationIndex, ScoreWeights};
pub use models::{Author, ExtractionResult, MatchedPaper};
pub use pipeline::{PipelineConfig, Stage, run};
