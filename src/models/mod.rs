mod author;
mod commands;
mod extraction;
mod matched;
mod metadata;
mod organization;

pub use author::Author;
pub use commands::{DocumentCommands, LatexCommand};
pub use extraction::{ExtractionCandidate, ExtractionKind, ExtractionResult};
pub use matched::{MatchedAffiliation, MatchedAuthor, MatchedPaper};
pub use metadata::PaperMetadata;
pub use organization::{ResearchLocation, ResearchOrganization, SENTINEL_ID};
