use serde::{Deserialize, Serialize};

/// One command invocation as written in the source and after sanitizing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatexCommand {
    pub original: String,
    pub sanitized: String,
}

impl LatexCommand {
    pub fn new(original: impl Into<String>, sanitized: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            sanitized: sanitized.into(),
        }
    }
}

/// Everything the command stage found in one paper's sources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentCommands {
    #[serde(default)]
    pub document_classes: Vec<String>,
    #[serde(default)]
    pub commands: Vec<LatexCommand>,
}

impl DocumentCommands {
    pub fn is_empty(&self) -> bool {
        self.document_classes.is_empty() && self.commands.is_empty()
    }

    /// The sanitized text of every command, in document order.
    pub fn sanitized(&self) -> Vec<String> {
        self.commands.iter().map(|command| command.sanitized.clone()).collect()
    }
}
