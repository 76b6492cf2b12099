use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Failed to read {file}: {source}")]
    Read { file: PathBuf, source: std::io::Error },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid style pattern '{pattern}': {source}")]
    InvalidPattern { pattern: String, source: regex::Error },

    #[error("Invalid attribute name '{key}': only letters, digits and '_' are allowed")]
    InvalidAttribute { key: String },

    #[error("Invalid style rules: {0}")]
    StyleRules(#[from] serde_json::Error),

    #[error("Invalid configuration in {path}: {source}")]
    Config { path: PathBuf, source: toml::de::Error },

    #[error("Too many input graphs: {count} given, at most {max} supported")]
    TooManyInputs { count: usize, max: usize },

    #[error("{flag} is not effective for fewer than 2 input graphs")]
    TooFewInputs { flag: &'static str },

    #[error("No input graphs given")]
    NoInputs,

    #[error("Input graph '{0}' was given more than once")]
    DuplicateGraph(String),

    #[error("The same file ({}) may not be both input and output", .0.display())]
    SameInputOutput(PathBuf),
}
