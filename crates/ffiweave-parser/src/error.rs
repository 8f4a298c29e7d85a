use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParserError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unsupported description format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid description ({count} problem(s)):\n{summary}")]
    Validation { count: usize, summary: String },
}
