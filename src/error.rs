use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("toml serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("binary `{binary}` missing from PATH")]
    BinaryMissing { binary: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("credential store failed: {0}")]
    Credential(String),

    #[error("model load failed: {0}")]
    ModelLoad(String),

    #[error("transcription failed: {0}")]
    Transcription(String),

    #[error("summarization failed: {0}")]
    Summarization(String),

    #[error("workflow error: {0}")]
    Workflow(String),
}

pub type AppResult<T> = Result<T, AppError>;
