use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::ModelSize;
use crate::error::AppResult;

/// A loaded speech-to-text model, ready to transcribe audio files.
#[derive(Debug, Clone)]
pub struct ModelHandle {
    pub binary: PathBuf,
    pub model_path: PathBuf,
    pub size: ModelSize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TranscriptResult {
    pub text: String,
}

pub trait TranscriptionEngine {
    fn load_model(&self, size: ModelSize) -> AppResult<ModelHandle>;
    fn transcribe(&self, handle: &ModelHandle, audio_path: &Path) -> AppResult<TranscriptResult>;
}
