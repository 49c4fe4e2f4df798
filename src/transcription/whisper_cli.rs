use std::path::{Path, PathBuf};
use std::process::Command;

use crate::bootstrap::AppPaths;
use crate::config::{ModelSize, TranscriptionConfig};
use crate::error::{AppError, AppResult};
use crate::transcription::engine::{ModelHandle, TranscriptResult, TranscriptionEngine};

/// Adapter over the whisper.cpp `whisper-cli` binary.
///
/// "Loading" a model resolves the binary and the ggml model file for the
/// selected size; the actual weights are read by the subprocess at
/// transcription time.
pub struct WhisperCliEngine {
    binary: String,
    models_dir: PathBuf,
    language: Option<String>,
    threads: Option<u32>,
}

impl WhisperCliEngine {
    pub fn from_config(config: &TranscriptionConfig, paths: &AppPaths) -> Self {
        Self {
            binary: config.binary.clone(),
            models_dir: config
                .models_dir
                .clone()
                .unwrap_or_else(|| paths.models_dir.clone()),
            language: config.language.clone(),
            threads: config.threads,
        }
    }

    fn resolve_binary(&self) -> AppResult<PathBuf> {
        let candidate = Path::new(&self.binary);
        if candidate.components().count() > 1 {
            if candidate.is_file() {
                return Ok(candidate.to_path_buf());
            }
            return Err(AppError::BinaryMissing {
                binary: self.binary.clone(),
            });
        }

        which::which(&self.binary).map_err(|_| AppError::BinaryMissing {
            binary: self.binary.clone(),
        })
    }
}

impl TranscriptionEngine for WhisperCliEngine {
    fn load_model(&self, size: ModelSize) -> AppResult<ModelHandle> {
        let binary = self.resolve_binary().map_err(|error| {
            AppError::ModelLoad(format!("cannot resolve whisper binary: {error}"))
        })?;

        let model_path = self.models_dir.join(size.ggml_file_name());
        if !model_path.is_file() {
            return Err(AppError::ModelLoad(format!(
                "model file {} not found; download {} into {}",
                model_path.display(),
                size.ggml_file_name(),
                self.models_dir.display()
            )));
        }

        Ok(ModelHandle {
            binary,
            model_path,
            size,
        })
    }

    fn transcribe(&self, handle: &ModelHandle, audio_path: &Path) -> AppResult<TranscriptResult> {
        let mut command = Command::new(&handle.binary);
        command
            .arg("-m")
            .arg(&handle.model_path)
            .arg("-f")
            .arg(audio_path)
            .arg("--no-timestamps")
            .arg("--no-prints");

        if let Some(language) = &self.language {
            command.arg("-l").arg(language);
        }
        if let Some(threads) = self.threads {
            command.arg("-t").arg(threads.to_string());
        }

        let output = command
            .output()
            .map_err(|error| AppError::Transcription(format!("failed to spawn {}: {error}", handle.binary.display())))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::Transcription(format!(
                "{} exited with {}: {}",
                handle.binary.display(),
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_owned();
        Ok(TranscriptResult { text })
    }
}
