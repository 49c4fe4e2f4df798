use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub transcription: TranscriptionConfig,
    pub summarization: SummarizationConfig,
    pub output: OutputConfig,
    pub diagnostics: DiagnosticsConfig,
}

/// Whisper model size, matching the ggml model files shipped by whisper.cpp.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ValueEnum, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModelSize {
    #[default]
    Tiny,
    Base,
    Turbo,
}

impl ModelSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelSize::Tiny => "tiny",
            ModelSize::Base => "base",
            ModelSize::Turbo => "turbo",
        }
    }

    pub fn ggml_file_name(&self) -> &'static str {
        match self {
            ModelSize::Tiny => "ggml-tiny.bin",
            ModelSize::Base => "ggml-base.bin",
            ModelSize::Turbo => "ggml-large-v3-turbo.bin",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionConfig {
    pub model_size: ModelSize,
    pub binary: String,
    pub models_dir: Option<PathBuf>,
    pub language: Option<String>,
    pub threads: Option<u32>,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            model_size: ModelSize::Tiny,
            binary: "whisper-cli".to_owned(),
            models_dir: None,
            language: None,
            threads: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizationConfig {
    pub model_id: String,
    pub endpoint: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub top_p: f64,
    pub prompt_template: String,
}

impl Default for SummarizationConfig {
    fn default() -> Self {
        Self {
            model_id: "llama-3.1-70b-versatile".to_owned(),
            endpoint: "https://api.groq.com/openai/v1/chat/completions".to_owned(),
            temperature: 1.0,
            max_tokens: 1024,
            top_p: 1.0,
            prompt_template: "Write a summary of the following transcript: \n\n{transcript}"
                .to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub enable_notifications: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            enable_notifications: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    pub log_level: String,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ModelSize};

    #[test]
    fn defaults_match_the_documented_run_parameters() {
        let config = AppConfig::default();
        assert_eq!(config.transcription.model_size, ModelSize::Tiny);
        assert_eq!(config.transcription.binary, "whisper-cli");
        assert_eq!(config.summarization.model_id, "llama-3.1-70b-versatile");
        assert_eq!(config.summarization.temperature, 1.0);
        assert_eq!(config.summarization.max_tokens, 1024);
        assert_eq!(config.summarization.top_p, 1.0);
        assert!(config.summarization.prompt_template.contains("{transcript}"));
        assert!(config.output.enable_notifications);
        assert_eq!(config.diagnostics.log_level, "info");
    }

    #[test]
    fn model_sizes_map_to_ggml_files() {
        assert_eq!(ModelSize::Tiny.ggml_file_name(), "ggml-tiny.bin");
        assert_eq!(ModelSize::Base.ggml_file_name(), "ggml-base.bin");
        assert_eq!(ModelSize::Turbo.ggml_file_name(), "ggml-large-v3-turbo.bin");
    }

    #[test]
    fn empty_toml_deserializes_to_defaults() {
        let config: AppConfig = toml::from_str("").expect("parse empty config");
        assert_eq!(config.transcription.model_size, ModelSize::Tiny);
        assert_eq!(
            config.summarization.endpoint,
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }
}
