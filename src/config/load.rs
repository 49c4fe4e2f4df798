use std::path::PathBuf;

use crate::bootstrap::AppPaths;
use crate::config::schema::{AppConfig, ModelSize};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_path: Option<PathBuf>,
    pub model_size: Option<ModelSize>,
    pub language: Option<String>,
    pub summary_model_id: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub top_p: Option<f64>,
}

pub fn load_config(paths: &AppPaths, overrides: &CliOverrides) -> AppResult<AppConfig> {
    let config_path = overrides
        .config_path
        .clone()
        .unwrap_or_else(|| paths.config_file.clone());

    let mut config = if config_path.exists() {
        let raw = std::fs::read_to_string(&config_path)?;
        toml::from_str::<AppConfig>(&raw)?
    } else {
        let defaults = AppConfig::default();
        write_default_config(&config_path, &defaults)?;
        defaults
    };

    if config.transcription.models_dir.is_none() {
        config.transcription.models_dir = Some(paths.models_dir.clone());
    }

    apply_env_overrides(&mut config);
    apply_cli_overrides(&mut config, overrides);

    validate(&config)?;
    Ok(config)
}

fn write_default_config(path: &PathBuf, defaults: &AppConfig) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let data = toml::to_string_pretty(defaults)?;
    std::fs::write(path, data)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let mut perms = std::fs::metadata(path)?.permissions();
        perms.set_mode(0o600);
        std::fs::set_permissions(path, perms)?;
    }

    Ok(())
}

fn validate(config: &AppConfig) -> AppResult<()> {
    if config.transcription.binary.trim().is_empty() {
        return Err(AppError::Config(
            "transcription.binary must not be empty".to_owned(),
        ));
    }

    let summarization = &config.summarization;
    if !(0.0..=2.0).contains(&summarization.temperature) {
        return Err(AppError::Config(
            "summarization.temperature must be within 0..=2".to_owned(),
        ));
    }
    if summarization.max_tokens == 0 {
        return Err(AppError::Config(
            "summarization.max_tokens must be > 0".to_owned(),
        ));
    }
    if !(summarization.top_p > 0.0 && summarization.top_p <= 1.0) {
        return Err(AppError::Config(
            "summarization.top_p must be within (0, 1]".to_owned(),
        ));
    }
    if !summarization.prompt_template.contains("{transcript}") {
        return Err(AppError::Config(
            "summarization.prompt_template must contain the {transcript} placeholder".to_owned(),
        ));
    }

    Ok(())
}

fn apply_env_overrides(config: &mut AppConfig) {
    if let Ok(value) = std::env::var("LOCALNOTE_MODEL_SIZE") {
        if let Some(parsed) = parse_model_size(&value) {
            config.transcription.model_size = parsed;
        }
    }
    if let Ok(value) = std::env::var("LOCALNOTE_WHISPER_BINARY") {
        if !value.trim().is_empty() {
            config.transcription.binary = value;
        }
    }
    if let Ok(value) = std::env::var("LOCALNOTE_MODELS_DIR") {
        if !value.trim().is_empty() {
            config.transcription.models_dir = Some(PathBuf::from(value));
        }
    }
    if let Ok(value) = std::env::var("LOCALNOTE_LANGUAGE") {
        config.transcription.language = if value.trim().is_empty() {
            None
        } else {
            Some(value)
        };
    }
    if let Ok(value) = std::env::var("LOCALNOTE_SUMMARY_MODEL") {
        if !value.trim().is_empty() {
            config.summarization.model_id = value;
        }
    }
    if let Ok(value) = std::env::var("LOCALNOTE_SUMMARY_ENDPOINT") {
        if !value.trim().is_empty() {
            config.summarization.endpoint = value;
        }
    }
    if let Ok(value) = std::env::var("LOCALNOTE_TEMPERATURE") {
        if let Ok(parsed) = value.parse::<f64>() {
            config.summarization.temperature = parsed;
        }
    }
    if let Ok(value) = std::env::var("LOCALNOTE_MAX_TOKENS") {
        if let Ok(parsed) = value.parse::<u32>() {
            config.summarization.max_tokens = parsed;
        }
    }
    if let Ok(value) = std::env::var("LOCALNOTE_TOP_P") {
        if let Ok(parsed) = value.parse::<f64>() {
            config.summarization.top_p = parsed;
        }
    }
    if let Ok(value) = std::env::var("LOCALNOTE_NOTIFICATIONS") {
        if let Some(parsed) = parse_bool(&value) {
            config.output.enable_notifications = parsed;
        }
    }
    if let Ok(value) = std::env::var("LOCALNOTE_LOG_LEVEL") {
        config.diagnostics.log_level = value;
    }
}

fn apply_cli_overrides(config: &mut AppConfig, overrides: &CliOverrides) {
    if let Some(value) = overrides.model_size {
        config.transcription.model_size = value;
    }
    if let Some(value) = &overrides.language {
        config.transcription.language = Some(value.clone());
    }
    if let Some(value) = &overrides.summary_model_id {
        config.summarization.model_id = value.clone();
    }
    if let Some(value) = overrides.temperature {
        config.summarization.temperature = value;
    }
    if let Some(value) = overrides.max_tokens {
        config.summarization.max_tokens = value;
    }
    if let Some(value) = overrides.top_p {
        config.summarization.top_p = value;
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_model_size(value: &str) -> Option<ModelSize> {
    match value.trim().to_ascii_lowercase().as_str() {
        "tiny" => Some(ModelSize::Tiny),
        "base" => Some(ModelSize::Base),
        "turbo" => Some(ModelSize::Turbo),
        _ => None,
    }
}
