use std::path::Path;
use std::process::Command;

use chrono::Utc;
use regex::Regex;

use crate::bootstrap::AppPaths;
use crate::config::AppConfig;
use crate::doctor::report::{CheckResult, CheckStatus, DoctorReport};

pub fn run_doctor(paths: &AppPaths, config: &AppConfig) -> DoctorReport {
    let mut checks = Vec::new();

    checks.push(check_whisper_binary(&config.transcription.binary));
    checks.push(check_model_file(paths, config));
    checks.push(check_binary_present(
        "ffmpeg",
        false,
        Some("Install ffmpeg to transcribe audio formats other than wav."),
    ));
    checks.push(check_credential(paths));
    checks.push(check_endpoint(&config.summarization.endpoint));

    DoctorReport::from_checks(Utc::now().to_rfc3339(), checks)
}

fn check_whisper_binary(binary: &str) -> CheckResult {
    let candidate = Path::new(binary);
    let resolved = if candidate.components().count() > 1 {
        candidate.is_file().then(|| candidate.to_path_buf())
    } else {
        which::which(binary).ok()
    };

    match resolved {
        Some(path) => {
            let detail = match binary_version(&path) {
                Some(version) => format!("{version} at {}", path.display()),
                None => format!("found at {} (version unknown)", path.display()),
            };
            CheckResult {
                name: "whisper-binary".to_owned(),
                status: CheckStatus::Pass,
                detail,
                required: true,
                remediation: None,
            }
        }
        None => CheckResult {
            name: "whisper-binary".to_owned(),
            status: CheckStatus::Fail,
            detail: format!("`{binary}` not found"),
            required: true,
            remediation: Some(
                "Install whisper.cpp and ensure whisper-cli is in PATH.".to_owned(),
            ),
        },
    }
}

fn check_model_file(paths: &AppPaths, config: &AppConfig) -> CheckResult {
    let models_dir = config
        .transcription
        .models_dir
        .clone()
        .unwrap_or_else(|| paths.models_dir.clone());
    let size = config.transcription.model_size;
    let model_path = models_dir.join(size.ggml_file_name());

    if model_path.is_file() {
        CheckResult {
            name: "model-file".to_owned(),
            status: CheckStatus::Pass,
            detail: format!("{} ({})", model_path.display(), size.as_str()),
            required: true,
            remediation: None,
        }
    } else {
        CheckResult {
            name: "model-file".to_owned(),
            status: CheckStatus::Fail,
            detail: format!("{} missing", model_path.display()),
            required: true,
            remediation: Some(format!(
                "Download {} into {}.",
                size.ggml_file_name(),
                models_dir.display()
            )),
        }
    }
}

fn check_binary_present(binary: &str, required: bool, remediation: Option<&str>) -> CheckResult {
    match which::which(binary) {
        Ok(path) => CheckResult {
            name: binary.to_owned(),
            status: CheckStatus::Pass,
            detail: format!("found at {}", path.display()),
            required,
            remediation: None,
        },
        Err(_) => CheckResult {
            name: binary.to_owned(),
            status: if required {
                CheckStatus::Fail
            } else {
                CheckStatus::Warn
            },
            detail: "binary not found in PATH".to_owned(),
            required,
            remediation: remediation.map(ToOwned::to_owned),
        },
    }
}

fn check_credential(paths: &AppPaths) -> CheckResult {
    let present = std::fs::read_to_string(&paths.key_file)
        .map(|raw| !raw.trim().is_empty())
        .unwrap_or(false);

    if present {
        CheckResult {
            name: "api-key".to_owned(),
            status: CheckStatus::Pass,
            detail: format!("credential present at {}", paths.key_file.display()),
            required: false,
            remediation: None,
        }
    } else {
        CheckResult {
            name: "api-key".to_owned(),
            status: CheckStatus::Warn,
            detail: "no API key stored; summarization will be skipped".to_owned(),
            required: false,
            remediation: Some("Run `localnote run --api-key <key> ...` once to store a key.".to_owned()),
        }
    }
}

fn check_endpoint(endpoint: &str) -> CheckResult {
    if endpoint.starts_with("https://") {
        CheckResult {
            name: "summary-endpoint".to_owned(),
            status: CheckStatus::Pass,
            detail: endpoint.to_owned(),
            required: false,
            remediation: None,
        }
    } else {
        CheckResult {
            name: "summary-endpoint".to_owned(),
            status: CheckStatus::Warn,
            detail: format!("endpoint is not https: {endpoint}"),
            required: false,
            remediation: Some("Use an https summarization endpoint.".to_owned()),
        }
    }
}

fn binary_version(path: &Path) -> Option<String> {
    let output = Command::new(path).arg("--version").output().ok()?;
    let combined = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    parse_version(&combined)
}

fn parse_version(raw: &str) -> Option<String> {
    let pattern = Regex::new(r"(\d+)\.(\d+)(?:\.(\d+))?").ok()?;
    let captures = pattern.captures(raw)?;
    Some(match captures.get(3) {
        Some(patch) => format!("{}.{}.{}", &captures[1], &captures[2], patch.as_str()),
        None => format!("{}.{}", &captures[1], &captures[2]),
    })
}
