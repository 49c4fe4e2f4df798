#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use localnote::bootstrap::AppPaths;
use localnote::config::{AppConfig, ModelSize, SummarizationConfig, TranscriptionConfig};
use localnote::credentials::CredentialStore;
use localnote::doctor::{run_doctor, DoctorState};
use localnote::error::{AppError, AppResult};
use localnote::summarization::{SummaryClient, SummaryResult};
use localnote::transcription::WhisperCliEngine;
use localnote::workflow::{run_workflow, DestinationPicker, RunOutcome, RunRequest, Stage};

fn paths_for(root: &Path) -> AppPaths {
    AppPaths {
        config_dir: root.join("config"),
        data_dir: root.join("data"),
        cache_dir: root.join("cache"),
        models_dir: root.join("data/models"),
        config_file: root.join("config/config.toml"),
        key_file: root.join("data/api_key.txt"),
    }
}

fn write_fake_whisper(dir: &Path, script_body: &str) -> PathBuf {
    let binary = dir.join("fake-whisper-cli");
    std::fs::write(&binary, format!("#!/bin/sh\n{script_body}\n")).expect("write script");
    let mut perms = std::fs::metadata(&binary).expect("metadata").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&binary, perms).expect("chmod");
    binary
}

fn engine_for(binary: &Path, paths: &AppPaths) -> WhisperCliEngine {
    let config = TranscriptionConfig {
        binary: binary.to_str().expect("utf8 path").to_owned(),
        ..TranscriptionConfig::default()
    };
    WhisperCliEngine::from_config(&config, paths)
}

struct RecordingSummarizer {
    result: Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

impl RecordingSummarizer {
    fn returning(text: &str) -> Self {
        Self {
            result: Ok(text.to_owned()),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

impl SummaryClient for RecordingSummarizer {
    fn summarize(&self, prompt: &str) -> AppResult<SummaryResult> {
        self.prompts
            .lock()
            .expect("lock prompts")
            .push(prompt.to_owned());
        match &self.result {
            Ok(text) => Ok(SummaryResult { text: text.clone() }),
            Err(message) => Err(AppError::Summarization(message.clone())),
        }
    }
}

struct PresetPicker {
    transcript: Option<PathBuf>,
    summary: Option<PathBuf>,
}

impl DestinationPicker for PresetPicker {
    fn transcript_destination(&mut self) -> Option<PathBuf> {
        self.transcript.take()
    }

    fn summary_destination(&mut self) -> Option<PathBuf> {
        self.summary.take()
    }
}

fn request_for(audio: PathBuf, api_key: &str) -> RunRequest {
    RunRequest {
        audio_path: Some(audio),
        model_size: ModelSize::Tiny,
        api_key: api_key.to_owned(),
        prompt_template: SummarizationConfig::default().prompt_template,
    }
}

#[test]
fn full_run_against_a_subprocess_engine_writes_both_files() {
    let temp = tempfile::TempDir::new().expect("tempdir");
    let paths = paths_for(temp.path());
    paths.ensure_dirs().expect("dirs");
    std::fs::write(paths.models_dir.join("ggml-tiny.bin"), b"weights").expect("model");

    let binary = write_fake_whisper(temp.path(), "echo 'hello world'");
    let engine = engine_for(&binary, &paths);
    let summarizer = RecordingSummarizer::returning("Summary.");
    let credentials = CredentialStore::new(paths.key_file.clone());

    let transcript_out = temp.path().join("out.txt");
    let summary_out = temp.path().join("summary.txt");
    let mut picker = PresetPicker {
        transcript: Some(transcript_out.clone()),
        summary: Some(summary_out.clone()),
    };

    let (events_tx, _events_rx) = crossbeam_channel::unbounded();
    let report = run_workflow(
        &request_for(temp.path().join("sample.wav"), "sk-xyz"),
        &credentials,
        &engine,
        &summarizer,
        &mut picker,
        &events_tx,
    );

    assert_eq!(report.outcome, RunOutcome::Completed { summarized: true });
    assert_eq!(
        std::fs::read_to_string(&transcript_out).expect("transcript"),
        "hello world"
    );
    assert_eq!(
        std::fs::read_to_string(&summary_out).expect("summary"),
        "Summary."
    );
    assert_eq!(
        std::fs::read_to_string(&paths.key_file).expect("key"),
        "sk-xyz"
    );
    assert_eq!(
        summarizer.prompts.lock().expect("lock").as_slice(),
        ["Write a summary of the following transcript: \n\nhello world"]
    );
}

#[test]
fn subprocess_failure_becomes_a_transcription_outcome() {
    let temp = tempfile::TempDir::new().expect("tempdir");
    let paths = paths_for(temp.path());
    paths.ensure_dirs().expect("dirs");
    std::fs::write(paths.models_dir.join("ggml-tiny.bin"), b"weights").expect("model");

    let binary = write_fake_whisper(temp.path(), "echo 'failed to open audio' >&2; exit 1");
    let engine = engine_for(&binary, &paths);
    let summarizer = RecordingSummarizer::returning("unused");
    let credentials = CredentialStore::new(paths.key_file.clone());

    let transcript_out = temp.path().join("out.txt");
    let mut picker = PresetPicker {
        transcript: Some(transcript_out.clone()),
        summary: None,
    };

    let (events_tx, _events_rx) = crossbeam_channel::unbounded();
    let report = run_workflow(
        &request_for(temp.path().join("missing.wav"), "sk-xyz"),
        &credentials,
        &engine,
        &summarizer,
        &mut picker,
        &events_tx,
    );

    match &report.outcome {
        RunOutcome::Failed { stage, message } => {
            assert_eq!(*stage, Stage::Transcription);
            assert!(message.contains("failed to open audio"));
        }
        other => panic!("expected transcription failure, got {other:?}"),
    }
    assert!(!transcript_out.exists());
    assert!(summarizer.prompts.lock().expect("lock").is_empty());
}

#[test]
fn missing_model_file_stops_the_run_at_model_load() {
    let temp = tempfile::TempDir::new().expect("tempdir");
    let paths = paths_for(temp.path());
    paths.ensure_dirs().expect("dirs");

    let binary = write_fake_whisper(temp.path(), "echo 'never reached'");
    let engine = engine_for(&binary, &paths);
    let summarizer = RecordingSummarizer::returning("unused");
    let credentials = CredentialStore::new(paths.key_file.clone());
    let mut picker = PresetPicker {
        transcript: Some(temp.path().join("out.txt")),
        summary: None,
    };

    let (events_tx, _events_rx) = crossbeam_channel::unbounded();
    let report = run_workflow(
        &request_for(temp.path().join("sample.wav"), ""),
        &credentials,
        &engine,
        &summarizer,
        &mut picker,
        &events_tx,
    );

    assert!(matches!(
        report.outcome,
        RunOutcome::Failed {
            stage: Stage::ModelLoad,
            ..
        }
    ));
    assert!(!temp.path().join("out.txt").exists());
}

#[test]
fn doctor_reports_unavailable_until_binary_and_model_exist() {
    let temp = tempfile::TempDir::new().expect("tempdir");
    let paths = paths_for(temp.path());
    paths.ensure_dirs().expect("dirs");

    let mut config = AppConfig::default();
    config.transcription.binary = "definitely-not-a-real-whisper-binary".to_owned();

    let report = run_doctor(&paths, &config);
    assert_eq!(report.state, DoctorState::Unavailable);

    let binary = write_fake_whisper(temp.path(), "echo 'whisper-cli version 1.7.2'");
    config.transcription.binary = binary.to_str().expect("utf8 path").to_owned();
    std::fs::write(paths.models_dir.join("ggml-tiny.bin"), b"weights").expect("model");

    let report = run_doctor(&paths, &config);
    assert_ne!(report.state, DoctorState::Unavailable);
    let rendered = report.render_text();
    assert!(rendered.contains("whisper-binary"));
    assert!(rendered.contains("model-file"));
}
