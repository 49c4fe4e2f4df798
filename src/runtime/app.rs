use std::path::PathBuf;
use std::thread;

use crossbeam_channel::select;

use crate::bootstrap::AppPaths;
use crate::config::AppConfig;
use crate::credentials::CredentialStore;
use crate::error::{AppError, AppResult};
use crate::summarization::{GroqClient, SummaryClient};
use crate::transcription::{TranscriptionEngine, WhisperCliEngine};
use crate::ui::{ConsolePicker, Notifier};
use crate::workflow::{
    run_workflow, DestinationPicker, RunOutcome, RunReport, RunRequest, Stage, WorkflowEvent,
};

#[derive(Debug, Clone, Default)]
pub struct RunArgs {
    pub audio: Option<PathBuf>,
    pub api_key: Option<String>,
    pub transcript_out: Option<PathBuf>,
    pub summary_out: Option<PathBuf>,
    pub json: bool,
    pub non_interactive: bool,
}

/// Execute one workflow run: the workflow itself runs on a named worker
/// thread while this thread renders progress events, so the front end stays
/// responsive during model load, transcription and the summarization call.
pub fn run_app(config: AppConfig, paths: AppPaths, args: RunArgs) -> AppResult<()> {
    paths.ensure_dirs()?;

    let credentials = CredentialStore::new(paths.key_file.clone());
    let api_key = match args.api_key {
        Some(key) => key,
        // no flag given: reuse the stored key, mirroring a prefilled field
        None => credentials.load()?,
    };

    let request = RunRequest {
        audio_path: args.audio,
        model_size: config.transcription.model_size,
        api_key: api_key.clone(),
        prompt_template: config.summarization.prompt_template.clone(),
    };

    let engine = WhisperCliEngine::from_config(&config.transcription, &paths);
    let summarizer = GroqClient::new(api_key, &config.summarization);
    let picker = ConsolePicker::new(args.transcript_out, args.summary_out, !args.non_interactive);
    let notifier = Notifier::new(config.output.enable_notifications);

    run_app_with(
        request,
        credentials,
        engine,
        summarizer,
        picker,
        notifier,
        args.json,
    )
}

fn run_app_with<E, S, P>(
    request: RunRequest,
    credentials: CredentialStore,
    engine: E,
    summarizer: S,
    mut picker: P,
    notifier: Notifier,
    json: bool,
) -> AppResult<()>
where
    E: TranscriptionEngine + Send + 'static,
    S: SummaryClient + Send + 'static,
    P: DestinationPicker + Send + 'static,
{
    let (event_tx, event_rx) = crossbeam_channel::unbounded::<WorkflowEvent>();
    let (report_tx, report_rx) = crossbeam_channel::bounded::<RunReport>(1);

    let worker = thread::Builder::new()
        .name("localnote-workflow".to_owned())
        .spawn(move || {
            let report = run_workflow(
                &request,
                &credentials,
                &engine,
                &summarizer,
                &mut picker,
                &event_tx,
            );
            let _ = report_tx.send(report);
        })
        .map_err(|error| AppError::Workflow(format!("failed to spawn workflow worker: {error}")))?;

    let mut events_open = true;
    let report = loop {
        if events_open {
            select! {
                recv(event_rx) -> event => match event {
                    Ok(event) => render_event(&event),
                    Err(_) => events_open = false,
                },
                recv(report_rx) -> report => match report {
                    Ok(report) => break report,
                    Err(_) => {
                        let _ = worker.join();
                        return Err(AppError::Workflow(
                            "workflow worker exited without a report".to_owned(),
                        ));
                    }
                },
            }
        } else {
            match report_rx.recv() {
                Ok(report) => break report,
                Err(_) => {
                    let _ = worker.join();
                    return Err(AppError::Workflow(
                        "workflow worker exited without a report".to_owned(),
                    ));
                }
            }
        }
    };

    worker
        .join()
        .map_err(|_| AppError::Workflow("workflow worker panicked".to_owned()))?;

    // drain any progress events that raced the final report
    for event in event_rx.try_iter() {
        render_event(&event);
    }

    let line = report.summary_line();
    match &report.outcome {
        RunOutcome::Completed { .. } => {
            tracing::info!(run_id = %report.run_id, "{line}");
            notifier.success(&line);
        }
        RunOutcome::Cancelled => tracing::warn!("{line}"),
        RunOutcome::Failed { .. } => {
            tracing::error!(run_id = %report.run_id, "{line}");
            notifier.failure(&line);
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{line}");
    }

    match report.outcome {
        RunOutcome::Failed { stage, message } => {
            Err(AppError::Workflow(format!("{stage}: {message}")))
        }
        _ => Ok(()),
    }
}

fn render_event(event: &WorkflowEvent) {
    match event {
        WorkflowEvent::StageStarted(stage) => tracing::info!("{}", stage_banner(*stage)),
        WorkflowEvent::StageFinished(stage) => tracing::debug!("{stage} finished"),
        WorkflowEvent::SaveSkipped(stage) => {
            tracing::info!("{stage} skipped; no destination chosen");
        }
    }
}

fn stage_banner(stage: Stage) -> &'static str {
    match stage {
        Stage::CredentialSave => "saving API key...",
        Stage::ModelLoad => "loading whisper model...",
        Stage::Transcription => "transcribing audio...",
        Stage::TranscriptSave => "saving transcript...",
        Stage::Summarization => "generating summary...",
        Stage::SummarySave => "saving summary...",
    }
}

pub fn status_report(config: &AppConfig, paths: &AppPaths) -> AppResult<String> {
    let credentials = CredentialStore::new(paths.key_file.clone());
    let key_stored = !credentials.load()?.is_empty();

    let binary = &config.transcription.binary;
    let binary_status = match which::which(binary) {
        Ok(path) => path.display().to_string(),
        Err(_) => {
            let candidate = std::path::Path::new(binary);
            if candidate.components().count() > 1 && candidate.is_file() {
                candidate.display().to_string()
            } else {
                format!("{binary} (not found)")
            }
        }
    };

    let models_dir = config
        .transcription
        .models_dir
        .clone()
        .unwrap_or_else(|| paths.models_dir.clone());
    let size = config.transcription.model_size;
    let model_path = models_dir.join(size.ggml_file_name());
    let model_status = if model_path.is_file() {
        "present"
    } else {
        "missing"
    };

    let mut output = String::new();
    output.push_str("LocalNote status\n");
    output.push_str(&format!("  config: {}\n", paths.config_file.display()));
    output.push_str(&format!("  whisper_binary: {binary_status}\n"));
    output.push_str(&format!(
        "  model: {} ({} {model_status})\n",
        size.as_str(),
        model_path.display()
    ));
    output.push_str(&format!(
        "  api_key: {}\n",
        if key_stored { "stored" } else { "not stored" }
    ));
    output.push_str(&format!(
        "  summary_model: {}\n",
        config.summarization.model_id
    ));

    Ok(output)
}
