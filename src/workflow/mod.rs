pub mod events;

use std::path::{Path, PathBuf};

use chrono::Utc;
use crossbeam_channel::Sender;
use uuid::Uuid;

use crate::config::ModelSize;
use crate::credentials::CredentialStore;
use crate::error::AppResult;
use crate::summarization::{render_prompt, SummaryClient};
use crate::transcription::TranscriptionEngine;
pub use crate::workflow::events::{RunOutcome, RunReport, Stage, WorkflowEvent};

/// Input for a single workflow run, assembled from CLI flags, stored
/// credential and configuration before the run starts. Immutable for the
/// duration of the run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub audio_path: Option<PathBuf>,
    pub model_size: ModelSize,
    pub api_key: String,
    pub prompt_template: String,
}

/// Supplies save destinations when the workflow needs them. Returning `None`
/// skips that save without failing the run; the policy is the same for the
/// transcript and the summary.
pub trait DestinationPicker {
    fn transcript_destination(&mut self) -> Option<PathBuf>;
    fn summary_destination(&mut self) -> Option<PathBuf>;
}

/// Run the full transcribe-then-summarize sequence.
///
/// Every step is gated on the previous one; the first failure aborts the
/// rest of the run and becomes the terminal outcome. Nothing is retried and
/// earlier successful writes are not rolled back. The credential is
/// persisted first, before the audio precondition is checked, so whatever
/// key was entered survives even a cancelled run.
pub fn run_workflow<E, S, P>(
    request: &RunRequest,
    credentials: &CredentialStore,
    engine: &E,
    summarizer: &S,
    picker: &mut P,
    events: &Sender<WorkflowEvent>,
) -> RunReport
where
    E: TranscriptionEngine,
    S: SummaryClient,
    P: DestinationPicker,
{
    let run_id = Uuid::new_v4().to_string();

    if let Err(error) = credentials.save(&request.api_key) {
        return finish(run_id, fail(Stage::CredentialSave, error), None, None);
    }

    let audio_path = match request
        .audio_path
        .as_ref()
        .filter(|path| !path.as_os_str().is_empty())
    {
        Some(path) => path.clone(),
        None => return finish(run_id, RunOutcome::Cancelled, None, None),
    };

    let handle = match stage(events, Stage::ModelLoad, || {
        engine.load_model(request.model_size)
    }) {
        Ok(handle) => handle,
        Err(outcome) => return finish(run_id, outcome, None, None),
    };

    let transcript = match stage(events, Stage::Transcription, || {
        let absolute = std::path::absolute(&audio_path)?;
        engine.transcribe(&handle, &absolute)
    }) {
        Ok(result) => result,
        Err(outcome) => return finish(run_id, outcome, None, None),
    };

    let transcript_path = match picker.transcript_destination() {
        Some(path) => {
            match stage(events, Stage::TranscriptSave, || {
                write_text(&path, &transcript.text)
            }) {
                Ok(()) => Some(path),
                Err(outcome) => return finish(run_id, outcome, None, None),
            }
        }
        None => {
            let _ = events.send(WorkflowEvent::SaveSkipped(Stage::TranscriptSave));
            None
        }
    };

    if request.api_key.is_empty() {
        return finish(
            run_id,
            RunOutcome::Completed { summarized: false },
            transcript_path,
            None,
        );
    }

    let summary = match stage(events, Stage::Summarization, || {
        let prompt = render_prompt(&request.prompt_template, &transcript.text);
        summarizer.summarize(&prompt)
    }) {
        Ok(result) => result,
        Err(outcome) => return finish(run_id, outcome, transcript_path, None),
    };

    let summary_path = match picker.summary_destination() {
        Some(path) => {
            match stage(events, Stage::SummarySave, || {
                write_text(&path, &summary.text)
            }) {
                Ok(()) => Some(path),
                Err(outcome) => return finish(run_id, outcome, transcript_path, None),
            }
        }
        None => {
            let _ = events.send(WorkflowEvent::SaveSkipped(Stage::SummarySave));
            None
        }
    };

    finish(
        run_id,
        RunOutcome::Completed { summarized: true },
        transcript_path,
        summary_path,
    )
}

fn stage<T>(
    events: &Sender<WorkflowEvent>,
    stage: Stage,
    body: impl FnOnce() -> AppResult<T>,
) -> Result<T, RunOutcome> {
    let _ = events.send(WorkflowEvent::StageStarted(stage));
    match body() {
        Ok(value) => {
            let _ = events.send(WorkflowEvent::StageFinished(stage));
            Ok(value)
        }
        Err(error) => Err(fail(stage, error)),
    }
}

fn fail(stage: Stage, error: impl std::fmt::Display) -> RunOutcome {
    RunOutcome::Failed {
        stage,
        message: error.to_string(),
    }
}

// Whole-buffer write: the file is either fully written or the run fails.
fn write_text(path: &Path, text: &str) -> AppResult<()> {
    std::fs::write(path, text)?;
    Ok(())
}

fn finish(
    run_id: String,
    outcome: RunOutcome,
    transcript_path: Option<PathBuf>,
    summary_path: Option<PathBuf>,
) -> RunReport {
    RunReport {
        run_id,
        outcome,
        transcript_path,
        summary_path,
        finished_at_rfc3339: Utc::now().to_rfc3339(),
    }
}
