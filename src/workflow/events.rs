use std::path::PathBuf;

use serde::Serialize;

/// Workflow stages that can fail terminally. Names follow the user-facing
/// failure labels ("model-load", "transcript-save", ...).
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    CredentialSave,
    ModelLoad,
    Transcription,
    TranscriptSave,
    Summarization,
    SummarySave,
}

impl Stage {
    pub fn label(&self) -> &'static str {
        match self {
            Stage::CredentialSave => "credential-save",
            Stage::ModelLoad => "model-load",
            Stage::Transcription => "transcription",
            Stage::TranscriptSave => "transcript-save",
            Stage::Summarization => "summarization",
            Stage::SummarySave => "summary-save",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Terminal state of one workflow execution. Never persisted, only reported.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum RunOutcome {
    Completed { summarized: bool },
    Cancelled,
    Failed { stage: Stage, message: String },
}

/// Progress events emitted while the workflow runs on its worker thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowEvent {
    StageStarted(Stage),
    StageFinished(Stage),
    SaveSkipped(Stage),
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RunReport {
    pub run_id: String,
    pub outcome: RunOutcome,
    pub transcript_path: Option<PathBuf>,
    pub summary_path: Option<PathBuf>,
    pub finished_at_rfc3339: String,
}

impl RunReport {
    pub fn summary_line(&self) -> String {
        match &self.outcome {
            RunOutcome::Completed { summarized: true } => {
                "Transcription has been completed and summary generated.".to_owned()
            }
            RunOutcome::Completed { summarized: false } => {
                "Transcription has been completed.".to_owned()
            }
            RunOutcome::Cancelled => "No audio file selected; nothing to do.".to_owned(),
            RunOutcome::Failed { stage, message } => format!("{stage} failed: {message}"),
        }
    }
}
