use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{CliOverrides, ModelSize};
use crate::runtime::RunArgs;

#[derive(Debug, Parser)]
#[command(name = "localnote")]
#[command(about = "LocalNote audio transcription and summarization utility")]
pub struct Cli {
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub model: Option<ModelSize>,

    #[arg(long)]
    pub language: Option<String>,

    #[arg(long)]
    pub summary_model: Option<String>,

    #[arg(long)]
    pub temperature: Option<f64>,

    #[arg(long)]
    pub max_tokens: Option<u32>,

    #[arg(long)]
    pub top_p: Option<f64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Transcribe an audio file and optionally summarize the transcript.
    Run {
        #[arg(long)]
        audio: Option<PathBuf>,

        /// API key for the summarization endpoint; persisted for later runs.
        #[arg(long)]
        api_key: Option<String>,

        #[arg(long)]
        transcript_out: Option<PathBuf>,

        #[arg(long)]
        summary_out: Option<PathBuf>,

        /// Print the final run report as JSON.
        #[arg(long)]
        json: bool,

        /// Never prompt; unanswered save destinations are skipped.
        #[arg(long)]
        non_interactive: bool,
    },
    Doctor {
        #[arg(long)]
        json: bool,
    },
    Status,
}

impl Cli {
    pub fn to_overrides(&self) -> CliOverrides {
        CliOverrides {
            config_path: self.config.clone(),
            model_size: self.model,
            language: self.language.clone(),
            summary_model_id: self.summary_model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            top_p: self.top_p,
        }
    }
}

impl Command {
    pub fn to_run_args(&self) -> Option<RunArgs> {
        match self {
            Command::Run {
                audio,
                api_key,
                transcript_out,
                summary_out,
                json,
                non_interactive,
            } => Some(RunArgs {
                audio: audio.clone(),
                api_key: api_key.clone(),
                transcript_out: transcript_out.clone(),
                summary_out: summary_out.clone(),
                json: *json,
                non_interactive: *non_interactive,
            }),
            _ => None,
        }
    }
}
