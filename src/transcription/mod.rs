pub mod engine;
pub mod whisper_cli;

pub use engine::{ModelHandle, TranscriptResult, TranscriptionEngine};
pub use whisper_cli::WhisperCliEngine;
