use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::workflow::DestinationPicker;

/// CLI front end for save destinations: flags pre-answer the prompts, and in
/// interactive mode a blank line skips the save.
pub struct ConsolePicker {
    transcript_out: Option<PathBuf>,
    summary_out: Option<PathBuf>,
    interactive: bool,
}

impl ConsolePicker {
    pub fn new(
        transcript_out: Option<PathBuf>,
        summary_out: Option<PathBuf>,
        interactive: bool,
    ) -> Self {
        Self {
            transcript_out,
            summary_out,
            interactive,
        }
    }

    fn ask(&self, prompt: &str) -> Option<PathBuf> {
        if !self.interactive {
            return None;
        }

        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();
        prompt_path(&mut stdin.lock(), &mut stdout, prompt)
    }
}

impl DestinationPicker for ConsolePicker {
    fn transcript_destination(&mut self) -> Option<PathBuf> {
        if let Some(path) = self.transcript_out.take() {
            return Some(path);
        }
        self.ask("Save transcript as (blank to skip): ")
    }

    fn summary_destination(&mut self) -> Option<PathBuf> {
        if let Some(path) = self.summary_out.take() {
            return Some(path);
        }
        self.ask("Save summary as (blank to skip): ")
    }
}

fn prompt_path(
    reader: &mut impl BufRead,
    writer: &mut impl Write,
    prompt: &str,
) -> Option<PathBuf> {
    if write!(writer, "{prompt}").and_then(|()| writer.flush()).is_err() {
        return None;
    }

    let mut line = String::new();
    match reader.read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(PathBuf::from(trimmed))
            }
        }
    }
}
