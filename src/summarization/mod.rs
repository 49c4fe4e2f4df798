pub mod client;
pub mod prompt;

pub use client::{GroqClient, SummaryClient, SummaryResult};
pub use prompt::render_prompt;
