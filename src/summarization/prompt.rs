pub const TRANSCRIPT_PLACEHOLDER: &str = "{transcript}";

/// Render the summarization prompt from the configured template.
///
/// Templates without the placeholder get the transcript appended, so a
/// misconfigured template still sends the transcript rather than a prompt
/// about nothing.
pub fn render_prompt(template: &str, transcript: &str) -> String {
    if template.contains(TRANSCRIPT_PLACEHOLDER) {
        template.replace(TRANSCRIPT_PLACEHOLDER, transcript)
    } else {
        format!("{template}{transcript}")
    }
}
