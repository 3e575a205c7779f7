//! Structured logging setup.
//!
//! Filter precedence: explicit directive, then `RUST_LOG`, then
//! [`DEFAULT_LOG_FILTER`]. Output goes to stderr so it never interleaves with
//! transcript text on stdout.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_FILTER: &str = "info";

const PREVIEW_CHARS: usize = 50;

/// Installs the global fmt subscriber.
///
/// Returns `false` when a subscriber was already installed; repeated calls are
/// harmless.
pub fn init_tracing(directive: Option<&str>) -> bool {
    let filter = directive
        .filter(|value| !value.trim().is_empty())
        .map(EnvFilter::new)
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}

/// Shortens candidate or interviewer text for log lines.
pub fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_keeps_short_text_and_truncates_long_text_on_char_boundaries() {
        assert_eq!(preview("short answer"), "short answer");

        let long = "答".repeat(60);
        let shortened = preview(&long);
        assert!(shortened.ends_with("..."));
        assert_eq!(shortened.chars().count(), PREVIEW_CHARS + 3);
    }

    #[test]
    fn second_init_reports_existing_subscriber() {
        let _ = init_tracing(Some("warn"));
        assert!(!init_tracing(None));
    }
}
