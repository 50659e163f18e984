//! Line layouts for rendering events as text

use crate::event::LogEvent;

/// Formats a log event into a single line of text
///
/// Layouts are pure and synchronous; a sink calls the layout once per event
/// and appends the result to storage. The returned line carries no trailing
/// line terminator; the sink adds the platform-appropriate one.
pub trait Layout: Send + Sync {
    /// Render the event as one line
    fn format(&self, event: &LogEvent) -> String;
}

/// Default pipe-separated layout
///
/// Renders `timestamp|LEVEL|sequence|source|message`, with an attached error
/// appended as a final `|error` field when present.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleLineLayout;

impl Layout for SingleLineLayout {
    fn format(&self, event: &LogEvent) -> String {
        let mut line = format!(
            "{}|{}|{}|{}|{}",
            event.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
            event.level,
            event.sequence,
            event.source,
            event.message
        );
        if let Some(error) = &event.error {
            line.push('|');
            line.push_str(error);
        }
        line
    }
}
