//! Parse event log.
//!
//! Every notable parsing event goes two ways: to the caller's log sink, in
//! document order, and to `tracing`.

/// Wraps the caller-supplied log sink.
pub struct ParseLog<'a> {
    sink: &'a mut dyn FnMut(&str),
}

impl<'a> ParseLog<'a> {
    /// Create a log forwarding to `sink`.
    pub fn new(sink: &'a mut dyn FnMut(&str)) -> Self {
        Self { sink }
    }

    /// Record a parsing event.
    pub fn event(&mut self, message: impl AsRef<str>) {
        let message = message.as_ref();
        tracing::debug!("{message}");
        (self.sink)(message);
    }

    /// Record a soft warning. Processing continues.
    pub fn warn(&mut self, message: impl AsRef<str>) {
        let message = message.as_ref();
        tracing::warn!("{message}");
        (self.sink)(&format!("warning: {message}"));
    }
}
