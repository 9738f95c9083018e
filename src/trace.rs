//! Sinks for teardown diagnostics.

/// Receives human-readable diagnostic lines.
pub trait TraceSink {
    fn trace(&mut self, message: &str);
}

impl<F: FnMut(&str)> TraceSink for F {
    fn trace(&mut self, message: &str) {
        self(message)
    }
}

/// Forwards messages to `tracing` at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn trace(&mut self, message: &str) {
        tracing::info!(target: "offtree", "{message}");
    }
}
