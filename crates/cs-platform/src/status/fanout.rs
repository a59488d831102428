use std::sync::Arc;

use cs_core::{ConnectionStatus, StatusSinkPort};

/// Forwards every transition to each inner sink, in order.
#[derive(Default, Clone)]
pub struct FanoutStatusSink {
    sinks: Vec<Arc<dyn StatusSinkPort>>,
}

impl FanoutStatusSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn StatusSinkPort>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl StatusSinkPort for FanoutStatusSink {
    fn on_status_change(&self, status: ConnectionStatus, detail: &str) {
        for sink in &self.sinks {
            sink.on_status_change(status, detail);
        }
    }
}
