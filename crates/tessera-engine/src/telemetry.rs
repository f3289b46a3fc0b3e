//! Best-effort product telemetry

use serde_json::Value;

/// Receives named usage events
///
/// Calls are fire-and-forget: implementations must not block and must
/// swallow their own failures.
pub trait Telemetry: Send + Sync {
    fn capture(&self, event: &str, payload: Option<Value>);
}

/// Emits telemetry events as `tracing` debug events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTelemetry;

impl Telemetry for TracingTelemetry {
    fn capture(&self, event: &str, payload: Option<Value>) {
        match payload {
            Some(payload) => tracing::debug!(target: "tessera::telemetry", event, %payload, "capture"),
            None => tracing::debug!(target: "tessera::telemetry", event, "capture"),
        }
    }
}

/// Drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTelemetry;

impl Telemetry for NoopTelemetry {
    fn capture(&self, _event: &str, _payload: Option<Value>) {}
}
