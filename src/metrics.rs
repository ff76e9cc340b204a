//! Prometheus metrics collection for chatrelay.
//!
//! Metrics are registered once by [`init`]; every recording helper is a
//! no-op until then.
//!
//! - `chat_events_total{event}` - Inbound events processed by type
//! - `chat_event_duration_seconds{event}` - Event handling latency
//! - `chat_event_errors_total{event,error}` - Rejected events
//! - `chat_commands_total{command}` - Chat lines by command kind
//! - `chat_message_fanout` - Recipients per broadcast

use prometheus::{
    Encoder, Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts,
    Registry, TextEncoder,
};
use std::sync::OnceLock;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

// ========================================================================
// Counters
// ========================================================================

/// Frames written to clients.
pub static MESSAGES_SENT: OnceLock<IntCounter> = OnceLock::new();

/// Recipients dropped because their outbound queue was full.
pub static MESSAGES_DROPPED: OnceLock<IntCounter> = OnceLock::new();

/// Inbound frames that failed to decode.
pub static FRAMES_REJECTED: OnceLock<IntCounterVec> = OnceLock::new();

// ========================================================================
// Gauges
// ========================================================================

/// Joined users (the registry count).
pub static CONNECTED_USERS: OnceLock<IntGauge> = OnceLock::new();

/// Attached WebSocket connections, joined or not.
pub static OPEN_CONNECTIONS: OnceLock<IntGauge> = OnceLock::new();

// ========================================================================
// Event metrics
// ========================================================================

pub static EVENT_COUNTER: OnceLock<IntCounterVec> = OnceLock::new();

pub static EVENT_LATENCY: OnceLock<HistogramVec> = OnceLock::new();

pub static EVENT_ERRORS: OnceLock<IntCounterVec> = OnceLock::new();

pub static CHAT_COMMANDS: OnceLock<IntCounterVec> = OnceLock::new();

pub static MESSAGE_FANOUT: OnceLock<Histogram> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Must be called once at startup before metrics are served.
pub fn init() {
    let r = registry();

    macro_rules! register {
        ($metric:ident, $init:expr) => {
            let m = $init.expect(concat!(stringify!($metric), " creation failed"));
            if let Err(e) = r.register(Box::new(m.clone())) {
                tracing::warn!(error = %e, concat!("Failed to register metric ", stringify!($metric)));
            }
            let _ = $metric.set(m);
        };
    }

    register!(MESSAGES_SENT, IntCounter::new("chat_messages_sent_total", "Frames written to clients"));
    register!(MESSAGES_DROPPED, IntCounter::new("chat_messages_dropped_total", "Recipients dropped due to backpressure"));
    register!(FRAMES_REJECTED, IntCounterVec::new(Opts::new("chat_frames_rejected_total", "Inbound frames that failed to decode"), &["error"]));
    register!(CONNECTED_USERS, IntGauge::new("chat_connected_users", "Joined users"));
    register!(OPEN_CONNECTIONS, IntGauge::new("chat_open_connections", "Attached WebSocket connections"));

    register!(EVENT_COUNTER, IntCounterVec::new(Opts::new("chat_events_total", "Inbound events processed by type"), &["event"]));
    register!(EVENT_LATENCY, HistogramVec::new(
        HistogramOpts::new("chat_event_duration_seconds", "Inbound event latency by type")
            .buckets(vec![0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05]),
        &["event"]));
    register!(EVENT_ERRORS, IntCounterVec::new(Opts::new("chat_event_errors_total", "Rejected inbound events"), &["event", "error"]));
    register!(CHAT_COMMANDS, IntCounterVec::new(Opts::new("chat_commands_total", "Chat lines by command kind"), &["command"]));
    register!(MESSAGE_FANOUT, Histogram::with_opts(
        HistogramOpts::new("chat_message_fanout", "Recipients per broadcast")
            .buckets(vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 1000.0])));
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

// ============================================================================
// Recording helpers
// ============================================================================

/// Record an inbound event with latency.
#[inline]
pub fn record_event(event: &str, duration_secs: f64) {
    if let Some(c) = EVENT_COUNTER.get() {
        c.with_label_values(&[event]).inc();
    }
    if let Some(h) = EVENT_LATENCY.get() {
        h.with_label_values(&[event]).observe(duration_secs);
    }
}

/// Record a rejected inbound event.
#[inline]
pub fn record_event_error(event: &str, error: &str) {
    if let Some(c) = EVENT_ERRORS.get() {
        c.with_label_values(&[event, error]).inc();
    }
}

/// Record a frame that failed to decode.
#[inline]
pub fn record_frame_rejected(error: &str) {
    if let Some(c) = FRAMES_REJECTED.get() {
        c.with_label_values(&[error]).inc();
    }
}

/// Record an interpreted chat line.
#[inline]
pub fn record_chat_command(command: &str) {
    if let Some(c) = CHAT_COMMANDS.get() {
        c.with_label_values(&[command]).inc();
    }
}

/// Record how many recipients a broadcast reached.
#[inline]
pub fn record_fanout(recipients: usize) {
    if let Some(h) = MESSAGE_FANOUT.get() {
        h.observe(recipients as f64);
    }
}

#[inline]
pub fn record_message_sent() {
    if let Some(c) = MESSAGES_SENT.get() {
        c.inc();
    }
}

#[inline]
pub fn record_message_dropped() {
    if let Some(c) = MESSAGES_DROPPED.get() {
        c.inc();
    }
}

#[inline]
pub fn set_connected_users(count: usize) {
    if let Some(g) = CONNECTED_USERS.get() {
        g.set(count as i64);
    }
}

#[inline]
pub fn connection_opened() {
    if let Some(g) = OPEN_CONNECTIONS.get() {
        g.inc();
    }
}

#[inline]
pub fn connection_closed() {
    if let Some(g) = OPEN_CONNECTIONS.get() {
        g.dec();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_lifecycle() {
        init();

        record_event("new-message", 0.001);
        record_chat_command("flipcoin");
        set_connected_users(3);

        let output = gather_metrics();
        assert!(output.contains("chat_events_total"));
        assert!(output.contains("chat_commands_total"));
        assert!(output.contains("chat_connected_users"));
    }
}
