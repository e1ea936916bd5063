//! Converts curl's cumulative timing checkpoints into per-phase deltas.

use crate::types::{MetricRecord, RawTiming};

/// Parse a curl timing value: a decimal number of seconds. curl emits either
/// `.` or `,` as the decimal separator depending on the process locale, so
/// both are accepted.
pub fn parse_seconds(s: &str) -> Option<f64> {
    let normalized = s.trim().replace(',', ".");
    let value: f64 = normalized.parse().ok()?;
    if value.is_finite() && value >= 0.0 {
        Some(value)
    } else {
        None
    }
}

/// Turn cumulative checkpoints (seconds, non-decreasing, measured from
/// request start) into per-phase deltas in integer milliseconds.
///
/// Each checkpoint is rounded to the nearest millisecond *before* the
/// subtraction, so the deltas always sum to the rounded final checkpoint.
/// A checkpoint that did not advance (e.g. the TLS handshake on a plaintext
/// connection) yields a raw zero delta.
pub fn phase_deltas(checkpoints: &[f64]) -> Vec<u64> {
    let mut deltas = Vec::with_capacity(checkpoints.len());
    let mut last_ms: i64 = 0;
    for &checkpoint in checkpoints {
        let cumulative_ms = (checkpoint * 1000.0).round() as i64;
        deltas.push((cumulative_ms - last_ms).max(0) as u64);
        last_ms = cumulative_ms;
    }
    deltas
}

/// Build a metric record from one completed call. The total is the last
/// cumulative checkpoint, kept in seconds for the end-of-run summary.
pub fn extract_record(raw: &RawTiming) -> MetricRecord {
    MetricRecord {
        status: raw.status.clone(),
        metrics: phase_deltas(&raw.checkpoints),
        total_secs: raw.checkpoints.last().copied().unwrap_or(0.0),
    }
}
