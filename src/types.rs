/// Raw output of one completed curl call, before delta extraction:
/// HTTP status text plus the six cumulative timing checkpoints in seconds
/// (namelookup, connect, appconnect, pretransfer, starttransfer, total).
#[derive(Debug, Clone)]
pub struct RawTiming {
    pub status: String,
    pub checkpoints: Vec<f64>,
}

/// One successful request after extraction: per-phase deltas in integer
/// milliseconds plus the total wall time reported by curl.
#[derive(Debug, Clone)]
pub struct MetricRecord {
    pub status: String,
    pub metrics: Vec<u64>,
    pub total_secs: f64,
}

/// Result of one scheduled request. Failures carry curl's exit code and the
/// diagnostic lines it printed about itself; they are tallied but never
/// stored as samples.
#[derive(Debug, Clone)]
pub enum RequestOutcome {
    Success(MetricRecord),
    Failure { exit_code: i32, detail: String },
}

/// Names of the measured phases, in column order. Used by the JSON report;
/// the table heading carries its own two-line display labels.
pub const PHASE_NAMES: [&str; 6] = [
    "dns_lookup",
    "tcp_connect",
    "tls_handshake",
    "request_sent",
    "ttfb",
    "content_download",
];

/// Number of timing checkpoints requested from curl per call.
pub const PHASE_COUNT: usize = PHASE_NAMES.len();
