//! The sequential request loop: one curl call at a time, a pause in between,
//! until the request budget runs out or an interrupt drains the run.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crate::render::{self, ColumnSpec};
use crate::samples::SampleStore;
use crate::types::RequestOutcome;

/// What the loop prints while it runs. Live mode emits one table row per
/// request; progress mode keeps an overwritten one-line counter; quiet mode
/// (JSON report) emits nothing until the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopOutput {
    Live,
    Progress,
    Quiet,
}

pub struct RunOptions {
    /// Stop after this many requests; `None` runs until interrupted.
    pub number: Option<u64>,
    pub output: LoopOutput,
    /// Pause between consecutive requests.
    pub sleep: Duration,
}

pub struct RunSummary {
    pub requests: u64,
    pub failures: u64,
    pub total_secs: f64,
    pub store: SampleStore,
}

/// Drive the loop. `execute` issues one request and blocks until it
/// completes; the executor is injected so the loop can be exercised without
/// a real curl. Counters are threaded through explicitly rather than
/// captured by output closures.
///
/// An interrupt observed at any checkpoint drains the loop; samples already
/// appended stay in the store. A failure outcome that arrives while the flag
/// is set is discarded, since the signal also killed the in-flight curl.
pub fn run_requests<E>(
    options: &RunOptions,
    columns: &[ColumnSpec],
    interrupted: &AtomicBool,
    mut execute: E,
) -> RunSummary
where
    E: FnMut() -> RequestOutcome,
{
    let mut store = SampleStore::new();
    let mut requests: u64 = 0;
    let mut failures: u64 = 0;
    let mut total_secs = 0.0;

    while options.number.is_none_or(|n| requests < n) {
        if interrupted.load(Ordering::SeqCst) {
            break;
        }

        match execute() {
            RequestOutcome::Success(record) => {
                if options.output == LoopOutput::Live {
                    let cells = render::sample_cells(columns, &record.status, &record.metrics);
                    println!("{}", render::render_row(columns, &cells, false));
                }
                total_secs += record.total_secs;
                store.append(record.metrics);
            }
            RequestOutcome::Failure { exit_code, detail } => {
                if interrupted.load(Ordering::SeqCst) {
                    break;
                }
                if options.output != LoopOutput::Quiet {
                    println!("FAIL ({exit_code}): {detail}");
                }
                failures += 1;
            }
        }
        requests += 1;

        if options.output == LoopOutput::Progress {
            print!("{}\r", progress_line(requests, options.number, failures));
        }
        let _ = io::stdout().flush();

        if interrupted.load(Ordering::SeqCst) {
            break;
        }
        thread::sleep(options.sleep);
    }

    RunSummary {
        requests,
        failures,
        total_secs,
        store,
    }
}

/// `Request [  3/100], failures 1` — the issued count right-justified to the
/// width of the budget, or bare when the run is unlimited.
fn progress_line(requests: u64, number: Option<u64>, failures: u64) -> String {
    let tag = match number {
        Some(n) => {
            let pending = n.to_string();
            format!("{:>width$}/{}", requests, pending, width = pending.len())
        }
        None => requests.to_string(),
    };
    format!("Request [{tag}], failures {failures}")
}
