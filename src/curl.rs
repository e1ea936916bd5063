//! The external request executor boundary: one curl subprocess per request.

use std::process::Command;

use crate::extract;
use crate::types::{PHASE_COUNT, RawTiming, RequestOutcome};

/// curl `-w` variables requested per call, in checkpoint order. `http_code`
/// comes first, then the cumulative timings.
const CURL_VARS: [&str; 7] = [
    "http_code",
    "time_namelookup",
    "time_connect",
    "time_appconnect",
    "time_pretransfer",
    "time_starttransfer",
    "time_total",
];

/// Build the `-w` format string: one `%{var}` per line. The separator is a
/// literal backslash-n, which curl expands to a newline.
fn write_format() -> String {
    CURL_VARS
        .iter()
        .map(|v| format!("%{{{v}}}"))
        .collect::<Vec<String>>()
        .join("\\n")
}

/// Issue one request through curl. Returns a success with extracted metrics,
/// or a failure carrying curl's exit code and its own diagnostic lines.
/// A spawn error (curl not installed) is a failure outcome, not a panic:
/// the loop counts it and moves on.
pub fn invoke(url: &str, extra_args: &[String]) -> RequestOutcome {
    invoke_program("curl", url, extra_args)
}

pub(crate) fn invoke_program(program: &str, url: &str, extra_args: &[String]) -> RequestOutcome {
    let output = match Command::new(program)
        .args(["-sSo", "/dev/null", "-w", &write_format()])
        .args(extra_args)
        .arg(url)
        .output()
    {
        Ok(output) => output,
        Err(err) => {
            return RequestOutcome::Failure {
                exit_code: 127,
                detail: format!("failed to launch {program}: {err}"),
            };
        }
    };

    if !output.status.success() {
        return RequestOutcome::Failure {
            exit_code: output.status.code().unwrap_or(-1),
            detail: diagnostics(&output.stderr),
        };
    }

    match parse_output(&String::from_utf8_lossy(&output.stdout)) {
        Ok(raw) => RequestOutcome::Success(extract::extract_record(&raw)),
        Err(detail) => RequestOutcome::Failure {
            exit_code: 0,
            detail,
        },
    }
}

/// Keep only the stderr lines curl itself emits (those prefixed with its own
/// name); progress noise and anything else is discarded.
fn diagnostics(stderr: &[u8]) -> String {
    String::from_utf8_lossy(stderr)
        .lines()
        .filter(|line| line.starts_with("curl"))
        .collect::<Vec<&str>>()
        .join(", ")
}

/// Parse the `-w` output: the status line followed by six cumulative
/// checkpoints in seconds.
fn parse_output(stdout: &str) -> Result<RawTiming, String> {
    let lines: Vec<&str> = stdout.lines().collect();
    if lines.len() < PHASE_COUNT + 1 {
        return Err(format!(
            "unexpected curl output: expected {} lines, got {}",
            PHASE_COUNT + 1,
            lines.len()
        ));
    }

    let status = lines[0].trim().to_string();
    let mut checkpoints = Vec::with_capacity(PHASE_COUNT);
    for &line in &lines[1..=PHASE_COUNT] {
        match extract::parse_seconds(line) {
            Some(value) => checkpoints.push(value),
            None => return Err(format!("unexpected curl timing value: {line:?}")),
        }
    }

    Ok(RawTiming {
        status,
        checkpoints,
    })
}
