use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use curlbench::curl;
use curlbench::errors::CurlbenchError;
use curlbench::render;
use curlbench::run::{self, LoopOutput, RunOptions};
use curlbench::stats::{self, AggregateKind};

#[derive(Parser)]
#[command(
    name = "curlbench",
    version,
    about = "Benchmark HTTP request timings by sampling curl repeatedly",
    after_help = "Extra curl options go before the URL, after `--`:\n  curlbench -n 20 -- --http2 --compressed https://example.com/"
)]
struct Cli {
    /// Exit after N requests (default: unlimited)
    #[arg(short, long)]
    number: Option<u64>,

    /// Only print the final report, with a one-line progress indicator
    #[arg(short, long)]
    report: bool,

    /// How much to sleep between requests, in seconds
    #[arg(short, long, default_value_t = 0.3, allow_negative_numbers = true)]
    sleep: f64,

    /// Emit the final report as JSON
    #[arg(long)]
    json: bool,

    /// Target URL, optionally preceded by pass-through curl arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    args: Vec<String>,
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if !cli.sleep.is_finite() || cli.sleep < 0.0 {
        return Err(CurlbenchError::InvalidSleep { value: cli.sleep }.into());
    }

    let mut curl_args = cli.args;
    let url = curl_args.pop().ok_or(CurlbenchError::UrlMissing)?;

    let columns = render::table_columns();

    let output = if cli.json {
        LoopOutput::Quiet
    } else if cli.report {
        LoopOutput::Progress
    } else {
        println!("{}", render::render_heading(&columns));
        LoopOutput::Live
    };

    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let flag = Arc::clone(&interrupted);
        ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
            .context("failed to install the interrupt handler")?;
    }

    let options = RunOptions {
        number: cli.number,
        output,
        sleep: Duration::from_secs_f64(cli.sleep),
    };

    let summary = run::run_requests(&options, &columns, &interrupted, || {
        curl::invoke(&url, &curl_args)
    });

    if summary.store.is_empty() {
        return Err(CurlbenchError::NoSamples.into());
    }

    let rows = stats::aggregate(&summary.store)?;

    if cli.json {
        println!(
            "{}",
            render::format_json(
                &summary.store,
                &rows,
                summary.requests,
                summary.failures,
                summary.total_secs,
            )
        );
        return Ok(());
    }

    // Live mode already printed the heading before the first row.
    if output == LoopOutput::Progress {
        println!("{}", render::render_heading(&columns));
    }
    for row in &rows {
        let cells = render::aggregate_cells(&columns, row);
        println!(
            "{}",
            render::render_row(&columns, &cells, row.kind == AggregateKind::Mean)
        );
    }

    let width = render::row_width(&columns);
    let counts = format!(
        "requests: {}    samples: {}    failures: {}",
        summary.requests,
        summary.store.count(),
        summary.failures
    );
    println!("{}", render::center(&counts, width));
    let elapsed = format!("Total time: {:.2} seconds", summary.total_secs);
    println!("{}", render::center(&elapsed, width));
    println!();

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{}", err);
        let code = match err.downcast_ref::<CurlbenchError>() {
            Some(CurlbenchError::UrlMissing) => 2,
            _ => 1,
        };
        process::exit(code);
    }
}
