//! Per-column aggregate statistics over the sample store.

use crate::errors::CurlbenchError;
use crate::samples::SampleStore;

/// Which statistic a row carries. The renderer keys presentation off this:
/// the mean row is bold, the deviation row is rendered as a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateKind {
    Min,
    Mean,
    Median,
    Max,
    Deviation,
}

/// One row of the final report: a label plus one statistic per phase column.
#[derive(Debug, Clone)]
pub struct AggregateRow {
    pub label: &'static str,
    pub kind: AggregateKind,
    pub values: Vec<f64>,
}

/// Compute the five aggregate rows, always in the order
/// min, avg, med, max, dev. Errors on an empty store.
pub fn aggregate(store: &SampleStore) -> Result<Vec<AggregateRow>, CurlbenchError> {
    if store.is_empty() {
        return Err(CurlbenchError::NoSamples);
    }

    let width = store.all().iter().map(Vec::len).min().unwrap_or(0);

    let rows = [
        ("min:", AggregateKind::Min),
        ("avg:", AggregateKind::Mean),
        ("med:", AggregateKind::Median),
        ("max:", AggregateKind::Max),
        ("dev:", AggregateKind::Deviation),
    ];

    Ok(rows
        .into_iter()
        .map(|(label, kind)| {
            let values = (0..width)
                .map(|col| {
                    let column: Vec<u64> =
                        store.all().iter().map(|sample| sample[col]).collect();
                    column_statistic(&column, kind)
                })
                .collect();
            AggregateRow {
                label,
                kind,
                values,
            }
        })
        .collect())
}

fn column_statistic(values: &[u64], kind: AggregateKind) -> f64 {
    match kind {
        AggregateKind::Min => values.iter().copied().min().unwrap_or(0) as f64,
        AggregateKind::Max => values.iter().copied().max().unwrap_or(0) as f64,
        AggregateKind::Mean => mean(values),
        AggregateKind::Median => median(values),
        AggregateKind::Deviation => relative_deviation(values),
    }
}

fn mean(values: &[u64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<u64>() as f64 / values.len() as f64
}

/// Lower median: the value at index `len / 2` of the sorted column.
/// Not interpolated for even counts.
fn median(values: &[u64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    sorted[sorted.len() / 2] as f64
}

/// Root-mean-square deviation from the mean, normalized by the mean.
/// A zero mean divides by 1 instead, so an all-zero column reports 0.
fn relative_deviation(values: &[u64]) -> f64 {
    let avg = mean(values);
    let rms = (values
        .iter()
        .map(|&v| (v as f64 - avg).powi(2))
        .sum::<f64>()
        / values.len() as f64)
        .sqrt();
    let divisor = if avg == 0.0 { 1.0 } else { avg };
    rms / divisor
}
