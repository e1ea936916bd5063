//! Aligned, truncated, optionally colorized table output.
//!
//! All ANSI escape emission happens through `paint` and `embolden`, guarded
//! by `if_supports_color` so piped output and `NO_COLOR` runs stay clean.

use owo_colors::{AnsiColors, DynColors, OwoColorize, Stream};
use serde::Serialize;

use crate::samples::SampleStore;
use crate::stats::{AggregateKind, AggregateRow};
use crate::types::PHASE_NAMES;

/// Two-space separator between columns.
const COLSPACING: &str = "  ";

/// Floor for phase column widths, regardless of label length.
const MIN_PHASE_WIDTH: usize = 5;

/// Replacement for a numeric rendering that will not fit its column.
const BIG_FALLBACK: &str = "BIG";

/// Static configuration for one displayed column. `metric` indexes into a
/// sample's metric vector; `None` marks the leading status/label column.
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub label: &'static str,
    pub min_width: usize,
    pub color: Option<DynColors>,
    pub metric: Option<usize>,
}

impl ColumnSpec {
    /// Display width: the longest line of the (possibly multi-line) label,
    /// floored at `min_width`.
    pub fn width(&self) -> usize {
        self.label
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0)
            .max(self.min_width)
    }
}

/// The fixed column layout: a 9-wide uncolored "Code" column followed by the
/// six timing phases.
pub fn table_columns() -> Vec<ColumnSpec> {
    let phases: [(&str, DynColors); 6] = [
        ("DNS\nlookup", DynColors::Ansi(AnsiColors::Cyan)),
        ("TCP\nconnect", DynColors::Ansi(AnsiColors::Yellow)),
        ("SSL\nhandshake", DynColors::Ansi(AnsiColors::Magenta)),
        ("Request\nsent", DynColors::Ansi(AnsiColors::Blue)),
        ("TTFB", DynColors::Ansi(AnsiColors::Green)),
        ("Content\ndownload", DynColors::Ansi(AnsiColors::Blue)),
    ];

    let mut columns = vec![ColumnSpec {
        label: "Code",
        min_width: 9,
        color: None,
        metric: None,
    }];
    columns.extend(phases.into_iter().enumerate().map(|(i, (label, color))| {
        ColumnSpec {
            label,
            min_width: MIN_PHASE_WIDTH,
            color: Some(color),
            metric: Some(i),
        }
    }));
    columns
}

/// Total rendered width of a row: column widths plus separators.
pub fn row_width(columns: &[ColumnSpec]) -> usize {
    let widths: usize = columns.iter().map(ColumnSpec::width).sum();
    widths + COLSPACING.len() * columns.len().saturating_sub(1)
}

/// Truncate to `width` characters, replacing the last kept character with an
/// ellipsis when truncation occurs.
pub fn ellipsize(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{kept}\u{2026}")
}

/// Fixed-point milliseconds with one decimal place, or `BIG` when the
/// rendering would overflow the column.
pub fn format_ms(ms: f64, width: usize) -> String {
    let text = format!("{ms:.1}");
    if text.chars().count() > width {
        BIG_FALLBACK.to_string()
    } else {
        text
    }
}

/// Relative deviation as a percentage with one decimal place.
pub fn format_percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

fn paint(text: &str, color: Option<DynColors>) -> String {
    match color {
        Some(color) => text
            .if_supports_color(Stream::Stdout, |s| s.color(color))
            .to_string(),
        None => text.to_string(),
    }
}

fn embolden(text: &str) -> String {
    text.if_supports_color(Stream::Stdout, |s| s.bold())
        .to_string()
}

/// Render one row: each cell is truncated to its column width,
/// right-justified, colorized, and the cells are joined with the separator.
pub fn render_row(columns: &[ColumnSpec], cells: &[String], bold: bool) -> String {
    let rendered: Vec<String> = columns
        .iter()
        .zip(cells.iter())
        .map(|(column, cell)| {
            let width = column.width();
            let fitted = format!("{:>width$}", ellipsize(cell, width));
            paint(&fitted, column.color)
        })
        .collect();
    let line = rendered.join(COLSPACING);
    if bold { embolden(&line) } else { line }
}

/// Render the bold heading. Labels may span multiple lines; shorter labels
/// are padded with leading blank lines so every column's label sits on the
/// same baseline.
pub fn render_heading(columns: &[ColumnSpec]) -> String {
    let labels: Vec<Vec<&str>> = columns.iter().map(|c| c.label.lines().collect()).collect();
    let heading_lines = labels.iter().map(Vec::len).max().unwrap_or(0);

    (0..heading_lines)
        .map(|line| {
            let cells: Vec<String> = labels
                .iter()
                .map(|label| {
                    let pad = heading_lines - label.len();
                    if line < pad {
                        String::new()
                    } else {
                        label[line - pad].to_string()
                    }
                })
                .collect();
            render_row(columns, &cells, true)
        })
        .collect::<Vec<String>>()
        .join("\n")
}

/// Cells for a live per-request row: status code then one duration per phase.
pub fn sample_cells(columns: &[ColumnSpec], status: &str, metrics: &[u64]) -> Vec<String> {
    columns
        .iter()
        .map(|column| match column.metric {
            Some(i) => {
                let value = metrics.get(i).copied().unwrap_or(0) as f64;
                format_ms(value, column.width())
            }
            None => status.to_string(),
        })
        .collect()
}

/// Cells for an aggregate row. The deviation row uses the percentage
/// rendering instead of the duration rendering.
pub fn aggregate_cells(columns: &[ColumnSpec], row: &AggregateRow) -> Vec<String> {
    columns
        .iter()
        .map(|column| match column.metric {
            Some(i) => {
                let value = row.values.get(i).copied().unwrap_or(0.0);
                if row.kind == AggregateKind::Deviation {
                    format_percent(value)
                } else {
                    format_ms(value, column.width())
                }
            }
            None => row.label.to_string(),
        })
        .collect()
}

/// Center `text` within `width`, dropping trailing padding.
pub fn center(text: &str, width: usize) -> String {
    format!("{text:^width$}").trim_end().to_string()
}

#[derive(Serialize)]
struct JsonReport {
    requests: u64,
    samples: usize,
    failures: u64,
    total_time_secs: f64,
    metrics: Vec<JsonMetric>,
}

#[derive(Serialize)]
struct JsonMetric {
    phase: &'static str,
    min: f64,
    avg: f64,
    med: f64,
    max: f64,
    dev: f64,
}

/// Final report as pretty JSON: run totals plus the five statistics per
/// phase. `dev` stays a fraction, not a percentage.
pub fn format_json(
    store: &SampleStore,
    rows: &[AggregateRow],
    requests: u64,
    failures: u64,
    total_secs: f64,
) -> String {
    let value = |kind: AggregateKind, i: usize| {
        rows.iter()
            .find(|row| row.kind == kind)
            .and_then(|row| row.values.get(i).copied())
            .unwrap_or(0.0)
    };

    let metrics = PHASE_NAMES
        .iter()
        .enumerate()
        .map(|(i, &phase)| JsonMetric {
            phase,
            min: value(AggregateKind::Min, i),
            avg: value(AggregateKind::Mean, i),
            med: value(AggregateKind::Median, i),
            max: value(AggregateKind::Max, i),
            dev: value(AggregateKind::Deviation, i),
        })
        .collect();

    let report = JsonReport {
        requests,
        samples: store.count(),
        failures,
        total_time_secs: total_secs,
        metrics,
    };

    serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::SampleStore;
    use crate::stats::aggregate;

    fn plain_column(
        label: &'static str,
        min_width: usize,
        metric: Option<usize>,
    ) -> ColumnSpec {
        ColumnSpec {
            label,
            min_width,
            color: None,
            metric,
        }
    }

    // ---- widths ----

    #[test]
    fn width_uses_longest_label_line() {
        let col = plain_column("SSL\nhandshake", 5, Some(0));
        assert_eq!(col.width(), 9);
    }

    #[test]
    fn width_floor_applies_to_short_labels() {
        let col = plain_column("TTFB", 5, Some(0));
        assert_eq!(col.width(), 5);
    }

    #[test]
    fn table_layout_matches_phase_count() {
        let columns = table_columns();
        assert_eq!(columns.len(), 7);
        assert!(columns[0].metric.is_none());
        assert_eq!(columns[0].width(), 9);
        for (i, col) in columns[1..].iter().enumerate() {
            assert_eq!(col.metric, Some(i));
            assert!(col.width() >= MIN_PHASE_WIDTH);
        }
    }

    #[test]
    fn row_width_sums_columns_and_separators() {
        let columns = vec![
            plain_column("Code", 9, None),
            plain_column("TTFB", 5, Some(0)),
        ];
        assert_eq!(row_width(&columns), 9 + 2 + 5);
    }

    // ---- ellipsize ----

    #[test]
    fn ellipsize_short_text_untouched() {
        assert_eq!(ellipsize("200", 9), "200");
    }

    #[test]
    fn ellipsize_exact_width_untouched() {
        assert_eq!(ellipsize("12345", 5), "12345");
    }

    #[test]
    fn ellipsize_truncates_with_marker() {
        assert_eq!(ellipsize("1234567890", 5), "1234\u{2026}");
    }

    #[test]
    fn ellipsize_never_exceeds_width() {
        for width in 1..8 {
            let out = ellipsize("abcdefghij", width);
            assert!(out.chars().count() <= width);
        }
    }

    // ---- numeric rendering ----

    #[test]
    fn format_ms_one_decimal() {
        assert_eq!(format_ms(38.0, 5), "38.0");
        assert_eq!(format_ms(0.0, 5), "0.0");
    }

    #[test]
    fn format_ms_big_fallback() {
        // "123456.7" is 8 chars, over a 5-wide column
        assert_eq!(format_ms(123456.7, 5), "BIG");
    }

    #[test]
    fn format_ms_fits_at_exact_width() {
        assert_eq!(format_ms(123.4, 5), "123.4");
    }

    #[test]
    fn format_percent_one_decimal() {
        assert_eq!(format_percent(0.408248), "40.8%");
        assert_eq!(format_percent(0.0), "0.0%");
    }

    // ---- rows ----

    #[test]
    fn render_row_right_justifies_and_joins() {
        let columns = vec![
            plain_column("Code", 9, None),
            plain_column("TTFB", 5, Some(0)),
        ];
        let cells = vec!["200".to_string(), "70.0".to_string()];
        assert_eq!(render_row(&columns, &cells, false), "      200   70.0");
    }

    #[test]
    fn render_row_truncates_overlong_cells() {
        let columns = vec![plain_column("Code", 4, None)];
        let cells = vec!["overflowing".to_string()];
        assert_eq!(render_row(&columns, &cells, false), "ove\u{2026}");
    }

    #[test]
    fn sample_cells_status_then_phases() {
        let columns = table_columns();
        let cells = sample_cells(&columns, "200", &[10, 2, 0, 38, 70, 80]);
        assert_eq!(cells[0], "200");
        assert_eq!(cells[1], "10.0");
        assert_eq!(cells[3], "0.0");
        assert_eq!(cells[6], "80.0");
    }

    #[test]
    fn aggregate_cells_use_percent_for_deviation() {
        let columns = table_columns();
        let mut store = SampleStore::new();
        store.append(vec![10, 20, 30, 40, 50, 60]);
        store.append(vec![30, 20, 10, 40, 50, 60]);
        let rows = aggregate(&store).unwrap();

        let avg_cells = aggregate_cells(&columns, &rows[1]);
        assert_eq!(avg_cells[0], "avg:");
        assert_eq!(avg_cells[1], "20.0");

        let dev_cells = aggregate_cells(&columns, &rows[4]);
        assert_eq!(dev_cells[0], "dev:");
        assert!(dev_cells[1].ends_with('%'));
        assert_eq!(dev_cells[4], "0.0%");
    }

    // ---- heading ----

    #[test]
    fn heading_has_two_lines_for_phase_labels() {
        let heading = render_heading(&table_columns());
        let lines: Vec<&str> = heading.lines().collect();
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn heading_pads_short_labels_to_baseline() {
        let heading = render_heading(&table_columns());
        let lines: Vec<&str> = heading.lines().collect();
        // Single-line labels (Code, TTFB) appear only on the last line.
        assert!(!lines[0].contains("Code"));
        assert!(!lines[0].contains("TTFB"));
        assert!(lines[1].contains("Code"));
        assert!(lines[1].contains("TTFB"));
        assert!(lines[0].contains("DNS"));
        assert!(lines[1].contains("lookup"));
    }

    // ---- center ----

    #[test]
    fn center_pads_left_half() {
        assert_eq!(center("abcd", 10), "   abcd");
    }

    #[test]
    fn center_wide_text_unchanged() {
        assert_eq!(center("abcdef", 4), "abcdef");
    }

    // ---- json ----

    #[test]
    fn json_report_schema() {
        let mut store = SampleStore::new();
        store.append(vec![10, 2, 0, 38, 70, 80]);
        store.append(vec![12, 2, 0, 40, 68, 78]);
        let rows = aggregate(&store).unwrap();

        let out = format_json(&store, &rows, 3, 1, 0.412);
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(parsed["requests"], 3);
        assert_eq!(parsed["samples"], 2);
        assert_eq!(parsed["failures"], 1);
        assert!((parsed["total_time_secs"].as_f64().unwrap() - 0.412).abs() < 1e-9);

        let metrics = parsed["metrics"].as_array().unwrap();
        assert_eq!(metrics.len(), 6);
        assert_eq!(metrics[0]["phase"], "dns_lookup");
        assert_eq!(metrics[0]["min"], 10.0);
        assert_eq!(metrics[0]["max"], 12.0);
        assert_eq!(metrics[4]["phase"], "ttfb");
        assert_eq!(metrics[4]["med"], 68.0);
    }
}
