//! Terminal preview of consolidated records.

use console::style;

use facturas_core::{InvoiceRecord, SentinelLabels, COLUMNS};

/// Cells wider than this are truncated in the preview.
const MAX_CELL_WIDTH: usize = 40;

/// Render records as a fixed-width table, sentinels highlighted.
pub fn render(records: &[InvoiceRecord], labels: &SentinelLabels) -> String {
    let rows: Vec<[String; 5]> = records
        .iter()
        .map(|r| r.cells(labels).map(|c| truncate(&c)))
        .collect();

    let mut widths = COLUMNS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = COLUMNS
        .iter()
        .zip(widths)
        .map(|(h, w)| style(pad(h, w)).bold().to_string())
        .collect();
    out.push_str(&header.join("  "));
    out.push('\n');

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');

    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .zip(widths)
            .map(|(cell, w)| {
                let padded = pad(cell, w);
                if *cell == labels.error {
                    style(padded).red().to_string()
                } else if *cell == labels.not_found {
                    style(padded).yellow().to_string()
                } else {
                    padded
                }
            })
            .collect();
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
    }

    out
}

fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    format!("{}{}", s, " ".repeat(width.saturating_sub(len)))
}

fn truncate(s: &str) -> String {
    if s.chars().count() <= MAX_CELL_WIDTH {
        return s.to_string();
    }
    let mut cut: String = s.chars().take(MAX_CELL_WIDTH - 1).collect();
    cut.push('…');
    cut
}
