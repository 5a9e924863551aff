use crate::cli::ListArgs;
use crate::config::Settings;
use crate::truenas::Dataset;
use anyhow::{Context, Result};
use std::io::Write;

const HEADERS: [&str; 6] = ["NAME", "TYPE", "USED", "AVAILABLE", "MOUNTPOINT", "COMPRESSION"];
const PADDING: usize = 2;
const PLACEHOLDER: &str = "-";

/// Human-readable size with binary prefixes, e.g. `1536` → `1.5 KiB`
pub fn format_bytes(bytes: u64) -> String {
    const UNIT: u64 = 1024;
    if bytes < UNIT {
        return format!("{} B", bytes);
    }
    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }
    let prefix = ['K', 'M', 'G', 'T', 'P', 'E'][exp];
    format!("{:.1} {}iB", bytes as f64 / div as f64, prefix)
}

/// One table row; missing values become `-`
fn row(ds: &Dataset) -> [String; 6] {
    let size = |value: &Option<crate::truenas::PropertyValue>| {
        value
            .as_ref()
            .and_then(|v| v.parsed_bytes())
            .map(format_bytes)
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    };
    let compression = ds
        .compression
        .as_ref()
        .and_then(|c| c.display_value())
        .unwrap_or(PLACEHOLDER);
    let mountpoint = ds
        .mountpoint
        .as_deref()
        .filter(|m| !m.is_empty())
        .unwrap_or(PLACEHOLDER);

    [
        ds.id.clone(),
        ds.kind.clone(),
        size(&ds.used),
        size(&ds.available),
        mountpoint.to_string(),
        compression.to_string(),
    ]
}

/// Left-aligned table, columns separated by at least two spaces
pub fn render_table(datasets: &[Dataset]) -> String {
    let underline = HEADERS.map(|h| "-".repeat(h.len()));
    let mut rows = vec![HEADERS.map(str::to_string), underline];
    rows.extend(datasets.iter().map(row));

    let mut widths = [0usize; 6];
    for r in &rows {
        for (width, cell) in widths.iter_mut().zip(r) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut table = String::new();
    for r in &rows {
        let mut line = String::new();
        for (i, cell) in r.iter().enumerate() {
            if i + 1 == r.len() {
                line.push_str(cell);
            } else {
                line.push_str(&format!("{:<width$}", cell, width = widths[i] + PADDING));
            }
        }
        table.push_str(line.trim_end());
        table.push('\n');
    }
    table
}

pub async fn run<W: Write>(args: &ListArgs, settings: &Settings, out: &mut W) -> Result<()> {
    let client = args.connection.connect(settings)?;
    let datasets = client
        .list_datasets(&args.pool)
        .await
        .context("failed to list datasets")?;

    if datasets.is_empty() {
        writeln!(out, "No datasets found in pool '{}'", args.pool)?;
        return Ok(());
    }

    write!(out, "{}", render_table(&datasets))?;
    Ok(())
}
