//! Terminal viewer: `table_view <path> [table]`.
//!
//! Loads the file, lists its tables, prints the selected table (the first one by default) as a
//! text grid, and prints the statistics summary of that table. Set `RUST_LOG=debug` to see what
//! the readers detected.

use std::env;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use table_loader::Session;
use table_loader::ingestion::{LoadOptions, LogObserver};
use table_loader::types::Table;

const PREVIEW_ROWS: usize = 20;

fn main() -> Result<()> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("usage: table_view <path> [table]");
    };
    let requested = args.next();

    let options = LoadOptions {
        observer: Some(Arc::new(LogObserver)),
        ..Default::default()
    };
    let mut session = Session::new()
        .load(&path, &options)
        .context("Failed to load file")?;

    if let Some(name) = requested {
        if !session.tables().is_some_and(|t| t.contains(&name)) {
            bail!("{path} has no table named {name:?}");
        }
        session = session.select(&name);
    }

    if let Some(tables) = session.tables() {
        println!("Tables: {}", tables.names().collect::<Vec<_>>().join(", "));
    }
    if let (Some(name), Some(table)) = (session.active_name(), session.active_table()) {
        println!(
            "\n[{name}] {} rows x {} columns",
            table.row_count(),
            table.column_count()
        );
        print!("{}", render_grid(table, PREVIEW_ROWS));
    }

    println!("\nSummary:");
    print!("{}", session.summary()?);
    Ok(())
}

fn render_grid(table: &Table, max_rows: usize) -> String {
    let header: Vec<String> = table.schema.field_names().map(str::to_owned).collect();
    let body: Vec<Vec<String>> = table
        .rows
        .iter()
        .take(max_rows)
        .map(|row| {
            (0..header.len())
                .map(|i| row.get(i).map(ToString::to_string).unwrap_or_default())
                .collect()
        })
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|i| {
            body.iter()
                .map(|r| r[i].chars().count())
                .chain([header[i].chars().count()])
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: &[String]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, &w)| format!("{c:<w$}"))
            .collect();
        format!("{}\n", padded.join(" | ").trim_end())
    };

    let mut out = line(&header);
    out.push_str(&format!(
        "{}\n",
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-")
    ));
    for row in &body {
        out.push_str(&line(row));
    }
    if table.row_count() > max_rows {
        out.push_str(&format!("... {} more rows\n", table.row_count() - max_rows));
    }
    out
}
