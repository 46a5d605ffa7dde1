//! Rendering a [`DirReport`] to stdout in the selected format.

use crate::cli::Format;
use anyhow::{Context, Result};
use dlsize_core::model::size::{format_size, total_size_line};
use dlsize_core::model::{DirReport, EntryKind};
use std::io::Write;

pub fn render<W: Write>(out: &mut W, report: &DirReport, format: Format, breakdown: bool) -> Result<()> {
    match format {
        Format::Text => render_text(out, report, breakdown),
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, report).context("failed to write JSON report")?;
            writeln!(out)?;
            Ok(())
        }
        Format::Csv => render_csv(out, report),
    }
}

fn render_text<W: Write>(out: &mut W, report: &DirReport, breakdown: bool) -> Result<()> {
    if breakdown {
        for child in &report.children {
            let suffix = if child.kind == EntryKind::Directory { "/" } else { "" };
            writeln!(out, "{:>10}  {}{}", format_size(child.bytes), child.name, suffix)?;
        }
    }
    writeln!(out, "{}", total_size_line(report.total_bytes))?;
    Ok(())
}

fn render_csv<W: Write>(out: &mut W, report: &DirReport) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);
    wtr.write_record(["name", "kind", "bytes"])?;
    for child in &report.children {
        wtr.write_record([
            child.name.as_str(),
            child.kind.label(),
            child.bytes.to_string().as_str(),
        ])?;
    }
    wtr.flush().context("failed to write CSV report")?;
    Ok(())
}
