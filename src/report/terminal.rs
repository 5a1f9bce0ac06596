use std::collections::HashMap;

use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::models::SkipReason;
use crate::report::RunSummary;

/// Render a colored terminal summary.
pub fn render(summary: &RunSummary, verbose: bool, quiet: bool) -> Result<()> {
    let skipped = summary.skipped.len();

    if quiet {
        println!(
            "Libraries: {}  Licenses: {}  Skipped: {}",
            summary.libraries.len().to_string().green(),
            summary.licenses.len().to_string().green(),
            skipped.to_string().yellow(),
        );
        return Ok(());
    }

    println!(
        "\n {} v{}\n",
        "license-catalog".bold(),
        env!("CARGO_PKG_VERSION")
    );

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(
        " │  {:<48} │",
        format!(
            "Coordinates        : {}  ({} opened)",
            summary.coordinates, summary.candidates
        )
    );
    println!(
        " │  {:<48} │",
        format!(
            "{}  Libraries       : {:>4}",
            "✓".green(),
            summary.libraries.len()
        )
    );
    println!(
        " │  {:<48} │",
        format!(
            "{}  Licenses        : {:>4}  {}",
            "✓".green(),
            summary.licenses.len(),
            top_licenses(summary)
        )
    );
    println!(
        " │  {:<48} │",
        format!("{}  Skipped         : {:>4}", "⚠".yellow(), skipped)
    );
    println!(
        " │  {:<48} │",
        format!(
            "Files written      : {}  (removed {})",
            summary.output.written, summary.output.removed
        )
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    if skipped > 0 {
        println!(" {} Skipped during extraction:\n", "[WARN]".yellow().bold());
        render_skipped(summary);
        println!();
    }

    if verbose && !summary.licenses.is_empty() {
        println!(" {} Stored licenses:\n", "[INFO]".green().bold());
        render_licenses(summary);
        println!();
        println!(" {} Libraries:\n", "[INFO]".green().bold());
        render_libraries(summary);
        println!();
    }

    Ok(())
}

fn bold_header(names: &[&str]) -> Vec<Cell> {
    names
        .iter()
        .map(|n| Cell::new(n).add_attribute(Attribute::Bold))
        .collect()
}

fn render_skipped(summary: &RunSummary) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(bold_header(&["Subject", "Reason", "Detail"]));

    for skip in &summary.skipped {
        let color = match skip.reason {
            SkipReason::ArchiveFailed | SkipReason::ResolverFailed => Color::Red,
            SkipReason::NoPayload => Color::DarkGrey,
            _ => Color::Yellow,
        };
        table.add_row(vec![
            Cell::new(&skip.subject),
            Cell::new(skip.reason.to_string()).fg(color),
            Cell::new(&skip.detail),
        ]);
    }

    println!("{}", table);
}

fn render_licenses(summary: &RunSummary) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(bold_header(&["Name", "SPDX", "Hash", "Used by"]));

    for license in &summary.licenses {
        let (spdx, color) = match &license.spdx_id {
            Some(id) => (id.as_str(), Color::Green),
            None => ("—", Color::DarkGrey),
        };
        table.add_row(vec![
            Cell::new(&license.name),
            Cell::new(spdx).fg(color),
            Cell::new(&license.hash[..12.min(license.hash.len())]),
            Cell::new(license.used_by).set_alignment(CellAlignment::Right),
        ]);
    }

    println!("{}", table);
}

fn render_libraries(summary: &RunSummary) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(bold_header(&["Library", "Unique id", "Licenses"]));

    for lib in &summary.libraries {
        table.add_row(vec![
            Cell::new(&lib.name),
            Cell::new(&lib.unique_id),
            Cell::new(lib.licenses.join(", ")),
        ]);
    }

    println!("{}", table);
}

/// The three most referenced license names, e.g. `[MIT License (12), ...]`.
fn top_licenses(summary: &RunSummary) -> String {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for lic in &summary.licenses {
        *counts.entry(lic.name.as_str()).or_insert(0) += lic.used_by;
    }

    let mut pairs: Vec<(&str, usize)> = counts.into_iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    let top: Vec<String> = pairs
        .iter()
        .take(3)
        .map(|(name, cnt)| format!("{} ({})", name, cnt))
        .collect();

    if top.is_empty() {
        String::new()
    } else {
        format!("[{}]", top.join(", "))
    }
}
