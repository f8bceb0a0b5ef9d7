// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Formats and prints run summaries to the console.

use comfy_table::{Cell, Table};

use super::update::UpdateSummary;

/// Summarize a finished run to the console.
///
/// Prints how checksums were resolved and the merged state of every day
/// touched by the run.
pub fn summarize_update(summary: &UpdateSummary) {
    println!("Records processed: {}\n", summary.records);

    println!("{}\n", resolution_table(summary));

    if !summary.days.is_empty() {
        println!("{}\n", day_table(summary));
    }
}

/// Create a table with the default preset styling.
fn default_table_preset() -> Table {
    let mut table = Table::new();
    table
        .load_preset(comfy_table::presets::UTF8_FULL_CONDENSED)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS)
        .set_content_arrangement(comfy_table::ContentArrangement::Dynamic);
    table
}

/// Create a table showing how checksums were resolved to refs.
fn resolution_table(summary: &UpdateSummary) -> Table {
    let mut table = default_table_preset();
    table
        .set_header(vec![
            Cell::new("Ref Resolution").add_attribute(comfy_table::Attribute::Bold),
            Cell::new("Count").add_attribute(comfy_table::Attribute::Bold),
        ])
        .add_row(vec![
            Cell::new("Cached from logs"),
            Cell::new(summary.cached_from_logs),
        ])
        .add_row(vec![
            Cell::new("Resolver calls"),
            Cell::new(summary.resolver_calls),
        ])
        .add_row(vec![
            Cell::new("Unresolved"),
            Cell::new(summary.unresolved),
        ]);
    table
}

/// Create a table showing the merged state of every touched day.
fn day_table(summary: &UpdateSummary) -> Table {
    let mut table = default_table_preset();
    table.set_header(vec![
        Cell::new("Date").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Downloads").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Delta").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Packages").add_attribute(comfy_table::Attribute::Bold),
    ]);
    for day in &summary.days {
        table.add_row(vec![
            Cell::new(&day.date),
            Cell::new(day.downloads),
            Cell::new(day.delta_downloads),
            Cell::new(day.packages),
        ]);
    }
    table
}
