//! Filtered-record download artifact.
//!
//! Writes the filtered well set as delimited text with a header row of the
//! canonical column names, and derives the artifact's file name from the
//! selected group.

use std::io::Write;

use anyhow::{Context, Result};

use crate::record::{WellColumn, WellRecord};

/// Writes `records` as delimited text: header row first, one row per well,
/// empty cells for missing values.
pub fn write_filtered_csv<W: Write>(
    writer: &mut csv::Writer<W>,
    columns: &[WellColumn],
    records: &[WellRecord],
) -> Result<()> {
    writer
        .write_record(columns.iter().map(|c| c.as_str()))
        .context("Writing export header row")?;
    for record in records {
        writer
            .write_record(columns.iter().map(|c| record.field(*c)))
            .context("Writing export row")?;
    }
    writer.flush().context("Flushing export output")?;
    Ok(())
}

/// Artifact file name for a group selection: lowercase, spaces replaced
/// with underscores, `all` when unfiltered.
pub fn export_file_name(selected_group: Option<&str>) -> String {
    let slug = match selected_group.map(str::trim) {
        Some(group) if !group.is_empty() => group.to_lowercase().replace(' ', "_"),
        _ => "all".to_string(),
    };
    format!("filtered_wells_{slug}.csv")
}
