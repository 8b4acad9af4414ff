//! The well profile and filtering engine.
//!
//! Four pure operations over loaded tables: grouped descriptive statistics,
//! group filtering, vertical-interval derivation, and the water-use join.
//! Column and mode parameters arrive as strings and are validated at the
//! top of each operation; structurally invalid requests fail fast with a
//! typed [`EngineError`], while per-row data gaps are handled by exclusion.
//!
//! Null policy differs deliberately per operation and feeds different
//! downstream views:
//! - grouping excludes rows with a null group value,
//! - interval derivation drops rows missing a required field,
//! - the join preserves unmatched rows with a null water use.

use std::collections::BTreeMap;

use itertools::Itertools;

use crate::{
    catalog::{GroupColumn, ValueColumn},
    error::{EngineError, EngineResult, JoinSide},
    record::{WaterUseTable, WellColumn, WellRecord, WellTable, normalize_group},
};

/// Sentinel accepted by [`filter_by_group`] meaning "no filter".
pub const ALL_GROUPS_SENTINEL: &str = "all";

/// Bucket for profile spans whose well has no water-use classification.
pub const UNCLASSIFIED_WATER_USE: &str = "unclassified";

/// Vertical extent mode for profile derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthMode {
    /// Surface down to the water table.
    DepthToWater,
    /// Water table down to the bottom of the well.
    WellDepth,
}

impl DepthMode {
    /// Parses a mode string. `wl_dtw` is accepted as an alias for
    /// `depth_to_water` since it is the depth column's own name. Anything
    /// else is rejected; the mode is never defaulted.
    pub fn parse(mode: &str) -> EngineResult<DepthMode> {
        match mode.trim().to_ascii_lowercase().as_str() {
            "depth_to_water" | "wl_dtw" => Ok(DepthMode::DepthToWater),
            "well_depth" => Ok(DepthMode::WellDepth),
            _ => Err(EngineError::InvalidParameter(mode.trim().to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DepthMode::DepthToWater => "depth_to_water",
            DepthMode::WellDepth => "well_depth",
        }
    }
}

/// Descriptive statistics of one group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    /// First-seen trimmed spelling of the group value.
    pub group: String,
    /// Number of non-null analysis values in the group.
    pub count: usize,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
}

/// One derived vertical well interval, ready for profile rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct WellSpan {
    pub site_id: Option<String>,
    pub x: f64,
    pub y: f64,
    pub top: f64,
    pub bottom: f64,
    pub water_use: Option<String>,
    pub wl_dtw: Option<f64>,
    pub well_depth: Option<f64>,
}

/// Groups all records by `group_col` and profiles `value_col` per group.
///
/// One summary row per distinct non-null normalized group value; rows whose
/// group value is null are excluded. Values that differ only in case or
/// surrounding whitespace collapse into one group. Output is ordered by
/// normalized group key.
pub fn summary_stats(
    table: &WellTable,
    value_col: &str,
    group_col: &str,
) -> EngineResult<Vec<GroupSummary>> {
    let value = ValueColumn::parse(value_col)?;
    let group = GroupColumn::parse(group_col)?;

    let mut groups: BTreeMap<String, (String, Vec<f64>)> = BTreeMap::new();
    for record in table.records() {
        let Some(raw) = group.extract(record) else {
            continue;
        };
        let key = normalize_group(raw);
        let entry = groups
            .entry(key)
            .or_insert_with(|| (raw.trim().to_string(), Vec::new()));
        if let Some(v) = value.extract(record) {
            entry.1.push(v);
        }
    }

    Ok(groups
        .into_values()
        .map(|(label, values)| summarize(label, values))
        .collect())
}

fn summarize(group: String, mut values: Vec<f64>) -> GroupSummary {
    values.sort_by(|a, b| a.total_cmp(b));
    let count = values.len();
    if count == 0 {
        return GroupSummary {
            group,
            count,
            mean: None,
            std_dev: None,
            min: None,
            q1: None,
            median: None,
            q3: None,
            max: None,
        };
    }
    let sum: f64 = values.iter().sum();
    let mean = sum / count as f64;
    let std_dev = if count < 2 {
        None
    } else {
        let variance = values
            .iter()
            .map(|v| (v - mean) * (v - mean))
            .sum::<f64>()
            / (count as f64 - 1.0);
        Some(variance.max(0.0).sqrt())
    };
    GroupSummary {
        group,
        count,
        mean: Some(mean),
        std_dev,
        min: Some(values[0]),
        q1: Some(quantile(&values, 0.25)),
        median: Some(quantile(&values, 0.5)),
        q3: Some(quantile(&values, 0.75)),
        max: Some(values[count - 1]),
    }
}

/// Linearly interpolated quantile over a sorted, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let fraction = position - lower as f64;
        sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
    }
}

/// Returns the records whose normalized `group_col` value equals the
/// normalized selection.
///
/// `None`, an empty selection, or the case-insensitive `"All"` sentinel
/// return every record unfiltered. Records with a null group value never
/// match a concrete selection.
pub fn filter_by_group(
    records: &[WellRecord],
    group_col: &str,
    selected_group: Option<&str>,
) -> EngineResult<Vec<WellRecord>> {
    let group = GroupColumn::parse(group_col)?;

    let wanted = selected_group.map(normalize_group).unwrap_or_default();
    if wanted.is_empty() || wanted == ALL_GROUPS_SENTINEL {
        return Ok(records.to_vec());
    }

    Ok(records
        .iter()
        .filter(|record| {
            group
                .extract(record)
                .is_some_and(|value| normalize_group(value) == wanted)
        })
        .cloned()
        .collect())
}

/// Distinct non-null group values present in the data, one per normalized
/// spelling, sorted. This is what a selection widget over `group_col`
/// offers alongside the `"All"` sentinel.
pub fn group_options(records: &[WellRecord], group_col: &str) -> EngineResult<Vec<String>> {
    let group = GroupColumn::parse(group_col)?;
    Ok(records
        .iter()
        .filter_map(|record| group.extract(record))
        .map(|raw| raw.trim().to_string())
        .unique_by(|value| value.to_lowercase())
        .sorted()
        .collect())
}

/// Derives top/bottom elevations for every record that carries the fields
/// the requested mode needs; the rest are dropped, never errored.
///
/// - `depth_to_water`: requires x, y, well_alt, wl_dtw.
///   top = well_alt, bottom = well_alt − wl_dtw.
/// - `well_depth`: additionally requires well_depth.
///   top = well_alt − wl_dtw, bottom = well_alt − well_depth.
pub fn derive_vertical_interval(
    records: &[WellRecord],
    depth_mode: &str,
) -> EngineResult<Vec<WellSpan>> {
    let mode = DepthMode::parse(depth_mode)?;
    Ok(records
        .iter()
        .filter_map(|record| span_for(record, mode))
        .collect())
}

fn span_for(record: &WellRecord, mode: DepthMode) -> Option<WellSpan> {
    let x = record.x?;
    let y = record.y?;
    let well_alt = record.well_alt?;
    let wl_dtw = record.wl_dtw?;
    let (top, bottom) = match mode {
        DepthMode::DepthToWater => (well_alt, well_alt - wl_dtw),
        DepthMode::WellDepth => {
            let well_depth = record.well_depth?;
            (well_alt - wl_dtw, well_alt - well_depth)
        }
    };
    Some(WellSpan {
        site_id: record.site_id.clone(),
        x,
        y,
        top,
        bottom,
        water_use: record.water_use.clone(),
        wl_dtw: record.wl_dtw,
        well_depth: record.well_depth,
    })
}

/// Left-joins the water-use category onto the well table by object
/// identifier.
///
/// Record count and order are preserved; records with no matching metadata
/// row (or no object identifier of their own) keep a null water use. The
/// join fails only structurally: when the key column is absent from either
/// side.
pub fn join_water_use(
    table: &WellTable,
    metadata: &WaterUseTable,
) -> EngineResult<WellTable> {
    if !table.has_column(WellColumn::ObjectId) {
        return Err(EngineError::MissingJoinKey {
            key: WellColumn::ObjectId.as_str().to_string(),
            side: JoinSide::Wells,
        });
    }
    if !metadata.has_objectid() {
        return Err(EngineError::MissingJoinKey {
            key: WellColumn::ObjectId.as_str().to_string(),
            side: JoinSide::Metadata,
        });
    }

    let mut columns = table.columns().to_vec();
    if !columns.contains(&WellColumn::WaterUse) {
        columns.push(WellColumn::WaterUse);
    }
    let records = table
        .records()
        .iter()
        .cloned()
        .map(|mut record| {
            let joined = record
                .objectid
                .and_then(|id| metadata.water_use_for(id))
                .map(str::to_string);
            if joined.is_some() {
                record.water_use = joined;
            }
            record
        })
        .collect();
    Ok(WellTable::new(records, columns))
}

/// Buckets profile spans by water-use category for per-category rendering.
///
/// Spans without a category land under [`UNCLASSIFIED_WATER_USE`] rather
/// than disappearing from the profile.
pub fn group_spans_by_water_use(spans: Vec<WellSpan>) -> BTreeMap<String, Vec<WellSpan>> {
    let mut grouped: BTreeMap<String, Vec<WellSpan>> = BTreeMap::new();
    for span in spans {
        let key = span
            .water_use
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(UNCLASSIFIED_WATER_USE)
            .to_string();
        grouped.entry(key).or_default().push(span);
    }
    grouped
}
