//! Well record model and tabular loading.
//!
//! Owns the typed [`WellRecord`] row, the [`WellColumn`] enumeration of
//! recognized columns, and the [`WellTable`] / [`WaterUseTable`] loaders.
//! Header names are canonicalized (trim + lowercase) on load so the source
//! files may use arbitrary casing.

use std::{collections::HashMap, path::Path};

use anyhow::{Context, Result, anyhow};
use log::debug;

use crate::io_utils;

/// Tokens treated as missing values in numeric cells.
const PLACEHOLDER_TOKENS: &[&str] = &["na", "n/a", "null", "none", "-", "--"];

/// Every column of the well table the explorer recognizes.
///
/// Unrecognized source columns are ignored at load; recognized ones keep
/// their source order so exports can reproduce the original header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WellColumn {
    SiteId,
    ObjectId,
    Longitude,
    Latitude,
    X,
    Y,
    WellAlt,
    WlDtw,
    WlElev,
    WellDepth,
    UnitName,
    Major1,
    Major2,
    Major3,
    Generalize,
    RockName,
    AqName,
    NameAbbr,
    BasinName1,
    SubbasinName,
    WaterUse,
}

impl WellColumn {
    pub const ALL: [WellColumn; 21] = [
        WellColumn::SiteId,
        WellColumn::ObjectId,
        WellColumn::Longitude,
        WellColumn::Latitude,
        WellColumn::X,
        WellColumn::Y,
        WellColumn::WellAlt,
        WellColumn::WlDtw,
        WellColumn::WlElev,
        WellColumn::WellDepth,
        WellColumn::UnitName,
        WellColumn::Major1,
        WellColumn::Major2,
        WellColumn::Major3,
        WellColumn::Generalize,
        WellColumn::RockName,
        WellColumn::AqName,
        WellColumn::NameAbbr,
        WellColumn::BasinName1,
        WellColumn::SubbasinName,
        WellColumn::WaterUse,
    ];

    /// Canonical (lowercase) column name as it appears in the source files.
    pub fn as_str(&self) -> &'static str {
        match self {
            WellColumn::SiteId => "site_id",
            WellColumn::ObjectId => "objectid",
            WellColumn::Longitude => "dd_long",
            WellColumn::Latitude => "dd_lat",
            WellColumn::X => "x",
            WellColumn::Y => "y",
            WellColumn::WellAlt => "well_alt",
            WellColumn::WlDtw => "wl_dtw",
            WellColumn::WlElev => "wl_elev",
            WellColumn::WellDepth => "well_depth",
            WellColumn::UnitName => "unit_name",
            WellColumn::Major1 => "major1",
            WellColumn::Major2 => "major2",
            WellColumn::Major3 => "major3",
            WellColumn::Generalize => "generalize",
            WellColumn::RockName => "rock_name",
            WellColumn::AqName => "aq_name",
            WellColumn::NameAbbr => "name_abbr",
            WellColumn::BasinName1 => "basin_name_1",
            WellColumn::SubbasinName => "subbasin_name",
            WellColumn::WaterUse => "water_use",
        }
    }

    /// Resolves a canonicalized header name to a recognized column.
    pub fn from_name(name: &str) -> Option<WellColumn> {
        WellColumn::ALL.iter().copied().find(|c| c.as_str() == name)
    }
}

/// One monitored well. Every attribute is optional; gaps are the norm in
/// field-collected records and are handled by each consumer, never here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WellRecord {
    pub site_id: Option<String>,
    pub objectid: Option<i64>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub well_alt: Option<f64>,
    pub wl_dtw: Option<f64>,
    pub wl_elev: Option<f64>,
    pub well_depth: Option<f64>,
    pub unit_name: Option<String>,
    pub major1: Option<String>,
    pub major2: Option<String>,
    pub major3: Option<String>,
    pub generalize: Option<String>,
    pub rock_name: Option<String>,
    pub aq_name: Option<String>,
    pub name_abbr: Option<String>,
    pub basin_name_1: Option<String>,
    pub subbasin_name: Option<String>,
    pub water_use: Option<String>,
}

impl WellRecord {
    /// Display form of a cell for table output and CSV export.
    ///
    /// Missing values render as the empty string.
    pub fn field(&self, column: WellColumn) -> String {
        match column {
            WellColumn::SiteId => self.site_id.clone().unwrap_or_default(),
            WellColumn::ObjectId => {
                self.objectid.map(|v| v.to_string()).unwrap_or_default()
            }
            WellColumn::Longitude => format_numeric(self.longitude),
            WellColumn::Latitude => format_numeric(self.latitude),
            WellColumn::X => format_numeric(self.x),
            WellColumn::Y => format_numeric(self.y),
            WellColumn::WellAlt => format_numeric(self.well_alt),
            WellColumn::WlDtw => format_numeric(self.wl_dtw),
            WellColumn::WlElev => format_numeric(self.wl_elev),
            WellColumn::WellDepth => format_numeric(self.well_depth),
            WellColumn::UnitName => self.unit_name.clone().unwrap_or_default(),
            WellColumn::Major1 => self.major1.clone().unwrap_or_default(),
            WellColumn::Major2 => self.major2.clone().unwrap_or_default(),
            WellColumn::Major3 => self.major3.clone().unwrap_or_default(),
            WellColumn::Generalize => self.generalize.clone().unwrap_or_default(),
            WellColumn::RockName => self.rock_name.clone().unwrap_or_default(),
            WellColumn::AqName => self.aq_name.clone().unwrap_or_default(),
            WellColumn::NameAbbr => self.name_abbr.clone().unwrap_or_default(),
            WellColumn::BasinName1 => self.basin_name_1.clone().unwrap_or_default(),
            WellColumn::SubbasinName => self.subbasin_name.clone().unwrap_or_default(),
            WellColumn::WaterUse => self.water_use.clone().unwrap_or_default(),
        }
    }

    fn set_cell(&mut self, column: WellColumn, raw: &str, row_number: usize) -> Result<()> {
        match column {
            WellColumn::SiteId => self.site_id = parse_text_cell(raw),
            WellColumn::ObjectId => {
                self.objectid = parse_integer_cell(raw)
                    .with_context(|| cell_context(column, row_number))?;
            }
            WellColumn::Longitude => {
                self.longitude = parse_numeric_cell(raw)
                    .with_context(|| cell_context(column, row_number))?;
            }
            WellColumn::Latitude => {
                self.latitude = parse_numeric_cell(raw)
                    .with_context(|| cell_context(column, row_number))?;
            }
            WellColumn::X => {
                self.x = parse_numeric_cell(raw)
                    .with_context(|| cell_context(column, row_number))?;
            }
            WellColumn::Y => {
                self.y = parse_numeric_cell(raw)
                    .with_context(|| cell_context(column, row_number))?;
            }
            WellColumn::WellAlt => {
                self.well_alt = parse_numeric_cell(raw)
                    .with_context(|| cell_context(column, row_number))?;
            }
            WellColumn::WlDtw => {
                self.wl_dtw = parse_numeric_cell(raw)
                    .with_context(|| cell_context(column, row_number))?;
            }
            WellColumn::WlElev => {
                self.wl_elev = parse_numeric_cell(raw)
                    .with_context(|| cell_context(column, row_number))?;
            }
            WellColumn::WellDepth => {
                self.well_depth = parse_numeric_cell(raw)
                    .with_context(|| cell_context(column, row_number))?;
            }
            WellColumn::UnitName => self.unit_name = parse_text_cell(raw),
            WellColumn::Major1 => self.major1 = parse_text_cell(raw),
            WellColumn::Major2 => self.major2 = parse_text_cell(raw),
            WellColumn::Major3 => self.major3 = parse_text_cell(raw),
            WellColumn::Generalize => self.generalize = parse_text_cell(raw),
            WellColumn::RockName => self.rock_name = parse_text_cell(raw),
            WellColumn::AqName => self.aq_name = parse_text_cell(raw),
            WellColumn::NameAbbr => self.name_abbr = parse_text_cell(raw),
            WellColumn::BasinName1 => self.basin_name_1 = parse_text_cell(raw),
            WellColumn::SubbasinName => self.subbasin_name = parse_text_cell(raw),
            WellColumn::WaterUse => self.water_use = parse_text_cell(raw),
        }
        Ok(())
    }
}

fn cell_context(column: WellColumn, row_number: usize) -> String {
    format!("Parsing column '{}' at row {row_number}", column.as_str())
}

fn format_numeric(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 => format!("{v:.0}"),
        Some(v) => v.to_string(),
        None => String::new(),
    }
}

/// Canonicalizes a header name: trim + lowercase.
pub fn canonical_header(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Normalizes a grouping value for comparison: trim + lowercase.
///
/// Both the stored value and the requested value pass through this before
/// any equality check, so `"Basin Fill"` matches `"basin fill "`.
pub fn normalize_group(value: &str) -> String {
    value.trim().to_lowercase()
}

fn is_placeholder(token: &str) -> bool {
    let lowered = token.to_ascii_lowercase();
    PLACEHOLDER_TOKENS.contains(&lowered.as_str())
}

fn parse_text_cell(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

fn parse_numeric_cell(raw: &str) -> Result<Option<f64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || is_placeholder(trimmed) {
        return Ok(None);
    }
    let parsed: f64 = trimmed
        .parse()
        .map_err(|_| anyhow!("Failed to parse '{trimmed}' as a number"))?;
    Ok(Some(parsed))
}

fn parse_integer_cell(raw: &str) -> Result<Option<i64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || is_placeholder(trimmed) {
        return Ok(None);
    }
    if let Ok(parsed) = trimmed.parse::<i64>() {
        return Ok(Some(parsed));
    }
    // Some extracts serialize identifiers as floats ("12345.0").
    let as_float: f64 = trimmed
        .parse()
        .map_err(|_| anyhow!("Failed to parse '{trimmed}' as an identifier"))?;
    if as_float.fract() == 0.0 {
        Ok(Some(as_float as i64))
    } else {
        Err(anyhow!("Identifier '{trimmed}' is not an integer"))
    }
}

/// The well table: records plus the recognized columns present in the
/// source file, in source order.
///
/// Loaded once and treated as immutable; every engine operation returns a
/// new view instead of mutating this table.
#[derive(Debug, Clone)]
pub struct WellTable {
    records: Vec<WellRecord>,
    columns: Vec<WellColumn>,
}

impl WellTable {
    pub fn new(records: Vec<WellRecord>, columns: Vec<WellColumn>) -> Self {
        Self { records, columns }
    }

    pub fn from_csv_path(path: &Path, delimiter: Option<u8>) -> Result<Self> {
        let delimiter = io_utils::resolve_input_delimiter(path, delimiter);
        let mut reader = io_utils::open_csv_reader_from_path(path, delimiter)?;
        let headers = reader
            .headers()
            .with_context(|| format!("Reading headers from {path:?}"))?
            .clone();

        let mut columns = Vec::new();
        let mut cells: Vec<(usize, WellColumn)> = Vec::new();
        for (idx, header) in headers.iter().enumerate() {
            let canonical = canonical_header(header);
            if let Some(column) = WellColumn::from_name(&canonical) {
                columns.push(column);
                cells.push((idx, column));
            } else {
                debug!("Ignoring unrecognized column '{canonical}' in {path:?}");
            }
        }

        let mut records = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let row_number = row_idx + 2;
            let row = result.with_context(|| format!("Reading row {row_number} of {path:?}"))?;
            let mut record = WellRecord::default();
            for (field_idx, column) in &cells {
                let raw = row.get(*field_idx).unwrap_or("");
                record
                    .set_cell(*column, raw, row_number)
                    .with_context(|| format!("Loading {path:?}"))?;
            }
            records.push(record);
        }

        debug!(
            "Loaded {} well record(s) with {} recognized column(s) from {:?}",
            records.len(),
            columns.len(),
            path
        );
        Ok(Self { records, columns })
    }

    pub fn records(&self) -> &[WellRecord] {
        &self.records
    }

    pub fn columns(&self) -> &[WellColumn] {
        &self.columns
    }

    pub fn has_column(&self, column: WellColumn) -> bool {
        self.columns.contains(&column)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Water-use metadata, keyed by object identifier.
///
/// The loader is deliberately tolerant of absent key columns; the join
/// operation reports [`MissingJoinKey`](crate::error::EngineError) so the
/// failure surfaces at the operation boundary, not at load time.
#[derive(Debug, Clone, Default)]
pub struct WaterUseTable {
    by_objectid: HashMap<i64, String>,
    has_objectid: bool,
    has_water_use: bool,
}

impl WaterUseTable {
    pub fn from_csv_path(path: &Path, delimiter: Option<u8>) -> Result<Self> {
        let delimiter = io_utils::resolve_input_delimiter(path, delimiter);
        let mut reader = io_utils::open_csv_reader_from_path(path, delimiter)?;
        let headers = reader
            .headers()
            .with_context(|| format!("Reading headers from {path:?}"))?
            .clone();

        let mut objectid_idx = None;
        let mut water_use_idx = None;
        for (idx, header) in headers.iter().enumerate() {
            match canonical_header(header).as_str() {
                "objectid" => objectid_idx = Some(idx),
                "water_use" => water_use_idx = Some(idx),
                _ => {}
            }
        }

        let mut by_objectid = HashMap::new();
        if let (Some(key_idx), Some(use_idx)) = (objectid_idx, water_use_idx) {
            for (row_idx, result) in reader.records().enumerate() {
                let row_number = row_idx + 2;
                let row =
                    result.with_context(|| format!("Reading row {row_number} of {path:?}"))?;
                let key = parse_integer_cell(row.get(key_idx).unwrap_or(""))
                    .with_context(|| format!("Parsing 'objectid' at row {row_number}"))?;
                let Some(key) = key else {
                    continue;
                };
                let Some(water_use) = parse_text_cell(row.get(use_idx).unwrap_or("")) else {
                    continue;
                };
                by_objectid.entry(key).or_insert(water_use);
            }
        }

        Ok(Self {
            by_objectid,
            has_objectid: objectid_idx.is_some(),
            has_water_use: water_use_idx.is_some(),
        })
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (i64, String)>) -> Self {
        Self {
            by_objectid: entries.into_iter().collect(),
            has_objectid: true,
            has_water_use: true,
        }
    }

    pub fn has_objectid(&self) -> bool {
        self.has_objectid
    }

    pub fn has_water_use(&self) -> bool {
        self.has_water_use
    }

    pub fn water_use_for(&self, objectid: i64) -> Option<&str> {
        self.by_objectid.get(&objectid).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_objectid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_objectid.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_header_trims_and_lowercases() {
        assert_eq!(canonical_header("  DD_Long "), "dd_long");
        assert_eq!(canonical_header("Aq_Name"), "aq_name");
    }

    #[test]
    fn normalize_group_is_case_and_whitespace_insensitive() {
        assert_eq!(
            normalize_group("Cretaceous Sedimentary Rocks"),
            normalize_group(" cretaceous sedimentary rocks ")
        );
    }

    #[test]
    fn numeric_cells_treat_placeholders_as_missing() {
        assert_eq!(parse_numeric_cell("").unwrap(), None);
        assert_eq!(parse_numeric_cell("NA").unwrap(), None);
        assert_eq!(parse_numeric_cell("null").unwrap(), None);
        assert_eq!(parse_numeric_cell("12.5").unwrap(), Some(12.5));
        assert!(parse_numeric_cell("granite").is_err());
    }

    #[test]
    fn integer_cells_accept_float_serialized_identifiers() {
        assert_eq!(parse_integer_cell("42").unwrap(), Some(42));
        assert_eq!(parse_integer_cell("42.0").unwrap(), Some(42));
        assert!(parse_integer_cell("42.5").is_err());
    }

    #[test]
    fn well_column_round_trips_names() {
        for column in WellColumn::ALL {
            assert_eq!(WellColumn::from_name(column.as_str()), Some(column));
        }
        assert_eq!(WellColumn::from_name("unknown_col"), None);
    }
}
