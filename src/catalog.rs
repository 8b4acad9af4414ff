//! Schema catalog: the fixed analysis-column enumerations and display labels.
//!
//! Labels resolve through a fixed chain: curated alias table, then the
//! descriptions loaded from the schema descriptor document, then the raw
//! column name. Lookups never fail; unknown columns degrade to their own
//! name.

use std::{collections::HashMap, fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::{
    error::{ColumnRole, EngineError, EngineResult},
    record::{WellColumn, WellRecord, canonical_header},
};

/// Curated labels that take precedence over descriptor text.
const CUSTOM_ALIASES: &[(&str, &str)] = &[
    ("basin_name_1", "AMA or INA"),
    ("subbasin_name", "Groundwater Subbasin"),
    ("aq_name", "Aquifer Name"),
    ("well_alt", "Well Elevation"),
    ("wl_dtw", "Depth to Water (DTW)"),
    ("wl_elev", "Water Surface Elevation"),
    ("well_depth", "Total Well Depth"),
    ("water_use", "Water Use"),
    ("unit_name", "Geologic Unit"),
    ("major1", "Primary Lithology"),
    ("major2", "Secondary Lithology"),
    ("major3", "Tertiary Lithology"),
    ("generalize", "Generalized Lithology"),
    ("rock_name", "Rock Name"),
];

/// Continuous attributes usable as the analysis variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueColumn {
    WellDepth,
    WlDtw,
    WlElev,
}

impl ValueColumn {
    pub const ALL: [ValueColumn; 3] =
        [ValueColumn::WellDepth, ValueColumn::WlDtw, ValueColumn::WlElev];

    pub fn as_str(&self) -> &'static str {
        self.well_column().as_str()
    }

    pub fn well_column(&self) -> WellColumn {
        match self {
            ValueColumn::WellDepth => WellColumn::WellDepth,
            ValueColumn::WlDtw => WellColumn::WlDtw,
            ValueColumn::WlElev => WellColumn::WlElev,
        }
    }

    /// Validates a requested column name at the API boundary.
    pub fn parse(name: &str) -> EngineResult<ValueColumn> {
        let canonical = canonical_header(name);
        ValueColumn::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == canonical)
            .ok_or_else(|| EngineError::InvalidColumn {
                column: name.to_string(),
                role: ColumnRole::Value,
            })
    }

    pub fn extract(&self, record: &WellRecord) -> Option<f64> {
        match self {
            ValueColumn::WellDepth => record.well_depth,
            ValueColumn::WlDtw => record.wl_dtw,
            ValueColumn::WlElev => record.wl_elev,
        }
    }
}

/// Categorical attributes usable as a grouping key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupColumn {
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
}

impl GroupColumn {
    pub const ALL: [GroupColumn; 10] = [
        GroupColumn::UnitName,
        GroupColumn::Major1,
        GroupColumn::Major2,
        GroupColumn::Major3,
        GroupColumn::Generalize,
        GroupColumn::RockName,
        GroupColumn::AqName,
        GroupColumn::NameAbbr,
        GroupColumn::BasinName1,
        GroupColumn::SubbasinName,
    ];

    pub fn as_str(&self) -> &'static str {
        self.well_column().as_str()
    }

    pub fn well_column(&self) -> WellColumn {
        match self {
            GroupColumn::UnitName => WellColumn::UnitName,
            GroupColumn::Major1 => WellColumn::Major1,
            GroupColumn::Major2 => WellColumn::Major2,
            GroupColumn::Major3 => WellColumn::Major3,
            GroupColumn::Generalize => WellColumn::Generalize,
            GroupColumn::RockName => WellColumn::RockName,
            GroupColumn::AqName => WellColumn::AqName,
            GroupColumn::NameAbbr => WellColumn::NameAbbr,
            GroupColumn::BasinName1 => WellColumn::BasinName1,
            GroupColumn::SubbasinName => WellColumn::SubbasinName,
        }
    }

    /// Validates a requested column name at the API boundary.
    pub fn parse(name: &str) -> EngineResult<GroupColumn> {
        let canonical = canonical_header(name);
        GroupColumn::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == canonical)
            .ok_or_else(|| EngineError::InvalidColumn {
                column: name.to_string(),
                role: ColumnRole::GroupBy,
            })
    }

    pub fn extract<'a>(&self, record: &'a WellRecord) -> Option<&'a str> {
        let value = match self {
            GroupColumn::UnitName => &record.unit_name,
            GroupColumn::Major1 => &record.major1,
            GroupColumn::Major2 => &record.major2,
            GroupColumn::Major3 => &record.major3,
            GroupColumn::Generalize => &record.generalize,
            GroupColumn::RockName => &record.rock_name,
            GroupColumn::AqName => &record.aq_name,
            GroupColumn::NameAbbr => &record.name_abbr,
            GroupColumn::BasinName1 => &record.basin_name_1,
            GroupColumn::SubbasinName => &record.subbasin_name,
        };
        value.as_deref()
    }
}

/// One `{name, description}` pair from the schema descriptor document.
#[derive(Debug, Deserialize)]
struct DescriptorEntry {
    name: String,
    description: String,
}

/// Column-name to display-label resolution.
#[derive(Debug, Clone, Default)]
pub struct LabelCatalog {
    descriptions: HashMap<String, String>,
}

impl LabelCatalog {
    /// Catalog with no descriptor loaded; aliases and raw-name fallback
    /// still apply.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads `{name, description}` entries from a JSON descriptor file.
    pub fn from_descriptor_path(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("Opening schema descriptor {path:?}"))?;
        let entries: Vec<DescriptorEntry> = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Parsing schema descriptor {path:?}"))?;
        let descriptions = entries
            .into_iter()
            .map(|entry| (canonical_header(&entry.name), entry.description))
            .collect();
        Ok(Self { descriptions })
    }

    /// Display label for a column: alias, then descriptor, then the raw name.
    pub fn label(&self, column: &str) -> String {
        let canonical = canonical_header(column);
        if let Some((_, alias)) = CUSTOM_ALIASES
            .iter()
            .find(|(name, _)| *name == canonical)
        {
            return (*alias).to_string();
        }
        if let Some(description) = self.descriptions.get(&canonical) {
            return description.clone();
        }
        canonical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_takes_precedence_over_descriptor() {
        let mut descriptions = HashMap::new();
        descriptions.insert(
            "aq_name".to_string(),
            "Name of the aquifer penetrated".to_string(),
        );
        descriptions.insert(
            "site_id".to_string(),
            "GWSI site identifier".to_string(),
        );
        let catalog = LabelCatalog { descriptions };

        assert_eq!(catalog.label("aq_name"), "Aquifer Name");
        assert_eq!(catalog.label("SITE_ID"), "GWSI site identifier");
        assert_eq!(catalog.label("mystery_col"), "mystery_col");
    }

    #[test]
    fn parse_validates_against_the_fixed_enumerations() {
        assert_eq!(ValueColumn::parse("well_depth"), Ok(ValueColumn::WellDepth));
        assert_eq!(ValueColumn::parse(" WL_DTW "), Ok(ValueColumn::WlDtw));
        assert_eq!(GroupColumn::parse("aq_name"), Ok(GroupColumn::AqName));

        assert!(matches!(
            ValueColumn::parse("unit_name"),
            Err(EngineError::InvalidColumn { role: ColumnRole::Value, .. })
        ));
        assert!(matches!(
            GroupColumn::parse("wl_dtw"),
            Err(EngineError::InvalidColumn { role: ColumnRole::GroupBy, .. })
        ));
    }
}
