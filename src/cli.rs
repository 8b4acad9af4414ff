use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::layers::LayerKind;

#[derive(Debug, Parser)]
#[command(author, version, about = "Explore groundwater well records", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the recognized value and group-by columns with display labels
    Columns(ColumnsArgs),
    /// Grouped summary statistics for a value column
    Stats(StatsArgs),
    /// Export filtered well records as CSV
    Export(ExportArgs),
    /// Derive vertical well intervals grouped by water use
    Profile(ProfileArgs),
    /// Inspect a boundary layer used as a map backdrop
    Layer(LayerArgs),
}

#[derive(Debug, Args)]
pub struct ColumnsArgs {
    /// Schema descriptor JSON ({name, description} entries) for labels
    #[arg(short = 'd', long = "descriptor")]
    pub descriptor: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Well table CSV file ('-' reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Value column to analyze (well_depth, wl_dtw, wl_elev)
    #[arg(short = 'v', long = "value")]
    pub value: String,
    /// Categorical column to group by
    #[arg(short = 'g', long = "group-by")]
    pub group_by: String,
    /// Narrow to one group before computing statistics
    #[arg(long = "group")]
    pub group: Option<String>,
    /// Schema descriptor JSON for display labels
    #[arg(short = 'd', long = "descriptor")]
    pub descriptor: Option<PathBuf>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Well table CSV file ('-' reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Categorical column to filter on
    #[arg(short = 'g', long = "group-by")]
    pub group_by: String,
    /// Group value to keep ("All" or omitted exports everything)
    #[arg(long = "group")]
    pub group: Option<String>,
    /// Output file; defaults to filtered_wells_<group>.csv ('-' for stdout)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
}

#[derive(Debug, Args)]
pub struct ProfileArgs {
    /// Well table CSV file ('-' reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Water-use metadata CSV keyed by objectid
    #[arg(short = 'm', long = "metadata")]
    pub metadata: Option<PathBuf>,
    /// Vertical extent mode: depth_to_water or well_depth
    #[arg(long = "mode", default_value = "depth_to_water")]
    pub mode: String,
    /// Categorical column to filter on before profiling
    #[arg(short = 'g', long = "group-by")]
    pub group_by: Option<String>,
    /// Group value to keep
    #[arg(long = "group")]
    pub group: Option<String>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
}

#[derive(Debug, Args)]
pub struct LayerArgs {
    /// Boundary layer GeoJSON file
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Which backdrop layer this file is
    #[arg(short = 'k', long = "kind", value_enum)]
    pub kind: LayerKindArg,
    /// Property holding each feature's display name (layer default if omitted)
    #[arg(long = "name-property")]
    pub name_property: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LayerKindArg {
    State,
    Subbasins,
    ManagementAreas,
    Aquifers,
}

impl LayerKindArg {
    pub fn kind(&self) -> LayerKind {
        match self {
            LayerKindArg::State => LayerKind::StateBoundary,
            LayerKindArg::Subbasins => LayerKind::Subbasins,
            LayerKindArg::ManagementAreas => LayerKind::ManagementAreas,
            LayerKindArg::Aquifers => LayerKind::Aquifers,
        }
    }
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "pipe" | "|" => Ok(b'|'),
        "semicolon" | ";" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimiter_parser_accepts_names_and_single_characters() {
        assert_eq!(parse_delimiter("tab"), Ok(b'\t'));
        assert_eq!(parse_delimiter(";"), Ok(b';'));
        assert_eq!(parse_delimiter("|"), Ok(b'|'));
        assert!(parse_delimiter("ab").is_err());
        assert!(parse_delimiter("").is_err());
    }
}
