use thiserror::Error;

/// Which analysis role a column was requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Value,
    GroupBy,
}

impl ColumnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnRole::Value => "value",
            ColumnRole::GroupBy => "group-by",
        }
    }
}

/// Which side of the water-use join is missing its key column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinSide {
    Wells,
    Metadata,
}

impl JoinSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinSide::Wells => "well table",
            JoinSide::Metadata => "metadata table",
        }
    }
}

/// Structural request errors raised by the filtering engine.
///
/// Per-row data gaps (null coordinates, missing depths) are never errors;
/// they are handled by exclusion inside each operation.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EngineError {
    #[error("'{column}' is not a recognized {} column", .role.as_str())]
    InvalidColumn { column: String, role: ColumnRole },

    #[error("unrecognized depth mode '{0}'; expected 'depth_to_water' or 'well_depth'")]
    InvalidParameter(String),

    #[error("join key '{key}' not present in the {}", .side.as_str())]
    MissingJoinKey { key: String, side: JoinSide },
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
