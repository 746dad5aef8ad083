//! Extraction pipeline for Construct 2 `c2array` game data
//!
//! The game ships its data as positional tables with no field names. This crate
//! recovers typed, cross-referenced, localized records from them.
//!
//! # Format Overview
//!
//! ## c2array container
//!
//! ```json
//! { "c2array": true, "size": [rows, cols, depth], "data": [[[cell, ...], ...], ...] }
//! ```
//!
//! - Row 0 is a header/reserved row and is never parsed
//! - Cells are numbers, strings, booleans or null
//! - Columns carry no names; layouts live in [`schema`]
//!
//! ## Source directory
//!
//! One container per entity type (`js.json` heroes, `mg.json` talents, ...),
//! one translation table (`lau.json`) and optionally the raw engine export
//! (`data.json`) holding sprite atlas definitions.
//!
//! # Pipeline
//!
//! [`c2array`] → [`coerce`] → [`mapper`] → [`lang`] → [`parsers`] →
//! [`sprite`] → [`resolver`], sequenced by [`pipeline::Pipeline`].

pub mod c2array;
pub mod coerce;
pub mod entity;
pub mod formula;
pub mod lang;
mod locale;
pub mod mapper;
pub mod parse;
pub mod parsers;
pub mod pipeline;
pub mod resolver;
pub mod schema;
pub mod sprite;

pub use c2array::{C2Array, Cell, Dimensions, Row, Rows};
pub use entity::{Entity, EntityKind, Localized};
pub use formula::{LookupTableFormula, PercentPerLevel};
pub use lang::{LanguageEntry, LanguageTable};
pub use locale::Locale;
pub use mapper::{FieldMapper, FieldSpec, FieldType, MappedRow, Value, ZeroPolicy};
pub use parse::{ParseOptions, ParseResult, ParseStats, TableParser};
pub use pipeline::{Collections, Pipeline, PipelineOptions, RunSummary, Source};
pub use resolver::Resolver;
pub use sprite::{Placement, PlacementSource, SpriteOptions, SpriteResolver};

/// Errors from table loading, parsing and export
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid c2array container {path}: {reason}")]
    Format { path: String, reason: String },

    #[error("Row {row}: {reason}")]
    Row { row: usize, reason: String },

    #[error("Required field missing at column {column}")]
    MissingField { column: usize },

    #[error("Invalid reference {field}={id} to {kind}")]
    Reference {
        field: String,
        id: i64,
        kind: EntityKind,
    },

    #[error("Failed to parse {kind}: {source}")]
    Strict {
        kind: EntityKind,
        #[source]
        source: Box<Error>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn format(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Format {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn row(row: usize, reason: impl Into<String>) -> Self {
        Self::Row {
            row,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::format("js.json", "missing c2array marker");
        assert!(err.to_string().contains("Invalid c2array container js.json"));

        let err = Error::row(4, "duplicate id 12");
        assert_eq!(err.to_string(), "Row 4: duplicate id 12");

        let err = Error::MissingField { column: 3 };
        assert!(err.to_string().contains("column 3"));

        let err = Error::Reference {
            field: "talents".to_string(),
            id: 77,
            kind: EntityKind::Talent,
        };
        assert_eq!(err.to_string(), "Invalid reference talents=77 to talent");

        let err = Error::Strict {
            kind: EntityKind::Hero,
            source: Box::new(Error::row(2, "bad")),
        };
        assert!(err.to_string().starts_with("Failed to parse hero"));
    }
}
