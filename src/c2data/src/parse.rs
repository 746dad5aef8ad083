//! Table parsing driver
//!
//! Every domain parser implements [`TableParser`] for a single row; the
//! shared driver here owns row iteration, id validity, duplicate detection
//! and the skip-or-abort error policy.

use crate::c2array::{C2Array, Row};
use crate::coerce;
use crate::entity::{Entity, EntityKind};
use crate::lang::LanguageTable;
use crate::locale::Locale;
use crate::mapper::ZeroPolicy;
use crate::{Error, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

/// Per-run parsing options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Locale of the source directory being parsed
    pub locale: Locale,
    /// Record failing rows and continue instead of aborting the table
    pub skip_errors: bool,
    pub zero_policy: ZeroPolicy,
}

/// Row counts for one table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseStats {
    /// Data rows in the table, header excluded
    pub total: usize,
    pub parsed: usize,
    pub failed: usize,
    pub warnings: usize,
}

/// Records plus everything that went wrong producing them
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult<T> {
    pub data: Vec<T>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub stats: ParseStats,
}

impl<T> ParseResult<T> {
    /// Result for a table that could not be used at all
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            data: Vec::new(),
            errors: vec![message.into()],
            warnings: Vec::new(),
            stats: ParseStats {
                failed: 1,
                ..Default::default()
            },
        }
    }

    fn finish(data: Vec<T>, errors: Vec<String>, warnings: Vec<String>, total: usize) -> Self {
        let stats = ParseStats {
            total,
            parsed: data.len(),
            failed: errors.len(),
            warnings: warnings.len(),
        };
        Self {
            data,
            errors,
            warnings,
            stats,
        }
    }
}

/// Locale and translations a parser is constructed with
#[derive(Debug, Clone, Copy)]
pub struct ParseContext<'a> {
    pub options: ParseOptions,
    pub lang: &'a LanguageTable,
}

impl<'a> ParseContext<'a> {
    pub fn new(options: ParseOptions, lang: &'a LanguageTable) -> Self {
        Self { options, lang }
    }

    pub fn locale(&self) -> Locale {
        self.options.locale
    }

    /// Translation of canonical text into this context's locale
    pub fn translate(&self, source: &str) -> Option<String> {
        if !self.locale().is_translated() {
            return None;
        }
        self.lang.lookup(source).map(str::to_string)
    }
}

/// Parses one row of one source table into a record
pub trait TableParser {
    type Record: Entity;

    fn parse_row(&self, row: &Row<'_>) -> Result<Self::Record>;

    fn kind(&self) -> EntityKind {
        <Self::Record as Entity>::KIND
    }
}

/// Wrap a field-level failure with its row number
fn at_row(row: usize, err: Error) -> Error {
    match err {
        Error::Row { .. } => err,
        other => Error::row(row, other.to_string()),
    }
}

/// Columns 0 and 1 carry id and canonical name in every table
fn is_blank_row(row: &Row<'_>) -> bool {
    let id_blank = row.get(0).map_or(true, |c| c.is_blank());
    id_blank && coerce::to_string(row.get(1), "").is_empty()
}

/// Parse every data row of `table`.
///
/// Blank rows are skipped with a warning. A row with a non-positive or
/// repeated id, or one the parser rejects, is a row error: recorded and
/// skipped under `skip_errors`, otherwise it aborts the table with
/// [`Error::Strict`].
pub fn parse_table<P: TableParser>(
    parser: &P,
    table: &C2Array,
    options: &ParseOptions,
) -> Result<ParseResult<P::Record>> {
    let kind = parser.kind();
    let mut data = Vec::with_capacity(table.data_row_count());
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut seen = HashSet::new();

    for row in table.rows() {
        if is_blank_row(&row) {
            warnings.push(format!("Row {}: blank row skipped", row.index));
            continue;
        }

        let outcome = check_id(&row)
            .and_then(|_| parser.parse_row(&row))
            .map_err(|e| at_row(row.index, e))
            .and_then(|record| {
                if seen.insert(record.id()) {
                    Ok(record)
                } else {
                    Err(Error::row(row.index, format!("duplicate id {}", record.id())))
                }
            });

        match outcome {
            Ok(record) => data.push(record),
            Err(err) if options.skip_errors => {
                tracing::debug!("{}: {}", kind, err);
                errors.push(err.to_string());
            }
            Err(err) => {
                return Err(Error::Strict {
                    kind,
                    source: Box::new(err),
                })
            }
        }
    }

    tracing::debug!(
        "Parsed {} {} records ({} errors, {} warnings)",
        data.len(),
        kind,
        errors.len(),
        warnings.len()
    );

    Ok(ParseResult::finish(
        data,
        errors,
        warnings,
        table.data_row_count(),
    ))
}

fn check_id(row: &Row<'_>) -> Result<()> {
    let id = coerce::to_integer(row.get(0), 0);
    if id <= 0 {
        return Err(Error::row(row.index, format!("invalid id {}", id)));
    }
    Ok(())
}

/// Load `parser`'s table from `dir` and parse it.
///
/// A missing or malformed container yields an empty result carrying one
/// error; only a strict-mode row failure is returned as `Err`.
pub fn parse_file<P: TableParser>(
    parser: &P,
    dir: &Path,
    options: &ParseOptions,
) -> Result<ParseResult<P::Record>> {
    let kind = parser.kind();
    let path = dir.join(kind.source_file());
    match C2Array::load(&path) {
        Ok(table) => parse_table(parser, &table, options),
        Err(err) => {
            tracing::warn!("Skipping {}: {}", kind, err);
            Ok(ParseResult::failed(format!("Failed to load file: {}", err)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::c2array::tests::table;
    use crate::entity::{impl_entity, Localized};
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Probe {
        id: i64,
        name_cn: String,
        #[serde(flatten)]
        localized: Localized,
    }

    impl_entity!(Probe, EntityKind::Enemy);

    struct ProbeParser;

    impl TableParser for ProbeParser {
        type Record = Probe;

        fn parse_row(&self, row: &Row<'_>) -> Result<Probe> {
            let name_cn = coerce::to_string(row.get(1), "");
            if name_cn == "坏" {
                return Err(Error::MissingField { column: 2 });
            }
            Ok(Probe {
                id: coerce::to_integer(row.get(0), 0),
                name_cn,
                localized: Localized::default(),
            })
        }
    }

    fn lenient() -> ParseOptions {
        ParseOptions {
            skip_errors: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_ids_positive_and_unique() {
        let arr = table(vec![
            vec![json!(1), json!("甲")],
            vec![json!(0), json!("")],
            vec![json!(-4), json!("负")],
            vec![json!(1), json!("重")],
            vec![json!(2), json!("坏")],
            vec![json!(3), json!("丙")],
        ]);
        let result = parse_table(&ProbeParser, &arr, &lenient()).unwrap();

        let ids: Vec<i64> = result.data.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(result.warnings, vec!["Row 2: blank row skipped"]);
        assert_eq!(
            result.errors,
            vec![
                "Row 3: invalid id -4",
                "Row 4: duplicate id 1",
                "Row 5: Required field missing at column 2",
            ]
        );
        assert_eq!(
            result.stats,
            ParseStats {
                total: 6,
                parsed: 2,
                failed: 3,
                warnings: 1
            }
        );
    }

    #[test]
    fn test_strict_mode_aborts_table() {
        let arr = table(vec![vec![json!(1), json!("甲")], vec![json!(1), json!("乙")]]);
        let err = parse_table(&ProbeParser, &arr, &ParseOptions::default()).unwrap_err();
        match err {
            Error::Strict { kind, source } => {
                assert_eq!(kind, EntityKind::Enemy);
                assert_eq!(source.to_string(), "Row 2: duplicate id 1");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_is_one_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = parse_file(&ProbeParser, dir.path(), &ParseOptions::default()).unwrap();
        assert!(result.data.is_empty());
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].starts_with("Failed to load file"));
        assert_eq!(result.stats.failed, 1);
    }

    #[test]
    fn test_translate_respects_locale() {
        let arr = table(vec![vec![json!(1), json!("曹操"), json!("Cao Cao")]]);
        let lang = LanguageTable::from_c2array(&arr, Locale::En);

        let en = ParseContext::new(lenient(), &lang);
        assert_eq!(en.translate("曹操").as_deref(), Some("Cao Cao"));

        let zh = ParseContext::new(
            ParseOptions {
                locale: Locale::Zh,
                ..lenient()
            },
            &lang,
        );
        assert!(zh.translate("曹操").is_none());
    }
}
