//! Columnar array container loading
//!
//! A c2array is a dense `rows × cols × depth` cube of loosely typed cells.
//! Only depth 0 carries data in every table this crate reads, but deeper
//! slices are kept addressable.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A single raw cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Bool(bool),
    Number(f64),
    Text(String),
    Null,
}

impl Cell {
    /// True for null, empty text, and the literal number 0
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Null => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(n) => *n == 0.0,
            Cell::Bool(_) => false,
        }
    }
}

/// Table dimensions as declared by the container's `size` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub rows: usize,
    pub cols: usize,
    pub depth: usize,
}

#[derive(Deserialize)]
struct RawContainer {
    #[serde(default)]
    c2array: Option<serde_json::Value>,
    #[serde(default)]
    size: Vec<usize>,
    #[serde(default)]
    data: Vec<Vec<Vec<Cell>>>,
}

/// A loaded, structurally checked c2array table
#[derive(Debug, Clone)]
pub struct C2Array {
    source: String,
    dimensions: Dimensions,
    data: Vec<Vec<Vec<Cell>>>,
}

impl C2Array {
    /// Load and check a container from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::format(path.display().to_string(), e.to_string()))?;
        Self::from_json_str(&path.display().to_string(), &content)
    }

    /// Parse a container from JSON text. `source` is only used in error messages.
    pub fn from_json_str(source: &str, content: &str) -> Result<Self> {
        let raw: RawContainer = serde_json::from_str(content)
            .map_err(|e| Error::format(source, format!("not valid JSON: {}", e)))?;
        Self::from_raw(source, raw)
    }

    /// Build a container from an already parsed JSON value.
    pub fn from_value(source: &str, value: serde_json::Value) -> Result<Self> {
        let raw: RawContainer = serde_json::from_value(value)
            .map_err(|e| Error::format(source, format!("unexpected structure: {}", e)))?;
        Self::from_raw(source, raw)
    }

    fn from_raw(source: &str, raw: RawContainer) -> Result<Self> {
        match raw.c2array {
            None | Some(serde_json::Value::Null) | Some(serde_json::Value::Bool(false)) => {
                return Err(Error::format(source, "Not a valid c2array format"));
            }
            Some(_) => {}
        }

        let dimensions = match raw.size.as_slice() {
            [rows, cols, depth] => Dimensions {
                rows: *rows,
                cols: *cols,
                depth: *depth,
            },
            other => {
                return Err(Error::format(
                    source,
                    format!("size must have 3 entries, got {}", other.len()),
                ))
            }
        };

        if raw.data.len() != dimensions.rows {
            return Err(Error::format(
                source,
                format!(
                    "declared {} rows but data has {}",
                    dimensions.rows,
                    raw.data.len()
                ),
            ));
        }

        for (r, row) in raw.data.iter().enumerate() {
            if row.len() != dimensions.cols {
                return Err(Error::format(
                    source,
                    format!(
                        "row {} has {} columns, expected {}",
                        r,
                        row.len(),
                        dimensions.cols
                    ),
                ));
            }
            if let Some(c) = row.iter().position(|stack| stack.len() != dimensions.depth) {
                return Err(Error::format(
                    source,
                    format!("cell ({}, {}) depth differs from {}", r, c, dimensions.depth),
                ));
            }
        }

        Ok(Self {
            source: source.to_string(),
            dimensions,
            data: raw.data,
        })
    }

    /// Where this container was loaded from
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Get a cell, or `None` when any index is out of range
    pub fn cell(&self, row: usize, col: usize, depth: usize) -> Option<&Cell> {
        self.data.get(row)?.get(col)?.get(depth)
    }

    /// Raw row access including the header row
    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        self.data.get(index).map(|cells| Row { index, cells })
    }

    /// Iterate data rows `1..rows`. Calling again restarts from the first data row.
    pub fn rows(&self) -> Rows<'_> {
        Rows {
            container: self,
            next: 1,
        }
    }

    /// Number of data rows (header excluded)
    pub fn data_row_count(&self) -> usize {
        self.dimensions.rows.saturating_sub(1)
    }
}

/// One row of a container
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    pub index: usize,
    pub cells: &'a [Vec<Cell>],
}

impl<'a> Row<'a> {
    /// Depth-0 cell at `col`
    pub fn get(&self, col: usize) -> Option<&'a Cell> {
        self.get_at(col, 0)
    }

    pub fn get_at(&self, col: usize, depth: usize) -> Option<&'a Cell> {
        self.cells.get(col)?.get(depth)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Iterator over data rows, see [`C2Array::rows`]
#[derive(Debug, Clone)]
pub struct Rows<'a> {
    container: &'a C2Array,
    next: usize,
}

impl<'a> Iterator for Rows<'a> {
    type Item = Row<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.container.row(self.next)?;
        self.next += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.container.dimensions.rows.saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Rows<'_> {}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    /// Build a container from rows of depth-0 cells. A header row is prepended.
    pub(crate) fn table(rows: Vec<Vec<serde_json::Value>>) -> C2Array {
        let cols = rows.iter().map(|r| r.len()).max().unwrap_or(1);
        let mut data = vec![vec![vec![json!("header")]; cols]];
        for row in rows {
            let mut cells: Vec<Vec<serde_json::Value>> = row.into_iter().map(|v| vec![v]).collect();
            cells.resize(cols, vec![json!(0)]);
            data.push(cells);
        }
        let value = json!({ "c2array": true, "size": [data.len(), cols, 1], "data": data });
        C2Array::from_value("test", value).unwrap()
    }

    #[test]
    fn test_rows_skip_header_and_restart() {
        let arr = table(vec![
            vec![json!(1), json!("甲")],
            vec![json!(2), json!("乙")],
            vec![json!(3), json!("丙")],
        ]);

        assert_eq!(arr.dimensions().rows, 4);
        assert_eq!(arr.rows().len(), 3);

        let first: Vec<usize> = arr.rows().map(|r| r.index).collect();
        let second: Vec<usize> = arr.rows().map(|r| r.index).collect();
        assert_eq!(first, vec![1, 2, 3]);
        assert_eq!(first, second);

        let names: Vec<&Cell> = arr.rows().filter_map(|r| r.get(1)).collect();
        assert_eq!(names[2], &Cell::Text("丙".to_string()));
    }

    #[test]
    fn test_cell_out_of_range_is_none() {
        let arr = table(vec![vec![json!(1), json!("a")]]);
        assert_eq!(arr.cell(1, 0, 0), Some(&Cell::Number(1.0)));
        assert!(arr.cell(1, 5, 0).is_none());
        assert!(arr.cell(9, 0, 0).is_none());
        assert!(arr.cell(1, 0, 3).is_none());
    }

    #[test]
    fn test_missing_marker_is_format_error() {
        let err = C2Array::from_json_str("x.json", r#"{"size":[1,1,1],"data":[[[0]]]}"#)
            .unwrap_err();
        assert!(matches!(err, Error::Format { .. }));
        assert!(err.to_string().contains("Not a valid c2array format"));
    }

    #[test]
    fn test_dimension_mismatch_is_format_error() {
        let err = C2Array::from_json_str(
            "x.json",
            r#"{"c2array":true,"size":[3,1,1],"data":[[[0]],[[1]]]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("declared 3 rows"));

        let err = C2Array::from_json_str(
            "x.json",
            r#"{"c2array":true,"size":[1,2,1],"data":[[[0]]]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("expected 2"));
    }

    #[test]
    fn test_invalid_json_is_format_error() {
        let err = C2Array::from_json_str("x.json", "{not json").unwrap_err();
        assert!(matches!(err, Error::Format { .. }));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("js.json");
        std::fs::write(
            &path,
            r#"{"c2array":true,"size":[2,2,1],"data":[[["id"],["name"]],[[7],["x"]]]}"#,
        )
        .unwrap();

        let arr = C2Array::load(&path).unwrap();
        assert_eq!(arr.data_row_count(), 1);
        assert_eq!(arr.cell(1, 0, 0), Some(&Cell::Number(7.0)));

        let missing = C2Array::load(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(missing, Error::Format { .. }));
    }

    #[test]
    fn test_cell_blank() {
        assert!(Cell::Null.is_blank());
        assert!(Cell::Number(0.0).is_blank());
        assert!(Cell::Text("  ".into()).is_blank());
        assert!(!Cell::Bool(false).is_blank());
        assert!(!Cell::Number(0.5).is_blank());
    }
}
