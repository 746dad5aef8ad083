//! Inspect command handler

use anyhow::{Context, Result};
use c2data::{C2Array, Cell};
use std::path::Path;

/// Number of data rows previewed when no row is requested
const PREVIEW_ROWS: usize = 5;

fn format_cell(cell: &Cell) -> String {
    match cell {
        Cell::Null => "null".to_string(),
        Cell::Bool(b) => b.to_string(),
        Cell::Number(n) => n.to_string(),
        Cell::Text(s) => format!("{:?}", s),
    }
}

/// Cells of one row, one per line, deeper slices after the first
fn format_row(table: &C2Array, index: usize) -> Option<Vec<String>> {
    let row = table.row(index)?;
    Some(
        row.cells
            .iter()
            .enumerate()
            .map(|(col, stack)| {
                let values: Vec<String> = stack.iter().map(format_cell).collect();
                format!("  [{:3}] {}", col, values.join(" | "))
            })
            .collect(),
    )
}

pub fn handle(input: &Path, row: Option<usize>) -> Result<()> {
    let table = C2Array::load(input).with_context(|| format!("Failed to load {}", input.display()))?;
    let dims = table.dimensions();

    println!("File: {}", input.display());
    println!(
        "Size: {} rows x {} cols x {} depth ({} data rows)",
        dims.rows,
        dims.cols,
        dims.depth,
        table.data_row_count()
    );

    match row {
        Some(index) => {
            let lines = format_row(&table, index)
                .with_context(|| format!("Row {} out of range (0..{})", index, dims.rows))?;
            println!();
            println!("Row {}:", index);
            for line in lines {
                println!("{}", line);
            }
        }
        None => {
            println!();
            for data_row in table.rows().take(PREVIEW_ROWS) {
                let preview: Vec<String> = (0..data_row.len().min(6))
                    .filter_map(|c| data_row.get(c))
                    .map(format_cell)
                    .collect();
                println!("  row {:4}: {}", data_row.index, preview.join(", "));
            }
            if table.data_row_count() > PREVIEW_ROWS {
                println!("  ... ({} more)", table.data_row_count() - PREVIEW_ROWS);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_fixture(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("dr.json");
        std::fs::write(
            &path,
            r#"{"c2array":true,"size":[2,3,1],"data":[[["id"],["name"],["lv"]],[[101],["吕布"],[null]]]}"#,
        )
        .unwrap();
        path
    }

    #[test]
    fn test_format_row() {
        let dir = tempfile::tempdir().unwrap();
        let table = C2Array::load(write_fixture(dir.path())).unwrap();

        let lines = format_row(&table, 1).unwrap();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("101"));
        assert!(lines[1].ends_with("\"吕布\""));
        assert!(lines[2].ends_with("null"));
        assert!(format_row(&table, 5).is_none());
    }

    #[test]
    fn test_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(dir.path());
        assert!(handle(&path, None).is_ok());
        assert!(handle(&path, Some(1)).is_ok());
        assert!(handle(&path, Some(9)).is_err());
        assert!(handle(&dir.path().join("missing.json"), None).is_err());
    }
}
