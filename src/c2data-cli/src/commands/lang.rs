//! Translation table diagnostics

use anyhow::{Context, Result};
use c2data::{LanguageEntry, LanguageTable, Locale};
use std::path::Path;

fn print_entry(entry: &LanguageEntry) {
    println!("  id:         {}", entry.id);
    println!("  source:     {}", entry.source);
    println!("  translated: {}", entry.translated);
}

pub fn handle(dir: &Path, locale: Locale, text: Option<&str>, id: Option<i64>) -> Result<()> {
    let table = LanguageTable::load(dir, locale)
        .with_context(|| format!("Failed to load translation table from {}", dir.display()))?;

    println!("{} entries ({})", table.len(), locale);

    if let Some(text) = text {
        match table.entry(text) {
            Some(entry) => print_entry(entry),
            None => println!("No entry for {:?}", text),
        }
    } else if let Some(id) = id {
        match table.lookup_by_id(id) {
            Some(entry) => print_entry(entry),
            None => println!("No entry with id {}", id),
        }
    } else {
        println!();
        println!("Usage: c2data lang DIR --text <canonical text>");
        println!("   or: c2data lang DIR --id <row id>");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("lau.json"),
            r#"{"c2array":true,"size":[2,3,1],"data":[[["id"],["cn"],["tr"]],[[1],["曹操"],["Cao Cao"]]]}"#,
        )
        .unwrap();

        assert!(handle(dir.path(), Locale::En, Some("曹操"), None).is_ok());
        assert!(handle(dir.path(), Locale::En, None, Some(1)).is_ok());
        assert!(handle(dir.path(), Locale::En, None, None).is_ok());

        let empty = tempfile::tempdir().unwrap();
        assert!(handle(empty.path(), Locale::En, None, None).is_err());
    }
}
