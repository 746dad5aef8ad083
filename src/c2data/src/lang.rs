//! Language lookup table (`lau.json`)
//!
//! Rows are `[id, sourceText, translatedText]`. Lookups are exact matches on
//! the canonical Chinese text, so callers pass `nameCN` and never an
//! already-translated variant.

use crate::c2array::C2Array;
use crate::coerce;
use crate::locale::Locale;
use crate::schema::language as col;
use crate::Result;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

/// One translation row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageEntry {
    pub id: i64,
    pub source: String,
    pub translated: String,
}

/// Immutable source-text → translation map for one locale
#[derive(Debug, Clone, Default)]
pub struct LanguageTable {
    locale: Locale,
    entries: Vec<LanguageEntry>,
    by_source: HashMap<String, usize>,
    /// First row seen for each source text, before any replacement
    first_by_source: HashMap<String, LanguageEntry>,
}

impl LanguageTable {
    /// A table that translates nothing
    pub fn empty(locale: Locale) -> Self {
        Self {
            locale,
            ..Default::default()
        }
    }

    /// Load `lau.json` from a source directory
    pub fn load<P: AsRef<Path>>(dir: P, locale: Locale) -> Result<Self> {
        let arr = C2Array::load(dir.as_ref().join(col::FILE))?;
        Ok(Self::from_c2array(&arr, locale))
    }

    pub fn from_c2array(arr: &C2Array, locale: Locale) -> Self {
        let mut table = Self::empty(locale);
        for row in arr.rows() {
            let source = coerce::to_string(row.get(col::SOURCE_TEXT), "");
            if source.is_empty() {
                continue;
            }
            let entry = LanguageEntry {
                id: coerce::to_integer(row.get(col::ID), 0),
                translated: coerce::strip_markup(&coerce::to_string(
                    row.get(col::TRANSLATED_TEXT),
                    "",
                )),
                source,
            };
            table.insert(entry);
        }
        tracing::debug!(
            "Loaded {} {} translations from {}",
            table.len(),
            locale,
            arr.source()
        );
        table
    }

    /// Later rows with the same source text replace earlier ones in place
    fn insert(&mut self, entry: LanguageEntry) {
        self.first_by_source
            .entry(entry.source.clone())
            .or_insert_with(|| entry.clone());
        match self.by_source.get(&entry.source) {
            Some(&idx) => self.entries[idx] = entry,
            None => {
                self.by_source.insert(entry.source.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Translated text for exactly this source text, if any
    pub fn lookup(&self, source: &str) -> Option<&str> {
        self.entry(source)
            .map(|e| e.translated.as_str())
            .filter(|t| !t.is_empty())
    }

    /// Full entry for a source text
    pub fn entry(&self, source: &str) -> Option<&LanguageEntry> {
        let key = source.trim();
        if key.is_empty() {
            return None;
        }
        self.by_source.get(key).map(|&idx| &self.entries[idx])
    }

    /// The earliest row for a source text, ignoring later replacements
    pub fn first_entry(&self, source: &str) -> Option<&LanguageEntry> {
        let key = source.trim();
        if key.is_empty() {
            return None;
        }
        self.first_by_source.get(key)
    }

    /// Reverse scan by row id. Linear; meant for diagnostics.
    pub fn lookup_by_id(&self, id: i64) -> Option<&LanguageEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn entries(&self) -> impl Iterator<Item = &LanguageEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
