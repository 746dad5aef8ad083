//! Generic column → field mapping
//!
//! A [`FieldMapper`] turns one row's positional cells into a named record
//! using a declared layout. Each field goes through absent-value handling,
//! then type coercion, then an optional transform that may look at sibling
//! cells of the same row.

use crate::c2array::{Cell, Row};
use crate::coerce;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Target type of a mapped field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Number,
    Integer,
    Text,
    Boolean,
    /// Text split on the given separator
    List(char),
    /// Raw cell, unconverted
    Raw,
}

/// A mapped field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl Value {
    fn from_cell(cell: &Cell) -> Self {
        match cell {
            Cell::Null => Value::Null,
            Cell::Bool(b) => Value::Boolean(*b),
            Cell::Number(n) => Value::Number(*n),
            Cell::Text(s) => Value::Text(s.clone()),
        }
    }

    fn to_cell(&self) -> Cell {
        match self {
            Value::Null => Cell::Null,
            Value::Boolean(b) => Cell::Bool(*b),
            Value::Integer(i) => Cell::Number(*i as f64),
            Value::Number(n) => Cell::Number(*n),
            Value::Text(s) => Cell::Text(s.clone()),
            Value::List(items) => Cell::Text(items.join(",")),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Number(n) if n.is_finite() => Some(n.trunc() as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// Post-coercion hook. Receives the coerced value and the whole row.
pub type Transform = fn(Value, &Row<'_>) -> Value;

/// How absent values are detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZeroPolicy {
    /// Only null, missing and empty text are absent; numeric 0 is a real value
    #[default]
    Preserve,
    /// Historical behaviour: numeric 0 is also treated as absent, so a
    /// configured default overwrites legitimate zeros
    LegacyZeroIsAbsent,
}

impl ZeroPolicy {
    fn is_absent(self, cell: Option<&Cell>) -> bool {
        match cell {
            None | Some(Cell::Null) => true,
            Some(Cell::Text(s)) => s.is_empty(),
            Some(Cell::Number(n)) => self == ZeroPolicy::LegacyZeroIsAbsent && *n == 0.0,
            Some(Cell::Bool(_)) => false,
        }
    }
}

/// Layout entry for one field
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub col: usize,
    pub ty: FieldType,
    pub default: Option<Value>,
    pub required: bool,
    pub transform: Option<Transform>,
}

impl FieldSpec {
    pub fn new(col: usize, ty: FieldType) -> Self {
        Self {
            col,
            ty,
            default: None,
            required: false,
            transform: None,
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }
}

/// Named fields extracted from one row
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MappedRow {
    fields: BTreeMap<&'static str, Value>,
}

impl MappedRow {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn number(&self, name: &str) -> f64 {
        self.get(name).and_then(Value::as_f64).unwrap_or(0.0)
    }

    pub fn integer(&self, name: &str) -> i64 {
        self.get(name).and_then(Value::as_i64).unwrap_or(0)
    }

    pub fn text(&self, name: &str) -> String {
        match self.get(name) {
            Some(Value::Text(s)) => s.clone(),
            Some(v @ (Value::Number(_) | Value::Integer(_))) => {
                coerce::to_string(Some(&v.to_cell()), "")
            }
            _ => String::new(),
        }
    }

    pub fn boolean(&self, name: &str) -> bool {
        matches!(self.get(name), Some(Value::Boolean(true)))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Maps a row to named fields according to a layout
#[derive(Debug, Clone, Default)]
pub struct FieldMapper {
    fields: Vec<(&'static str, FieldSpec)>,
    policy: ZeroPolicy,
}

impl FieldMapper {
    pub fn new(policy: ZeroPolicy) -> Self {
        Self {
            fields: Vec::new(),
            policy,
        }
    }

    /// Build from a `(name, column, type)` layout table
    pub fn from_layout(layout: &[(&'static str, usize, FieldType)], policy: ZeroPolicy) -> Self {
        let mut mapper = Self::new(policy);
        for (name, col, ty) in layout {
            mapper = mapper.field(*name, FieldSpec::new(*col, *ty));
        }
        mapper
    }

    /// Add or replace a field
    pub fn field(mut self, name: &'static str, spec: FieldSpec) -> Self {
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = spec,
            None => self.fields.push((name, spec)),
        }
        self
    }

    pub fn policy(&self) -> ZeroPolicy {
        self.policy
    }

    /// Map one row. Fails only when a required field without a default is absent.
    pub fn map(&self, row: &Row<'_>) -> Result<MappedRow> {
        let mut out = MappedRow::default();
        for (name, spec) in &self.fields {
            let value = self.extract(row, spec)?;
            out.fields.insert(*name, value);
        }
        Ok(out)
    }

    fn extract(&self, row: &Row<'_>, spec: &FieldSpec) -> Result<Value> {
        let cell = row.get(spec.col);

        let raw = if self.policy.is_absent(cell) {
            match (&spec.default, spec.required) {
                (Some(default), _) => Some(default.to_cell()),
                (None, true) => return Err(Error::MissingField { column: spec.col }),
                (None, false) => None,
            }
        } else {
            cell.cloned()
        };

        let value = match raw {
            None => Value::Null,
            Some(cell) => convert(&cell, spec.ty),
        };

        Ok(match spec.transform {
            Some(transform) => transform(value, row),
            None => value,
        })
    }
}

fn convert(cell: &Cell, ty: FieldType) -> Value {
    let cell = Some(cell);
    match ty {
        FieldType::Number => Value::Number(coerce::to_number(cell, 0.0)),
        FieldType::Integer => Value::Integer(coerce::to_integer(cell, 0)),
        FieldType::Text => Value::Text(coerce::to_string(cell, "")),
        FieldType::Boolean => Value::Boolean(coerce::to_bool(cell)),
        FieldType::List(sep) => Value::List(coerce::to_array(cell, sep)),
        FieldType::Raw => cell.map(Value::from_cell).unwrap_or(Value::Null),
    }
}
