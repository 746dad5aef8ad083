//! Cross-collection reference lookups
//!
//! Registered records are held as JSON values so one resolver can serve
//! every entity type; [`Resolver::resolve_as`] gets the typed record back.
//! Id `0` is the "no reference" sentinel everywhere.

use crate::entity::{Entity, EntityKind};
use crate::{Error, Result};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Default)]
struct Collection {
    records: Vec<Value>,
    by_id: HashMap<i64, usize>,
    /// Secondary indexes by field name, built on demand
    indexes: HashMap<String, HashMap<String, Vec<usize>>>,
}

/// Index key for a field value; strings are used unquoted
fn index_key(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[derive(Debug, Clone, Default)]
pub struct Resolver {
    collections: BTreeMap<EntityKind, Collection>,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace everything registered for `T::KIND` with `records`
    pub fn register<T: Entity>(&mut self, records: &[T]) -> Result<()> {
        let mut collection = Collection::default();
        for record in records {
            collection.by_id.insert(record.id(), collection.records.len());
            collection.records.push(serde_json::to_value(record)?);
        }
        tracing::debug!("Registered {} {} records", records.len(), T::KIND);
        self.collections.insert(T::KIND, collection);
        Ok(())
    }

    pub fn contains(&self, id: i64, kind: EntityKind) -> bool {
        self.collections
            .get(&kind)
            .is_some_and(|c| c.by_id.contains_key(&id))
    }

    pub fn resolve(&self, id: i64, kind: EntityKind) -> Option<&Value> {
        let collection = self.collections.get(&kind)?;
        collection.by_id.get(&id).map(|&i| &collection.records[i])
    }

    /// Resolve each id in order, dropping misses
    pub fn resolve_many(&self, ids: &[i64], kind: EntityKind) -> Vec<&Value> {
        ids.iter().filter_map(|&id| self.resolve(id, kind)).collect()
    }

    /// Typed copy of a registered record
    pub fn resolve_as<T: Entity>(&self, id: i64) -> Result<Option<T>> {
        self.resolve(id, T::KIND)
            .map(|v| serde_json::from_value(v.clone()))
            .transpose()
            .map_err(Error::from)
    }

    /// `Ok` when `id` is absent, `0`, or names a registered record
    pub fn validate_reference(&self, id: Option<i64>, kind: EntityKind, field: &str) -> Result<()> {
        match id {
            None | Some(0) => Ok(()),
            Some(id) if self.contains(id, kind) => Ok(()),
            Some(id) => Err(Error::Reference {
                field: field.to_string(),
                id,
                kind,
            }),
        }
    }

    /// Build (or rebuild) a lookup index on `field` for `kind`
    pub fn build_index(&mut self, kind: EntityKind, field: &str) {
        let Some(collection) = self.collections.get_mut(&kind) else {
            return;
        };
        let mut index: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, record) in collection.records.iter().enumerate() {
            if let Some(key) = record.get(field).and_then(index_key) {
                index.entry(key).or_default().push(i);
            }
        }
        collection.indexes.insert(field.to_string(), index);
    }

    /// Records of `kind` whose `field` equals `value`.
    ///
    /// Uses the index from [`build_index`](Self::build_index) when there is
    /// one, otherwise scans.
    pub fn lookup_by(&self, kind: EntityKind, field: &str, value: &Value) -> Vec<&Value> {
        let Some(collection) = self.collections.get(&kind) else {
            return Vec::new();
        };
        let Some(key) = index_key(value) else {
            return Vec::new();
        };

        match collection.indexes.get(field) {
            Some(index) => index
                .get(&key)
                .map(|hits| hits.iter().map(|&i| &collection.records[i]).collect())
                .unwrap_or_default(),
            None => collection
                .records
                .iter()
                .filter(|r| r.get(field).and_then(index_key).as_deref() == Some(key.as_str()))
                .collect(),
        }
    }

    /// Everything registered for `kind`, in registration order
    pub fn get_all(&self, kind: EntityKind) -> &[Value] {
        self.collections
            .get(&kind)
            .map(|c| c.records.as_slice())
            .unwrap_or(&[])
    }
}
