use crate::{Error, Result};
use std::collections::HashMap;

/// Ordered list of category names; position is the index the models were
/// trained on.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    name: String,
    entries: Vec<String>,
    positions: HashMap<String, usize>,
}

impl CategoryTable {
    pub fn new(name: impl Into<String>, entries: Vec<String>) -> Result<Self> {
        let name = name.into();
        if entries.is_empty() {
            return Err(Error::catalog(format!("table '{}' is empty", name)));
        }

        let mut positions = HashMap::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            if positions.insert(entry.clone(), index).is_some() {
                return Err(Error::catalog(format!(
                    "table '{}' contains '{}' more than once",
                    name, entry
                )));
            }
        }

        Ok(Self {
            name,
            entries,
            positions,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// Exact, case-sensitive reverse lookup.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Resolves a request-supplied index, rejecting anything outside
    /// `[0, len)` as a validation failure on `field`.
    pub fn resolve_index(&self, field: &str, index: i64) -> Result<(usize, &str)> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.get(i).map(|name| (i, name)))
            .ok_or_else(|| {
                Error::validation(
                    field,
                    format!("index {} is out of range [0, {})", index, self.len()),
                )
            })
    }

    pub fn resolve_name(&self, field: &str, name: &str) -> Result<(usize, &str)> {
        self.index_of(name)
            .map(|i| (i, self.entries[i].as_str()))
            .ok_or_else(|| Error::validation(field, format!("unknown {} '{}'", field, name)))
    }
}
