use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::StationId;

/// Canonical station name → alternative spellings/abbreviations that must
/// resolve to that station. Lower-case, accent-preserving. Synonym sets of
/// distinct stations are disjoint by construction; at query time the first
/// match wins in iteration order, which the sorted map keeps stable across
/// process restarts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SynonymTable {
    /// lowercase synonym -> canonical station id
    entries: BTreeMap<String, StationId>,
}

impl SynonymTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a synonym. If the synonym already maps to a different
    /// station, the first registration wins (deterministic iteration order).
    pub fn insert(&mut self, synonym: &str, canonical: StationId) {
        self.entries
            .entry(synonym.to_lowercase())
            .or_insert(canonical);
    }

    pub fn resolve(&self, candidate: &str) -> Option<&StationId> {
        self.entries.get(&candidate.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &StationId)> {
        self.entries.iter()
    }
}
