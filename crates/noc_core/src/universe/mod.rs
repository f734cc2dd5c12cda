use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::domain::{EntityKey, Incident};

/// The set of entities that "exist" for a report, per category.
///
/// Entities listed here are reported even when they had no incident in the window (at 100%).
/// It either comes from configuration or is derived from the full incident history.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntityUniverse {
    by_category: BTreeMap<String, BTreeSet<String>>,
}

impl EntityUniverse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Universe from configured category → entity id lists. Blank ids are ignored.
    pub fn from_config<I, C, E>(entries: I) -> Self
    where
        I: IntoIterator<Item = (C, Vec<E>)>,
        C: Into<String>,
        E: Into<String>,
    {
        let mut universe = Self::new();
        for (category, ids) in entries {
            let category = category.into();
            for id in ids {
                universe.insert(category.clone(), id);
            }
        }
        universe
    }

    /// Every entity id ever seen in `incidents`, regardless of dates or cause.
    ///
    /// Retired devices keep showing up at 100% as long as their old records exist.
    pub fn derive_from_history(incidents: &[Incident]) -> Self {
        let mut universe = Self::new();
        for inc in incidents {
            universe.insert(inc.category.clone(), inc.entity_id.clone());
        }
        universe
    }

    /// Add one entity, normalized the same way as [`EntityKey::new`]. Blank ids are ignored.
    pub fn insert(&mut self, category: impl Into<String>, entity_id: impl Into<String>) {
        let key = EntityKey::new(category, entity_id);
        if key.entity_id.is_empty() {
            return;
        }
        self.by_category
            .entry(key.category)
            .or_default()
            .insert(key.entity_id);
    }

    /// Union of two universes.
    pub fn merged(mut self, other: &EntityUniverse) -> Self {
        for (category, ids) in &other.by_category {
            let entry = self.by_category.entry(category.clone()).or_default();
            entry.extend(ids.iter().cloned());
        }
        self
    }

    pub fn contains(&self, key: &EntityKey) -> bool {
        self.by_category
            .get(&key.category)
            .is_some_and(|ids| ids.contains(&key.entity_id))
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.by_category.keys().map(String::as_str)
    }

    pub fn entities(&self, category: &str) -> impl Iterator<Item = &str> {
        self.by_category
            .get(category)
            .into_iter()
            .flat_map(|ids| ids.iter().map(String::as_str))
    }

    pub fn keys(&self) -> impl Iterator<Item = EntityKey> + '_ {
        self.by_category.iter().flat_map(|(category, ids)| {
            ids.iter()
                .map(move |id| EntityKey::new(category.clone(), id.clone()))
        })
    }

    pub fn len(&self) -> usize {
        self.by_category.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
