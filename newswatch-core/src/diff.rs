use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::record::NewsRecord;

/// Identities observed so far, in the order they were first seen.
///
/// Entries are only ever appended. Serialized as a plain JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SeenSet {
    order: Vec<String>,
    index: HashSet<String>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.index.contains(identity)
    }

    /// Appends `identity`; returns `false` if it was already present.
    pub fn insert(&mut self, identity: String) -> bool {
        if self.index.contains(&identity) {
            return false;
        }
        self.index.insert(identity.clone());
        self.order.push(identity);
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn is_superset_of(&self, other: &SeenSet) -> bool {
        other.iter().all(|identity| self.contains(identity))
    }
}

impl From<Vec<String>> for SeenSet {
    fn from(identities: Vec<String>) -> Self {
        let mut set = SeenSet::new();
        for identity in identities {
            set.insert(identity);
        }
        set
    }
}

impl From<SeenSet> for Vec<String> {
    fn from(set: SeenSet) -> Self {
        set.order
    }
}

/// Splits `candidates` into newly observed records, appending their
/// identities to `seen`.
///
/// Known records are dropped. A record repeated within the same batch is
/// reported only at its first occurrence. Source order is preserved.
pub fn diff(candidates: Vec<NewsRecord>, seen: &mut SeenSet) -> Vec<NewsRecord> {
    candidates
        .into_iter()
        .filter(|record| seen.insert(record.identity()))
        .collect()
}
