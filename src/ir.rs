use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Result, SungearError};

/// One named input list. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct ListSet {
    pub name: String,
    pub genes: BTreeSet<String>,
}

impl ListSet {
    pub fn new<I, S>(name: impl Into<String>, genes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            genes: genes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, gene: &str) -> bool {
        self.genes.contains(gene)
    }
}

/// The ordered input lists plus the restricted gene universe they span.
///
/// Construction applies the optional universe filter; a list whose genes
/// are all excluded keeps its slot as a zero-member set so that anchor
/// assignment stays stable while node enumeration skips it. Each request
/// builds its own registry; nothing here is shared across invocations.
#[derive(Debug, Clone)]
pub struct SetRegistry {
    lists: Vec<ListSet>,
    universe: BTreeSet<String>,
    filtered: bool,
    metadata: BTreeMap<String, serde_json::Value>,
}

impl SetRegistry {
    pub fn from_lists(lists: Vec<ListSet>) -> Result<Self> {
        Self::with_filter(lists, None)
    }

    pub fn with_filter(lists: Vec<ListSet>, filter: Option<&BTreeSet<String>>) -> Result<Self> {
        let loaded = lists.iter().filter(|l| !l.genes.is_empty()).count();
        if loaded < 2 {
            return Err(SungearError::InsufficientInput);
        }

        let lists: Vec<ListSet> = match filter {
            Some(keep) => lists
                .into_iter()
                .map(|l| ListSet {
                    name: l.name,
                    genes: l.genes.intersection(keep).cloned().collect(),
                })
                .collect(),
            None => lists,
        };

        let mut universe = BTreeSet::new();
        for list in &lists {
            universe.extend(list.genes.iter().cloned());
        }
        if universe.is_empty() {
            return Err(SungearError::EmptyUniverse);
        }

        Ok(Self {
            lists,
            universe,
            filtered: filter.is_some(),
            metadata: BTreeMap::new(),
        })
    }

    /// Per-list metadata passed through to the layout output. Looking the
    /// metadata up is the caller's concern.
    pub fn set_metadata(&mut self, metadata: BTreeMap<String, serde_json::Value>) {
        self.metadata = metadata;
    }

    pub fn lists(&self) -> &[ListSet] {
        &self.lists
    }

    pub fn universe(&self) -> &BTreeSet<String> {
        &self.universe
    }

    pub fn filtered(&self) -> bool {
        self.filtered
    }

    pub fn metadata(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.metadata
    }
}
