//! Result Store
//!
//! Injected storage for finished analyses. IDs come from an explicit
//! allocator owned by the store instance, so separate stores never share
//! state.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{AnalysisId, AnalysisResult};

/// Storage seam for analysis results
pub trait ResultStore: Send + Sync {
    fn insert(&self, result: AnalysisResult) -> AnalysisId;

    fn get(&self, id: AnalysisId) -> Option<StoredAnalysis>;

    /// All stored analyses, oldest first
    fn list(&self) -> Vec<StoredAnalysis>;

    fn remove(&self, id: AnalysisId) -> Option<StoredAnalysis>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Monotonic ID source. Starts at 1; IDs are never reused.
#[derive(Debug)]
pub struct IdAllocator {
    next: AtomicU64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }
}

impl IdAllocator {
    pub fn next_id(&self) -> AnalysisId {
        AnalysisId::new(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAnalysis {
    pub id: AnalysisId,
    pub created_at: DateTime<Utc>,
    pub result: AnalysisResult,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    ids: IdAllocator,
    entries: DashMap<AnalysisId, StoredAnalysis>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResultStore for InMemoryStore {
    fn insert(&self, result: AnalysisResult) -> AnalysisId {
        let id = self.ids.next_id();
        debug!(%id, filename = %result.filename, "Stored analysis");
        self.entries.insert(
            id,
            StoredAnalysis {
                id,
                created_at: Utc::now(),
                result,
            },
        );
        id
    }

    fn get(&self, id: AnalysisId) -> Option<StoredAnalysis> {
        self.entries.get(&id).map(|entry| entry.value().clone())
    }

    fn list(&self) -> Vec<StoredAnalysis> {
        let mut all: Vec<StoredAnalysis> = self
            .entries
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        all.sort_by_key(|stored| stored.id);
        all
    }

    fn remove(&self, id: AnalysisId) -> Option<StoredAnalysis> {
        self.entries.remove(&id).map(|(_, stored)| stored)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::Optimizer;
    use crate::types::AnalysisRequest;
    use std::sync::Arc;
    use std::thread;

    fn sample(name: &str) -> AnalysisResult {
        Optimizer::builtin().analyze(&AnalysisRequest::new("let x = 1;", name, "javascript"))
    }

    #[test]
    fn test_insert_get_remove() {
        let store = InMemoryStore::new();
        assert!(store.is_empty());

        let first = store.insert(sample("a.js"));
        let second = store.insert(sample("b.js"));
        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 2);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(first).unwrap().result.filename, "a.js");

        let removed = store.remove(first).unwrap();
        assert_eq!(removed.id, first);
        assert!(store.get(first).is_none());

        // Removed IDs are not handed out again
        let third = store.insert(sample("c.js"));
        assert_eq!(third.get(), 3);
    }

    #[test]
    fn test_list_ordered_by_id() {
        let store = InMemoryStore::new();
        for name in ["a.js", "b.js", "c.js"] {
            store.insert(sample(name));
        }
        let names: Vec<_> = store
            .list()
            .into_iter()
            .map(|s| s.result.filename)
            .collect();
        assert_eq!(names, vec!["a.js", "b.js", "c.js"]);
    }

    #[test]
    fn test_separate_stores_do_not_share_ids() {
        let a = InMemoryStore::new();
        let b = InMemoryStore::new();
        assert_eq!(a.insert(sample("a.js")), b.insert(sample("b.js")));
    }

    #[test]
    fn test_concurrent_inserts_get_unique_ids() {
        let store = Arc::new(InMemoryStore::new());
        let result = sample("t.js");
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                let result = result.clone();
                thread::spawn(move || (0..25).map(|_| store.insert(result.clone())).count())
            })
            .collect();
        let total: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

        assert_eq!(total, 200);
        assert_eq!(store.len(), 200);
        assert_eq!(store.list().last().unwrap().id.get(), 200);
    }
}
