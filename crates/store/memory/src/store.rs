use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use boxes_core::{BoxRecord, NewBox};
use boxes_store::error::StoreError;
use boxes_store::store::BoxStore;

/// In-memory [`BoxStore`] backed by a [`DashMap`]. Suitable for development
/// and testing.
///
/// Ids come from an atomic counter starting at 1, so concurrent inserts
/// never share an id. Nothing survives a restart.
#[derive(Debug)]
pub struct MemoryBoxStore {
    boxes: DashMap<i64, BoxRecord>,
    next_id: AtomicI64,
}

impl MemoryBoxStore {
    /// Create a new, empty in-memory box store.
    pub fn new() -> Self {
        Self {
            boxes: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of stored boxes.
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Whether no box has been stored.
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

impl Default for MemoryBoxStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BoxStore for MemoryBoxStore {
    async fn insert(&self, new_box: NewBox) -> Result<BoxRecord, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let record = new_box.into_record(id, Utc::now());
        self.boxes.insert(id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: i64) -> Result<Option<BoxRecord>, StoreError> {
        Ok(self.boxes.get(&id).map(|r| r.value().clone()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn conformance() {
        let store = MemoryBoxStore::new();
        boxes_store::testing::run_store_conformance_tests(&store)
            .await
            .expect("conformance tests should pass");
    }

    #[tokio::test]
    async fn ids_start_at_one() {
        let store = MemoryBoxStore::new();
        let record = store
            .insert(NewBox {
                height: 1,
                width: 1,
                color: "red".into(),
            })
            .await
            .unwrap();
        assert_eq!(record.id, 1);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_inserts_get_unique_ids() {
        let store = Arc::new(MemoryBoxStore::new());
        let mut handles = Vec::new();
        for i in 0..64 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .insert(NewBox {
                        height: i + 1,
                        width: 1,
                        color: "red".into(),
                    })
                    .await
                    .unwrap()
                    .id
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 64);
        assert_eq!(store.len(), 64);
    }
}
