//! Box creation: validate, persist, classify failures.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use boxes_core::{BoxRecord, ValidationError, validate};
use boxes_store::{BoxStore, StoreError};

/// Why a box could not be created.
#[derive(Debug, Error)]
pub enum CreateBoxError {
    /// The payload broke a field rule. Nothing was written.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The store rejected or could not perform the insert.
    #[error("storage error: {0}")]
    Storage(StoreError),

    /// Anything else that went wrong.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Why a box could not be fetched.
#[derive(Debug, Error)]
pub enum GetBoxError {
    #[error("storage error: {0}")]
    Storage(StoreError),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Validates payloads and writes boxes through a [`BoxStore`].
///
/// Holds no state besides the store handle, so clones are cheap and
/// concurrent calls are independent.
#[derive(Clone)]
pub struct BoxService {
    store: Arc<dyn BoxStore>,
}

impl BoxService {
    pub fn new(store: Arc<dyn BoxStore>) -> Self {
        Self { store }
    }

    /// Validate `payload` and persist a new box.
    ///
    /// Validation runs to completion before the store is touched. Storage
    /// and internal failures are logged here, once; validation failures are
    /// the caller's problem and are not.
    pub async fn create_box(&self, payload: &Value) -> Result<BoxRecord, CreateBoxError> {
        let new_box = match validate(payload) {
            Ok(new_box) => new_box,
            Err(e) => {
                debug!(errors = ?e.errors(), "box payload rejected");
                return Err(e.into());
            }
        };

        let (height, width, color) = (new_box.height, new_box.width, new_box.color.clone());

        match self.store.insert(new_box).await {
            Ok(record) => {
                debug!(id = record.id, "box created");
                Ok(record)
            }
            Err(e @ StoreError::Decode(_)) => {
                error!(error = ?e, height, width, color = %color, "GenerateBox - General error");
                Err(CreateBoxError::Internal(e.to_string()))
            }
            Err(e) => {
                error!(
                    error = %e,
                    height,
                    width,
                    color = %color,
                    "GenerateBox - DB error"
                );
                Err(CreateBoxError::Storage(e))
            }
        }
    }

    /// Fetch a previously created box.
    pub async fn get_box(&self, id: i64) -> Result<Option<BoxRecord>, GetBoxError> {
        match self.store.get(id).await {
            Ok(record) => Ok(record),
            Err(e @ StoreError::Decode(_)) => {
                error!(id, error = ?e, "GetBox - General error");
                Err(GetBoxError::Internal(e.to_string()))
            }
            Err(e) => {
                error!(id, error = %e, "GetBox - DB error");
                Err(GetBoxError::Storage(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use boxes_store_memory::MemoryBoxStore;

    use super::*;

    fn service() -> (BoxService, Arc<MemoryBoxStore>) {
        let store = Arc::new(MemoryBoxStore::new());
        (BoxService::new(Arc::clone(&store) as Arc<dyn BoxStore>), store)
    }

    #[tokio::test]
    async fn creates_box_with_input_values() {
        let (svc, store) = service();
        let record = svc
            .create_box(&json!({"height": 150, "width": 200, "color": "#A1B2C3"}))
            .await
            .unwrap();
        assert_eq!((record.height, record.width), (150, 200));
        assert_eq!(record.color, "#A1B2C3");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn invalid_payload_writes_nothing() {
        let (svc, store) = service();
        for payload in [
            json!({"width": 200, "color": "red"}),
            json!({"height": 1, "color": "red"}),
            json!({"height": 1, "width": 1}),
            json!({"height": 0, "width": 1, "color": "red"}),
            json!({"height": 1, "width": 1, "color": "x".repeat(51)}),
        ] {
            let err = svc.create_box(&payload).await.unwrap_err();
            assert!(matches!(err, CreateBoxError::Validation(_)), "{payload}");
        }
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn identical_payloads_are_not_deduplicated() {
        let (svc, store) = service();
        let payload = json!({"height": 2, "width": 3, "color": "red"});
        let first = svc.create_box(&payload).await.unwrap();
        let second = svc.create_box(&payload).await.unwrap();
        assert!(second.id > first.id);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn get_box_round_trips() {
        let (svc, _store) = service();
        let created = svc
            .create_box(&json!({"height": 4, "width": 5, "color": "teal"}))
            .await
            .unwrap();
        let fetched = svc.get_box(created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
        assert_eq!(svc.get_box(999).await.unwrap(), None);
    }
}
