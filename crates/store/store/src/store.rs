use async_trait::async_trait;

use boxes_core::{BoxRecord, NewBox};

use crate::error::StoreError;

/// Durable storage for boxes.
///
/// Implementations must be `Send + Sync` to be shared across request
/// handlers. Each call is independent; no transaction spans two calls.
#[async_trait]
pub trait BoxStore: Send + Sync {
    /// Persist a new box as a single atomic write.
    ///
    /// The backend assigns `id` (unique, increasing, never reused) and sets
    /// `created_at` and `updated_at` to the same instant. On error nothing
    /// is written.
    async fn insert(&self, new_box: NewBox) -> Result<BoxRecord, StoreError>;

    /// Fetch a box by id. Returns `None` when no such box exists.
    async fn get(&self, id: i64) -> Result<Option<BoxRecord>, StoreError>;
}
