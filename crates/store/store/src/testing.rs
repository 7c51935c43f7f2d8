use boxes_core::NewBox;

use crate::error::StoreError;
use crate::store::BoxStore;

fn new_box(height: i32, width: i32, color: &str) -> NewBox {
    NewBox {
        height,
        width,
        color: color.to_owned(),
    }
}

/// Run the full box store conformance test suite.
///
/// Call this from your backend's test module with a fresh store instance.
///
/// # Errors
///
/// Returns an error if the store fails an operation the suite expects to
/// succeed.
pub async fn run_store_conformance_tests(store: &dyn BoxStore) -> Result<(), StoreError> {
    test_insert_echoes_fields(store).await?;
    test_insert_assigns_increasing_ids(store).await?;
    test_insert_sets_equal_timestamps(store).await?;
    test_get_round_trip(store).await?;
    test_get_missing(store).await?;
    test_long_color_is_stored_verbatim(store).await?;
    Ok(())
}

async fn test_insert_echoes_fields(store: &dyn BoxStore) -> Result<(), StoreError> {
    let record = store.insert(new_box(150, 200, "#A1B2C3")).await?;
    assert!(record.id > 0, "id should be positive, got {}", record.id);
    assert_eq!(record.height, 150);
    assert_eq!(record.width, 200);
    assert_eq!(record.color, "#A1B2C3");
    Ok(())
}

async fn test_insert_assigns_increasing_ids(store: &dyn BoxStore) -> Result<(), StoreError> {
    let first = store.insert(new_box(10, 10, "red")).await?;
    let second = store.insert(new_box(10, 10, "red")).await?;
    assert!(
        second.id > first.id,
        "identical inserts should get distinct increasing ids ({} then {})",
        first.id,
        second.id
    );
    Ok(())
}

async fn test_insert_sets_equal_timestamps(store: &dyn BoxStore) -> Result<(), StoreError> {
    let record = store.insert(new_box(3, 4, "blue")).await?;
    assert_eq!(
        record.created_at, record.updated_at,
        "a fresh box should have equal timestamps"
    );
    Ok(())
}

async fn test_get_round_trip(store: &dyn BoxStore) -> Result<(), StoreError> {
    let created = store.insert(new_box(7, 9, "green")).await?;
    let fetched = store.get(created.id).await?;
    assert_eq!(fetched.as_ref(), Some(&created));
    Ok(())
}

async fn test_get_missing(store: &dyn BoxStore) -> Result<(), StoreError> {
    let fetched = store.get(i64::MAX).await?;
    assert!(fetched.is_none(), "get on a missing id should return None");
    Ok(())
}

async fn test_long_color_is_stored_verbatim(store: &dyn BoxStore) -> Result<(), StoreError> {
    let color = "c".repeat(boxes_core::MAX_COLOR_LENGTH);
    let record = store.insert(new_box(1, 1, &color)).await?;
    assert_eq!(record.color, color);
    let fetched = store.get(record.id).await?;
    assert_eq!(fetched.map(|r| r.color), Some(color));
    Ok(())
}
