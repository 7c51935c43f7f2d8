use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted box: a rectangle description with a storage-assigned
/// identity and timestamps.
///
/// Serializes with camelCase keys (`createdAt`, `updatedAt`) regardless of
/// how a storage backend names its columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", schema(example = json!({
    "id": 1,
    "height": 150,
    "width": 200,
    "color": "#A1B2C3",
    "createdAt": "2025-08-21T17:30:12Z",
    "updatedAt": "2025-08-21T17:30:12Z"
})))]
#[serde(rename_all = "camelCase")]
pub struct BoxRecord {
    /// Storage-assigned identifier. Never reused.
    pub id: i64,
    /// Height in pixels or units. Always at least 1.
    pub height: i32,
    /// Width in pixels or units. Always at least 1.
    pub width: i32,
    /// Hex code or color name.
    pub color: String,
    /// When the box was created.
    pub created_at: DateTime<Utc>,
    /// When the box was last modified. Equal to `created_at` since boxes
    /// are never updated.
    pub updated_at: DateTime<Utc>,
}

/// The validated fields of a box that has not been persisted yet.
///
/// Produced by [`crate::validate`]. Building one by hand skips the field
/// rules; only the PostgreSQL column constraints would catch a bad value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBox {
    pub height: i32,
    pub width: i32,
    pub color: String,
}

impl NewBox {
    /// Attach storage-assigned identity and timestamps, producing the
    /// persisted record. `created_at` and `updated_at` are both set to `now`.
    pub fn into_record(self, id: i64, now: DateTime<Utc>) -> BoxRecord {
        BoxRecord {
            id,
            height: self.height,
            width: self.width,
            color: self.color,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_keys() {
        let now = Utc::now();
        let record = NewBox {
            height: 150,
            width: 200,
            color: "#A1B2C3".into(),
        }
        .into_record(7, now);

        let json = serde_json::to_value(&record).unwrap();
        let obj = json.as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            ["color", "createdAt", "height", "id", "updatedAt", "width"]
        );
        assert_eq!(json["id"], 7);
        assert_eq!(json["color"], "#A1B2C3");
    }

    #[test]
    fn into_record_sets_equal_timestamps() {
        let now = Utc::now();
        let record = NewBox {
            height: 1,
            width: 1,
            color: "red".into(),
        }
        .into_record(1, now);
        assert_eq!(record.created_at, record.updated_at);
        assert_eq!(record.created_at, now);
    }
}
