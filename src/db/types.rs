/// Database types for saved schedule snapshots
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A named, saved schedule belonging to one user.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleSnapshot {
    pub id: String,
    #[serde(skip_serializing)]
    pub user_id: String,
    pub name: String,
    #[serde(rename = "classIds")]
    pub class_ids: Vec<String>,
    #[serde(rename = "totalCredits")]
    pub total_credits: f64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl ScheduleSnapshot {
    /// Derived count serialized as `classCount`.
    pub fn class_count(&self) -> usize {
        self.class_ids.len()
    }

    /// The wire representation, including the derived class count.
    pub fn to_json(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if let Some(obj) = value.as_object_mut() {
            obj.insert("classCount".to_string(), self.class_count().into());
        }
        value
    }
}

/// Partial update for a snapshot; absent fields keep their stored values.
#[derive(Debug, Clone, Default)]
pub struct SnapshotPatch {
    pub name: Option<String>,
    pub class_ids: Option<Vec<String>>,
    pub total_credits: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape_has_camel_case_and_class_count() {
        let snapshot = ScheduleSnapshot {
            id: "abc123".to_string(),
            user_id: "student@example.edu".to_string(),
            name: "Plan A".to_string(),
            class_ids: vec!["CPSC-350-01".to_string(), "MATH-110-01".to_string()],
            total_credits: 6.0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = snapshot.to_json();
        assert_eq!(json["classIds"][0], "CPSC-350-01");
        assert_eq!(json["totalCredits"], 6.0);
        assert_eq!(json["classCount"], 2);
        assert!(json.get("user_id").is_none());
        assert!(json.get("createdAt").is_some());
    }
}
