/// Database module for saved schedule snapshots

mod types;

pub use types::{ScheduleSnapshot, SnapshotPatch};

use std::sync::Mutex;

use chrono::Utc;
use rand::Rng;
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;
use tracing::info;

const SCHEMA_SQL: &str = include_str!("../../sql/init_snapshots.sql");

/// Errors from snapshot persistence.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Snapshot name was empty after trimming
    #[error("Snapshot name cannot be empty")]
    EmptyName,

    /// The user already has a snapshot with this name
    #[error("A snapshot named '{name}' already exists")]
    DuplicateName { name: String },

    /// No snapshot with the given id belongs to the user
    #[error("Snapshot not found")]
    NotFound,

    /// Underlying storage failure
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// rusqlite-backed store for schedule snapshots.
pub struct SnapshotStore {
    db: Mutex<Connection>,
}

impl SnapshotStore {
    /// Opens (or creates) the snapshot database and applies the schema.
    pub fn new(db_path: &str) -> Result<Self, SnapshotError> {
        let conn = Connection::open(db_path)?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            db: Mutex::new(conn),
        })
    }

    /// An in-memory store, used by tests.
    pub fn in_memory() -> Result<Self, SnapshotError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            db: Mutex::new(conn),
        })
    }

    /// Saves a new snapshot. Names are unique per user; the collision
    /// surfaces as `DuplicateName`.
    pub fn save(
        &self,
        user_id: &str,
        name: &str,
        class_ids: &[String],
        total_credits: f64,
    ) -> Result<ScheduleSnapshot, SnapshotError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SnapshotError::EmptyName);
        }

        let snapshot = ScheduleSnapshot {
            id: random_snapshot_id(),
            user_id: user_id.to_string(),
            name: name.to_string(),
            class_ids: class_ids.to_vec(),
            total_credits,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let class_ids_json =
            serde_json::to_string(&snapshot.class_ids).unwrap_or_else(|_| "[]".to_string());

        let db = self.db.lock().unwrap();
        let result = db.execute(
            "INSERT INTO schedule_snapshots (id, user_id, name, class_ids, total_credits, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                snapshot.id,
                snapshot.user_id,
                snapshot.name,
                class_ids_json,
                snapshot.total_credits,
                snapshot.created_at.to_rfc3339(),
                snapshot.updated_at.to_rfc3339(),
            ],
        );

        match result {
            Ok(_) => {
                info!(user = %user_id, snapshot = %snapshot.id, name = %snapshot.name, "Saved snapshot");
                Ok(snapshot)
            }
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(SnapshotError::DuplicateName {
                    name: name.to_string(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Lists a user's snapshots, newest first.
    pub fn list(&self, user_id: &str) -> Result<Vec<ScheduleSnapshot>, SnapshotError> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(
            "SELECT id, user_id, name, class_ids, total_credits, created_at, updated_at
             FROM schedule_snapshots
             WHERE user_id = ?1
             ORDER BY created_at DESC",
        )?;

        let snapshots = stmt
            .query_map([user_id], row_to_snapshot)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(snapshots)
    }

    /// Gets one snapshot by id, scoped to the owning user.
    pub fn get(
        &self,
        user_id: &str,
        snapshot_id: &str,
    ) -> Result<Option<ScheduleSnapshot>, SnapshotError> {
        let db = self.db.lock().unwrap();
        let snapshot = db
            .query_row(
                "SELECT id, user_id, name, class_ids, total_credits, created_at, updated_at
                 FROM schedule_snapshots
                 WHERE id = ?1 AND user_id = ?2",
                params![snapshot_id, user_id],
                row_to_snapshot,
            )
            .optional()?;
        Ok(snapshot)
    }

    /// Gets one snapshot by name, scoped to the owning user.
    pub fn get_by_name(
        &self,
        user_id: &str,
        name: &str,
    ) -> Result<Option<ScheduleSnapshot>, SnapshotError> {
        let db = self.db.lock().unwrap();
        let snapshot = db
            .query_row(
                "SELECT id, user_id, name, class_ids, total_credits, created_at, updated_at
                 FROM schedule_snapshots
                 WHERE user_id = ?1 AND name = ?2",
                params![user_id, name],
                row_to_snapshot,
            )
            .optional()?;
        Ok(snapshot)
    }

    /// Applies a partial update, merging the supplied fields over the
    /// stored row and bumping `updated_at`.
    pub fn update(
        &self,
        user_id: &str,
        snapshot_id: &str,
        patch: SnapshotPatch,
    ) -> Result<ScheduleSnapshot, SnapshotError> {
        let mut snapshot = self
            .get(user_id, snapshot_id)?
            .ok_or(SnapshotError::NotFound)?;

        if let Some(name) = patch.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(SnapshotError::EmptyName);
            }
            snapshot.name = name;
        }
        if let Some(class_ids) = patch.class_ids {
            snapshot.class_ids = class_ids;
        }
        if let Some(total_credits) = patch.total_credits {
            snapshot.total_credits = total_credits;
        }
        snapshot.updated_at = Utc::now();

        let class_ids_json =
            serde_json::to_string(&snapshot.class_ids).unwrap_or_else(|_| "[]".to_string());

        let db = self.db.lock().unwrap();
        let result = db.execute(
            "UPDATE schedule_snapshots
             SET name = ?1, class_ids = ?2, total_credits = ?3, updated_at = ?4
             WHERE id = ?5 AND user_id = ?6",
            params![
                snapshot.name,
                class_ids_json,
                snapshot.total_credits,
                snapshot.updated_at.to_rfc3339(),
                snapshot.id,
                snapshot.user_id,
            ],
        );

        match result {
            Ok(0) => Err(SnapshotError::NotFound),
            Ok(_) => Ok(snapshot),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(SnapshotError::DuplicateName {
                    name: snapshot.name,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Deletes a snapshot; returns whether a row was removed.
    pub fn delete(&self, user_id: &str, snapshot_id: &str) -> Result<bool, SnapshotError> {
        let db = self.db.lock().unwrap();
        let removed = db.execute(
            "DELETE FROM schedule_snapshots WHERE id = ?1 AND user_id = ?2",
            params![snapshot_id, user_id],
        )?;
        Ok(removed > 0)
    }
}

fn row_to_snapshot(row: &rusqlite::Row<'_>) -> rusqlite::Result<ScheduleSnapshot> {
    let class_ids_json: String = row.get(3)?;
    let created_at: String = row.get(5)?;
    let updated_at: String = row.get(6)?;

    Ok(ScheduleSnapshot {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        class_ids: serde_json::from_str(&class_ids_json).unwrap_or_default(),
        total_credits: row.get(4)?,
        created_at: chrono::DateTime::parse_from_rfc3339(&created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
        updated_at: chrono::DateTime::parse_from_rfc3339(&updated_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}

/// Random 32-hex-character snapshot id.
fn random_snapshot_id() -> String {
    let mut rng = rand::thread_rng();
    (0..32)
        .map(|_| format!("{:x}", rng.gen_range(0..16)))
        .collect()
}
