// SPDX-FileCopyrightText: 2026 Umos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel registry CRUD.
//!
//! The `api_key`/`api_secret` values moving through this module are always
//! ciphertext -- encryption happens in the channel service before insert,
//! decryption happens in the dispatcher after select.

use rusqlite::{OptionalExtension, params};
use umos_core::{ChannelConfig, UmosError};

use crate::database::{Database, map_tr_err};
use crate::queries::{parse_ts, parse_ts_opt};

/// Insert payload for a new channel. Credential fields are ciphertext.
#[derive(Debug, Clone)]
pub struct NewChannel {
    pub name: String,
    pub provider_type: String,
    pub api_key: String,
    pub api_secret: String,
}

/// Partial update payload. `None` fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct ChannelUpdate {
    pub name: Option<String>,
    pub provider_type: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub is_active: Option<bool>,
}

const CHANNEL_COLUMNS: &str = "id, name, provider_type, api_key, api_secret, is_active, \
                               last_sync_at, created_at, updated_at";

fn row_to_channel(row: &rusqlite::Row<'_>) -> Result<ChannelConfig, rusqlite::Error> {
    Ok(ChannelConfig {
        id: row.get(0)?,
        name: row.get(1)?,
        provider_type: row.get(2)?,
        api_key: row.get(3)?,
        api_secret: row.get(4)?,
        is_active: row.get(5)?,
        last_sync_at: parse_ts_opt(6, row.get(6)?)?,
        created_at: parse_ts(7, row.get(7)?)?,
        updated_at: parse_ts(8, row.get(8)?)?,
    })
}

/// Create a channel and return the stored row.
pub async fn create_channel(db: &Database, new: NewChannel) -> Result<ChannelConfig, UmosError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO channel_configs (name, provider_type, api_key, api_secret)
                 VALUES (?1, ?2, ?3, ?4)",
                params![new.name, new.provider_type, new.api_key, new.api_secret],
            )?;
            let id = conn.last_insert_rowid();
            let channel = conn.query_row(
                &format!("SELECT {CHANNEL_COLUMNS} FROM channel_configs WHERE id = ?1"),
                params![id],
                row_to_channel,
            )?;
            Ok(channel)
        })
        .await
        .map_err(map_constraint_err)
}

/// Get a channel by id regardless of its active flag (admin read path).
pub async fn get_channel(db: &Database, id: i64) -> Result<Option<ChannelConfig>, UmosError> {
    db.connection()
        .call(move |conn| {
            let channel = conn
                .query_row(
                    &format!("SELECT {CHANNEL_COLUMNS} FROM channel_configs WHERE id = ?1"),
                    params![id],
                    row_to_channel,
                )
                .optional()?;
            Ok(channel)
        })
        .await
        .map_err(map_tr_err)
}

/// Get a channel eligible for collection dispatch.
///
/// Returns `None` for both an absent and an inactive channel -- the
/// distinction is intentionally not exposed at this layer.
pub async fn get_active_channel(
    db: &Database,
    id: i64,
) -> Result<Option<ChannelConfig>, UmosError> {
    db.connection()
        .call(move |conn| {
            let channel = conn
                .query_row(
                    &format!(
                        "SELECT {CHANNEL_COLUMNS} FROM channel_configs
                         WHERE id = ?1 AND is_active = 1"
                    ),
                    params![id],
                    row_to_channel,
                )
                .optional()?;
            Ok(channel)
        })
        .await
        .map_err(map_tr_err)
}

/// List channels with pagination.
pub async fn list_channels(
    db: &Database,
    limit: i64,
    offset: i64,
) -> Result<Vec<ChannelConfig>, UmosError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CHANNEL_COLUMNS} FROM channel_configs ORDER BY id LIMIT ?1 OFFSET ?2"
            ))?;
            let rows = stmt.query_map(params![limit, offset], row_to_channel)?;
            let mut channels = Vec::new();
            for row in rows {
                channels.push(row?);
            }
            Ok(channels)
        })
        .await
        .map_err(map_tr_err)
}

/// Ids of every channel eligible for bulk collection.
pub async fn list_active_channel_ids(db: &Database) -> Result<Vec<i64>, UmosError> {
    db.connection()
        .call(|conn| {
            let mut stmt =
                conn.prepare("SELECT id FROM channel_configs WHERE is_active = 1 ORDER BY id")?;
            let rows = stmt.query_map([], |row| row.get(0))?;
            let mut ids = Vec::new();
            for row in rows {
                ids.push(row?);
            }
            Ok(ids)
        })
        .await
        .map_err(map_tr_err)
}

/// Apply a partial update and return the updated row, or `None` if the
/// channel does not exist.
pub async fn update_channel(
    db: &Database,
    id: i64,
    update: ChannelUpdate,
) -> Result<Option<ChannelConfig>, UmosError> {
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE channel_configs SET
                     name          = COALESCE(?1, name),
                     provider_type = COALESCE(?2, provider_type),
                     api_key       = COALESCE(?3, api_key),
                     api_secret    = COALESCE(?4, api_secret),
                     is_active     = COALESCE(?5, is_active),
                     updated_at    = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?6",
                params![
                    update.name,
                    update.provider_type,
                    update.api_key,
                    update.api_secret,
                    update.is_active,
                    id,
                ],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            let channel = conn
                .query_row(
                    &format!("SELECT {CHANNEL_COLUMNS} FROM channel_configs WHERE id = ?1"),
                    params![id],
                    row_to_channel,
                )
                .optional()?;
            Ok(channel)
        })
        .await
        .map_err(map_constraint_err)
}

/// Hard-delete a channel. Returns whether a row was removed.
pub async fn delete_channel(db: &Database, id: i64) -> Result<bool, UmosError> {
    db.connection()
        .call(move |conn| {
            let changed = conn.execute("DELETE FROM channel_configs WHERE id = ?1", params![id])?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Record a successful collection run.
pub async fn touch_last_sync(db: &Database, id: i64) -> Result<(), UmosError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE channel_configs
                 SET last_sync_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?1",
                params![id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// A unique-constraint violation on insert/update means a duplicate
/// channel name -- a caller error, not a storage fault.
fn map_constraint_err(err: tokio_rusqlite::Error) -> UmosError {
    if let tokio_rusqlite::Error::Error(rusqlite::Error::SqliteFailure(ref e, _)) = err
        && e.code == rusqlite::ErrorCode::ConstraintViolation
    {
        return UmosError::InvalidInput("channel name already exists".to_string());
    }
    map_tr_err(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    fn sample_channel(name: &str) -> NewChannel {
        NewChannel {
            name: name.to_string(),
            provider_type: "coupang".to_string(),
            api_key: "ct-key".to_string(),
            api_secret: "ct-secret".to_string(),
        }
    }

    #[tokio::test]
    async fn create_and_get_channel() {
        let db = setup_db().await;
        let created = create_channel(&db, sample_channel("coupang-kr")).await.unwrap();
        assert!(created.is_active, "new channels start active");
        assert!(created.last_sync_at.is_none());

        let fetched = get_channel(&db, created.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "coupang-kr");
        assert_eq!(fetched.provider_type, "coupang");
        assert_eq!(fetched.api_key, "ct-key");
    }

    #[tokio::test]
    async fn duplicate_name_is_invalid_input() {
        let db = setup_db().await;
        create_channel(&db, sample_channel("dup")).await.unwrap();
        let err = create_channel(&db, sample_channel("dup")).await.unwrap_err();
        assert!(matches!(err, UmosError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn get_active_channel_hides_inactive_rows() {
        let db = setup_db().await;
        let created = create_channel(&db, sample_channel("soon-inactive")).await.unwrap();
        assert!(get_active_channel(&db, created.id).await.unwrap().is_some());

        update_channel(
            &db,
            created.id,
            ChannelUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        // Inactive and absent are indistinguishable here.
        assert!(get_active_channel(&db, created.id).await.unwrap().is_none());
        assert!(get_active_channel(&db, 9999).await.unwrap().is_none());
        // The admin read path still sees the row.
        assert!(get_channel(&db, created.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn update_keeps_unspecified_fields() {
        let db = setup_db().await;
        let created = create_channel(&db, sample_channel("partial")).await.unwrap();

        let updated = update_channel(
            &db,
            created.id,
            ChannelUpdate {
                api_secret: Some("ct-secret-2".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(updated.api_secret, "ct-secret-2");
        assert_eq!(updated.api_key, "ct-key");
        assert_eq!(updated.name, "partial");
    }

    #[tokio::test]
    async fn update_missing_channel_returns_none() {
        let db = setup_db().await;
        let result = update_channel(&db, 42, ChannelUpdate::default()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn delete_channel_removes_row() {
        let db = setup_db().await;
        let created = create_channel(&db, sample_channel("doomed")).await.unwrap();
        assert!(delete_channel(&db, created.id).await.unwrap());
        assert!(!delete_channel(&db, created.id).await.unwrap());
        assert!(get_channel(&db, created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn touch_last_sync_sets_timestamp() {
        let db = setup_db().await;
        let created = create_channel(&db, sample_channel("synced")).await.unwrap();
        touch_last_sync(&db, created.id).await.unwrap();
        let fetched = get_channel(&db, created.id).await.unwrap().unwrap();
        assert!(fetched.last_sync_at.is_some());
    }

    #[tokio::test]
    async fn list_active_channel_ids_skips_inactive() {
        let db = setup_db().await;
        let a = create_channel(&db, sample_channel("a")).await.unwrap();
        let b = create_channel(&db, sample_channel("b")).await.unwrap();
        let c = create_channel(&db, sample_channel("c")).await.unwrap();
        update_channel(
            &db,
            b.id,
            ChannelUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let ids = list_active_channel_ids(&db).await.unwrap();
        assert_eq!(ids, vec![a.id, c.id]);
    }
}
