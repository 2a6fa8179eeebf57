//! MariaDB/MySQL implementation of the store traits.
//!
//! Every method checks a connection out of the shared pool for a single
//! statement (or a statement plus an existence check). The bulk log insert is
//! the only multi-statement write and runs in one transaction.

use async_trait::async_trait;
use sqlx::{MySql, QueryBuilder};

use super::{FacilityStore, KeyfobStore, ScanLogStore, Store};
use crate::db::DbPool;
use crate::models::{
    facility::{Facility, FacilityUpdate},
    keyfob::Keyfob,
    scan::{NewScanLog, ScanLog},
};

/// Rows per multi-row INSERT, keeping placeholder counts well below the
/// server's prepared-statement limit.
const BULK_INSERT_CHUNK: usize = 1000;

#[derive(Debug, Clone)]
pub struct MySqlStore {
    pool: DbPool,
}

impl MySqlStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// MariaDB reports changed rows, not matched rows, so an UPDATE that
    /// writes the current value back affects zero rows. This check tells that
    /// case apart from a missing keyfob.
    async fn keyfob_exists(&self, keyfob_id: i64) -> Result<bool, sqlx::Error> {
        let exists: i64 =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM keyfobs WHERE keyfob_id = ?)")
                .bind(keyfob_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists != 0)
    }

    async fn facility_exists(&self, facility_id: i64) -> Result<bool, sqlx::Error> {
        let exists: i64 =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM facilities WHERE facility_id = ?)")
                .bind(facility_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists != 0)
    }
}

#[async_trait]
impl KeyfobStore for MySqlStore {
    async fn insert_keyfob(&self, keyfob_key: i64) -> Result<i64, sqlx::Error> {
        let result = sqlx::query("INSERT INTO keyfobs (keyfob_key) VALUES (?)")
            .bind(keyfob_key)
            .execute(&self.pool)
            .await?;

        Ok(result.last_insert_id() as i64)
    }

    async fn set_attached_user(
        &self,
        keyfob_id: i64,
        user_id: Option<i64>,
    ) -> Result<bool, sqlx::Error> {
        let updated = sqlx::query("UPDATE keyfobs SET attached_user_id = ? WHERE keyfob_id = ?")
            .bind(user_id)
            .bind(keyfob_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if updated > 0 {
            return Ok(true);
        }
        self.keyfob_exists(keyfob_id).await
    }

    async fn set_keyfob_key(&self, keyfob_id: i64, keyfob_key: i64) -> Result<bool, sqlx::Error> {
        let updated = sqlx::query("UPDATE keyfobs SET keyfob_key = ? WHERE keyfob_id = ?")
            .bind(keyfob_key)
            .bind(keyfob_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if updated > 0 {
            return Ok(true);
        }
        self.keyfob_exists(keyfob_id).await
    }

    async fn disable_keyfob(&self, keyfob_id: i64) -> Result<bool, sqlx::Error> {
        let updated = sqlx::query("UPDATE keyfobs SET disabled = TRUE WHERE keyfob_id = ?")
            .bind(keyfob_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if updated > 0 {
            return Ok(true);
        }
        self.keyfob_exists(keyfob_id).await
    }

    async fn list_active_keyfobs(&self) -> Result<Vec<Keyfob>, sqlx::Error> {
        sqlx::query_as::<_, Keyfob>(
            r#"
            SELECT k.keyfob_id, k.keyfob_key, k.attached_user_id, k.disabled,
                   u.first_name, u.last_name, u.affix, u.role
            FROM keyfobs k
            LEFT JOIN users u ON u.id = k.attached_user_id
            WHERE k.disabled = FALSE
            ORDER BY k.keyfob_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn is_access_allowed(&self, keyfob_id: i64) -> Result<bool, sqlx::Error> {
        let allowed: i64 = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM keyfobs
                WHERE keyfob_id = ?
                AND attached_user_id IS NOT NULL
                AND disabled = FALSE
            )
            "#,
        )
        .bind(keyfob_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(allowed != 0)
    }
}

#[async_trait]
impl FacilityStore for MySqlStore {
    async fn insert_facility(
        &self,
        facility_type: &str,
        capacity: i32,
    ) -> Result<i64, sqlx::Error> {
        let result = sqlx::query("INSERT INTO facilities (facility_type, capacity) VALUES (?, ?)")
            .bind(facility_type)
            .bind(capacity)
            .execute(&self.pool)
            .await?;

        Ok(result.last_insert_id() as i64)
    }

    async fn list_facilities(&self, active_only: bool) -> Result<Vec<Facility>, sqlx::Error> {
        let mut builder = QueryBuilder::<MySql>::new(
            "SELECT facility_id, facility_type, capacity, active, broken FROM facilities",
        );
        if active_only {
            builder.push(" WHERE active = TRUE");
        }
        builder.push(" ORDER BY facility_id");

        builder.build_query_as::<Facility>().fetch_all(&self.pool).await
    }

    async fn deactivate_facility(&self, facility_id: i64) -> Result<bool, sqlx::Error> {
        let updated = sqlx::query("UPDATE facilities SET active = FALSE WHERE facility_id = ?")
            .bind(facility_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if updated > 0 {
            return Ok(true);
        }
        self.facility_exists(facility_id).await
    }

    async fn update_facility(
        &self,
        facility_id: i64,
        update: &FacilityUpdate,
    ) -> Result<bool, sqlx::Error> {
        if update.is_empty() {
            return self.facility_exists(facility_id).await;
        }

        let mut builder = QueryBuilder::<MySql>::new("UPDATE facilities SET ");
        let mut assignments = builder.separated(", ");
        if let Some(facility_type) = update.facility_type.as_deref() {
            assignments.push("facility_type = ").push_bind_unseparated(facility_type);
        }
        if let Some(capacity) = update.capacity {
            assignments.push("capacity = ").push_bind_unseparated(capacity);
        }
        if let Some(active) = update.active {
            assignments.push("active = ").push_bind_unseparated(active);
        }
        if let Some(broken) = update.broken {
            assignments.push("broken = ").push_bind_unseparated(broken);
        }
        builder.push(" WHERE facility_id = ").push_bind(facility_id);

        let updated = builder.build().execute(&self.pool).await?.rows_affected();

        if updated > 0 {
            return Ok(true);
        }
        self.facility_exists(facility_id).await
    }
}

#[async_trait]
impl ScanLogStore for MySqlStore {
    async fn append_log(&self, log: &NewScanLog) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO logs (keyfob_id, facility_id, timestamp, in_out, allowed)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(log.keyfob_id)
        .bind(log.facility_id)
        .bind(log.timestamp)
        .bind(log.in_out)
        .bind(log.allowed)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_id() as i64)
    }

    /// All chunks commit together or not at all.
    async fn append_logs(&self, logs: &[NewScanLog]) -> Result<u64, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let mut written = 0;

        for chunk in logs.chunks(BULK_INSERT_CHUNK) {
            let mut builder = QueryBuilder::<MySql>::new(
                "INSERT INTO logs (keyfob_id, facility_id, timestamp, in_out, allowed) ",
            );
            builder.push_values(chunk, |mut row, log| {
                row.push_bind(log.keyfob_id)
                    .push_bind(log.facility_id)
                    .push_bind(log.timestamp)
                    .push_bind(log.in_out)
                    .push_bind(log.allowed);
            });

            written += builder.build().execute(&mut *tx).await?.rows_affected();
        }

        tx.commit().await?;
        Ok(written)
    }

    async fn list_logs(&self) -> Result<Vec<ScanLog>, sqlx::Error> {
        sqlx::query_as::<_, ScanLog>(
            "SELECT id, keyfob_id, facility_id, timestamp, in_out, allowed FROM logs ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn recent_logs(&self, limit: u32) -> Result<Vec<ScanLog>, sqlx::Error> {
        sqlx::query_as::<_, ScanLog>(
            r#"
            SELECT id, keyfob_id, facility_id, timestamp, in_out, allowed
            FROM logs
            ORDER BY timestamp DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }
}

#[async_trait]
impl Store for MySqlStore {
    async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
