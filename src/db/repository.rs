//! Shift swap request store backed by SQLite.
//!
//! Writes are single-key and idempotent. Reads hand back whole-table snapshots
//! with no isolation from concurrent writers.

use chrono::{NaiveDate, Utc};
use sqlx::sqlite::{Sqlite, SqliteRow};
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::matching::{parse_records, Snapshot};
use crate::models::{record_key, RevisionInfo, ShiftSwapRequest, SwapRecord};

const RECORD_COLUMNS: &str = "employee_name, date, give_away, can_take_early, can_take_morning, can_take_evening, can_take_night, can_take_rest";

const BUMP_REVISION_SQL: &str =
    "UPDATE meta SET revision_id = revision_id + 1, generated_at = ? WHERE id = 1";

// The WHERE clause turns an identical resubmission into a no-op.
const UPSERT_SQL: &str = r#"
    INSERT INTO swap_requests (record_key, employee_name, date, give_away, can_take_early, can_take_morning, can_take_evening, can_take_night, can_take_rest, updated_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
    ON CONFLICT(record_key) DO UPDATE SET
        employee_name = excluded.employee_name,
        date = excluded.date,
        give_away = excluded.give_away,
        can_take_early = excluded.can_take_early,
        can_take_morning = excluded.can_take_morning,
        can_take_evening = excluded.can_take_evening,
        can_take_night = excluded.can_take_night,
        can_take_rest = excluded.can_take_rest,
        updated_at = excluded.updated_at
    WHERE swap_requests.give_away IS NOT excluded.give_away
        OR swap_requests.can_take_early IS NOT excluded.can_take_early
        OR swap_requests.can_take_morning IS NOT excluded.can_take_morning
        OR swap_requests.can_take_evening IS NOT excluded.can_take_evening
        OR swap_requests.can_take_night IS NOT excluded.can_take_night
        OR swap_requests.can_take_rest IS NOT excluded.can_take_rest
"#;

type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, <Sqlite as sqlx::Database>::Arguments<'q>>;

fn upsert_query<'q>(key: &'q str, record: &'q SwapRecord, now: &'q str) -> SqliteQuery<'q> {
    sqlx::query(UPSERT_SQL)
        .bind(key)
        .bind(&record.employee_name)
        .bind(&record.date)
        .bind(&record.give_away)
        .bind(&record.can_take_early)
        .bind(&record.can_take_morning)
        .bind(&record.can_take_evening)
        .bind(&record.can_take_night)
        .bind(&record.can_take_rest)
        .bind(now)
}

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the current revision ID.
    pub async fn get_revision_id(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT revision_id FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("revision_id"))
    }

    /// Get revision info.
    pub async fn get_revision_info(&self) -> Result<RevisionInfo, AppError> {
        let row = sqlx::query("SELECT revision_id, generated_at FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(RevisionInfo {
            revision_id: row.get("revision_id"),
            generated_at: row.get("generated_at"),
        })
    }

    /// Increment the revision ID and return the new value.
    async fn increment_revision(&self) -> Result<i64, AppError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(BUMP_REVISION_SQL)
            .bind(&now)
            .execute(&self.pool)
            .await?;
        self.get_revision_id().await
    }

    // ==================== READS ====================

    /// Every stored record, unvalidated.
    pub async fn list_records(&self) -> Result<Vec<SwapRecord>, AppError> {
        let sql = format!(
            "SELECT {} FROM swap_requests ORDER BY date, employee_name",
            RECORD_COLUMNS
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(record_from_row).collect())
    }

    /// All well-formed requests; malformed rows are counted and skipped.
    pub async fn list_requests(&self) -> Result<Snapshot, AppError> {
        let records = self.list_records().await?;
        Ok(parse_records(records))
    }

    /// Requests owned by one employee.
    pub async fn list_requests_for(
        &self,
        employee_name: &str,
    ) -> Result<Vec<ShiftSwapRequest>, AppError> {
        let sql = format!(
            "SELECT {} FROM swap_requests WHERE employee_name = ? ORDER BY date",
            RECORD_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(employee_name)
            .fetch_all(&self.pool)
            .await?;
        Ok(parse_records(rows.iter().map(record_from_row).collect()).requests)
    }

    /// The request stored under `employee_name` and `date`, if any.
    pub async fn get_request(
        &self,
        employee_name: &str,
        date: NaiveDate,
    ) -> Result<Option<ShiftSwapRequest>, AppError> {
        let sql = format!(
            "SELECT {} FROM swap_requests WHERE record_key = ?",
            RECORD_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(record_key(employee_name, date))
            .fetch_optional(&self.pool)
            .await?;

        let records = row.as_ref().map(record_from_row).into_iter().collect();
        Ok(parse_records(records).requests.into_iter().next())
    }

    // ==================== WRITES ====================

    /// Insert or overwrite the request under its key.
    ///
    /// Returns `false` when an identical request was already stored.
    pub async fn upsert_request(&self, request: &ShiftSwapRequest) -> Result<bool, AppError> {
        let key = request.key();
        let record = SwapRecord::from(request);
        let now = Utc::now().to_rfc3339();

        let result = upsert_query(&key, &record, &now)
            .execute(&self.pool)
            .await?;

        let changed = result.rows_affected() > 0;
        if changed {
            self.increment_revision().await?;
        }
        tracing::debug!(key = %key, changed, "Upserted swap request");
        Ok(changed)
    }

    /// Delete the request under `employee_name` and `date`.
    ///
    /// Deleting a key that is not stored is a no-op and returns `false`.
    pub async fn delete_request(
        &self,
        employee_name: &str,
        date: NaiveDate,
    ) -> Result<bool, AppError> {
        let key = record_key(employee_name, date);
        let result = sqlx::query("DELETE FROM swap_requests WHERE record_key = ?")
            .bind(&key)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            self.increment_revision().await?;
        }
        tracing::debug!(key = %key, deleted, "Deleted swap request");
        Ok(deleted)
    }

    /// Move an employee's request from `old_date` to the date of `request`.
    ///
    /// The old record is removed and the new one upserted in one transaction.
    pub async fn replace_request(
        &self,
        old_date: NaiveDate,
        request: &ShiftSwapRequest,
    ) -> Result<bool, AppError> {
        let old_key = record_key(&request.employee_name, old_date);
        let key = request.key();
        let record = SwapRecord::from(request);
        let now = Utc::now().to_rfc3339();

        let mut tx = self.pool.begin().await?;

        let removed = if old_key != key {
            sqlx::query("DELETE FROM swap_requests WHERE record_key = ?")
                .bind(&old_key)
                .execute(&mut *tx)
                .await?
                .rows_affected()
        } else {
            0
        };

        let written = upsert_query(&key, &record, &now)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let changed = removed + written > 0;
        if changed {
            sqlx::query(BUMP_REVISION_SQL)
                .bind(&now)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::debug!(from = %old_key, to = %key, changed, "Replaced swap request");
        Ok(changed)
    }
}

// Helper functions for row conversion

fn text(row: &SqliteRow, column: &str) -> Option<String> {
    row.try_get::<Option<String>, _>(column).ok().flatten()
}

fn record_from_row(row: &SqliteRow) -> SwapRecord {
    SwapRecord {
        employee_name: text(row, "employee_name"),
        date: text(row, "date"),
        give_away: text(row, "give_away"),
        can_take_early: text(row, "can_take_early"),
        can_take_morning: text(row, "can_take_morning"),
        can_take_evening: text(row, "can_take_evening"),
        can_take_night: text(row, "can_take_night"),
        can_take_rest: text(row, "can_take_rest"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use crate::models::{CanTake, ShiftCategory};
    use tempfile::TempDir;

    async fn repo() -> (Repository, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let pool = init_database(&temp_dir.path().join("test.sqlite"))
            .await
            .expect("Failed to init DB");
        (Repository::new(pool), temp_dir)
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn request(name: &str, date: NaiveDate, give: ShiftCategory, take: ShiftCategory) -> ShiftSwapRequest {
        ShiftSwapRequest::new(name, date, Some(give), CanTake::from_categories([take]))
    }

    #[tokio::test]
    async fn test_upsert_twice_keeps_one_record() {
        let (repo, _dir) = repo().await;
        let alice = request("Alice", day(1), ShiftCategory::Early, ShiftCategory::Morning);

        assert!(repo.upsert_request(&alice).await.unwrap());
        let revision = repo.get_revision_id().await.unwrap();
        assert!(!repo.upsert_request(&alice).await.unwrap());
        assert_eq!(repo.get_revision_id().await.unwrap(), revision);

        let snapshot = repo.list_requests().await.unwrap();
        assert_eq!(snapshot.requests, vec![alice]);
    }

    #[tokio::test]
    async fn test_resubmission_overwrites() {
        let (repo, _dir) = repo().await;
        repo.upsert_request(&request("Alice", day(1), ShiftCategory::Early, ShiftCategory::Morning))
            .await
            .unwrap();
        let updated = request("Alice", day(1), ShiftCategory::Night, ShiftCategory::Rest);
        assert!(repo.upsert_request(&updated).await.unwrap());

        let stored = repo.get_request("Alice", day(1)).await.unwrap();
        assert_eq!(stored, Some(updated));
        assert_eq!(repo.list_records().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_is_keyed_and_idempotent() {
        let (repo, _dir) = repo().await;
        repo.upsert_request(&request("Alice", day(1), ShiftCategory::Early, ShiftCategory::Morning))
            .await
            .unwrap();
        repo.upsert_request(&request("Bob", day(1), ShiftCategory::Morning, ShiftCategory::Early))
            .await
            .unwrap();

        // Another employee's date does not reach Alice's record.
        assert!(!repo.delete_request("Carol", day(1)).await.unwrap());
        assert!(repo.delete_request("Bob", day(1)).await.unwrap());
        assert!(!repo.delete_request("Bob", day(1)).await.unwrap());

        let snapshot = repo.list_requests().await.unwrap();
        assert_eq!(snapshot.requests.len(), 1);
        assert_eq!(snapshot.requests[0].employee_name, "Alice");
    }

    #[tokio::test]
    async fn test_replace_moves_request() {
        let (repo, _dir) = repo().await;
        repo.upsert_request(&request("Alice", day(1), ShiftCategory::Early, ShiftCategory::Morning))
            .await
            .unwrap();

        let moved = request("Alice", day(2), ShiftCategory::Early, ShiftCategory::Morning);
        assert!(repo.replace_request(day(1), &moved).await.unwrap());

        assert_eq!(repo.get_request("Alice", day(1)).await.unwrap(), None);
        assert_eq!(repo.get_request("Alice", day(2)).await.unwrap(), Some(moved));
        assert_eq!(repo.list_requests_for("Alice").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_rows_are_skipped() {
        let (repo, _dir) = repo().await;
        repo.upsert_request(&request("Alice", day(1), ShiftCategory::Early, ShiftCategory::Morning))
            .await
            .unwrap();
        let corrupt = SwapRecord {
            employee_name: Some("Mallory".to_string()),
            date: Some("2024-06-01".to_string()),
            give_away: Some("brunch".to_string()),
            ..SwapRecord::default()
        };
        upsert_query("Mallory_2024-06-01", &corrupt, "2024-06-01T00:00:00Z")
            .execute(&repo.pool)
            .await
            .unwrap();

        assert_eq!(repo.list_records().await.unwrap().len(), 2);
        let snapshot = repo.list_requests().await.unwrap();
        assert_eq!(snapshot.requests.len(), 1);
        assert_eq!(snapshot.skipped, 1);
    }

    #[tokio::test]
    async fn test_revision_advances_on_writes() {
        let (repo, _dir) = repo().await;
        let start = repo.get_revision_info().await.unwrap().revision_id;
        repo.upsert_request(&request("Alice", day(1), ShiftCategory::Early, ShiftCategory::Morning))
            .await
            .unwrap();
        repo.delete_request("Alice", day(1)).await.unwrap();
        assert_eq!(repo.get_revision_id().await.unwrap(), start + 2);
    }
}
