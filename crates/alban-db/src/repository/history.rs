//! # History Repository
//!
//! Database operations for generated-document history.
//!
//! ## Lifecycle of a Record
//! ```text
//! generate_invoice ──► insert(NewHistoryRecord) ──► row (id, created_at assigned)
//!                                                     │
//!                 list() newest first ◄───────────────┤
//!                                                     │
//!                 delete(id) ◄── user removes entry ──┘
//! ```
//!
//! Records are immutable once written. Timestamps are stored as Unix
//! milliseconds so ordering is a plain integer sort.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use alban_core::{HistoryRecord, Money, NewHistoryRecord};

const INSERT_SQL: &str = r#"
    INSERT INTO history (
        id, action_type, file_name, file_path, created_at,
        total_before_cents, total_after_cents, product_count
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
"#;

const SELECT_COLUMNS: &str = r#"
    SELECT
        id, action_type, file_name, file_path, created_at,
        total_before_cents, total_after_cents, product_count
    FROM history
"#;

/// Raw `history` row.
#[derive(Debug, Clone, sqlx::FromRow)]
struct HistoryRow {
    id: String,
    action_type: String,
    file_name: String,
    file_path: String,
    created_at: i64,
    total_before_cents: i64,
    total_after_cents: i64,
    product_count: i64,
}

impl TryFrom<HistoryRow> for HistoryRecord {
    type Error = DbError;

    fn try_from(row: HistoryRow) -> DbResult<Self> {
        let created_at = DateTime::<Utc>::from_timestamp_millis(row.created_at)
            .ok_or_else(|| DbError::corrupt("history.created_at", row.created_at))?;
        let product_count = u32::try_from(row.product_count)
            .map_err(|_| DbError::corrupt("history.product_count", row.product_count))?;

        Ok(HistoryRecord {
            id: row.id,
            action_type: row.action_type,
            file_name: row.file_name,
            file_path: row.file_path,
            created_at,
            total_before: Money::from_cents(row.total_before_cents),
            total_after: Money::from_cents(row.total_after_cents),
            product_count,
        })
    }
}

/// Repository for history database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = HistoryRepository::new(pool);
///
/// let record = repo.insert(&new_record).await?;
/// let newest_first = repo.list().await?;
/// repo.delete(&record.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct HistoryRepository {
    pool: SqlitePool,
}

impl HistoryRepository {
    /// Creates a new HistoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        HistoryRepository { pool }
    }

    /// Records a generation, assigning a fresh id and the current time.
    pub async fn insert(&self, new: &NewHistoryRecord) -> DbResult<HistoryRecord> {
        let record = HistoryRecord {
            id: generate_history_id(),
            action_type: new.action_type.clone(),
            file_name: new.file_name.clone(),
            file_path: new.file_path.clone(),
            created_at: now_millis(),
            total_before: new.total_before,
            total_after: new.total_after,
            product_count: new.product_count,
        };

        debug!(id = %record.id, file = %record.file_name, "Inserting history record");

        sqlx::query(INSERT_SQL)
            .bind(&record.id)
            .bind(&record.action_type)
            .bind(&record.file_name)
            .bind(&record.file_path)
            .bind(record.timestamp_millis())
            .bind(record.total_before.cents())
            .bind(record.total_after.cents())
            .bind(record.product_count as i64)
            .execute(&self.pool)
            .await?;

        Ok(record)
    }

    /// Inserts complete records (ids and timestamps included) in one
    /// transaction. A duplicate id rolls the whole batch back.
    pub async fn insert_all(&self, records: &[HistoryRecord]) -> DbResult<()> {
        if records.is_empty() {
            return Ok(());
        }

        debug!(count = records.len(), "Inserting history batch");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        for record in records {
            sqlx::query(INSERT_SQL)
                .bind(&record.id)
                .bind(&record.action_type)
                .bind(&record.file_name)
                .bind(&record.file_path)
                .bind(record.timestamp_millis())
                .bind(record.total_before.cents())
                .bind(record.total_after.cents())
                .bind(record.product_count as i64)
                .execute(&mut *tx)
                .await
                .map_err(|e| match DbError::from(e) {
                    DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &record.id),
                    other => other,
                })?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(count = records.len(), "History batch inserted");
        Ok(())
    }

    /// All records, newest first. Records created in the same millisecond
    /// come back in reverse insertion order.
    pub async fn list(&self) -> DbResult<Vec<HistoryRecord>> {
        let sql = format!("{} ORDER BY created_at DESC, rowid DESC", SELECT_COLUMNS);
        let rows: Vec<HistoryRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        debug!(count = rows.len(), "Listed history records");
        rows.into_iter().map(HistoryRecord::try_from).collect()
    }

    /// Gets a record by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<HistoryRecord>> {
        let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
        let row: Option<HistoryRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(HistoryRecord::try_from).transpose()
    }

    /// Deletes a record. Fails with `NotFound` when no row has this id.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting history record");

        let result = sqlx::query("DELETE FROM history WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("HistoryRecord", id));
        }

        Ok(())
    }

    /// Counts stored records.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM history")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Generates a new history record id.
pub fn generate_history_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current time truncated to the stored precision.
fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::<Utc>::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Duration;

    async fn repo() -> HistoryRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().history()
    }

    fn new_record(file_name: &str, after: i64) -> NewHistoryRecord {
        NewHistoryRecord {
            action_type: "PDF Generated".to_string(),
            file_name: file_name.to_string(),
            file_path: format!("/docs/{}", file_name),
            total_before: Money::from_cents(after + 500),
            total_after: Money::from_cents(after),
            product_count: 3,
        }
    }

    fn record_at(id: &str, millis: i64) -> HistoryRecord {
        HistoryRecord {
            id: id.to_string(),
            action_type: "PDF Generated".to_string(),
            file_name: format!("{}.pdf", id),
            file_path: format!("/docs/{}.pdf", id),
            created_at: DateTime::<Utc>::from_timestamp_millis(millis).unwrap(),
            total_before: Money::from_cents(1000),
            total_after: Money::from_cents(900),
            product_count: 1,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let repo = repo().await;
        let stored = repo.insert(&new_record("a.pdf", 11200)).await.unwrap();

        assert!(Uuid::parse_str(&stored.id).is_ok());
        let fetched = repo.get_by_id(&stored.id).await.unwrap().unwrap();
        assert_eq!(fetched, stored);
        assert_eq!(fetched.total_after, Money::from_cents(11200));
        assert_eq!(fetched.file_path, "/docs/a.pdf");
        assert!(repo.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let repo = repo().await;
        let base = Utc::now().timestamp_millis();
        repo.insert_all(&[
            record_at("old", base - 2_000),
            record_at("new", base),
            record_at("mid", base - 1_000),
        ])
        .await
        .unwrap();

        let ids: Vec<String> = repo.list().await.unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[tokio::test]
    async fn test_same_millisecond_uses_insertion_order() {
        let repo = repo().await;
        let at = (Utc::now() - Duration::days(1)).timestamp_millis();
        repo.insert_all(&[record_at("first", at), record_at("second", at)])
            .await
            .unwrap();

        let ids: Vec<String> = repo.list().await.unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn test_insert_all_rolls_back_on_duplicate() {
        let repo = repo().await;
        let at = Utc::now().timestamp_millis();
        repo.insert_all(&[record_at("dup", at)]).await.unwrap();

        let err = repo
            .insert_all(&[record_at("fresh", at), record_at("dup", at)])
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
        assert_eq!(repo.count().await.unwrap(), 1);
        assert!(repo.get_by_id("fresh").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = repo().await;
        let stored = repo.insert(&new_record("b.pdf", 100)).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);

        repo.delete(&stored.id).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 0);

        let err = repo.delete(&stored.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_negative_totals_rejected() {
        let repo = repo().await;
        let mut bad = new_record("c.pdf", 0);
        bad.total_after = Money::from_cents(-1);

        assert!(repo.insert(&bad).await.is_err());
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
