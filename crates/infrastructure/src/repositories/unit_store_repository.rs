use crate::database;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tally_dns_application::ports::UnitStore;
use tally_dns_domain::{DomainError, FilterResult, UnitCounters, UnitId};
use tracing::info;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS stats_units (
    id INTEGER PRIMARY KEY,
    total INTEGER NOT NULL,
    by_result TEXT NOT NULL,
    elapsed_sum_micros INTEGER NOT NULL
)";

/// SQLite-backed unit store. One row per unit id; the per-category counters
/// travel as a JSON array so the row stays fixed-width from the schema's
/// point of view.
pub struct SqliteUnitStore {
    pool: SqlitePool,
}

impl SqliteUnitStore {
    /// Prepares the store on an existing pool, creating the schema when
    /// missing.
    pub async fn open(pool: SqlitePool) -> Result<Self, DomainError> {
        sqlx::query(SCHEMA).execute(&pool).await.map_err(db_err)?;
        Ok(Self { pool })
    }

    /// Opens (or creates) the store file at `path`. An unusable path or an
    /// unreadable database is a configuration error.
    pub async fn connect(path: &str) -> Result<Self, DomainError> {
        let pool = database::create_pool(path).await.map_err(|e| {
            DomainError::ConfigError(format!("cannot open stats store {path}: {e}"))
        })?;

        let store = Self::open(pool).await?;
        info!(path, "Stats unit store opened");
        Ok(store)
    }
}

#[async_trait]
impl UnitStore for SqliteUnitStore {
    async fn load(&self, id: UnitId) -> Result<Option<UnitCounters>, DomainError> {
        let row = sqlx::query(
            "SELECT total, by_result, elapsed_sum_micros FROM stats_units WHERE id = ?",
        )
        .bind(i64::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref().map(row_to_counters).transpose()
    }

    async fn load_range(
        &self,
        from: UnitId,
        to: UnitId,
    ) -> Result<Vec<(UnitId, UnitCounters)>, DomainError> {
        let rows = sqlx::query(
            "SELECT id, total, by_result, elapsed_sum_micros FROM stats_units \
             WHERE id BETWEEN ? AND ? ORDER BY id",
        )
        .bind(i64::from(from))
        .bind(i64::from(to))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let mut units = Vec::with_capacity(rows.len());
        for row in &rows {
            let id: i64 = row.get("id");
            units.push((id as UnitId, row_to_counters(row)?));
        }
        Ok(units)
    }

    async fn store(&self, id: UnitId, counters: &UnitCounters) -> Result<(), DomainError> {
        let by_result = serde_json::to_string(&counters.by_result)
            .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        sqlx::query(
            "INSERT INTO stats_units (id, total, by_result, elapsed_sum_micros) \
             VALUES (?, ?, ?, ?) \
             ON CONFLICT(id) DO UPDATE SET \
                 total = excluded.total, \
                 by_result = excluded.by_result, \
                 elapsed_sum_micros = excluded.elapsed_sum_micros",
        )
        .bind(i64::from(id))
        .bind(counters.total as i64)
        .bind(by_result)
        .bind(counters.elapsed_sum_micros as i64)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn delete_before(&self, cutoff: UnitId) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM stats_units WHERE id < ?")
            .bind(i64::from(cutoff))
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

fn db_err(e: sqlx::Error) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

fn row_to_counters(row: &SqliteRow) -> Result<UnitCounters, DomainError> {
    let total: i64 = row.get("total");
    let elapsed_sum_micros: i64 = row.get("elapsed_sum_micros");
    let by_result_json: String = row.get("by_result");

    let by_result: [u64; FilterResult::COUNT] = serde_json::from_str(&by_result_json)
        .map_err(|e| DomainError::DatabaseError(format!("corrupt unit record: {e}")))?;

    Ok(UnitCounters {
        total: total as u64,
        by_result,
        elapsed_sum_micros: elapsed_sum_micros as u64,
    })
}
