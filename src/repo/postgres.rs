/// Postgres-backed key-value table of launch items
use super::{decode_batch, decode_keyed, not_found, RecordStore};
use crate::domain::LaunchRecord;
use crate::errors::ApiResult;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

/// Launch store over a `(flight_number BIGINT PRIMARY KEY, item JSONB)` table
#[derive(Clone)]
pub struct PgLaunchStore {
    pool: PgPool,
    table: String,
}

impl PgLaunchStore {
    /// `table` must already be a validated SQL identifier
    pub fn new(pool: PgPool, table: impl Into<String>) -> Self {
        Self {
            pool,
            table: table.into(),
        }
    }
}

#[async_trait]
impl RecordStore for PgLaunchStore {
    async fn fetch_all(&self) -> ApiResult<Vec<LaunchRecord>> {
        let rows = sqlx::query_as::<_, (Value,)>(&format!(
            "SELECT item FROM {} ORDER BY flight_number",
            self.table
        ))
        .fetch_all(&self.pool)
        .await?;

        decode_batch(rows.iter().map(|(item,)| item))
    }

    async fn fetch_by_key(&self, flight_number: u64) -> ApiResult<LaunchRecord> {
        let key = i64::try_from(flight_number).map_err(|_| not_found(flight_number))?;

        let row = sqlx::query_as::<_, (Value,)>(&format!(
            "SELECT item FROM {} WHERE flight_number = $1",
            self.table
        ))
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some((item,)) => decode_keyed(&item, flight_number),
            None => Err(not_found(flight_number)),
        }
    }

    async fn ping(&self) -> ApiResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Initialize the launch table
pub async fn init_db(pool: &PgPool, table: &str) -> ApiResult<()> {
    sqlx::query(&format!(
        "CREATE TABLE IF NOT EXISTS {}(
            flight_number BIGINT PRIMARY KEY,
            item JSONB NOT NULL
        )",
        table
    ))
    .execute(pool)
    .await?;

    Ok(())
}
