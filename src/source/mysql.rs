//! MySQL implementation of the pathway source
//!
//! Assumed relational layout, both tables read in primary-key order:
//!
//! ```text
//! objects(db_id BIGINT PK, class VARCHAR, display_name VARCHAR,
//!         stable_id VARCHAR NULL, species VARCHAR NULL,
//!         identifier VARCHAR NULL, database_name VARCHAR NULL)
//! object_refs(db_id BIGINT, field VARCHAR, rank INT, target_id BIGINT)
//! ```

use super::{ObjectRow, PathwaySource, RefRow, SourceConfig, SourceError, SourceResult};
use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::Row;
use std::time::Duration;
use tracing::info;

const OBJECT_SQL: &str = "SELECT db_id, class, display_name, stable_id, species, \
     identifier, database_name FROM objects ORDER BY db_id";

const REF_SQL: &str =
    "SELECT db_id, field, `rank`, target_id FROM object_refs ORDER BY db_id, field, `rank`";

const COUNT_SQL: &str = "SELECT COUNT(*) FROM objects";

const CLASS_SQL: &str = "SELECT DISTINCT class FROM objects";

/// Pathway source backed by a MySQL connection pool.
pub struct MySqlSource {
    pool: MySqlPool,
}

impl MySqlSource {
    /// Connect to the source database.
    ///
    /// The pool stays small: the loader is the only reader and holds at most
    /// two cursors open at a time.
    pub async fn connect(config: &SourceConfig) -> SourceResult<Self> {
        info!(
            host = %config.host,
            port = config.port,
            database = %config.name,
            "Connecting to relational source"
        );

        let pool = MySqlPoolOptions::new()
            .max_connections(4)
            .acquire_timeout(Duration::from_secs(10))
            .connect(&config.url())
            .await?;

        Ok(Self { pool })
    }

    /// Close the connection pool gracefully.
    pub async fn close(self) {
        self.pool.close().await;
    }

    fn object_row(row: MySqlRow) -> SourceResult<ObjectRow> {
        Ok(ObjectRow {
            db_id: row.try_get("db_id")?,
            class: row.try_get("class")?,
            display_name: row.try_get("display_name")?,
            stable_id: row.try_get("stable_id")?,
            species: row.try_get("species")?,
            identifier: row.try_get("identifier")?,
            database_name: row.try_get("database_name")?,
        })
    }

    fn ref_row(row: MySqlRow) -> SourceResult<RefRow> {
        Ok(RefRow {
            db_id: row.try_get("db_id")?,
            field: row.try_get("field")?,
            rank: row.try_get("rank")?,
            target_id: row.try_get("target_id")?,
        })
    }
}

#[async_trait]
impl PathwaySource for MySqlSource {
    async fn object_count(&self) -> SourceResult<u64> {
        let row = sqlx::query(COUNT_SQL).fetch_one(&self.pool).await?;
        let count: i64 = row.try_get(0)?;
        Ok(count as u64)
    }

    async fn distinct_classes(&self) -> SourceResult<Vec<String>> {
        let rows = sqlx::query(CLASS_SQL).fetch_all(&self.pool).await?;
        rows.into_iter()
            .map(|row| row.try_get::<String, _>("class").map_err(SourceError::from))
            .collect()
    }

    fn object_rows(&self) -> BoxStream<'_, SourceResult<ObjectRow>> {
        sqlx::query(OBJECT_SQL)
            .fetch(&self.pool)
            .map(|row| row.map_err(SourceError::from).and_then(Self::object_row))
            .boxed()
    }

    fn ref_rows(&self) -> BoxStream<'_, SourceResult<RefRow>> {
        sqlx::query(REF_SQL)
            .fetch(&self.pool)
            .map(|row| row.map_err(SourceError::from).and_then(Self::ref_row))
            .boxed()
    }
}
