use std::time::Duration;

use sqlx::sqlite::SqlitePoolOptions;

use frontdesk_core::config::DatabaseConfig;

pub type DbPool = sqlx::SqlitePool;

/// Session pragmas applied to every pooled connection.
const SESSION_PRAGMAS: &[&str] = &["PRAGMA foreign_keys = ON", "PRAGMA journal_mode = WAL"];

/// Opens the pool described by `database`. The SQLite busy timeout is derived
/// from the configured acquire timeout so lock waits and pool waits expire on
/// the same horizon.
pub async fn connect(database: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    let timeout = Duration::from_secs(database.timeout_secs.max(1));
    let busy_timeout_ms = timeout.as_millis().min(u128::from(u32::MAX)) as u64;

    SqlitePoolOptions::new()
        .max_connections(database.max_connections.max(1))
        .acquire_timeout(timeout)
        .after_connect(move |conn, _meta| {
            Box::pin(async move {
                for pragma in SESSION_PRAGMAS {
                    sqlx::query(pragma).execute(&mut *conn).await?;
                }
                sqlx::query(&format!("PRAGMA busy_timeout = {busy_timeout_ms}"))
                    .execute(&mut *conn)
                    .await?;
                Ok(())
            })
        })
        .connect(&database.url)
        .await
}

#[cfg(test)]
pub(crate) async fn memory_pool() -> DbPool {
    let database = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        timeout_secs: 5,
    };
    connect(&database).await.expect("in-memory pool")
}

#[cfg(test)]
mod tests {
    use sqlx::Row;

    use super::memory_pool;

    #[tokio::test]
    async fn pooled_connections_carry_session_pragmas() {
        let pool = memory_pool().await;

        let foreign_keys = sqlx::query("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .expect("query pragma")
            .try_get::<i64, _>(0)
            .expect("decode pragma");
        assert_eq!(foreign_keys, 1);

        let busy_timeout = sqlx::query("PRAGMA busy_timeout")
            .fetch_one(&pool)
            .await
            .expect("query pragma")
            .try_get::<i64, _>(0)
            .expect("decode pragma");
        assert_eq!(busy_timeout, 5_000, "busy timeout follows the acquire timeout");
    }
}
