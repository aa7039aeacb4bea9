//! 数据库基础设施

use sqlx::{
    postgres::{PgPool, PgPoolOptions},
    Error,
};
use tracing::info;

use super::config::DatabaseConfig;

pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    /// 建立连接池并确保表结构存在
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, Error> {
        info!("Connecting to database: {}", config.redacted_url());

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.url)
            .await?;

        let manager = Self { pool };
        manager.create_tables().await?;
        Ok(manager)
    }

    async fn create_tables(&self) -> Result<(), Error> {
        // seq 只用来保持插入顺序
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                seq BIGSERIAL,
                id UUID PRIMARY KEY,
                name TEXT NOT NULL,
                price DOUBLE PRECISION NOT NULL,
                category TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("Database tables ready");
        Ok(())
    }

    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }
}
