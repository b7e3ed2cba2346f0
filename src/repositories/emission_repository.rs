use super::RepositoryResult;
use crate::models::emission::{EmissionRecord, NewEmissionRecord};
use async_trait::async_trait;
use sqlx::SqlitePool;

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait EmissionRepository: Send + Sync {
    async fn create_record(&self, record: NewEmissionRecord) -> RepositoryResult<i64>;
    async fn list_by_user(&self, user_id: i64, limit: i64) -> RepositoryResult<Vec<EmissionRecord>>;
}

pub struct SqliteEmissionRepository {
    pool: SqlitePool,
}

impl SqliteEmissionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmissionRepository for SqliteEmissionRepository {
    async fn create_record(&self, record: NewEmissionRecord) -> RepositoryResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO emissions (user_id, vehicle_class, engine_size, carbon_emission)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(record.user_id)
        .bind(&record.vehicle_class)
        .bind(record.engine_size)
        .bind(record.carbon_emission)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn list_by_user(&self, user_id: i64, limit: i64) -> RepositoryResult<Vec<EmissionRecord>> {
        let records = sqlx::query_as::<_, EmissionRecord>(
            r#"
            SELECT id, user_id, vehicle_class, engine_size, carbon_emission, created_at
            FROM emissions
            WHERE user_id = ?
            ORDER BY id DESC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
