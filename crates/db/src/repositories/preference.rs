use sqlx::Row;

use frontdesk_core::domain::business::{BusinessId, UserId};
use frontdesk_core::domain::preference::UserPreference;

use super::business::parse_timestamp;
use super::{PreferenceRepository, RepositoryError};
use crate::DbPool;

pub struct SqlPreferenceRepository {
    pool: DbPool,
}

impl SqlPreferenceRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl PreferenceRepository for SqlPreferenceRepository {
    async fn get(&self, user_id: &UserId) -> Result<Option<UserPreference>, RepositoryError> {
        let row = sqlx::query(
            "SELECT user_id, active_business_id, updated_at
             FROM user_preference WHERE user_id = ?",
        )
        .bind(&user_id.0)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else { return Ok(None) };
        let get = |column: &str| -> Result<String, RepositoryError> {
            row.try_get(column).map_err(|e| RepositoryError::Decode(e.to_string()))
        };
        Ok(Some(UserPreference {
            user_id: UserId(get("user_id")?),
            active_business_id: BusinessId(get("active_business_id")?),
            updated_at: parse_timestamp(&get("updated_at")?),
        }))
    }

    async fn set(&self, preference: &UserPreference) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO user_preference (user_id, active_business_id, updated_at)
             VALUES (?, ?, ?)
             ON CONFLICT(user_id) DO UPDATE SET
                 active_business_id = excluded.active_business_id,
                 updated_at = excluded.updated_at",
        )
        .bind(&preference.user_id.0)
        .bind(&preference.active_business_id.0)
        .bind(preference.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn clear(&self, user_id: &UserId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM user_preference WHERE user_id = ?")
            .bind(&user_id.0)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
