use async_trait::async_trait;
use sqlx::Row;
use twocol_core::model::UserId;

use super::SqliteRepository;
use super::mapping::{conn, ser, user_id_to_i64};
use crate::repository::{StorageError, UserPreferenceRepository};

#[async_trait]
impl UserPreferenceRepository for SqliteRepository {
    async fn get_preference(
        &self,
        user: UserId,
        name: &str,
    ) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT value FROM user_preferences WHERE userid = ?1 AND name = ?2")
            .bind(user_id_to_i64(user)?)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        row.map(|row| row.try_get::<String, _>("value").map_err(ser))
            .transpose()
    }

    async fn set_preference(
        &self,
        user: UserId,
        name: &str,
        value: &str,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO user_preferences (userid, name, value)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(userid, name) DO UPDATE SET
                value = excluded.value
            ",
        )
        .bind(user_id_to_i64(user)?)
        .bind(name)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(conn)?;
        Ok(())
    }
}
