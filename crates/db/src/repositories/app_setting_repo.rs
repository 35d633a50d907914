//! Repository for the `app_settings` key/value table.

use sqlx::{PgConnection, PgPool};

use crate::models::app_setting::{
    AppSetting, AppSettings, UpdateAppSettings, KEY_TELEGRAM_CHAT_ID,
    KEY_TELEGRAM_NOTIFICATIONS_ENABLED,
};

/// Reads and writes application settings.
pub struct AppSettingRepo;

impl AppSettingRepo {
    /// Load every known setting into a typed [`AppSettings`].
    pub async fn get(pool: &PgPool) -> Result<AppSettings, sqlx::Error> {
        let rows = sqlx::query_as::<_, AppSetting>("SELECT key, value, updated_at FROM app_settings")
            .fetch_all(pool)
            .await?;
        Ok(AppSettings::from_rows(&rows))
    }

    /// Insert or overwrite a single key.
    pub async fn upsert(conn: &mut PgConnection, key: &str, value: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO app_settings (key, value) VALUES ($1, $2)
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value",
        )
        .bind(key)
        .bind(value)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Apply a partial update atomically and return the resulting settings.
    pub async fn update(
        pool: &PgPool,
        input: &UpdateAppSettings,
    ) -> Result<AppSettings, sqlx::Error> {
        let mut tx = pool.begin().await?;
        if let Some(chat_id) = &input.telegram_chat_id {
            Self::upsert(&mut tx, KEY_TELEGRAM_CHAT_ID, chat_id.trim()).await?;
        }
        if let Some(enabled) = input.telegram_notifications_enabled {
            let value = if enabled { "true" } else { "false" };
            Self::upsert(&mut tx, KEY_TELEGRAM_NOTIFICATIONS_ENABLED, value).await?;
        }
        tx.commit().await?;
        Self::get(pool).await
    }
}
