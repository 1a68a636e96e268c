//! User settings repository
//!
//! Settings are stored as one JSONB document per user.

use anyhow::Result;
use peso_coach_shared::Settings;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};

const UPSERT_SETTINGS: &str = r#"
    INSERT INTO user_settings (user_key, settings, updated_at)
    VALUES ($1, $2, NOW())
    ON CONFLICT (user_key) DO UPDATE
    SET settings = EXCLUDED.settings, updated_at = NOW()
"#;

pub struct SettingsRepository;

impl SettingsRepository {
    pub async fn get(pool: &PgPool, user_key: &str) -> Result<Option<Settings>> {
        let row: Option<(Json<Settings>,)> =
            sqlx::query_as("SELECT settings FROM user_settings WHERE user_key = $1")
                .bind(user_key)
                .fetch_optional(pool)
                .await?;

        Ok(row.map(|(Json(settings),)| settings))
    }

    pub async fn put(pool: &PgPool, user_key: &str, settings: &Settings) -> Result<()> {
        sqlx::query(UPSERT_SETTINGS)
            .bind(user_key)
            .bind(Json(settings))
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Same as [`Self::put`], inside the caller's transaction
    pub async fn put_in(tx: &mut Transaction<'_, Postgres>, user_key: &str, settings: &Settings) -> Result<()> {
        sqlx::query(UPSERT_SETTINGS)
            .bind(user_key)
            .bind(Json(settings))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}
