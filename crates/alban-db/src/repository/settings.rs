//! # Settings Repository
//!
//! Key/value preferences. Typed accessors parse leniently: a missing or
//! unrecognized value reads back as the default.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use alban_core::{Language, ThemeMode};

/// Key under which the theme preference is stored.
pub const THEME_MODE_KEY: &str = "theme_mode";

/// Key under which the language preference is stored.
pub const LANGUAGE_KEY: &str = "language";

/// Repository for application settings.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    /// Creates a new SettingsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SettingsRepository { pool }
    }

    /// Raw value for `key`, if set.
    pub async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value)
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        debug!(key = %key, value = %value, "Saving setting");

        sqlx::query(
            r#"
            INSERT INTO settings (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().timestamp_millis())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Theme preference; `System` when unset or unrecognized.
    pub async fn theme_mode(&self) -> DbResult<ThemeMode> {
        Ok(self
            .get(THEME_MODE_KEY)
            .await?
            .map(|v| ThemeMode::parse_or_default(&v))
            .unwrap_or_default())
    }

    pub async fn save_theme_mode(&self, mode: ThemeMode) -> DbResult<()> {
        self.set(THEME_MODE_KEY, mode.as_str()).await
    }

    /// Language preference; English when unset or unrecognized.
    pub async fn language(&self) -> DbResult<Language> {
        Ok(self
            .get(LANGUAGE_KEY)
            .await?
            .map(|v| Language::parse_or_default(&v))
            .unwrap_or_default())
    }

    pub async fn save_language(&self, language: Language) -> DbResult<()> {
        self.set(LANGUAGE_KEY, language.code()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn repo() -> SettingsRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().settings()
    }

    #[tokio::test]
    async fn test_get_set_upsert() {
        let repo = repo().await;
        assert_eq!(repo.get("k").await.unwrap(), None);

        repo.set("k", "one").await.unwrap();
        repo.set("k", "two").await.unwrap();
        assert_eq!(repo.get("k").await.unwrap().as_deref(), Some("two"));
    }

    #[tokio::test]
    async fn test_theme_mode_defaults_and_round_trips() {
        let repo = repo().await;
        assert_eq!(repo.theme_mode().await.unwrap(), ThemeMode::System);

        repo.save_theme_mode(ThemeMode::Dark).await.unwrap();
        assert_eq!(repo.theme_mode().await.unwrap(), ThemeMode::Dark);

        repo.set(THEME_MODE_KEY, "PURPLE").await.unwrap();
        assert_eq!(repo.theme_mode().await.unwrap(), ThemeMode::System);
    }

    #[tokio::test]
    async fn test_language_defaults_and_round_trips() {
        let repo = repo().await;
        assert_eq!(repo.language().await.unwrap(), Language::En);

        repo.save_language(Language::Ar).await.unwrap();
        assert_eq!(repo.language().await.unwrap(), Language::Ar);
        assert_eq!(repo.get(LANGUAGE_KEY).await.unwrap().as_deref(), Some("ar"));

        repo.set(LANGUAGE_KEY, "de").await.unwrap();
        assert_eq!(repo.language().await.unwrap(), Language::En);
    }
}
