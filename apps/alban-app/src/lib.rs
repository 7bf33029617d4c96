//! # AlbanManage Application Layer
//!
//! Wires configuration, the database, and the document store into one
//! caller-owned [`App`] handle. The presentation layer drives everything
//! through [`InvoiceService`] and the settings repository.
//!
//! ## Module Organization
//! ```text
//! alban_app/
//! ├── lib.rs        ◄─── You are here (App startup, tracing)
//! ├── config.rs     ◄─── AppConfig (TOML + ALBAN_* env)
//! ├── storage.rs    ◄─── DocumentStore trait, FsDocumentStore
//! ├── service.rs    ◄─── InvoiceService (generate, history)
//! └── error.rs      ◄─── ApiError, StorageError, ConfigError
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! alban_app::init_tracing();
//! let app = App::start(AppConfig::load_or_default(None)).await?;
//! let receipt = app
//!     .invoices()
//!     .generate_invoice(entries, chrono::Local::now().date_naive())
//!     .await?;
//! app.close().await;
//! ```

pub mod config;
pub mod error;
pub mod service;
pub mod storage;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use alban_db::{Database, DbConfig, SettingsRepository};

pub use config::AppConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use service::{InvoiceReceipt, InvoiceService};
pub use storage::{DocumentStore, FsDocumentStore, StoredDocument};

/// Installs the global tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=alban=trace` - Show trace for alban crates only
/// - Default: `info,alban=debug,sqlx=warn`
///
/// Calling it twice is harmless; the second call keeps the first subscriber.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,alban=debug,sqlx=warn"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Running application: open database plus document store.
#[derive(Debug, Clone)]
pub struct App {
    config: AppConfig,
    db: Database,
    store: Arc<FsDocumentStore>,
    invoices: InvoiceService,
}

impl App {
    /// Validates `config`, opens the database (applying migrations), and
    /// opens the document store.
    ///
    /// ## Startup Sequence
    /// ```text
    /// 1. config.validate()
    /// 2. create data_dir
    /// 3. Database::new (SQLite WAL, migrations)
    /// 4. FsDocumentStore::new (creates documents_dir)
    /// ```
    pub async fn start(config: AppConfig) -> ApiResult<Self> {
        config.validate()?;

        tokio::fs::create_dir_all(&config.data_dir)
            .await
            .map_err(error::StorageError::from)?;

        let db_path = config.database_path();
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(error::StorageError::from)?;
        }

        let db = Database::new(DbConfig::new(db_path)).await?;
        let store = Arc::new(FsDocumentStore::new(config.documents_dir()).await?);
        let invoices = InvoiceService::new(db.clone(), store.clone(), &config);

        info!(
            data_dir = %config.data_dir.display(),
            documents = %store.root().display(),
            "AlbanManage started"
        );

        Ok(App {
            config,
            db,
            store,
            invoices,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn invoices(&self) -> &InvoiceService {
        &self.invoices
    }

    /// Theme and language preferences.
    pub fn settings(&self) -> SettingsRepository {
        self.db.settings()
    }

    pub fn store(&self) -> &FsDocumentStore {
        &self.store
    }

    /// Closes the database pool.
    pub async fn close(&self) {
        self.db.close().await;
        info!("AlbanManage stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alban_core::{Money, ProductEntry, ThemeMode};
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_start_creates_layout_and_generates() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::in_dir(dir.path().join("data"));

        let app = App::start(config.clone()).await.unwrap();
        assert!(config.database_path().exists());
        assert!(config.documents_dir().is_dir());
        assert!(app.db().health_check().await);

        let entry = ProductEntry::new("Yaourt", Money::from_cents(500), 12).with_packs(1);
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let receipt = app.invoices().generate_invoice(vec![entry], date).await.unwrap();
        assert_eq!(receipt.totals.grand_total_after, Money::from_cents(6000));
        assert!(receipt.document.path.starts_with(app.store().root()));

        app.settings().save_theme_mode(ThemeMode::Dark).await.unwrap();
        assert_eq!(app.settings().theme_mode().await.unwrap(), ThemeMode::Dark);

        app.close().await;
    }

    #[tokio::test]
    async fn test_history_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::in_dir(dir.path());
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let entry = ProductEntry::new("Lben", Money::from_cents(300), 6).with_units(4);

        let app = App::start(config.clone()).await.unwrap();
        let receipt = app.invoices().generate_invoice(vec![entry], date).await.unwrap();
        app.close().await;

        let app = App::start(config).await.unwrap();
        let history = app.invoices().history().await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, receipt.record.id);
        app.close().await;
    }

    #[tokio::test]
    async fn test_invalid_config_refused() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::in_dir(dir.path());
        config.invoice_title = String::new();

        let err = App::start(config).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigError);
    }
}
