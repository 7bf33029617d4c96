//! # Repository Module
//!
//! Database repository implementations for AlbanManage.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  InvoiceService                                                         │
//! │       │                                                                 │
//! │       │  db.history().insert(record)                                   │
//! │       ▼                                                                 │
//! │  HistoryRepository                  SettingsRepository                 │
//! │  ├── insert / insert_all            ├── get / set                      │
//! │  ├── list (newest first)            ├── theme_mode / save_theme_mode   │
//! │  ├── get_by_id / count              └── language / save_language       │
//! │  └── delete                                                             │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories hold a cloned `SqlitePool` handle and are cheap to create.

pub mod history;
pub mod settings;
