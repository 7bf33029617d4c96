//! # alban-core: Pure Business Logic for AlbanManage
//!
//! Inventory totals and invoice layout as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       AlbanManage Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Presentation (counting screen)                  │   │
//! │  │    Product forms ──► Summary ──► Generate PDF ──► History       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 alban-app (InvoiceService, App)                 │   │
//! │  │    config, tracing, document store, generate_invoice            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ alban-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  totals   │  │  invoice  │  │   │
//! │  │   │  Entry    │  │   Money   │  │ RowTotals │  │  layout   │  │   │
//! │  │   │  History  │  │  parsing  │  │ aggregate │  │  PDF      │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO DATABASE • NO FILES • NO NETWORK • PURE FUNCTIONS         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 alban-db (Database Layer)                       │   │
//! │  │         SQLite history + settings, migrations, repositories     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (ProductEntry, HistoryRecord, settings values)
//! - [`money`] - Money type with integer arithmetic
//! - [`totals`] - Per-row and grand totals
//! - [`validation`] - Entry validation and quantity parsing
//! - [`catalog`] - Built-in product catalog
//! - [`invoice`] - Paginated invoice layout and PDF output
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use alban_core::{aggregate, Money, ProductEntry};
//!
//! let entries = vec![
//!     ProductEntry::new("Lait UHT", Money::from_cents(500), 12)
//!         .with_units(6)
//!         .with_packs(1)
//!         .with_disabled(2),
//!     ProductEntry::new("Yaourt", Money::from_cents(500), 12)
//!         .with_units(8)
//!         .with_packs(1),
//! ];
//!
//! let totals = aggregate(&entries);
//! assert_eq!(totals.grand_total_before.to_string(), "200.00");
//! assert_eq!(totals.grand_total_after.to_string(), "180.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod invoice;
pub mod money;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use invoice::{build_invoice_document, InvoiceBuilder, LayoutConfig};
pub use money::Money;
pub use totals::{
    active_entry_count, aggregate, checked_aggregate, checked_entry_totals, compute_entry_totals,
};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Longest product name accepted by validation.
pub const MAX_PRODUCT_NAME_LEN: usize = 200;

/// Currency label printed after invoice amounts.
pub const DEFAULT_CURRENCY_LABEL: &str = "MAD";

/// `action_type` of history records created by invoice generation.
pub const DEFAULT_ACTION_LABEL: &str = "PDF Generated";

/// MIME type of generated documents.
pub const PDF_MIME_TYPE: &str = "application/pdf";
