//! # Invoice Service
//!
//! The generate → store → record workflow, plus history browsing.
//!
//! ```text
//! generate_invoice(entries, today)
//!      │
//!      ├── validate_entries ──────────► ApiError::ValidationError
//!      ├── aggregate                    (pure)
//!      ├── spawn_blocking(build) ─────► ApiError::DocumentError
//!      ├── store.save(bytes) ─────────► ApiError::StorageError (no history)
//!      └── history.insert ────────────► HistoryRecord
//!                 └── on error: store.delete(document), ApiError::DatabaseError
//! ```

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use alban_core::invoice::{BuiltInvoice, LayoutSummary};
use alban_core::validation::validate_entries;
use alban_core::{
    active_entry_count, aggregate, HistoryRecord, InvoiceBuilder, InvoiceTotals,
    NewHistoryRecord, ProductEntry,
};
use alban_db::Database;

use crate::config::AppConfig;
use crate::error::{ApiError, ApiResult, StorageError};
use crate::storage::{DocumentStore, StoredDocument};

/// Outcome of a successful generation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceReceipt {
    pub record: HistoryRecord,
    pub document: StoredDocument,
    pub totals: InvoiceTotals,
    pub summary: LayoutSummary,
}

/// Invoice generation and history operations.
#[derive(Clone)]
pub struct InvoiceService {
    db: Database,
    store: Arc<dyn DocumentStore>,
    builder: InvoiceBuilder,
    title: String,
    action_label: String,
}

impl std::fmt::Debug for InvoiceService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvoiceService")
            .field("title", &self.title)
            .field("action_label", &self.action_label)
            .finish_non_exhaustive()
    }
}

impl InvoiceService {
    pub fn new(db: Database, store: Arc<dyn DocumentStore>, config: &AppConfig) -> Self {
        InvoiceService {
            db,
            store,
            builder: InvoiceBuilder::new(config.layout()),
            title: config.invoice_title.clone(),
            action_label: config.action_label.clone(),
        }
    }

    /// Builds, stores, and records an invoice for `entries` dated `today`.
    ///
    /// Nothing is recorded unless the document was stored, and a stored
    /// document is removed again if its history record cannot be written.
    pub async fn generate_invoice(
        &self,
        entries: Vec<ProductEntry>,
        today: NaiveDate,
    ) -> ApiResult<InvoiceReceipt> {
        validate_entries(&entries)?;

        let totals = aggregate(&entries);
        let product_count = u32::try_from(active_entry_count(&entries))
            .map_err(|_| ApiError::validation("Too many products on one invoice"))?;

        debug!(
            entries = entries.len(),
            product_count,
            total_after = %totals.grand_total_after,
            "Generating invoice"
        );

        let built = self.build_document(entries, today).await?;
        let base_name = document_base_name(&self.title, today);
        let document = self.store.save(&base_name, built.bytes).await?;

        let new = NewHistoryRecord::from_totals(
            self.action_label.as_str(),
            document.file_name.as_str(),
            document.path.to_string_lossy(),
            &totals,
            product_count,
        );
        let record = match self.db.history().insert(&new).await {
            Ok(record) => record,
            Err(e) => {
                // An unrecorded document would be invisible to history
                if let Err(cleanup) = self.store.delete(&document.path).await {
                    warn!(
                        path = %document.path.display(),
                        error = %cleanup,
                        "Failed to remove unrecorded document"
                    );
                }
                return Err(e.into());
            }
        };

        info!(
            id = %record.id,
            file = %record.file_name,
            pages = built.summary.pages,
            "Invoice generated"
        );

        Ok(InvoiceReceipt {
            record,
            document,
            totals,
            summary: built.summary,
        })
    }

    async fn build_document(
        &self,
        entries: Vec<ProductEntry>,
        today: NaiveDate,
    ) -> ApiResult<BuiltInvoice> {
        let builder = self.builder.clone();
        let title = self.title.clone();

        let built = tokio::task::spawn_blocking(move || builder.build(&entries, &title, today))
            .await
            .map_err(|e| ApiError::internal(format!("Invoice build task failed: {}", e)))??;

        Ok(built)
    }

    /// History, newest first.
    pub async fn history(&self) -> ApiResult<Vec<HistoryRecord>> {
        Ok(self.db.history().list().await?)
    }

    /// Deletes a history record and its stored document.
    ///
    /// Returns whether a file was removed. A record whose file is already
    /// gone, or lives outside the store, is still deleted.
    pub async fn delete_history(&self, id: &str) -> ApiResult<bool> {
        let record = self
            .db
            .history()
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("HistoryRecord", id))?;

        let removed = match self.store.delete(Path::new(&record.file_path)).await {
            Ok(removed) => removed,
            Err(StorageError::OutsideStore(path)) => {
                warn!(path = %path.display(), "History file outside document store, left in place");
                false
            }
            Err(e) => return Err(e.into()),
        };

        self.db.history().delete(id).await?;
        info!(%id, file_removed = removed, "History record deleted");

        Ok(removed)
    }

    /// Bytes of the document a record points at.
    pub async fn open_document(&self, record: &HistoryRecord) -> ApiResult<Vec<u8>> {
        Ok(self.store.open(Path::new(&record.file_path)).await?)
    }

    /// Every stored PDF, newest first.
    pub async fn documents(&self) -> ApiResult<Vec<StoredDocument>> {
        Ok(self.store.list().await?)
    }
}

/// `"AlbanManage Invoice"` on 2026-10-19 → `"AlbanManage_Invoice_2026-10-19"`.
fn document_base_name(title: &str, date: NaiveDate) -> String {
    let stem: String = title
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    format!("{}_{}", stem, date.format("%Y-%m-%d"))
}
