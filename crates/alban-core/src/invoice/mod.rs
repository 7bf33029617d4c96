//! # Invoice Document
//!
//! Paginated invoice layout over a [`DocumentSurface`], with a printpdf
//! surface for production output and a recording surface for inspection.

pub mod builder;
pub mod layout;
pub mod metrics;
pub mod pdf;
pub mod recording;
pub mod surface;

pub use builder::{BuiltInvoice, InvoiceBuilder, LayoutSummary};
pub use layout::{LayoutConfig, DEFAULT_FOOTER_CAPTION, DEFAULT_INVOICE_TITLE};
pub use pdf::PdfSurface;
pub use recording::{DrawOp, RecordedPage, RecordingSurface};
pub use surface::{DocumentSurface, PageSize, Rect, TextStyle};

use chrono::NaiveDate;

use crate::error::CoreResult;
use crate::types::ProductEntry;

/// Renders `entries` as a PDF with the default layout.
///
/// `title` is drawn as the page heading and stored as the document title;
/// `date` is printed as `dd/MM/yyyy`.
pub fn build_invoice_document(
    entries: &[ProductEntry],
    title: &str,
    date: NaiveDate,
) -> CoreResult<Vec<u8>> {
    InvoiceBuilder::default()
        .build(entries, title, date)
        .map(|built| built.bytes)
}
