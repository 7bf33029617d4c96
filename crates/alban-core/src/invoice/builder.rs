//! # Invoice Builder
//!
//! Lays entries out as a paginated table and serializes the result.
//!
//! ```text
//! page 1                         page 2..n
//! ┌────────────────────────┐     ┌────────────────────────┐
//! │ AlbanManage Invoice    │     │▓ header band ▓▓▓▓▓▓▓▓▓▓│  y = 50
//! │ Date: 19/10/2026       │     │ row                    │
//! │▓ header band ▓▓▓▓▓▓▓▓▓▓│     │ row                    │
//! │ row                    │     │ ...                    │
//! │ ...        (y ≤ 750)   │     │ Grand Total: 1.00 MAD  │
//! └────────────────────────┘     │ Generated by ...       │
//!                                └────────────────────────┘
//! ```
//!
//! Only entries with activity produce rows. The builder holds no state
//! between runs; every call starts from an empty surface.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::invoice::layout::{truncate_to_width, LayoutConfig, COLUMNS};
use crate::invoice::pdf::PdfSurface;
use crate::invoice::surface::DocumentSurface;
use crate::money::Money;
use crate::totals::{aggregate, compute_entry_totals};
use crate::types::ProductEntry;

/// Shape of a built document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSummary {
    pub pages: usize,
    pub rows: usize,
    pub rows_first_page: usize,
    pub rows_per_continuation_page: usize,
    pub grand_total: Money,
}

/// Serialized document plus its layout summary.
#[derive(Debug, Clone)]
pub struct BuiltInvoice {
    pub bytes: Vec<u8>,
    pub summary: LayoutSummary,
}

/// Invoice layout engine.
#[derive(Debug, Clone, Default)]
pub struct InvoiceBuilder {
    config: LayoutConfig,
}

impl InvoiceBuilder {
    pub fn new(config: LayoutConfig) -> Self {
        InvoiceBuilder { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Builds a PDF.
    pub fn build(
        &self,
        entries: &[ProductEntry],
        title: &str,
        date: NaiveDate,
    ) -> CoreResult<BuiltInvoice> {
        let mut surface = PdfSurface::new(title);
        self.build_with(&mut surface, entries, title, date)
    }

    /// Builds onto any surface. On failure the surface is aborted and no
    /// bytes are returned.
    pub fn build_with<S: DocumentSurface>(
        &self,
        surface: &mut S,
        entries: &[ProductEntry],
        title: &str,
        date: NaiveDate,
    ) -> CoreResult<BuiltInvoice> {
        match self.layout(surface, entries, title, date) {
            Ok(summary) => match surface.finish() {
                Ok(bytes) => Ok(BuiltInvoice { bytes, summary }),
                Err(e) => {
                    surface.abort();
                    Err(as_build_failure(e))
                }
            },
            Err(e) => {
                surface.abort();
                Err(as_build_failure(e))
            }
        }
    }

    fn layout<S: DocumentSurface>(
        &self,
        surface: &mut S,
        entries: &[ProductEntry],
        title: &str,
        date: NaiveDate,
    ) -> CoreResult<LayoutSummary> {
        let cfg = &self.config;
        let mut pages = 1;
        let mut rows = 0;
        let grand_total = aggregate(entries).grand_total_after;

        surface.begin_page(cfg.page)?;
        surface.draw_text(title, cfg.margin_x, cfg.title_y, cfg.title_style)?;
        surface.draw_text(
            &format!("Date: {}", date.format("%d/%m/%Y")),
            cfg.margin_x,
            cfg.date_y,
            cfg.date_style,
        )?;
        let mut y = self.draw_header(surface, cfg.header_y(true))?;

        for entry in entries.iter().filter(|e| e.has_activity()) {
            if y > cfg.max_y {
                surface.finish_page()?;
                surface.begin_page(cfg.page)?;
                pages += 1;
                y = self.draw_header(surface, cfg.header_y(false))?;
            }

            let totals = compute_entry_totals(entry);

            let name = truncate_to_width(&*surface, &entry.name, cfg.row_style, cfg.name_budget);
            let cells = [
                name,
                entry.units.to_string(),
                entry.packs.to_string(),
                totals.total_units.to_string(),
                entry.expired.to_string(),
                entry.disabled.to_string(),
                entry.unit_price.to_string(),
                totals.row_total_after.with_currency(&cfg.currency_label),
            ];
            for (column, text) in COLUMNS.iter().zip(cells.iter()) {
                surface.draw_text(text, column.x, y, cfg.row_style)?;
            }

            rows += 1;
            y += cfg.row_height;
        }

        if y > cfg.max_y {
            surface.finish_page()?;
            surface.begin_page(cfg.page)?;
            pages += 1;
            y = cfg.continuation_header_y;
        }

        y += cfg.total_gap;
        surface.draw_text(
            &format!(
                "Grand Total: {}",
                grand_total.with_currency(&cfg.currency_label)
            ),
            cfg.margin_x,
            y,
            cfg.total_style,
        )?;

        y += cfg.footer_gap;
        surface.draw_text(&cfg.footer_caption, cfg.margin_x, y, cfg.footer_style)?;
        surface.finish_page()?;

        Ok(LayoutSummary {
            pages,
            rows,
            rows_first_page: cfg.rows_per_page(true),
            rows_per_continuation_page: cfg.rows_per_page(false),
            grand_total,
        })
    }

    /// Draws the band and column labels; returns the first row baseline.
    fn draw_header<S: DocumentSurface>(&self, surface: &mut S, y: f32) -> CoreResult<f32> {
        let cfg = &self.config;
        surface.fill_rect(cfg.header_band(y), cfg.band_gray)?;
        for column in COLUMNS.iter() {
            surface.draw_text(column.label, column.x, y, cfg.header_style)?;
        }
        Ok(y + cfg.header_advance)
    }
}

fn as_build_failure(err: CoreError) -> CoreError {
    match err {
        CoreError::DocumentBuildFailed { .. } => err,
        other => CoreError::build_failed(other.to_string()),
    }
}
