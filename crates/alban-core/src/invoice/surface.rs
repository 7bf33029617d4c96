//! # Document Surface
//!
//! The narrow drawing interface the invoice layout is written against.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  InvoiceBuilder (layout + pagination)                                   │
//! │       │  begin_page / draw_text / fill_rect / measure_text / finish     │
//! │       ▼                                                                 │
//! │  ┌──────────────────────────┐    ┌──────────────────────────────────┐  │
//! │  │ PdfSurface (printpdf)    │    │ RecordingSurface (draw call log) │  │
//! │  │ production bytes         │    │ tests, previews                  │  │
//! │  └──────────────────────────┘    └──────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Coordinates are PDF points with a top-left origin; `y` grows down the
//! page and names the text baseline.

use crate::error::CoreResult;

/// Page dimensions in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    /// A4 at 72 dpi.
    pub const A4: PageSize = PageSize {
        width: 595.0,
        height: 842.0,
    };
}

/// Font settings for a text run. All text uses the surface's sans-serif face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub bold: bool,
}

impl TextStyle {
    pub const fn regular(size: f32) -> Self {
        TextStyle { size, bold: false }
    }

    pub const fn bold(size: f32) -> Self {
        TextStyle { size, bold: true }
    }
}

/// Axis-aligned rectangle, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Builds a rectangle from its left, top, right and bottom edges.
    pub fn from_edges(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Rect {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
        }
    }
}

/// A fixed-size-page drawing target that serializes to bytes.
///
/// ## Lifecycle
/// ```text
/// begin_page ─► draw_* ─► finish_page ─┬─► begin_page ...
///                                      └─► finish ─► bytes
///
/// any error ─► abort (partial pages are dropped, nothing is emitted)
/// ```
pub trait DocumentSurface {
    /// Starts a new page. Fails when the page cannot be allocated.
    fn begin_page(&mut self, size: PageSize) -> CoreResult<()>;

    /// Finalizes the current page.
    fn finish_page(&mut self) -> CoreResult<()>;

    /// Draws a single line of text with its baseline at `y`.
    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) -> CoreResult<()>;

    /// Fills a rectangle with a grey level (0.0 black, 1.0 white).
    fn fill_rect(&mut self, rect: Rect, gray: f32) -> CoreResult<()>;

    /// Width of `text` in points when drawn with `style`.
    fn measure_text(&self, text: &str, style: TextStyle) -> f32;

    /// Serializes every finished page. The surface is empty afterwards.
    fn finish(&mut self) -> CoreResult<Vec<u8>>;

    /// Drops every page started so far without emitting anything.
    fn abort(&mut self);
}
