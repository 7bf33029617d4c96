//! Invoice geometry and cell formatting.
//!
//! All coordinates are points on an A4 page, top-left origin. The defaults
//! reproduce the printed invoice the shop already uses.

use crate::invoice::surface::{DocumentSurface, PageSize, Rect, TextStyle};
use crate::DEFAULT_CURRENCY_LABEL;

/// Heading drawn at the top of the first page.
pub const DEFAULT_INVOICE_TITLE: &str = "AlbanManage Invoice";

/// Caption under the grand total.
pub const DEFAULT_FOOTER_CAPTION: &str = "Generated by AlbanManage";

/// Appended to names cut to fit the product column.
pub const ELLIPSIS: &str = "...";

/// A table column: header label and left offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    pub label: &'static str,
    pub x: f32,
}

/// Table columns, left to right.
pub const COLUMNS: [Column; 8] = [
    Column { label: "Product", x: 50.0 },
    Column { label: "Units", x: 180.0 },
    Column { label: "Packs", x: 230.0 },
    Column { label: "Total Units", x: 280.0 },
    Column { label: "Expired", x: 340.0 },
    Column { label: "Disabled", x: 390.0 },
    Column { label: "Unit Price", x: 440.0 },
    Column { label: "Total", x: 500.0 },
];

/// Page geometry, typography and labels for the invoice.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub page: PageSize,
    pub margin_x: f32,
    pub title_y: f32,
    pub date_y: f32,
    /// Header baseline on the first page.
    pub first_header_y: f32,
    /// Header baseline on continuation pages.
    pub continuation_header_y: f32,
    /// A row is never started below this baseline.
    pub max_y: f32,
    pub header_advance: f32,
    pub row_height: f32,
    /// Header band extends this far above the header baseline...
    pub band_above: f32,
    /// ...and this far below it.
    pub band_below: f32,
    pub band_left: f32,
    pub band_right: f32,
    pub band_gray: f32,
    /// Width available to the product name.
    pub name_budget: f32,
    pub title_style: TextStyle,
    pub date_style: TextStyle,
    pub header_style: TextStyle,
    pub row_style: TextStyle,
    pub total_style: TextStyle,
    pub footer_style: TextStyle,
    pub total_gap: f32,
    pub footer_gap: f32,
    pub currency_label: String,
    pub footer_caption: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            page: PageSize::A4,
            margin_x: 50.0,
            title_y: 80.0,
            date_y: 110.0,
            first_header_y: 160.0,
            continuation_header_y: 50.0,
            max_y: 750.0,
            header_advance: 25.0,
            row_height: 20.0,
            band_above: 20.0,
            band_below: 5.0,
            band_left: 45.0,
            band_right: 550.0,
            band_gray: 0.8,
            name_budget: 110.0,
            title_style: TextStyle::bold(24.0),
            date_style: TextStyle::regular(14.0),
            header_style: TextStyle::bold(12.0),
            row_style: TextStyle::regular(12.0),
            total_style: TextStyle::bold(16.0),
            footer_style: TextStyle::regular(10.0),
            total_gap: 20.0,
            footer_gap: 40.0,
            currency_label: DEFAULT_CURRENCY_LABEL.to_string(),
            footer_caption: DEFAULT_FOOTER_CAPTION.to_string(),
        }
    }
}

impl LayoutConfig {
    pub fn with_currency_label(mut self, label: impl Into<String>) -> Self {
        self.currency_label = label.into();
        self
    }

    pub fn with_footer_caption(mut self, caption: impl Into<String>) -> Self {
        self.footer_caption = caption.into();
        self
    }

    /// Baseline of the header on the first or a continuation page.
    pub fn header_y(&self, first_page: bool) -> f32 {
        if first_page {
            self.first_header_y
        } else {
            self.continuation_header_y
        }
    }

    /// Number of data rows that fit under the header of a page.
    pub fn rows_per_page(&self, first_page: bool) -> usize {
        let start = self.header_y(first_page) + self.header_advance;
        if start > self.max_y || self.row_height <= 0.0 {
            return 0;
        }
        ((self.max_y - start) / self.row_height) as usize + 1
    }

    /// Grey band behind the header row whose baseline is `y`.
    pub fn header_band(&self, y: f32) -> Rect {
        Rect::from_edges(
            self.band_left,
            y - self.band_above,
            self.band_right,
            y + self.band_below,
        )
    }
}

/// Shortens `name` to fit `budget` points, appending [`ELLIPSIS`].
///
/// Characters are kept while the running width plus the ellipsis stays
/// within the budget. Names that already fit are returned unchanged.
pub fn truncate_to_width<S: DocumentSurface + ?Sized>(
    surface: &S,
    name: &str,
    style: TextStyle,
    budget: f32,
) -> String {
    if surface.measure_text(name, style) <= budget {
        return name.to_string();
    }

    let ellipsis = surface.measure_text(ELLIPSIS, style);
    let mut width = 0.0;
    let mut kept = String::new();
    for c in name.chars() {
        let mut buf = [0u8; 4];
        let advance = surface.measure_text(c.encode_utf8(&mut buf), style);
        if width + advance + ellipsis > budget {
            break;
        }
        width += advance;
        kept.push(c);
    }
    kept.push_str(ELLIPSIS);
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::recording::RecordingSurface;

    #[test]
    fn test_default_rows_per_page() {
        let config = LayoutConfig::default();
        assert_eq!(config.rows_per_page(true), 29);
        assert_eq!(config.rows_per_page(false), 34);
    }

    #[test]
    fn test_header_band_edges() {
        let band = LayoutConfig::default().header_band(160.0);
        assert_eq!(band, Rect::from_edges(45.0, 140.0, 550.0, 165.0));
    }

    #[test]
    fn test_short_name_untouched() {
        let surface = RecordingSurface::new();
        let name = truncate_to_width(&surface, "Lben 0.25L", TextStyle::regular(12.0), 110.0);
        assert_eq!(name, "Lben 0.25L");
    }

    #[test]
    fn test_long_name_truncated_within_budget() {
        let surface = RecordingSurface::new();
        let style = TextStyle::regular(12.0);
        let name = truncate_to_width(&surface, "Piko Yaourt Boisson Vanille 140g", style, 110.0);

        assert!(name.ends_with(ELLIPSIS));
        assert!(name.len() < "Piko Yaourt Boisson Vanille 140g".len());
        assert!(surface.measure_text(&name, style) <= 110.0);
        assert!("Piko Yaourt Boisson Vanille 140g".starts_with(name.trim_end_matches(ELLIPSIS)));
    }

    #[test]
    fn test_tiny_budget_leaves_only_ellipsis() {
        let surface = RecordingSurface::new();
        let name = truncate_to_width(&surface, "Beurre", TextStyle::regular(12.0), 5.0);
        assert_eq!(name, ELLIPSIS);
    }
}
