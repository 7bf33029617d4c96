//! # PDF Surface
//!
//! [`DocumentSurface`] backed by printpdf with embedded DejaVu Sans faces.
//!
//! ```text
//! layout space (points, top-left origin)      printpdf space (mm, bottom-left)
//!   (x, y)  ───────────────────────────────►  (x·25.4/72, (H − y)·25.4/72)
//! ```
//!
//! The document lives in memory until `finish`, which serializes it into a
//! byte buffer. Nothing here touches the file system.

use std::io::{BufWriter, Cursor};

use printpdf::path::PaintMode;
use printpdf::{
    Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Rect as PdfRect, Rgb,
};

use crate::error::{CoreError, CoreResult};
use crate::invoice::metrics::{font_bytes, text_width};
use crate::invoice::surface::{DocumentSurface, PageSize, Rect, TextStyle};

const PT_TO_MM: f32 = 25.4 / 72.0;
const LAYER_NAME: &str = "Layer 1";

fn mm(points: f32) -> Mm {
    Mm(points * PT_TO_MM)
}

fn embed_font(doc: &PdfDocumentReference, bold: bool) -> CoreResult<IndirectFontRef> {
    doc.add_external_font(Cursor::new(font_bytes(bold)))
        .map_err(|e| CoreError::build_failed(format!("font: {}", e)))
}

struct OpenDocument {
    doc: PdfDocumentReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

struct OpenPage {
    layer: PdfLayerReference,
    height: f32,
}

/// printpdf-backed surface.
pub struct PdfSurface {
    title: String,
    document: Option<OpenDocument>,
    page: Option<OpenPage>,
    page_count: usize,
}

impl PdfSurface {
    /// Creates an empty surface; `title` becomes the PDF document title.
    pub fn new(title: impl Into<String>) -> Self {
        PdfSurface {
            title: title.into(),
            document: None,
            page: None,
            page_count: 0,
        }
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    fn layer(&self) -> CoreResult<&OpenPage> {
        self.page
            .as_ref()
            .ok_or_else(|| CoreError::build_failed("draw call outside of a page"))
    }

    fn font(&self, bold: bool) -> CoreResult<&IndirectFontRef> {
        let document = self
            .document
            .as_ref()
            .ok_or_else(|| CoreError::build_failed("document not started"))?;
        Ok(if bold { &document.bold } else { &document.regular })
    }
}

impl std::fmt::Debug for PdfSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfSurface")
            .field("title", &self.title)
            .field("page_count", &self.page_count)
            .field("page_open", &self.page.is_some())
            .finish()
    }
}

impl DocumentSurface for PdfSurface {
    fn begin_page(&mut self, size: PageSize) -> CoreResult<()> {
        if self.page.is_some() {
            return Err(CoreError::build_failed("previous page was not finished"));
        }

        let layer = match self.document.as_ref() {
            Some(open) => {
                let (page, layer) =
                    open.doc
                        .add_page(mm(size.width), mm(size.height), LAYER_NAME);
                open.doc.get_page(page).get_layer(layer)
            }
            None => {
                let (doc, page, layer) = PdfDocument::new(
                    &self.title,
                    mm(size.width),
                    mm(size.height),
                    LAYER_NAME,
                );
                let regular = embed_font(&doc, false)?;
                let bold = embed_font(&doc, true)?;
                let layer = doc.get_page(page).get_layer(layer);
                self.document = Some(OpenDocument { doc, regular, bold });
                layer
            }
        };

        self.page = Some(OpenPage {
            layer,
            height: size.height,
        });
        self.page_count += 1;
        Ok(())
    }

    fn finish_page(&mut self) -> CoreResult<()> {
        self.page
            .take()
            .map(|_| ())
            .ok_or_else(|| CoreError::build_failed("no page to finish"))
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) -> CoreResult<()> {
        let font = self.font(style.bold)?;
        let page = self.layer()?;
        page.layer
            .use_text(text, style.size, mm(x), mm(page.height - y), font);
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, gray: f32) -> CoreResult<()> {
        let page = self.layer()?;
        let bottom = page.height - (rect.y + rect.height);
        let top = page.height - rect.y;

        page.layer
            .set_fill_color(Color::Rgb(Rgb::new(gray, gray, gray, None)));
        page.layer.add_rect(
            PdfRect::new(mm(rect.x), mm(bottom), mm(rect.x + rect.width), mm(top))
                .with_mode(PaintMode::Fill),
        );
        page.layer
            .set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
        Ok(())
    }

    fn measure_text(&self, text: &str, style: TextStyle) -> f32 {
        text_width(text, style.size, style.bold)
    }

    fn finish(&mut self) -> CoreResult<Vec<u8>> {
        if self.page.is_some() {
            return Err(CoreError::build_failed("last page was not finished"));
        }
        let open = self
            .document
            .take()
            .ok_or_else(|| CoreError::build_failed("document has no pages"))?;

        let mut writer = BufWriter::new(Vec::<u8>::new());
        open.doc
            .save(&mut writer)
            .map_err(|e| CoreError::build_failed(format!("serialize: {}", e)))?;
        writer
            .into_inner()
            .map_err(|e| CoreError::build_failed(format!("flush: {}", e)))
    }

    fn abort(&mut self) {
        self.page = None;
        self.document = None;
        self.page_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_page_document_is_pdf() {
        let mut surface = PdfSurface::new("test");
        surface.begin_page(PageSize::A4).unwrap();
        surface
            .fill_rect(Rect::from_edges(45.0, 140.0, 550.0, 165.0), 0.8)
            .unwrap();
        surface
            .draw_text("AlbanManage Invoice", 50.0, 80.0, TextStyle::bold(24.0))
            .unwrap();
        surface.finish_page().unwrap();

        let bytes = surface.finish().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_non_ascii_names_render() {
        let mut surface = PdfSurface::new("accents");
        surface.begin_page(PageSize::A4).unwrap();
        surface
            .draw_text("Lait Demi-Écrémé · Piña · حليب", 50.0, 200.0, TextStyle::regular(12.0))
            .unwrap();
        surface.finish_page().unwrap();

        let bytes = surface.finish().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(surface.measure_text("É", TextStyle::regular(12.0)) > 0.0);
    }

    #[test]
    fn test_finish_without_pages_fails() {
        let mut surface = PdfSurface::new("empty");
        assert!(matches!(
            surface.finish(),
            Err(CoreError::DocumentBuildFailed { .. })
        ));
    }

    #[test]
    fn test_abort_drops_document() {
        let mut surface = PdfSurface::new("aborted");
        surface.begin_page(PageSize::A4).unwrap();
        surface.abort();
        assert_eq!(surface.page_count(), 0);
        assert!(surface.finish().is_err());
    }
}
