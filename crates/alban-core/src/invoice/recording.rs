//! In-memory surface that records draw calls instead of rendering them.
//!
//! Serves layout tests and text previews. Measurement uses the same
//! embedded font metrics as the PDF surface, so truncation decisions match.

use std::fmt::Write as _;

use crate::error::{CoreError, CoreResult};
use crate::invoice::metrics::text_width;
use crate::invoice::surface::{DocumentSurface, PageSize, Rect, TextStyle};

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        text: String,
        x: f32,
        y: f32,
        style: TextStyle,
    },
    Rect {
        rect: Rect,
        gray: f32,
    },
}

/// A page and everything drawn on it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPage {
    pub size: PageSize,
    pub ops: Vec<DrawOp>,
    pub finished: bool,
}

impl RecordedPage {
    /// Text runs in draw order.
    pub fn texts(&self) -> impl Iterator<Item = (&str, f32, f32)> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, x, y, .. } => Some((text.as_str(), *x, *y)),
            DrawOp::Rect { .. } => None,
        })
    }

    /// Text runs drawn at horizontal offset `x`.
    pub fn column(&self, x: f32) -> Vec<&str> {
        self.texts()
            .filter(|(_, tx, _)| *tx == x)
            .map(|(text, _, _)| text)
            .collect()
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|(text, _, _)| text == needle)
    }
}

/// Records pages and draw calls; can simulate page allocation failure.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pages: Vec<RecordedPage>,
    open: bool,
    fail_at_page: Option<usize>,
    pages_started: usize,
    aborted: bool,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface whose `n`th `begin_page` call (1-based) fails.
    pub fn failing_at_page(n: usize) -> Self {
        RecordingSurface {
            fail_at_page: Some(n),
            ..Self::default()
        }
    }

    pub fn pages(&self) -> &[RecordedPage] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// True once `abort` has discarded the pages.
    pub fn was_aborted(&self) -> bool {
        self.aborted
    }

    fn current_page(&mut self) -> CoreResult<&mut RecordedPage> {
        if !self.open {
            return Err(CoreError::build_failed("draw call outside of a page"));
        }
        self.pages
            .last_mut()
            .ok_or_else(|| CoreError::build_failed("draw call outside of a page"))
    }
}

impl DocumentSurface for RecordingSurface {
    fn begin_page(&mut self, size: PageSize) -> CoreResult<()> {
        self.pages_started += 1;
        if self.fail_at_page == Some(self.pages_started) {
            return Err(CoreError::build_failed(format!(
                "could not allocate page {}",
                self.pages_started
            )));
        }
        if self.open {
            return Err(CoreError::build_failed("previous page was not finished"));
        }

        self.pages.push(RecordedPage {
            size,
            ops: Vec::new(),
            finished: false,
        });
        self.open = true;
        Ok(())
    }

    fn finish_page(&mut self) -> CoreResult<()> {
        self.current_page()?.finished = true;
        self.open = false;
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) -> CoreResult<()> {
        self.current_page()?.ops.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            style,
        });
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, gray: f32) -> CoreResult<()> {
        self.current_page()?.ops.push(DrawOp::Rect { rect, gray });
        Ok(())
    }

    fn measure_text(&self, text: &str, style: TextStyle) -> f32 {
        text_width(text, style.size, style.bold)
    }

    /// Emits a plain-text dump, one line per page and per text run.
    fn finish(&mut self) -> CoreResult<Vec<u8>> {
        if self.open {
            return Err(CoreError::build_failed("last page was not finished"));
        }
        if self.pages.is_empty() {
            return Err(CoreError::build_failed("document has no pages"));
        }

        let mut out = String::new();
        for (index, page) in self.pages.iter().enumerate() {
            let _ = writeln!(out, "--- page {} ---", index + 1);
            for (text, x, y) in page.texts() {
                let _ = writeln!(out, "{:>6.1} {:>6.1} {}", x, y, text);
            }
        }
        Ok(out.into_bytes())
    }

    fn abort(&mut self) {
        self.pages.clear();
        self.open = false;
        self.aborted = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_pages_and_text() {
        let mut surface = RecordingSurface::new();
        surface.begin_page(PageSize::A4).unwrap();
        surface
            .draw_text("hello", 50.0, 80.0, TextStyle::regular(12.0))
            .unwrap();
        surface.finish_page().unwrap();

        assert_eq!(surface.page_count(), 1);
        assert!(surface.pages()[0].finished);
        assert_eq!(surface.pages()[0].column(50.0), vec!["hello"]);

        let dump = String::from_utf8(surface.finish().unwrap()).unwrap();
        assert!(dump.contains("--- page 1 ---"));
        assert!(dump.contains("hello"));
    }

    #[test]
    fn test_draw_outside_page_fails() {
        let mut surface = RecordingSurface::new();
        assert!(surface
            .draw_text("x", 0.0, 0.0, TextStyle::regular(12.0))
            .is_err());
    }

    #[test]
    fn test_injected_failure_and_abort() {
        let mut surface = RecordingSurface::failing_at_page(2);
        surface.begin_page(PageSize::A4).unwrap();
        surface.finish_page().unwrap();
        assert!(surface.begin_page(PageSize::A4).is_err());

        surface.abort();
        assert!(surface.was_aborted());
        assert_eq!(surface.page_count(), 0);
    }
}
