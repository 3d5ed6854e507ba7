//! Single-page PDF builder
//!
//! Provides a fluent API for placing text and rules on one fixed A4 page.
//! Coordinates are millimetres measured from the top-left corner, the way
//! print layouts are usually specified; conversion to PDF's bottom-up
//! coordinate space happens internally.

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rgb,
};
use tracing::instrument;

use crate::error::RenderResult;

/// A4 portrait page size in millimetres
pub const PAGE_WIDTH_MM: f32 = 210.0;
/// A4 portrait page height in millimetres
pub const PAGE_HEIGHT_MM: f32 = 297.0;

/// Stroke width for grid rules, in points
const RULE_THICKNESS_PT: f32 = 0.6;

/// Vertical offset from a row's top edge to its text baseline.
///
/// Rows on fixed forms are 10 mm tall with the baseline roughly centered.
const BASELINE_OFFSET_MM: f32 = 6.5;

/// Fixed-page PDF builder
///
/// Builds a single A4 portrait page with Helvetica text and hairline rules.
/// All placement methods take top-down millimetre coordinates.
pub struct PageBuilder {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl PageBuilder {
    /// Create a builder for one A4 portrait page
    pub fn new(title: &str) -> RenderResult<Self> {
        let (doc, page, layer) = PdfDocument::new(
            title,
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Layer 1",
        );
        let layer = doc.get_page(page).get_layer(layer);
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

        layer.set_outline_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
        layer.set_outline_thickness(RULE_THICKNESS_PT);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
        })
    }

    /// Convert a top-down y coordinate to PDF bottom-up space
    fn flip(y: f32) -> Mm {
        Mm(PAGE_HEIGHT_MM - y)
    }

    // === Text Output ===

    /// Place regular text with its baseline inside the 10 mm row starting at `y`
    pub fn text(&mut self, x: f32, y: f32, size: f32, s: &str) -> &mut Self {
        self.layer
            .use_text(s, size, Mm(x), Self::flip(y + BASELINE_OFFSET_MM), &self.regular);
        self
    }

    /// Place bold text with its baseline inside the 10 mm row starting at `y`
    pub fn bold(&mut self, x: f32, y: f32, size: f32, s: &str) -> &mut Self {
        self.layer
            .use_text(s, size, Mm(x), Self::flip(y + BASELINE_OFFSET_MM), &self.bold);
        self
    }

    /// Place regular text at an exact baseline, no row offset
    pub fn text_at(&mut self, x: f32, y: f32, size: f32, s: &str) -> &mut Self {
        self.layer
            .use_text(s, size, Mm(x), Self::flip(y), &self.regular);
        self
    }

    /// Place bold text at an exact baseline, no row offset
    pub fn bold_at(&mut self, x: f32, y: f32, size: f32, s: &str) -> &mut Self {
        self.layer.use_text(s, size, Mm(x), Self::flip(y), &self.bold);
        self
    }

    // === Color ===

    /// Set the text fill color (0..255 per channel)
    pub fn color(&mut self, r: u8, g: u8, b: u8) -> &mut Self {
        self.layer.set_fill_color(Color::Rgb(Rgb::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            None,
        )));
        self
    }

    /// Reset the text fill color to black
    pub fn black(&mut self) -> &mut Self {
        self.layer
            .set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
        self
    }

    // === Rules ===

    /// Horizontal rule from `x1` to `x2` at height `y`
    pub fn hline(&mut self, x1: f32, x2: f32, y: f32) -> &mut Self {
        self.stroke(&[(x1, y), (x2, y)]);
        self
    }

    /// Vertical rule from `y1` down to `y2` at `x`
    pub fn vline(&mut self, x: f32, y1: f32, y2: f32) -> &mut Self {
        self.stroke(&[(x, y1), (x, y2)]);
        self
    }

    /// Rectangular border with corners `(x1, y1)` (top-left) and `(x2, y2)`
    pub fn boxed(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> &mut Self {
        self.hline(x1, x2, y1);
        self.hline(x1, x2, y2);
        self.vline(x1, y1, y2);
        self.vline(x2, y1, y2);
        self
    }

    fn stroke(&mut self, points: &[(f32, f32)]) {
        let points = points
            .iter()
            .map(|&(x, y)| (Point::new(Mm(x), Self::flip(y)), false))
            .collect();
        self.layer.add_line(Line {
            points,
            is_closed: false,
        });
    }

    // === Output ===

    /// Serialize the document to PDF bytes
    #[instrument(skip(self))]
    pub fn finish(self) -> RenderResult<Vec<u8>> {
        let bytes = self.doc.save_to_bytes()?;
        tracing::debug!(size = bytes.len(), "PDF document assembled");
        Ok(bytes)
    }
}
