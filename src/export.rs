//! Document export for generated packing lists
//!
//! Converts the backend's list text into a downloadable PDF. The text is
//! split into lines and every line becomes one left-aligned paragraph cell,
//! in order, with blank lines kept as blank cells so the backend's own
//! formatting (category headers, separators) survives into the document.

use chrono::{Local, NaiveDate};
use printpdf::{BuiltinFont, Mm, PdfDocument};
use tracing::debug;

use crate::{PacklisteError, Result};

/// MIME type of the exported artifact
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// A4 portrait page size
const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;

/// Page margins and cell geometry
const MARGIN_MM: f32 = 15.0;
const LINE_HEIGHT_MM: f32 = 10.0;
const FONT_SIZE_PT: f32 = 12.0;

/// Helvetica at 12 pt stays inside the printable width up to roughly this
/// many characters, so cells wrap at this column
const WRAP_COLUMNS: usize = 85;

/// Document title embedded in the PDF metadata
const DOC_TITLE: &str = "Packliste";

/// Rendered downloadable document plus its derived file name
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    /// File name offered for download
    pub file_name: String,
    /// Document bytes, served with [`PDF_MIME_TYPE`]
    pub bytes: Vec<u8>,
}

/// Capability interface for turning paragraph lines into document bytes
///
/// The exporter only depends on this trait, so tests substitute recording
/// stand-ins instead of producing real PDF output.
pub trait DocumentRenderer: Send + Sync {
    /// Render the given paragraph cells, in order, into document bytes
    fn render(&self, lines: &[String]) -> Result<Vec<u8>>;
}

/// PDF renderer with fixed A4 geometry and a builtin Helvetica face
///
/// Builtin faces use WinAnsi encoding, which covers the German umlauts and
/// ß appearing in generated lists.
#[derive(Debug, Default)]
pub struct PdfRenderer;

impl DocumentRenderer for PdfRenderer {
    fn render(&self, lines: &[String]) -> Result<Vec<u8>> {
        let (doc, page, layer) = PdfDocument::new(
            DOC_TITLE,
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Seite 1",
        );
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| PacklisteError::render(e.to_string()))?;

        let mut current_layer = doc.get_page(page).get_layer(layer);
        let mut y = PAGE_HEIGHT_MM - MARGIN_MM;
        let mut page_count = 1u32;

        for line in lines {
            for row in wrap_line(line, WRAP_COLUMNS) {
                y -= LINE_HEIGHT_MM;
                if y < MARGIN_MM {
                    page_count += 1;
                    let (next_page, next_layer) = doc.add_page(
                        Mm(PAGE_WIDTH_MM),
                        Mm(PAGE_HEIGHT_MM),
                        format!("Seite {page_count}"),
                    );
                    current_layer = doc.get_page(next_page).get_layer(next_layer);
                    y = PAGE_HEIGHT_MM - MARGIN_MM - LINE_HEIGHT_MM;
                }
                // a blank row still advances the cursor, keeping the cell
                if !row.is_empty() {
                    current_layer.use_text(row, FONT_SIZE_PT, Mm(MARGIN_MM), Mm(y), &font);
                }
            }
        }

        doc.save_to_bytes()
            .map_err(|e| PacklisteError::render(e.to_string()))
    }
}

/// Exporter turning packing list text into an [`ExportArtifact`]
pub struct DocumentExporter {
    renderer: Box<dyn DocumentRenderer>,
}

impl DocumentExporter {
    /// Create an exporter with a custom renderer
    pub fn new(renderer: Box<dyn DocumentRenderer>) -> Self {
        Self { renderer }
    }

    /// Convert list text into a downloadable artifact
    ///
    /// Lines are split on line breaks with order preserved exactly; blank
    /// lines become blank cells. Only the bytes and file name are externally
    /// visible, no temporary files are written.
    pub fn export(&self, text: &str, file_name_hint: &str) -> Result<ExportArtifact> {
        let lines = split_lines(text);
        debug!(lines = lines.len(), "Rendering packing list document");

        let bytes = self.renderer.render(&lines)?;
        Ok(ExportArtifact {
            file_name: file_name_hint.to_string(),
            bytes,
        })
    }
}

impl Default for DocumentExporter {
    fn default() -> Self {
        Self::new(Box::new(PdfRenderer))
    }
}

/// Derive the download file name for a destination and optional start date
///
/// Falls back to today's local date when the trip has no explicit start.
#[must_use]
pub fn derive_file_name(destination: &str, start_date: Option<NaiveDate>) -> String {
    let date_token = start_date.unwrap_or_else(|| Local::now().date_naive());
    format!("Packliste_{destination}_{date_token}.pdf")
}

/// Split text into paragraph lines, tolerating CRLF line endings
fn split_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

/// Wrap one paragraph line into rows of at most `max_chars`
///
/// Lines within the limit pass through verbatim, spacing included, so the
/// backend's own indentation survives. Longer lines are re-flowed with a
/// greedy word wrap; words longer than a full row are hard-split so every
/// input line produces at least one row.
fn wrap_line(line: &str, max_chars: usize) -> Vec<String> {
    if line.chars().count() <= max_chars {
        return vec![line.to_string()];
    }

    let mut rows = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in line.split_whitespace() {
        let mut remaining = word;

        while remaining.chars().count() > max_chars {
            if current_len > 0 {
                rows.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let split_at = remaining
                .char_indices()
                .nth(max_chars)
                .map_or(remaining.len(), |(i, _)| i);
            let (head, tail) = remaining.split_at(split_at);
            rows.push(head.to_string());
            remaining = tail;
        }

        let word_len = remaining.chars().count();
        if word_len == 0 {
            continue;
        }
        if current_len == 0 {
            current.push_str(remaining);
            current_len = word_len;
        } else if current_len + 1 + word_len <= max_chars {
            current.push(' ');
            current.push_str(remaining);
            current_len += 1 + word_len;
        } else {
            rows.push(std::mem::take(&mut current));
            current.push_str(remaining);
            current_len = word_len;
        }
    }

    if current_len > 0 || rows.is_empty() {
        rows.push(current);
    }
    rows
}
