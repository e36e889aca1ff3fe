// PDF export of an evaluated report.
//
// Export happens in two steps: `compose_layout` places every text line on a
// page (pure, deterministic for a given context), then `render_pdf` draws
// that layout with printpdf's built-in Helvetica faces. Screenshots are not
// included. The same layout and timestamp always produce the same bytes.

use crate::error::ExportError;
use crate::evaluate::EvaluatedReport;
use crate::view::NO_ISSUES_MESSAGE;
use chrono::{DateTime, Local};
use printpdf::lopdf::{self, Object, StringFormat};
use printpdf::{BuiltinFont, Mm, OffsetDateTime, PdfDocument};
use std::fs;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::path::{Path, PathBuf};
use tracing::info;

pub const PDF_FILE_NAME: &str = "auditly-report.pdf";
pub const DOCUMENT_TITLE: &str = "Website Audit Report";

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const LEFT_MARGIN_MM: f32 = 20.0;
pub const TOP_MARGIN_MM: f32 = 20.0;
/// A line is never started below this; the cursor moves to a new page.
pub const BOTTOM_LIMIT_MM: f32 = 270.0;

const TITLE_SIZE: f32 = 18.0;
const BODY_SIZE: f32 = 11.0;
const LINE_STEP_MM: f32 = 8.0;
// Roughly what fits across A4 at 11pt Helvetica inside the margins.
const WRAP_COLUMNS: usize = 90;

/// Everything the exported document shows.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportContext {
    pub url: String,
    pub evaluated: EvaluatedReport,
    pub load_time_ms: Option<f64>,
    pub generated_at: DateTime<Local>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

/// One line of text; `y_mm` is measured from the top of the page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub weight: FontWeight,
    pub size: f32,
    pub x_mm: f32,
    pub y_mm: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub lines: Vec<TextLine>,
}

struct PageCursor {
    pages: Vec<PageLayout>,
    y: f32,
}

impl PageCursor {
    fn new() -> Self {
        Self {
            pages: vec![PageLayout::default()],
            y: TOP_MARGIN_MM,
        }
    }

    fn advance(&mut self, mm: f32) {
        self.y += mm;
    }

    fn write(&mut self, text: impl Into<String>, weight: FontWeight, size: f32) {
        if self.y > BOTTOM_LIMIT_MM {
            self.pages.push(PageLayout::default());
            self.y = TOP_MARGIN_MM;
        }
        let y_mm = self.y;
        // `pages` always holds at least the first page
        if let Some(page) = self.pages.last_mut() {
            page.lines.push(TextLine {
                text: text.into(),
                weight,
                size,
                x_mm: LEFT_MARGIN_MM,
                y_mm,
            });
        }
    }

    /// Write `text` wrapped to the page width, one step per continuation line.
    fn write_wrapped(&mut self, text: &str, weight: FontWeight) {
        let mut lines = wrap_text(text, WRAP_COLUMNS).into_iter().peekable();
        while let Some(line) = lines.next() {
            self.write(line, weight, BODY_SIZE);
            if lines.peek().is_some() {
                self.advance(LINE_STEP_MM);
            }
        }
    }

    fn finish(self) -> Vec<PageLayout> {
        self.pages
    }
}

/// Lay out the report as pages of text lines.
pub fn compose_layout(context: &ExportContext) -> Vec<PageLayout> {
    let mut cursor = PageCursor::new();

    cursor.write(DOCUMENT_TITLE, FontWeight::Bold, TITLE_SIZE);

    cursor.advance(10.0);
    cursor.write_wrapped(&format!("URL: {}", context.url), FontWeight::Regular);

    cursor.advance(LINE_STEP_MM);
    cursor.write(
        format!("Generated on: {}", format_generated_at(&context.generated_at)),
        FontWeight::Regular,
        BODY_SIZE,
    );

    cursor.advance(15.0);
    cursor.write("SEO Score", FontWeight::Bold, BODY_SIZE);

    cursor.advance(LINE_STEP_MM);
    cursor.write(
        format!("{} / 100", context.evaluated.score),
        FontWeight::Regular,
        BODY_SIZE,
    );

    cursor.advance(15.0);
    cursor.write("SEO Issues", FontWeight::Bold, BODY_SIZE);

    cursor.advance(LINE_STEP_MM);
    if context.evaluated.issues.is_empty() {
        cursor.write(NO_ISSUES_MESSAGE, FontWeight::Regular, BODY_SIZE);
        cursor.advance(LINE_STEP_MM);
    } else {
        for issue in &context.evaluated.issues {
            cursor.write_wrapped(&format!("- {}", issue), FontWeight::Regular);
            cursor.advance(LINE_STEP_MM);
        }
    }

    cursor.advance(10.0);
    cursor.write("Performance", FontWeight::Bold, BODY_SIZE);

    cursor.advance(LINE_STEP_MM);
    cursor.write(
        format!("Load Time: {}", format_load_time(context.load_time_ms)),
        FontWeight::Regular,
        BODY_SIZE,
    );

    cursor.finish()
}

/// Draw `pages` into PDF bytes stamped with `generated_at`.
pub fn render_pdf(
    pages: &[PageLayout],
    generated_at: &DateTime<Local>,
) -> Result<Vec<u8>, ExportError> {
    let stamp = OffsetDateTime::from_unix_timestamp(generated_at.timestamp()).map_err(pdf_err)?;
    let (doc, first_page, first_layer) = PdfDocument::new(
        DOCUMENT_TITLE,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let doc = doc
        .with_creation_date(stamp)
        .with_mod_date(stamp)
        .with_metadata_date(stamp);
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(pdf_err)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_err)?;

    for (idx, page) in pages.iter().enumerate() {
        let (page_idx, layer_idx) = if idx == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(
                Mm(PAGE_WIDTH_MM),
                Mm(PAGE_HEIGHT_MM),
                format!("Layer {}", idx + 1),
            )
        };
        let layer = doc.get_page(page_idx).get_layer(layer_idx);

        for line in &page.lines {
            let font = match line.weight {
                FontWeight::Regular => &regular,
                FontWeight::Bold => &bold,
            };
            // PDF space starts at the bottom-left corner
            layer.use_text(
                line.text.clone(),
                line.size,
                Mm(line.x_mm),
                Mm(PAGE_HEIGHT_MM - line.y_mm),
                font,
            );
        }
    }

    let bytes = doc.save_to_bytes().map_err(pdf_err)?;
    stamp_document_id(&bytes, &document_id(pages, generated_at))
}

/// printpdf picks a random trailer `/ID` on every save; replace it.
fn stamp_document_id(bytes: &[u8], id: &str) -> Result<Vec<u8>, ExportError> {
    let mut document = lopdf::Document::load_mem(bytes).map_err(pdf_err)?;
    let id = Object::String(id.as_bytes().to_vec(), StringFormat::Literal);
    document
        .trailer
        .set("ID", Object::Array(vec![id.clone(), id]));

    let mut out = Vec::with_capacity(bytes.len());
    document.save_to(&mut out).map_err(pdf_err)?;
    Ok(out)
}

/// 32 hex digits derived from the document's content.
fn document_id(pages: &[PageLayout], generated_at: &DateTime<Local>) -> String {
    let digest = |salt: u64| {
        let mut hasher = DefaultHasher::new();
        salt.hash(&mut hasher);
        generated_at.timestamp().hash(&mut hasher);
        for line in pages.iter().flat_map(|page| &page.lines) {
            line.text.hash(&mut hasher);
            line.y_mm.to_bits().hash(&mut hasher);
        }
        hasher.finish()
    };
    format!("{:016X}{:016X}", digest(0), digest(1))
}

/// Write `auditly-report.pdf` into `dir` and return its path.
///
/// Each call writes a fresh file, replacing any earlier export in `dir`.
pub fn export_pdf(context: &ExportContext, dir: &Path) -> Result<PathBuf, ExportError> {
    let pages = compose_layout(context);
    let bytes = render_pdf(&pages, &context.generated_at)?;

    fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(PDF_FILE_NAME);
    fs::write(&path, &bytes).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;

    info!(
        "Exported {} page(s), {} bytes to {}",
        pages.len(),
        bytes.len(),
        path.display()
    );
    Ok(path)
}

pub fn format_generated_at(generated_at: &DateTime<Local>) -> String {
    generated_at.format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn format_load_time(load_time_ms: Option<f64>) -> String {
    match load_time_ms {
        Some(ms) if ms.fract() == 0.0 => format!("{} ms", ms as i64),
        Some(ms) => format!("{:.1} ms", ms),
        None => "N/A".to_string(),
    }
}

fn pdf_err<E: std::fmt::Debug>(err: E) -> ExportError {
    ExportError::Pdf(format!("{:?}", err))
}

fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if text.chars().count() <= width {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        let mut rest = word;
        loop {
            let len = rest.chars().count();
            let separator = usize::from(!current_line.is_empty());
            let room = width.saturating_sub(current_line.chars().count() + separator);

            if len <= room {
                if separator == 1 {
                    current_line.push(' ');
                }
                current_line.push_str(rest);
                break;
            }

            // Tokens wider than a line (URLs) are split to fill the line
            if len > width && room > 0 {
                let split = rest
                    .char_indices()
                    .nth(room)
                    .map_or(rest.len(), |(idx, _)| idx);
                if separator == 1 {
                    current_line.push(' ');
                }
                current_line.push_str(&rest[..split]);
                lines.push(std::mem::take(&mut current_line));
                rest = &rest[split..];
                continue;
            }

            lines.push(std::mem::take(&mut current_line));
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    lines
}
