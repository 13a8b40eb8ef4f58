//! # Summary Export
//!
//! Renders a [`FinalSummary`] into downloadable bytes. The summary text is
//! treated as opaque markdown; all format-specific rules (header conversion
//! for plain text, layout for PDF) live here.

use std::io::BufWriter;

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

use crate::pipeline::FinalSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    PlainText,
    Markdown,
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::PlainText => "txt",
            ExportFormat::Markdown => "md",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::PlainText => "text/plain",
            ExportFormat::Markdown => "text/markdown",
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

/// A rendered artifact ready to be written or served.
#[derive(Debug, Clone)]
pub struct Export {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub mime_type: &'static str,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("PDF rendering failed: {0}")]
    Pdf(String),
}

/// Renders the summary in the requested format. The optional `video_id`
/// feeds the filename and the generated-from footer.
pub fn render(
    summary: &FinalSummary,
    format: ExportFormat,
    video_id: Option<&str>,
) -> Result<Export, ExportError> {
    let bytes = match format {
        ExportFormat::PlainText => render_plain_text(&summary.markdown).into_bytes(),
        ExportFormat::Markdown => render_markdown(&summary.markdown, video_id).into_bytes(),
        ExportFormat::Pdf => render_pdf(&summary.markdown, video_id)?,
    };
    let filename = match video_id {
        Some(id) => format!("summary_{id}.{}", format.extension()),
        None => format!("summary.{}", format.extension()),
    };
    Ok(Export {
        bytes,
        filename,
        mime_type: format.mime_type(),
    })
}

/// Markdown headers become uppercase title lines underlined with `=`.
fn render_plain_text(markdown: &str) -> String {
    let mut lines = Vec::new();
    for line in markdown.lines() {
        let header = line.strip_prefix("## ").or_else(|| line.strip_prefix("# "));
        match header {
            Some(header) => {
                lines.push(String::new());
                lines.push(header.to_uppercase());
                lines.push("=".repeat(header.chars().count()));
            }
            None => lines.push(line.to_string()),
        }
    }
    lines.join("\n")
}

fn render_markdown(markdown: &str, video_id: Option<&str>) -> String {
    let mut text = if markdown.starts_with('#') {
        markdown.to_string()
    } else {
        format!("# Video Summary\n\n{markdown}")
    };
    if let Some(id) = video_id {
        text.push_str(&format!("\n\n---\n*Generated from YouTube video: {id}*"));
    }
    text
}

const PAGE_WIDTH_MM: f32 = 215.9;
const PAGE_HEIGHT_MM: f32 = 279.4;
const MARGIN_MM: f32 = 19.0;
const BODY_WRAP_COLS: usize = 95;

fn render_pdf(markdown: &str, video_id: Option<&str>) -> Result<Vec<u8>, ExportError> {
    let (doc, page, layer) =
        PdfDocument::new("Video Summary", Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "content");
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;

    let mut writer = PdfWriter {
        doc: &doc,
        layer: doc.get_page(page).get_layer(layer),
        y: PAGE_HEIGHT_MM - MARGIN_MM,
    };

    writer.text_line("Video Summary", &bold, 18.0, 0.0);
    writer.gap(6.0);

    let mut paragraph: Vec<String> = Vec::new();
    for raw_line in markdown.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            flush_paragraph(&mut writer, &mut paragraph, &regular);
            continue;
        }
        if let Some(heading) = line.strip_prefix("## ") {
            flush_paragraph(&mut writer, &mut paragraph, &regular);
            writer.gap(4.0);
            writer.text_line(heading, &bold, 14.0, 0.0);
            writer.gap(2.0);
        } else if let Some(heading) = line.strip_prefix("# ") {
            flush_paragraph(&mut writer, &mut paragraph, &regular);
            writer.gap(4.0);
            writer.text_line(heading, &bold, 16.0, 0.0);
            writer.gap(2.0);
        } else if let Some(item) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
            flush_paragraph(&mut writer, &mut paragraph, &regular);
            writer.wrapped_lines(&format!("\u{2022} {item}"), &regular, 11.0, 5.0);
        } else if is_numbered_item(line) {
            flush_paragraph(&mut writer, &mut paragraph, &regular);
            writer.wrapped_lines(line, &regular, 11.0, 5.0);
        } else {
            paragraph.push(line.to_string());
        }
    }
    flush_paragraph(&mut writer, &mut paragraph, &regular);

    if let Some(id) = video_id {
        writer.gap(8.0);
        writer.text_line(&format!("Generated from YouTube video: {id}"), &regular, 9.0, 0.0);
    }

    let mut bytes = Vec::new();
    doc.save(&mut BufWriter::new(&mut bytes))
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    Ok(bytes)
}

/// Matches list lines like `1. foo`, `2) bar`, `3: baz`.
fn is_numbered_item(line: &str) -> bool {
    let bytes = line.as_bytes();
    bytes.len() > 2 && bytes[0].is_ascii_digit() && matches!(bytes[1], b'.' | b')' | b':')
}

fn flush_paragraph(writer: &mut PdfWriter<'_>, paragraph: &mut Vec<String>, font: &IndirectFontRef) {
    if paragraph.is_empty() {
        return;
    }
    let text = paragraph.join(" ");
    paragraph.clear();
    writer.wrapped_lines(&text, font, 11.0, 0.0);
    writer.gap(2.0);
}

/// Cursor-based page writer; starts a new page when a line would cross the
/// bottom margin.
struct PdfWriter<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
}

impl PdfWriter<'_> {
    fn text_line(&mut self, text: &str, font: &IndirectFontRef, size_pt: f32, indent_mm: f32) {
        // 1pt = 0.3528mm, with a little leading
        let line_height = size_pt * 0.3528 * 1.35;
        if self.y - line_height < MARGIN_MM {
            let (page, layer) = self
                .doc
                .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "content");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT_MM - MARGIN_MM;
        }
        self.y -= line_height;
        self.layer
            .use_text(text, size_pt, Mm(MARGIN_MM + indent_mm), Mm(self.y), font);
    }

    fn wrapped_lines(&mut self, text: &str, font: &IndirectFontRef, size_pt: f32, indent_mm: f32) {
        for line in wrap_words(text, BODY_WRAP_COLS) {
            self.text_line(&line, font, size_pt, indent_mm);
        }
    }

    fn gap(&mut self, mm: f32) {
        self.y -= mm;
    }
}

/// Greedy word wrap by character count; a Helvetica approximation good
/// enough for body text.
fn wrap_words(text: &str, max_cols: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + word.chars().count() + 1 > max_cols {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
