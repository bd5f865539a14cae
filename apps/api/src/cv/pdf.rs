//! CV PDF rendering on top of `lopdf`.
//!
//! Single-column layout with a steel-blue heading palette: personal info,
//! professional summary, education, work experience (only when any entry
//! names a company), skills. Long text wraps on an estimated glyph width;
//! content that runs past the bottom margin continues on a new page.

use chrono::Utc;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use crate::cv::models::CvData;

const PAGE_WIDTH: f32 = 595.0; // A4 portrait, points
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 40.0;

const PRIMARY: (f32, f32, f32) = (0.27, 0.51, 0.71); // steel blue
const SECONDARY: (f32, f32, f32) = (0.39, 0.39, 0.39);
const BLACK: (f32, f32, f32) = (0.0, 0.0, 0.0);

// Font resource names registered on the page tree.
const REGULAR: &str = "F1";
const BOLD: &str = "F2";
const OBLIQUE: &str = "F3";

/// Average Helvetica glyph width as a fraction of the font size. Used for
/// wrapping and centering estimates only.
const GLYPH_WIDTH_EM: f32 = 0.5;

/// Renders the CV as a finished PDF document.
pub fn render_cv(data: &CvData) -> Result<Vec<u8>, lopdf::Error> {
    let mut page = PageComposer::new();

    // Personal information
    page.centered_line(BOLD, 24.0, PRIMARY, &data.name, 30.0);
    let contact = format!("{} | {}", data.email, data.phone);
    page.centered_line(REGULAR, 12.0, SECONDARY, &contact, 16.0);
    page.advance(20.0);

    // Professional summary
    page.section_heading("PROFESSIONAL SUMMARY");
    page.paragraph(REGULAR, 11.0, BLACK, &data.summary, 14.0);
    page.advance(12.0);

    // Education
    page.section_heading("EDUCATION");
    for edu in &data.education {
        page.line(BOLD, 12.0, BLACK, &edu.institution, 16.0);
        let detail = format!("{} | {}", edu.degree, edu.year);
        page.line(REGULAR, 11.0, SECONDARY, &detail, 14.0);
        if !edu.description.is_empty() {
            page.paragraph(REGULAR, 10.0, BLACK, &edu.description, 12.0);
        }
        page.advance(8.0);
    }

    // Work experience, only when any entry actually names a company
    if data.experience.iter().any(|e| !e.company.trim().is_empty()) {
        page.section_heading("WORK EXPERIENCE");
        for exp in &data.experience {
            if exp.company.trim().is_empty() {
                continue;
            }
            page.line(BOLD, 12.0, BLACK, &exp.company, 16.0);
            let end = if exp.end_date.trim().is_empty() {
                "Present"
            } else {
                exp.end_date.trim()
            };
            let detail = format!("{} | {} - {}", exp.position, exp.start_date, end);
            page.line(REGULAR, 11.0, SECONDARY, &detail, 14.0);
            if !exp.description.is_empty() {
                page.paragraph(REGULAR, 10.0, BLACK, &exp.description, 12.0);
            }
            page.advance(8.0);
        }
    }

    // Skills
    page.section_heading("SKILLS");
    let skills = data
        .skills
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" \u{2022} ");
    page.paragraph(REGULAR, 11.0, BLACK, &skills, 14.0);

    assemble_document(page.finish())
}

/// Builds the lopdf object graph from per-page operation lists.
fn assemble_document(pages_ops: Vec<Vec<Operation>>) -> Result<Vec<u8>, lopdf::Error> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let font_bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let font_oblique = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Oblique",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            REGULAR => font_regular,
            BOLD => font_bold,
            OBLIQUE => font_oblique,
        },
    });

    let generated_on = format!("Generated on {}", Utc::now().format("%Y-%m-%d"));
    let page_count = pages_ops.len();

    let mut kids: Vec<Object> = Vec::new();
    for (index, mut ops) in pages_ops.into_iter().enumerate() {
        decorate_page(&mut ops, index, &generated_on);
        let content = Content { operations: ops };
        let stream_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => stream_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

/// Footer on every page; a running header from the second page on.
fn decorate_page(ops: &mut Vec<Operation>, index: usize, generated_on: &str) {
    if index > 0 {
        let header = format!("Professional CV - Page {}", index + 1);
        push_text(
            ops,
            centered_x(&header, 10.0),
            PAGE_HEIGHT - 24.0,
            BOLD,
            10.0,
            SECONDARY,
            &header,
        );
    }
    push_text(
        ops,
        centered_x(generated_on, 8.0),
        24.0,
        OBLIQUE,
        8.0,
        SECONDARY,
        generated_on,
    );
}

struct PageComposer {
    pages: Vec<Vec<Operation>>,
    ops: Vec<Operation>,
    y: f32,
}

impl PageComposer {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            ops: Vec::new(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        self.pages.push(self.ops);
        self.pages
    }

    fn break_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.ops));
        self.y = PAGE_HEIGHT - MARGIN;
    }

    /// Starts a new page when fewer than `needed` points remain.
    fn ensure_space(&mut self, needed: f32) {
        if self.y - needed < MARGIN {
            self.break_page();
        }
    }

    fn advance(&mut self, dy: f32) {
        self.y -= dy;
    }

    fn line(&mut self, font: &str, size: f32, color: (f32, f32, f32), text: &str, leading: f32) {
        self.ensure_space(leading);
        self.advance(leading);
        push_text(&mut self.ops, MARGIN, self.y, font, size, color, text);
    }

    fn centered_line(
        &mut self,
        font: &str,
        size: f32,
        color: (f32, f32, f32),
        text: &str,
        leading: f32,
    ) {
        self.ensure_space(leading);
        self.advance(leading);
        push_text(&mut self.ops, centered_x(text, size), self.y, font, size, color, text);
    }

    /// Section title with an underline rule, as one block.
    fn section_heading(&mut self, title: &str) {
        self.ensure_space(44.0);
        self.advance(22.0);
        push_text(&mut self.ops, MARGIN, self.y, BOLD, 16.0, PRIMARY, title);
        self.advance(6.0);
        self.rule(PRIMARY);
        self.advance(14.0);
    }

    fn rule(&mut self, color: (f32, f32, f32)) {
        self.ops.push(Operation::new("w", vec![0.5f32.into()]));
        self.ops.push(Operation::new(
            "RG",
            vec![color.0.into(), color.1.into(), color.2.into()],
        ));
        self.ops
            .push(Operation::new("m", vec![MARGIN.into(), self.y.into()]));
        self.ops.push(Operation::new(
            "l",
            vec![(PAGE_WIDTH - MARGIN).into(), self.y.into()],
        ));
        self.ops.push(Operation::new("S", vec![]));
    }

    /// Word-wrapped body text.
    fn paragraph(
        &mut self,
        font: &str,
        size: f32,
        color: (f32, f32, f32),
        text: &str,
        leading: f32,
    ) {
        let max_chars = ((PAGE_WIDTH - 2.0 * MARGIN) / (size * GLYPH_WIDTH_EM)) as usize;
        for wrapped in wrap(text, max_chars) {
            self.line(font, size, color, &wrapped, leading);
        }
    }
}

fn push_text(
    ops: &mut Vec<Operation>,
    x: f32,
    y: f32,
    font: &str,
    size: f32,
    color: (f32, f32, f32),
    text: &str,
) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "Tf",
        vec![Object::Name(font.as_bytes().to_vec()), size.into()],
    ));
    ops.push(Operation::new(
        "rg",
        vec![color.0.into(), color.1.into(), color.2.into()],
    ));
    ops.push(Operation::new("Td", vec![x.into(), y.into()]));
    ops.push(Operation::new(
        "Tj",
        vec![Object::string_literal(encode_text(text))],
    ));
    ops.push(Operation::new("ET", vec![]));
}

fn centered_x(text: &str, size: f32) -> f32 {
    let width = text.chars().count() as f32 * size * GLYPH_WIDTH_EM;
    ((PAGE_WIDTH - width) / 2.0).max(MARGIN)
}

/// Helvetica is registered with WinAnsi encoding: pass ASCII through, map
/// the bullet, replace everything else.
fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{2022}' => 0x95,
            c if c.is_ascii() && !c.is_ascii_control() => c as u8,
            _ => b'?',
        })
        .collect()
}

/// Greedy word wrap on an estimated line width.
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > max_chars {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
