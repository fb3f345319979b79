use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use log::info;
use printpdf::image_crate::{DynamicImage, RgbImage};
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference,
};

use super::chart::{self, RenderedChart};
use crate::data::model::{Metric, Specimen};
use crate::error::{Error, Result};
use crate::glossary;

// ---------------------------------------------------------------------------
// Page geometry (A4 portrait, 1-inch margins, sizes in mm)
// ---------------------------------------------------------------------------

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 25.4;
const FRAME_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
const MM_PER_PT: f32 = 25.4 / 72.0;

const TITLE_SIZE: f32 = 32.0;
const SUBTITLE_SIZE: f32 = 16.0;
const HEADING_SIZE: f32 = 18.0;
const BODY_SIZE: f32 = 10.0;
const FOOTER_SIZE: f32 = 9.0;

/// Title baselines measured from the top edge, matching the fixed header of
/// the original layout.
const TITLE_BASELINE: f32 = 108.0 * MM_PER_PT;
const SUBTITLE_BASELINE: f32 = 130.0 * MM_PER_PT;

/// Flowed content on the title page starts two inches below the top margin,
/// leaving the header area clear.
const TITLE_PAGE_LEAD: f32 = 50.8;

const HEADING_LEADING: f32 = 22.0 * MM_PER_PT;
const HEADING_SPACE_AFTER: f32 = 6.0 * MM_PER_PT;
const BODY_LEADING: f32 = 12.0 * MM_PER_PT;
const SECTION_SPACER: f32 = 2.54; // 0.1 inch between metric sections

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Compose the PDF report: a title page header, then one section per metric
/// (heading, optional glossary paragraph, chart), flowing across pages with
/// numbered footers.  Overwrites `output_path` if it exists.
pub fn generate_report(
    specimens: &[Specimen],
    metrics: &[Metric],
    output_path: &Path,
    title: &str,
) -> Result<()> {
    let mut composer = Composer::new(title)?;
    composer.title_header(title, subtitle(specimens).as_deref());

    for &metric in metrics {
        composer.heading(metric.name());
        if let Some(text) = glossary::description(metric) {
            composer.paragraph(text);
        }
        composer.chart(chart::render(specimens, metric)?)?;
        composer.spacer(SECTION_SPACER);
    }

    composer.save(output_path)?;
    info!("wrote {}", output_path.display());
    Ok(())
}

/// `Comparison of phenotypes from 'a', 'b' classes`: distinct class labels
/// in first-occurrence order, each quoted.  `None` when there are no
/// specimens, so the title page never shows a label-less subtitle.
fn subtitle(specimens: &[Specimen]) -> Option<String> {
    let mut classes: Vec<&str> = Vec::new();
    for sp in specimens {
        if !classes.contains(&sp.class_label()) {
            classes.push(sp.class_label());
        }
    }
    if classes.is_empty() {
        return None;
    }
    let joined = classes
        .iter()
        .map(|c| format!("'{c}'"))
        .collect::<Vec<_>>()
        .join(", ");
    Some(format!("Comparison of phenotypes from {joined} classes"))
}

// ---------------------------------------------------------------------------
// Composer – top-down flow layout with page breaks
// ---------------------------------------------------------------------------

/// Tracks a cursor measured in mm from the top of the current page down to
/// where the next element lands.  Elements that do not fit above the bottom
/// margin trigger a page break; every page after the first gets a footer
/// with its 1-based number.
struct Composer {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font_body: IndirectFontRef,
    font_heading: IndirectFontRef,
    font_times_bold: IndirectFontRef,
    font_times_roman: IndirectFontRef,
    cursor: f32,
    page: usize,
}

impl Composer {
    fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "content");
        let layer = doc.get_page(page).get_layer(layer);

        let font_body = doc.add_builtin_font(BuiltinFont::Helvetica)?;
        let font_heading = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
        let font_times_bold = doc.add_builtin_font(BuiltinFont::TimesBold)?;
        let font_times_roman = doc.add_builtin_font(BuiltinFont::TimesRoman)?;

        Ok(Composer {
            doc,
            layer,
            font_body,
            font_heading,
            font_times_bold,
            font_times_roman,
            cursor: MARGIN + TITLE_PAGE_LEAD,
            page: 1,
        })
    }

    /// Fixed header of the title page: main title and subtitle, centered.
    fn title_header(&self, title: &str, subtitle: Option<&str>) {
        self.centered_text(title, TITLE_SIZE, TITLE_BASELINE, &self.font_times_bold);
        if let Some(subtitle) = subtitle {
            self.centered_text(
                subtitle,
                SUBTITLE_SIZE,
                SUBTITLE_BASELINE,
                &self.font_times_bold,
            );
        }
    }

    fn centered_text(&self, text: &str, size: f32, baseline_from_top: f32, font: &IndirectFontRef) {
        let x = (PAGE_WIDTH - text_width(text, size)) / 2.0;
        self.layer.use_text(
            text,
            size,
            Mm(x),
            Mm(PAGE_HEIGHT - baseline_from_top),
            font,
        );
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "content");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.page += 1;
        self.cursor = MARGIN;

        // Footer: page number at 1in from the left, 0.75in from the bottom.
        self.layer.use_text(
            self.page.to_string(),
            FOOTER_SIZE,
            Mm(25.4),
            Mm(19.05),
            &self.font_times_roman,
        );
    }

    fn ensure_room(&mut self, height: f32) {
        if self.cursor + height > PAGE_HEIGHT - MARGIN {
            self.new_page();
        }
    }

    fn heading(&mut self, text: &str) {
        self.ensure_room(HEADING_LEADING);
        let baseline = self.cursor + HEADING_SIZE * MM_PER_PT;
        self.layer.use_text(
            text,
            HEADING_SIZE,
            Mm(MARGIN),
            Mm(PAGE_HEIGHT - baseline),
            &self.font_heading,
        );
        self.cursor += HEADING_LEADING + HEADING_SPACE_AFTER;
    }

    fn paragraph(&mut self, text: &str) {
        let max_chars = (FRAME_WIDTH / char_width(BODY_SIZE)) as usize;
        for line in wrap_text(text, max_chars) {
            self.ensure_room(BODY_LEADING);
            let baseline = self.cursor + BODY_SIZE * MM_PER_PT;
            self.layer.use_text(
                line,
                BODY_SIZE,
                Mm(MARGIN),
                Mm(PAGE_HEIGHT - baseline),
                &self.font_body,
            );
            self.cursor += BODY_LEADING;
        }
    }

    /// Embed a rendered chart scaled to span the text frame width.
    fn chart(&mut self, rendered: RenderedChart) -> Result<()> {
        let height = FRAME_WIDTH * rendered.height as f32 / rendered.width as f32;
        self.ensure_room(height);

        let buffer = RgbImage::from_raw(rendered.width, rendered.height, rendered.pixels)
            .ok_or_else(|| Error::Chart("rendered buffer has unexpected size".to_string()))?;
        let image = Image::from_dynamic_image(&DynamicImage::ImageRgb8(buffer));

        // dpi chosen so `width px / dpi` inches equals the frame width.
        let dpi = rendered.width as f32 * 25.4 / FRAME_WIDTH;
        image.add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(MARGIN)),
                translate_y: Some(Mm(PAGE_HEIGHT - self.cursor - height)),
                dpi: Some(dpi),
                ..ImageTransform::default()
            },
        );

        self.cursor += height;
        Ok(())
    }

    fn spacer(&mut self, height: f32) {
        self.cursor += height;
    }

    fn save(self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| Error::io(path, e))?;
        self.doc.save(&mut BufWriter::new(file))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Text measurement
// ---------------------------------------------------------------------------

// The built-in PDF fonts carry no exposed metrics; half an em per character
// is close enough for centering and wrapping body text.
fn char_width(size: f32) -> f32 {
    size * 0.5 * MM_PER_PT
}

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * char_width(size)
}

fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > max_chars {
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

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
