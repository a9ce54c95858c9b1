use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerIndex, PdfLayerReference, PdfPageIndex, Point, Polygon, Rgb,
};
use tracing::debug;

use crate::models::{AttributionEntry, AttributionModel, LicenseInfo};
use crate::report::template::{Template, TemplateRegistry};
use crate::report::DocumentEmitter;

const OUTPUT_FILE: &str = "attribution.pdf";

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN: f32 = 18.0;
const COVER_HDR_H: f32 = 72.0; // gradient header height on cover page

// ── Colour palette ────────────────────────────────────────────────────────────
const BG:           (f32, f32, f32) = (1.00, 1.00, 1.00);
const PANEL:        (f32, f32, f32) = (1.00, 1.00, 1.00);
const PANEL_ALT:    (f32, f32, f32) = (0.95, 0.96, 0.99); // subtle tint for license chips
const PANEL_BORDER: (f32, f32, f32) = (0.85, 0.87, 0.92);
const TEXT_PRI:     (f32, f32, f32) = (0.07, 0.08, 0.14); // near-black
const TEXT_SEC:     (f32, f32, f32) = (0.36, 0.40, 0.52); // medium grey-blue
const TEXT_MUT:     (f32, f32, f32) = (0.58, 0.63, 0.72); // muted grey
const WHITE:        (f32, f32, f32) = (1.00, 1.00, 1.00);
const WHITE_DIM:    (f32, f32, f32) = (0.82, 0.89, 1.00); // dimmed white for header

const R_BADGE: f32 = 1.5;

// ── Flowing page layout ───────────────────────────────────────────────────────
const FIRST_Y: f32 = 268.0;
const BOT_MARGIN: f32 = 28.0;
const T_END: f32 = PAGE_W - MARGIN;

const PURL_WRAP: usize = 80;
const COPYRIGHT_WRAP: usize = 110;
const LICENSE_WRAP: usize = 105;

/// Renders the attribution model as an A4 PDF.
#[derive(Debug, Default)]
pub struct PdfEmitter;

impl DocumentEmitter for PdfEmitter {
    fn emit(
        &self,
        model: &AttributionModel,
        templates: &TemplateRegistry,
        template_id: &str,
        scratch_dir: &Path,
    ) -> Result<Option<PathBuf>> {
        let template = templates
            .get(template_id)
            .with_context(|| format!("Unknown template '{}'", template_id))?;

        let doc = PdfDocument::empty(format!("{} {}", template.title, template.subtitle));
        let fonts = Fonts {
            regular: doc.add_builtin_font(BuiltinFont::Helvetica)?,
            bold: doc.add_builtin_font(BuiltinFont::HelveticaBold)?,
        };

        let licenses = model.distinct_licenses();

        add_cover_page(&doc, model, licenses.len(), template, &fonts);
        add_attribution_pages(&doc, model, template, &fonts);
        if template.include_license_texts {
            add_license_pages(&doc, &licenses, template, &fonts);
        }

        let bytes = doc.save_to_bytes()?;
        let path = scratch_dir.join(OUTPUT_FILE);
        std::fs::write(&path, &bytes)
            .with_context(|| format!("Failed to write PDF to {}", path.display()))?;

        debug!(path = %path.display(), bytes = bytes.len(), "rendered PDF");
        Ok(Some(path))
    }
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn pick(&self, bold: bool) -> &IndirectFontRef {
        if bold {
            &self.bold
        } else {
            &self.regular
        }
    }
}

// ── Cover page ────────────────────────────────────────────────────────────────

fn add_cover_page(
    doc: &PdfDocumentReference,
    model: &AttributionModel,
    license_count: usize,
    template: &Template,
    fonts: &Fonts,
) {
    let (page_idx, layer_idx) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Cover");
    let layer = doc.get_page(page_idx).get_layer(layer_idx);
    let (font_r, font_b) = (&fonts.regular, &fonts.bold);

    let binaries = model
        .entries
        .iter()
        .filter(|e| e.binary_filename.is_some())
        .count();

    fill_rect(&layer, 0.0, 0.0, PAGE_W, PAGE_H, BG);

    // ── Gradient header zone (top COVER_HDR_H mm) ─────────────────────────────
    let hdr_bot = PAGE_H - COVER_HDR_H;
    fill_gradient_h(
        &layer, 0.0, hdr_bot, PAGE_W, COVER_HDR_H,
        rgb(template.accent_from), rgb(template.accent_to), 28,
    );

    set_color(&layer, WHITE_DIM);
    layer.use_text(
        format!("attribution-report v{}", env!("CARGO_PKG_VERSION")),
        7.5, Mm(PAGE_W - MARGIN - 48.0), Mm(PAGE_H - 10.5), font_r,
    );

    set_color(&layer, WHITE);
    layer.use_text(truncate(&template.title, 30), 28.0, Mm(MARGIN), Mm(PAGE_H - 26.0), font_b);
    set_color(&layer, WHITE_DIM);
    layer.use_text(truncate(&template.subtitle, 30), 28.0, Mm(MARGIN), Mm(PAGE_H - 41.0), font_b);

    // ── Project chip (just below header) ──────────────────────────────────────
    let chip_y = hdr_bot - 18.0;
    let chip_h = 12.0f32;
    let chip_w = 106.0f32;
    fill_rounded_rect(&layer, MARGIN, chip_y, chip_w, chip_h, R_BADGE, PANEL);
    stroke_rounded_rect(&layer, MARGIN, chip_y, chip_w, chip_h, R_BADGE, PANEL_BORDER);
    fill_rect(&layer, MARGIN, chip_y, 2.5, chip_h, rgb(template.accent_from));

    set_color(&layer, TEXT_MUT);
    layer.use_text("PROJECT", 6.0, Mm(MARGIN + 5.0), Mm(chip_y + chip_h - 3.8), font_b);
    set_color(&layer, TEXT_PRI);
    let project_label = if model.project.version.is_empty() {
        model.project.name.clone()
    } else {
        format!("{} {}", model.project.name, model.project.version)
    };
    layer.use_text(
        truncate(&project_label, 34),
        9.5, Mm(MARGIN + 5.0), Mm(chip_y + 2.8), font_b,
    );

    set_color(&layer, TEXT_SEC);
    layer.use_text(
        format!("Generated  {}", today()),
        9.0, Mm(MARGIN), Mm(chip_y - 8.0), font_r,
    );

    // ── Divider + OVERVIEW ────────────────────────────────────────────────────
    let rule_y = chip_y - 16.5;
    draw_hline(&layer, MARGIN, T_END, rule_y, PANEL_BORDER);
    set_color(&layer, TEXT_MUT);
    layer.use_text("OVERVIEW", 6.5, Mm(MARGIN), Mm(rule_y - 7.0), font_b);

    // ── Stat cards (3 in a row) ───────────────────────────────────────────────
    let card_y  = rule_y - 42.0;
    let card_h  = 26.0f32;
    let gap     = 4.0f32;
    let card_w  = (T_END - MARGIN - gap * 2.0) / 3.0;

    let cards: [(&str, String); 3] = [
        ("PACKAGES", model.entries.len().to_string()),
        ("LICENSES", license_count.to_string()),
        ("BINARIES", binaries.to_string()),
    ];

    for (i, (label, value)) in cards.iter().enumerate() {
        let cx = MARGIN + (card_w + gap) * i as f32;
        let accent = if i % 2 == 0 { template.accent_from } else { template.accent_to };
        draw_stat_card(&layer, cx, card_y, card_w, card_h, label, value, rgb(accent), fonts);
    }

    // ── "What's in this report" section ───────────────────────────────────────
    let section_y = card_y - 13.0;
    draw_hline(&layer, MARGIN, T_END, section_y, PANEL_BORDER);
    set_color(&layer, TEXT_MUT);
    layer.use_text("WHAT'S IN THIS REPORT", 6.5, Mm(MARGIN), Mm(section_y - 7.5), font_b);

    let mut items = vec![
        ("Project", "Copyright statements of the distributed project"),
        ("Attributions", "Every package with its licenses and copyright holders"),
    ];
    if template.include_license_texts {
        items.push(("License Texts", "Full text of each referenced license, once"));
    }
    for (j, (title, desc)) in items.iter().enumerate() {
        let iy = section_y - 15.0 - j as f32 * 10.0;
        fill_rounded_rect(&layer, MARGIN, iy + 2.0, 2.0, 2.0, 1.0, rgb(template.accent_from));
        set_color(&layer, TEXT_PRI);
        layer.use_text(*title, 8.5, Mm(MARGIN + 5.0), Mm(iy + 2.0), font_b);
        set_color(&layer, TEXT_SEC);
        layer.use_text(*desc, 8.0, Mm(MARGIN + 5.0), Mm(iy - 3.5), font_r);
    }

    draw_footer(&layer, template, font_r);
}

#[allow(clippy::too_many_arguments)]
fn draw_stat_card(
    layer: &PdfLayerReference,
    x: f32, y: f32, w: f32, h: f32,
    label: &str,
    value: &str,
    accent: (f32, f32, f32),
    fonts: &Fonts,
) {
    fill_rounded_rect(layer, x, y, w, h, R_BADGE, PANEL);
    stroke_rounded_rect(layer, x, y, w, h, R_BADGE, PANEL_BORDER);

    // Thin accent top strip
    fill_rect(layer, x, y + h - 2.0, w, 2.0, accent);

    set_color(layer, accent);
    layer.use_text(value, 20.0, Mm(x + 5.0), Mm(y + h * 0.38), &fonts.bold);

    set_color(layer, TEXT_MUT);
    layer.use_text(label, 6.5, Mm(x + 5.0), Mm(y + 3.5), &fonts.regular);
}

// ── Attribution pages ─────────────────────────────────────────────────────────

fn add_attribution_pages(
    doc: &PdfDocumentReference,
    model: &AttributionModel,
    template: &Template,
    fonts: &Fonts,
) {
    let mut flow = Flow::new(doc, fonts, template, "Attributions");

    flow.text("PROJECT COPYRIGHT", Style::label());
    flow.text(&model.project.name, Style::title());
    copyright_lines(&mut flow, &model.project.copyright);
    flow.separator();

    for entry in &model.entries {
        add_entry(&mut flow, entry, template.include_license_texts);
    }
}

fn add_entry(flow: &mut Flow, entry: &AttributionEntry, with_anchors: bool) {
    // Keep the package header together with its first lines.
    flow.reserve(18.0);

    for line in wrap_text(&entry.purl, PURL_WRAP) {
        flow.text(&line, Style::title());
    }
    if let Some(binary) = &entry.binary_filename {
        flow.text(&format!("Binary: {}", binary), Style::muted());
    }

    if entry.licenses.is_empty() {
        flow.text("No license determined.", Style::muted());
    }
    for license in &entry.licenses {
        let label = if license.name == license.license {
            license.license.clone()
        } else {
            format!("{} ({})", license.name, license.license)
        };
        let label = if with_anchors {
            format!("{}  #{}", label, license.anchor)
        } else {
            label
        };
        flow.chip(&label);
    }

    copyright_lines(flow, &entry.copyright);
    flow.separator();
}

fn copyright_lines(flow: &mut Flow, copyright: &str) {
    if copyright.is_empty() {
        flow.text("No copyright statements found.", Style::muted());
        return;
    }
    for statement in copyright.lines() {
        for line in wrap_text(statement, COPYRIGHT_WRAP) {
            flow.text(&line, Style::body());
        }
    }
}

// ── License text pages ────────────────────────────────────────────────────────

fn add_license_pages(
    doc: &PdfDocumentReference,
    licenses: &[&LicenseInfo],
    template: &Template,
    fonts: &Fonts,
) {
    let mut flow = Flow::new(doc, fonts, template, "License Texts");

    for (i, license) in licenses.iter().enumerate() {
        if i > 0 {
            flow.page_break();
        }
        flow.text(&license.name, Style::heading());
        flow.text(&format!("{}  #{}", license.license, license.anchor), Style::muted());
        flow.space(3.0);

        for raw in license.text.lines() {
            if raw.trim().is_empty() {
                flow.space(2.5);
                continue;
            }
            for line in wrap_text(raw, LICENSE_WRAP) {
                flow.text(&line, Style::body());
            }
        }
    }
}

// ── Flowing text layout ───────────────────────────────────────────────────────

#[derive(Clone, Copy)]
struct Style {
    size: f32,
    bold: bool,
    color: (f32, f32, f32),
    leading: f32,
}

impl Style {
    fn heading() -> Self {
        Style { size: 12.0, bold: true, color: TEXT_PRI, leading: 6.0 }
    }

    fn title() -> Self {
        Style { size: 9.5, bold: true, color: TEXT_PRI, leading: 5.0 }
    }

    fn label() -> Self {
        Style { size: 6.5, bold: true, color: TEXT_MUT, leading: 4.5 }
    }

    fn body() -> Self {
        Style { size: 7.5, bold: false, color: TEXT_SEC, leading: 3.6 }
    }

    fn muted() -> Self {
        Style { size: 7.5, bold: false, color: TEXT_MUT, leading: 3.8 }
    }
}

/// Writes lines top to bottom, starting a new page when the current one is full.
struct Flow<'a> {
    doc: &'a PdfDocumentReference,
    fonts: &'a Fonts,
    template: &'a Template,
    heading: &'static str,
    page: Option<(PdfPageIndex, PdfLayerIndex)>,
    page_num: u32,
    cur_y: f32,
}

impl<'a> Flow<'a> {
    fn new(
        doc: &'a PdfDocumentReference,
        fonts: &'a Fonts,
        template: &'a Template,
        heading: &'static str,
    ) -> Self {
        Flow { doc, fonts, template, heading, page: None, page_num: 0, cur_y: FIRST_Y }
    }

    fn new_page(&mut self) -> (PdfPageIndex, PdfLayerIndex) {
        self.page_num += 1;
        let (pi, li) = self.doc.add_page(Mm(PAGE_W), Mm(PAGE_H), self.heading);
        let layer = self.doc.get_page(pi).get_layer(li);

        fill_rect(&layer, 0.0, 0.0, PAGE_W, PAGE_H, BG);
        fill_gradient_h(
            &layer, 0.0, PAGE_H - 2.5, PAGE_W, 2.5,
            rgb(self.template.accent_from), rgb(self.template.accent_to), 21,
        );

        set_color(&layer, TEXT_PRI);
        layer.use_text(self.heading, 14.0, Mm(MARGIN), Mm(282.5), &self.fonts.bold);
        set_color(&layer, TEXT_MUT);
        layer.use_text(
            format!("Page {}", self.page_num),
            8.0, Mm(PAGE_W - MARGIN - 14.0), Mm(283.0), &self.fonts.regular,
        );
        draw_hline(&layer, MARGIN, T_END, 277.5, PANEL_BORDER);
        draw_footer(&layer, self.template, &self.fonts.regular);

        self.cur_y = FIRST_Y;
        self.page = Some((pi, li));
        (pi, li)
    }

    /// Layer with at least `height` mm left above the bottom margin.
    fn reserve(&mut self, height: f32) -> PdfLayerReference {
        let current = self.page;
        let (pi, li) = match current {
            Some(page) if self.cur_y - height >= BOT_MARGIN => page,
            _ => self.new_page(),
        };
        self.doc.get_page(pi).get_layer(li)
    }

    fn page_break(&mut self) {
        self.new_page();
    }

    fn space(&mut self, height: f32) {
        self.cur_y -= height;
    }

    fn text(&mut self, text: &str, style: Style) {
        let layer = self.reserve(style.leading);
        set_color(&layer, style.color);
        layer.use_text(
            text, style.size, Mm(MARGIN + 1.5), Mm(self.cur_y - style.size * 0.3),
            self.fonts.pick(style.bold),
        );
        self.cur_y -= style.leading;
    }

    /// License reference rendered on a tinted rounded background.
    fn chip(&mut self, text: &str) {
        const CHIP_H: f32 = 4.8;
        let label = truncate(text, 100);
        let layer = self.reserve(CHIP_H + 1.0);
        let width = (label.chars().count() as f32 * 1.45 + 6.0).min(T_END - MARGIN);

        fill_rounded_rect(
            &layer, MARGIN + 1.5, self.cur_y - CHIP_H, width, CHIP_H, R_BADGE, PANEL_ALT,
        );
        set_color(&layer, rgb(self.template.accent_from));
        layer.use_text(
            label, 7.0, Mm(MARGIN + 4.0), Mm(self.cur_y - CHIP_H + 1.4), &self.fonts.bold,
        );
        self.cur_y -= CHIP_H + 1.0;
    }

    fn separator(&mut self) {
        let layer = self.reserve(5.0);
        self.cur_y -= 2.0;
        draw_hline(&layer, MARGIN, T_END, self.cur_y, PANEL_BORDER);
        self.cur_y -= 3.0;
    }
}

fn draw_footer(layer: &PdfLayerReference, template: &Template, font: &IndirectFontRef) {
    draw_hline(layer, MARGIN, T_END, 22.0, PANEL_BORDER);
    set_color(layer, TEXT_MUT);
    let footer = template
        .footer
        .clone()
        .unwrap_or_else(|| format!("Generated by attribution-report v{}", env!("CARGO_PKG_VERSION")));
    layer.use_text(truncate(&footer, 90), 7.5, Mm(MARGIN), Mm(15.0), font);
}

// ── Drawing helpers ───────────────────────────────────────────────────────────

fn rgb(c: [f32; 3]) -> (f32, f32, f32) {
    (c[0], c[1], c[2])
}

fn set_color(layer: &PdfLayerReference, (r, g, b): (f32, f32, f32)) {
    layer.set_fill_color(Color::Rgb(Rgb { r, g, b, icc_profile: None }));
}

fn fill_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32,
             (r, g, b): (f32, f32, f32)) {
    layer.set_fill_color(Color::Rgb(Rgb { r, g, b, icc_profile: None }));
    layer.add_polygon(Polygon {
        rings: vec![vec![
            (Point::new(Mm(x),     Mm(y)),     false),
            (Point::new(Mm(x + w), Mm(y)),     false),
            (Point::new(Mm(x + w), Mm(y + h)), false),
            (Point::new(Mm(x),     Mm(y + h)), false),
        ]],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });
    layer.set_fill_color(Color::Rgb(Rgb { r: 0.0, g: 0.0, b: 0.0, icc_profile: None }));
}

/// Clockwise polygon ring approximating a rounded rectangle, 8 segments per corner.
fn rounded_rect_ring(x: f32, y: f32, w: f32, h: f32, r: f32) -> Vec<(Point, bool)> {
    let r = r.min(w / 2.0).min(h / 2.0);
    const SEGS: usize = 8;
    let mut pts = Vec::with_capacity(4 * (SEGS + 1));

    let corners = [
        (x + w - r, y + r,     270.0f32, 360.0f32), // bottom-right
        (x + w - r, y + h - r, 0.0f32,   90.0f32),  // top-right
        (x + r,     y + h - r, 90.0f32,  180.0f32), // top-left
        (x + r,     y + r,     180.0f32, 270.0f32), // bottom-left
    ];

    for (cx, cy, start, end) in &corners {
        for i in 0..=SEGS {
            let t = i as f32 / SEGS as f32;
            let angle = (start + (end - start) * t).to_radians();
            pts.push((
                Point::new(Mm(cx + r * angle.cos()), Mm(cy + r * angle.sin())),
                false,
            ));
        }
    }
    pts
}

fn fill_rounded_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32,
                     r: f32, (cr, cg, cb): (f32, f32, f32)) {
    layer.set_fill_color(Color::Rgb(Rgb { r: cr, g: cg, b: cb, icc_profile: None }));
    layer.add_polygon(Polygon {
        rings: vec![rounded_rect_ring(x, y, w, h, r)],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });
    layer.set_fill_color(Color::Rgb(Rgb { r: 0.0, g: 0.0, b: 0.0, icc_profile: None }));
}

fn stroke_rounded_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32,
                       r: f32, (cr, cg, cb): (f32, f32, f32)) {
    layer.set_outline_color(Color::Rgb(Rgb { r: cr, g: cg, b: cb, icc_profile: None }));
    layer.set_outline_thickness(0.4);
    layer.add_polygon(Polygon {
        rings: vec![rounded_rect_ring(x, y, w, h, r)],
        mode: PaintMode::Stroke,
        winding_order: WindingOrder::NonZero,
    });
    layer.set_outline_color(Color::Rgb(Rgb { r: 0.0, g: 0.0, b: 0.0, icc_profile: None }));
    layer.set_outline_thickness(1.0);
}

fn draw_hline(layer: &PdfLayerReference, x1: f32, x2: f32, y: f32,
              (r, g, b): (f32, f32, f32)) {
    layer.set_outline_color(Color::Rgb(Rgb { r, g, b, icc_profile: None }));
    layer.set_outline_thickness(0.3);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(x1), Mm(y)), false),
            (Point::new(Mm(x2), Mm(y)), false),
        ],
        is_closed: false,
    });
    layer.set_outline_color(Color::Rgb(Rgb { r: 0.0, g: 0.0, b: 0.0, icc_profile: None }));
    layer.set_outline_thickness(1.0);
}

/// Left-to-right gradient rectangle made of `steps` vertical strips.
#[allow(clippy::too_many_arguments)]
fn fill_gradient_h(
    layer: &PdfLayerReference,
    x: f32, y: f32, w: f32, h: f32,
    from: (f32, f32, f32),
    to: (f32, f32, f32),
    steps: usize,
) {
    let step_w = w / steps as f32;
    for i in 0..steps {
        let t = i as f32 / (steps - 1).max(1) as f32;
        let color = (
            from.0 + (to.0 - from.0) * t,
            from.1 + (to.1 - from.1) * t,
            from.2 + (to.2 - from.2) * t,
        );
        // Overlap strips slightly to prevent rounding gaps
        fill_rect(layer, x + i as f32 * step_w, y, step_w + 0.6, h, color);
    }
}

// ── Text helpers ──────────────────────────────────────────────────────────────

fn truncate(s: &str, max: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() > max {
        format!("{}...", chars[..max.saturating_sub(3)].iter().collect::<String>())
    } else {
        s.to_string()
    }
}

/// Greedy word wrap by character count; words longer than `max_chars` are split.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    if text.chars().count() <= max_chars {
        return vec![text.to_string()];
    }
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let word: String = word.into_iter().collect();
        if current.is_empty() {
            current = word;
        } else if current.chars().count() + 1 + word.chars().count() > max_chars {
            lines.push(std::mem::replace(&mut current, word));
        } else {
            current.push(' ');
            current.push_str(&word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}
