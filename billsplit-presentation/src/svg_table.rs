use std::{borrow::Cow, fmt::Write};

const FONT_SIZE: u32 = 13;
const CAPTION_FONT_SIZE: u32 = 15;
const CELL_PADDING: u32 = 10;
const LINE_HEIGHT: u32 = FONT_SIZE + CELL_PADDING * 2;
const CAPTION_HEIGHT: u32 = CAPTION_FONT_SIZE + CELL_PADDING;
const HEADER_BG: &str = "#2d3748";
const HEADER_TEXT: &str = "#ffffff";
const ROW_BG_EVEN: &str = "#ffffff";
const ROW_BG_ODD: &str = "#f1f5f9";
const TOTAL_BG: &str = "#e2e8f0";
const ROW_TEXT: &str = "#1a202c";
const CAPTION_TEXT: &str = "#2d3748";
const BORDER_COLOR: &str = "#cbd5e0";
const FONT_FAMILY: &str = "Helvetica, Arial, sans-serif";
const CHAR_WIDTH: f32 = 7.8;
const MIN_TEXT_WIDTH: u32 = 24;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Renders one invoice table as a standalone SVG document.
///
/// Rows may be longer than the header; the extra columns get blank header
/// cells, which is how the weighted table carries its grand total.
#[derive(Default)]
pub struct SvgTableBuilder<'a> {
    caption: Option<Cow<'a, str>>,
    headers: Vec<Cow<'a, str>>,
    rows: Vec<Vec<Cow<'a, str>>>,
    alignments: Vec<Alignment>,
    emphasize_last_row: bool,
}

impl<'a> SvgTableBuilder<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn caption(mut self, caption: impl Into<Cow<'a, str>>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn alignments(mut self, alignments: &[Alignment]) -> Self {
        self.alignments = alignments.to_vec();
        self
    }

    pub fn headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'a, str>>,
    {
        self.headers = headers.into_iter().map(Into::into).collect();
        self
    }

    pub fn row<I, S>(mut self, row: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'a, str>>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
        self
    }

    /// Draws the final row as a totals row.
    pub fn emphasize_last_row(mut self, emphasize: bool) -> Self {
        self.emphasize_last_row = emphasize;
        self
    }

    pub fn build(self) -> String {
        let col_count = self
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or_default();
        if col_count == 0 {
            return String::new();
        }

        let mut col_widths = vec![estimate_text_width(""); col_count];
        for line in std::iter::once(&self.headers).chain(&self.rows) {
            for (width, cell) in col_widths.iter_mut().zip(line) {
                *width = (*width).max(estimate_text_width(cell));
            }
        }

        let table_top = if self.caption.is_some() {
            CAPTION_HEIGHT
        } else {
            0
        };
        let total_width: u32 =
            col_widths.iter().sum::<u32>() + (col_count as u32 + 1) * CELL_PADDING;
        let table_height = LINE_HEIGHT * (1 + self.rows.len() as u32) + 2;
        let total_height = table_top + table_height;

        let mut svg = String::with_capacity(4096);
        let _ = writeln!(
            &mut svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{total_width}" height="{total_height}" viewBox="0 0 {total_width} {total_height}">"#
        );
        let _ = writeln!(
            &mut svg,
            r#"<style>text {{ font-family: {FONT_FAMILY}; font-size: {FONT_SIZE}px; }}</style>"#
        );

        if let Some(caption) = &self.caption {
            let _ = writeln!(
                &mut svg,
                r#"<text x="2" y="{CAPTION_FONT_SIZE}" fill="{CAPTION_TEXT}" font-size="{CAPTION_FONT_SIZE}" font-weight="bold">{}</text>"#,
                escape_xml(caption)
            );
        }

        let _ = writeln!(
            &mut svg,
            r#"<rect y="{table_top}" width="{total_width}" height="{table_height}" fill="{BORDER_COLOR}" rx="4" />"#
        );
        let _ = writeln!(
            &mut svg,
            r#"<rect x="1" y="{}" width="{}" height="{LINE_HEIGHT}" fill="{HEADER_BG}" rx="3" />"#,
            table_top + 1,
            total_width - 2
        );
        self.write_cells(
            &mut svg,
            &self.headers,
            &col_widths,
            table_top + 1,
            HEADER_TEXT,
            false,
        );

        let last_row = self.rows.len().saturating_sub(1);
        for (row_idx, row) in self.rows.iter().enumerate() {
            let y = table_top + LINE_HEIGHT * (1 + row_idx as u32) + 1;
            let is_total = self.emphasize_last_row && row_idx == last_row;
            let bg = match (is_total, row_idx % 2 == 0) {
                (true, _) => TOTAL_BG,
                (false, true) => ROW_BG_EVEN,
                (false, false) => ROW_BG_ODD,
            };
            let _ = writeln!(
                &mut svg,
                r#"<rect x="1" y="{y}" width="{}" height="{LINE_HEIGHT}" fill="{bg}" />"#,
                total_width - 2
            );
            self.write_cells(&mut svg, row, &col_widths, y, ROW_TEXT, is_total);
        }

        svg.push_str("</svg>");
        svg
    }

    fn write_cells(
        &self,
        svg: &mut String,
        cells: &[Cow<'a, str>],
        col_widths: &[u32],
        y: u32,
        fill: &str,
        bold: bool,
    ) {
        let weight = if bold { r#" font-weight="bold""# } else { "" };
        let mut x = CELL_PADDING;
        for (i, (cell, width)) in cells.iter().zip(col_widths).enumerate() {
            let alignment = self.alignments.get(i).copied().unwrap_or_default();
            let text_x = compute_text_x(x, *width, alignment);
            let _ = writeln!(
                svg,
                r#"<text x="{text_x}" y="{}" fill="{fill}" text-anchor="{}"{weight}>{}</text>"#,
                y + LINE_HEIGHT / 2 + FONT_SIZE / 2 - 2,
                alignment_anchor(alignment),
                escape_xml(cell)
            );
            x += width + CELL_PADDING;
        }
    }
}

fn estimate_text_width(text: &str) -> u32 {
    let width = text.chars().count() as f32 * CHAR_WIDTH;
    (width.ceil() as u32).max(MIN_TEXT_WIDTH) + CELL_PADDING
}

fn compute_text_x(cell_x: u32, cell_width: u32, alignment: Alignment) -> u32 {
    match alignment {
        Alignment::Left => cell_x,
        Alignment::Center => cell_x + cell_width / 2,
        Alignment::Right => cell_x + cell_width,
    }
}

fn alignment_anchor(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::Left => "start",
        Alignment::Center => "middle",
        Alignment::Right => "end",
    }
}

fn escape_xml(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 10);
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Stacks table documents top to bottom, left aligned, on a white page.
pub fn combine_svgs_vertically(svgs: &[&str]) -> Option<String> {
    const SPACING: u32 = 24;
    const MARGIN: u32 = 16;

    if svgs.is_empty() {
        return None;
    }

    let mut parts = Vec::with_capacity(svgs.len());
    for svg in svgs {
        let width = extract_svg_dimension(svg, "width")?;
        let height = extract_svg_dimension(svg, "height")?;
        parts.push((width, height, extract_svg_content(svg)?));
    }

    let max_width = parts.iter().map(|(width, _, _)| *width).max()? + MARGIN * 2;
    let total_height = parts.iter().map(|(_, height, _)| *height).sum::<u32>()
        + SPACING * (parts.len() as u32 - 1)
        + MARGIN * 2;

    let capacity = svgs.iter().map(|s| s.len()).sum::<usize>() + parts.len() * 64 + 512;
    let mut combined = String::with_capacity(capacity);
    let _ = writeln!(
        &mut combined,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{max_width}" height="{total_height}" viewBox="0 0 {max_width} {total_height}">"#
    );
    let _ = writeln!(
        &mut combined,
        r#"<style>text {{ font-family: {FONT_FAMILY}; font-size: {FONT_SIZE}px; }}</style>"#
    );
    let _ = writeln!(
        &mut combined,
        r##"<rect width="{max_width}" height="{total_height}" fill="#ffffff" />"##
    );

    let mut y_offset = MARGIN;
    for (_, height, content) in parts {
        let _ = writeln!(
            &mut combined,
            r#"<g transform="translate({MARGIN}, {y_offset})">"#
        );
        combined.push_str(&content);
        combined.push_str("</g>\n");
        y_offset += height + SPACING;
    }

    combined.push_str("</svg>");
    Some(combined)
}

fn extract_svg_dimension(svg: &str, attr: &str) -> Option<u32> {
    let pattern = format!(" {attr}=\"");
    let start = svg.find(&pattern)? + pattern.len();
    let end = svg[start..].find('"')? + start;
    svg[start..end].parse().ok()
}

fn extract_svg_content(svg: &str) -> Option<String> {
    const STYLE_TAG_CLOSE: &str = "</style>";

    let start = svg.find('>')? + 1;
    let end = svg.rfind("</svg>")?;
    let content = &svg[start..end];

    match (content.find("<style>"), content.find(STYLE_TAG_CLOSE)) {
        (Some(style_start), Some(style_end)) => Some(format!(
            "{}{}",
            &content[..style_start],
            &content[style_end + STYLE_TAG_CLOSE.len()..]
        )),
        _ => Some(content.to_string()),
    }
}
