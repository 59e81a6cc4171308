//! Paragraph layout: greedy word wrap over styled runs.
//!
//! # Rules
//! - Words break only at whitespace; whitespace runs collapse to one space.
//! - A word may mix weights (`<b>Acme</b>'s` is one word with two fragments).
//! - `Inline::Break` ends the current line unconditionally.
//! - A word wider than the line sits alone on its own (overflowing) line.
//! - Justified paragraphs stretch every line except the last line and lines
//!   ended by a forced break.

use serde::{Deserialize, Serialize};

use crate::markup::BlockRole;
use crate::render::font_metrics::{get_metrics, PdfFont};
use crate::render::runs::Inline;

// ────────────────────────────────────────────────────────────────────────────
// Paragraph styles
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
    Left,
    Justify,
}

/// Typographic settings for one kind of paragraph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParagraphStyle {
    /// Font for unemphasized text. Emphasis always switches to Helvetica-Bold.
    pub font: PdfFont,
    pub size_pt: f32,
    pub leading_pt: f32,
    pub alignment: Alignment,
    pub space_after_pt: f32,
    /// Vertical gap inserted after the paragraph.
    pub gap_after_pt: f32,
}

impl ParagraphStyle {
    /// Contact header: bold 12/14, 12pt space after, then a quarter-inch gap.
    pub fn header() -> Self {
        Self {
            font: PdfFont::HelveticaBold,
            size_pt: 12.0,
            leading_pt: 14.0,
            alignment: Alignment::Left,
            space_after_pt: 12.0,
            gap_after_pt: 18.0,
        }
    }

    /// Letter body: justified 10/12, then a 0.15 inch gap.
    pub fn body() -> Self {
        Self {
            font: PdfFont::Helvetica,
            size_pt: 10.0,
            leading_pt: 12.0,
            alignment: Alignment::Justify,
            space_after_pt: 0.0,
            gap_after_pt: 10.8,
        }
    }

    pub fn for_role(role: BlockRole) -> Self {
        match role {
            BlockRole::Header => Self::header(),
            BlockRole::Body => Self::body(),
        }
    }

    fn font_for(&self, bold: bool) -> PdfFont {
        if bold {
            PdfFont::HelveticaBold
        } else {
            self.font
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Layout output
// ────────────────────────────────────────────────────────────────────────────

/// A same-font piece of a word.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub text: String,
    pub font: PdfFont,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub fragments: Vec<Fragment>,
    pub width_pt: f32,
}

impl Word {
    fn last_font(&self) -> Option<PdfFont> {
        self.fragments.last().map(|f| f.font)
    }
}

/// One printed line of a paragraph.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub words: Vec<Word>,
    /// Width with single spaces between words.
    pub natural_width_pt: f32,
    /// Extra width added to every inter-word space (0 unless justified).
    pub word_spacing_pt: f32,
}

impl Line {
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.fragments.iter().map(|f| f.text.as_str()).collect::<String>())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wrapping
// ────────────────────────────────────────────────────────────────────────────

/// Lays out a paragraph into lines no wider than `max_width_pt` (except for
/// single over-long words). An empty paragraph yields no lines.
pub fn wrap_paragraph(inlines: &[Inline], style: &ParagraphStyle, max_width_pt: f32) -> Vec<Line> {
    let mut hard_lines = split_words(inlines, style);

    // A trailing forced break does not add an empty line.
    while hard_lines.last().is_some_and(|words| words.is_empty()) {
        hard_lines.pop();
    }

    let mut lines = Vec::new();
    for words in hard_lines {
        lines.extend(wrap_words(words, style, max_width_pt));
    }
    lines
}

/// Splits inline runs into words, grouped by forced breaks.
fn split_words(inlines: &[Inline], style: &ParagraphStyle) -> Vec<Vec<Word>> {
    let mut hard_lines: Vec<Vec<Word>> = vec![Vec::new()];
    let mut current: Vec<Fragment> = Vec::new();

    for inline in inlines {
        match inline {
            Inline::Break => {
                finish_word(&mut current, &mut hard_lines, style);
                hard_lines.push(Vec::new());
            }
            Inline::Text { text, bold } => {
                let font = style.font_for(*bold);
                for c in text.chars() {
                    if c.is_whitespace() {
                        finish_word(&mut current, &mut hard_lines, style);
                        continue;
                    }
                    match current.last_mut() {
                        Some(fragment) if fragment.font == font => fragment.text.push(c),
                        _ => current.push(Fragment {
                            text: c.to_string(),
                            font,
                        }),
                    }
                }
            }
        }
    }
    finish_word(&mut current, &mut hard_lines, style);

    hard_lines
}

fn finish_word(current: &mut Vec<Fragment>, hard_lines: &mut [Vec<Word>], style: &ParagraphStyle) {
    if current.is_empty() {
        return;
    }
    let fragments = std::mem::take(current);
    let width_pt = fragments
        .iter()
        .map(|f| get_metrics(f.font).measure_pt(&f.text, style.size_pt))
        .sum();
    if let Some(line) = hard_lines.last_mut() {
        line.push(Word {
            fragments,
            width_pt,
        });
    }
}

/// Greedy wrap of one forced-break-free run of words.
fn wrap_words(words: Vec<Word>, style: &ParagraphStyle, max_width_pt: f32) -> Vec<Line> {
    if words.is_empty() {
        // Consecutive forced breaks leave a blank line.
        return vec![Line {
            words: Vec::new(),
            natural_width_pt: 0.0,
            word_spacing_pt: 0.0,
        }];
    }

    let mut lines: Vec<Line> = Vec::new();
    let mut line_words: Vec<Word> = Vec::new();
    let mut current_width = 0.0_f32;

    for word in words {
        let space_w = line_words
            .last()
            .and_then(Word::last_font)
            .map(|font| get_metrics(font).space_width * style.size_pt)
            .unwrap_or(0.0);

        if !line_words.is_empty() && current_width + space_w + word.width_pt > max_width_pt {
            lines.push(Line {
                words: std::mem::take(&mut line_words),
                natural_width_pt: current_width,
                word_spacing_pt: 0.0,
            });
            current_width = word.width_pt;
        } else {
            current_width += space_w + word.width_pt;
        }
        line_words.push(word);
    }
    // The final line of a run is never stretched.
    lines.push(Line {
        words: line_words,
        natural_width_pt: current_width,
        word_spacing_pt: 0.0,
    });

    if style.alignment == Alignment::Justify {
        let stretchable = lines.len() - 1;
        for line in lines.iter_mut().take(stretchable) {
            let gaps = line.words.len().saturating_sub(1);
            if gaps > 0 && line.natural_width_pt < max_width_pt {
                line.word_spacing_pt = (max_width_pt - line.natural_width_pt) / gaps as f32;
            }
        }
    }

    lines
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
