//! PDF writer. Lays styled blocks onto US-letter pages with `lopdf`.
//!
//! Text is set in the non-embedded base-14 Helvetica pair with WinAnsiEncoding,
//! one `BT … ET` object per printed line. Justification uses `Tw`, which only
//! stretches byte 32, so inter-word spaces are always literal spaces.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, StringFormat};
use tracing::{debug, trace};

use crate::markup::StyledBlock;
use crate::render::encoding::encode_win_ansi;
use crate::render::font_metrics::{default_page_config, PageConfig, PdfFont};
use crate::render::layout::{wrap_paragraph, Line, ParagraphStyle};
use crate::render::runs::parse_inline;
use crate::render::{DocumentRenderer, RenderError};

const DOCUMENT_TITLE: &str = "Cover Letter";

/// Paginated PDF renderer for translated letters.
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    page: PageConfig,
}

impl PdfRenderer {
    pub fn new(page: PageConfig) -> Self {
        Self { page }
    }

    /// Lays out every block and returns one operation list per page.
    fn paginate(&self, blocks: &[StyledBlock]) -> Result<Vec<Vec<Operation>>, RenderError> {
        let width = self.page.text_width_pt();
        let mut pages: Vec<Vec<Operation>> = Vec::new();
        let mut ops: Vec<Operation> = Vec::new();
        let mut page_has_lines = false;
        let mut y = self.page.top_y();

        for (index, block) in blocks.iter().enumerate() {
            let style = ParagraphStyle::for_role(block.role);
            let lines = wrap_paragraph(&parse_inline(&block.text), &style, width);

            for line in &lines {
                if page_has_lines && y - style.leading_pt < self.page.margin_bottom_pt {
                    pages.push(std::mem::take(&mut ops));
                    y = self.page.top_y();
                }
                y -= style.leading_pt;
                trace!("Block {} at y={:.1}: {}", index + 1, y, line.text());
                emit_line(&mut ops, line, &style, self.page.margin_left_pt, y).map_err(
                    |character| RenderError::UnsupportedCharacter {
                        character,
                        code: character as u32,
                        paragraph: index + 1,
                    },
                )?;
                page_has_lines = true;
            }

            // Overrunning the bottom margin here is fine: the next line starts a
            // new page and the gap is dropped.
            y -= style.space_after_pt + style.gap_after_pt;
        }
        pages.push(ops);

        Ok(pages)
    }

    fn assemble(&self, pages: Vec<Vec<Operation>>) -> Result<Vec<u8>, RenderError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut fonts = Dictionary::new();
        for font in [PdfFont::Helvetica, PdfFont::HelveticaBold] {
            let font_id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(font.resource_name(), Object::Reference(font_id));
        }
        let resources_id = doc.add_object(dictionary! {
            "Font" => fonts,
        });

        let media_box = vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(self.page.page_width_pt.round() as i64),
            Object::Integer(self.page.page_height_pt.round() as i64),
        ];

        let page_count = pages.len();
        let mut kids: Vec<Object> = Vec::with_capacity(page_count);
        for operations in pages {
            let content = Content { operations }
                .encode()
                .map_err(|e| RenderError::Pdf(format!("content stream encoding failed: {e}")))?;
            let content_id = doc.add_object(lopdf::Stream::new(Dictionary::new(), content));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => Object::Reference(pages_id),
                "MediaBox" => media_box.clone(),
                "Contents" => Object::Reference(content_id),
                "Resources" => Object::Reference(resources_id),
            });
            kids.push(Object::Reference(page_id));
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => Object::Integer(page_count as i64),
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(DOCUMENT_TITLE),
            "Producer" => Object::string_literal(env!("CARGO_PKG_NAME")),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));
        doc.trailer.set("Info", Object::Reference(info_id));
        doc.compress();

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| RenderError::Pdf(format!("failed to serialize PDF: {e}")))?;

        debug!("Rendered {} page(s), {} bytes", page_count, buffer.len());
        Ok(buffer)
    }
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self::new(default_page_config())
    }
}

impl DocumentRenderer for PdfRenderer {
    fn render(&self, blocks: &[StyledBlock]) -> Result<Vec<u8>, RenderError> {
        if blocks.is_empty() {
            return Err(RenderError::Empty);
        }
        let pages = self.paginate(blocks)?;
        self.assemble(pages)
    }
}

/// Appends the text operators for one line at baseline `y`.
///
/// Fails with the first character that cannot be encoded.
fn emit_line(
    ops: &mut Vec<Operation>,
    line: &Line,
    style: &ParagraphStyle,
    x: f32,
    y: f32,
) -> Result<(), char> {
    if line.words.is_empty() {
        return Ok(());
    }

    // Same-font byte runs; the space before a word rides in the preceding run.
    let mut runs: Vec<(PdfFont, Vec<u8>)> = Vec::new();
    for (i, word) in line.words.iter().enumerate() {
        if i > 0 {
            if let Some((_, bytes)) = runs.last_mut() {
                bytes.push(b' ');
            }
        }
        for fragment in &word.fragments {
            let encoded = encode_win_ansi(&fragment.text)?;
            match runs.last_mut() {
                Some((font, bytes)) if *font == fragment.font => bytes.extend(encoded),
                _ => runs.push((fragment.font, encoded)),
            }
        }
    }

    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("Tw", vec![line.word_spacing_pt.into()]));
    ops.push(Operation::new("Td", vec![x.into(), y.into()]));
    for (font, bytes) in runs {
        ops.push(Operation::new(
            "Tf",
            vec![
                Object::Name(font.resource_name().as_bytes().to_vec()),
                style.size_pt.into(),
            ],
        ));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(bytes, StringFormat::Hexadecimal)],
        ));
    }
    ops.push(Operation::new("ET", vec![]));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{translate, BlockRole};

    fn render(draft: &str) -> Result<Vec<u8>, RenderError> {
        PdfRenderer::default().render(&translate(draft))
    }

    fn page_count(bytes: &[u8]) -> usize {
        Document::load_mem(bytes).unwrap().get_pages().len()
    }

    const LETTER: &str = "**Jane Doe**\n555-0100 | jane@example.com\nhttps://jane.dev\n\n\
        Dear Hiring Team,\nI am applying for the **Platform Engineer** role.\n\n\
        Sincerely,\nJane Doe";

    #[test]
    fn test_render_produces_pdf_bytes() {
        let bytes = render(LETTER).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        assert_eq!(page_count(&bytes), 1);
    }

    #[test]
    fn test_rendered_text_is_extractable() {
        let bytes = render(LETTER).unwrap();
        let text = pdf_extract::extract_text_from_mem(&bytes).unwrap();
        assert!(text.contains("Jane"), "{text}");
        assert!(text.contains("Hiring"), "{text}");
        assert!(text.contains("Platform"), "{text}");
        assert!(text.contains("Sincerely"), "{text}");
        assert!(!text.contains("**"));
        assert!(!text.contains("<b>"));
    }

    #[test]
    fn test_long_letter_paginates() {
        let paragraph = "Throughout my career I have consistently exceeded goals. ".repeat(12);
        let mut draft = String::from("**Jane Doe**\nphone");
        for _ in 0..20 {
            draft.push_str("\n\n");
            draft.push_str(&paragraph);
        }
        let bytes = render(&draft).unwrap();
        assert!(page_count(&bytes) > 1);
    }

    #[test]
    fn test_empty_block_list_is_an_error() {
        assert!(matches!(render("  \n\n "), Err(RenderError::Empty)));
    }

    #[test]
    fn test_unsupported_character_names_paragraph() {
        let err = render("**Jane Doe**\n\nFirst paragraph.\n\nI ✓ Rust.").unwrap_err();
        match err {
            RenderError::UnsupportedCharacter {
                character,
                paragraph,
                ..
            } => {
                assert_eq!(character, '✓');
                assert_eq!(paragraph, 3);
            }
            other => panic!("expected UnsupportedCharacter, got {other:?}"),
        }
    }

    #[test]
    fn test_latin1_text_renders() {
        let bytes = render("**José Núñez**\n\nMerci — à bientôt.").unwrap();
        assert_eq!(page_count(&bytes), 1);
    }

    #[test]
    fn test_block_without_visible_text_still_renders() {
        let blocks = vec![StyledBlock {
            text: "<b></b>".to_string(),
            role: BlockRole::Header,
        }];
        let bytes = PdfRenderer::default().render(&blocks).unwrap();
        assert_eq!(page_count(&bytes), 1);
    }

    #[test]
    fn test_justified_line_sets_word_spacing() {
        let mut ops = Vec::new();
        let style = ParagraphStyle::body();
        let text = "measurable impact ".repeat(40);
        let lines = wrap_paragraph(&parse_inline(&text), &style, 504.0);
        emit_line(&mut ops, &lines[0], &style, 54.0, 700.0).unwrap();

        let tw = ops.iter().find(|op| op.operator == "Tw").unwrap();
        match &tw.operands[0] {
            Object::Real(spacing) => assert!(*spacing > 0.0),
            other => panic!("unexpected Tw operand {other:?}"),
        }
    }
}
