//! Markup Translator: turns letter text into styled blocks for the renderer.
//!
//! # Rules
//! - Blocks are separated by a blank line; whitespace-only blocks are dropped.
//! - The first surviving block is the Header, every later block is Body.
//!   Classification is positional only.
//! - Single newlines inside a block become `<br/>`.
//! - Emphasis uses the parity rule: split on `**`, even-indexed segments stay
//!   literal, odd-indexed segments are wrapped in `<b>…</b>`. An odd delimiter
//!   count bolds the tail. No smarter matching is attempted.
//!
//! `translate` is total: it never fails, whatever the input.

use serde::{Deserialize, Serialize};

pub const EMPHASIS_DELIMITER: &str = "**";
pub const BOLD_OPEN: &str = "<b>";
pub const BOLD_CLOSE: &str = "</b>";
pub const LINE_BREAK: &str = "<br/>";

const BLOCK_DELIMITER: &str = "\n\n";

/// Rendering role of a block. Attached while splitting, never inferred later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockRole {
    Header,
    Body,
}

/// One flowed paragraph of renderer markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledBlock {
    pub text: String,
    pub role: BlockRole,
}

/// Splits a draft into styled blocks: exactly one Header first, then Body blocks.
pub fn translate(draft: &str) -> Vec<StyledBlock> {
    draft
        .split(BLOCK_DELIMITER)
        .filter(|raw| !raw.trim().is_empty())
        .enumerate()
        .map(|(position, raw)| {
            let role = if position == 0 {
                BlockRole::Header
            } else {
                BlockRole::Body
            };
            let text = match role {
                BlockRole::Header => header_markup(raw),
                BlockRole::Body => emphasis_markup(&break_lines(raw)),
            };
            StyledBlock {
                text: collapse_repeated_markers(text),
                role,
            }
        })
        .collect()
}

/// Header blocks carry the contact name between the first two delimiters.
///
/// Bounded split into at most 3 parts: the middle part (the name) is bolded and
/// the remainder keeps the parity rule. Anything other than exactly 3 parts
/// falls back to the generic conversion.
fn header_markup(raw: &str) -> String {
    let parts: Vec<&str> = raw.splitn(3, EMPHASIS_DELIMITER).collect();
    let [prefix, name, remainder] = parts.as_slice() else {
        return emphasis_markup(&break_lines(raw));
    };

    format!(
        "{}{BOLD_OPEN}{name}{BOLD_CLOSE}{}",
        break_lines(prefix),
        emphasis_markup(&break_lines(remainder)),
    )
}

/// Applies the parity rule to one block of text.
pub fn emphasis_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    for (index, segment) in text.split(EMPHASIS_DELIMITER).enumerate() {
        if index % 2 == 0 {
            out.push_str(segment);
        } else {
            out.push_str(BOLD_OPEN);
            out.push_str(segment);
            out.push_str(BOLD_CLOSE);
        }
    }
    out
}

fn break_lines(text: &str) -> String {
    text.replace('\n', LINE_BREAK)
}

/// Collapses any run of consecutive `<b>` (or `</b>`) into a single marker.
fn collapse_repeated_markers(mut text: String) -> String {
    for marker in [BOLD_OPEN, BOLD_CLOSE] {
        let doubled = marker.repeat(2);
        while text.contains(&doubled) {
            text = text.replace(&doubled, marker);
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::letter::composer::compose;
    use crate::letter::request::{ContactDetails, LetterRequest};
    use crate::letter::tone::Tone;

    fn roles(blocks: &[StyledBlock]) -> Vec<BlockRole> {
        blocks.iter().map(|b| b.role).collect()
    }

    // ── splitting and classification ────────────────────────────────────────

    #[test]
    fn test_empty_and_whitespace_drafts_yield_no_blocks() {
        assert!(translate("").is_empty());
        assert!(translate("   \n\n  ").is_empty());
        assert!(translate("\n\n\n\n\t").is_empty());
    }

    #[test]
    fn test_single_block_is_header() {
        let blocks = translate("Just one paragraph\nwith two lines");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].role, BlockRole::Header);
        assert_eq!(blocks[0].text, "Just one paragraph<br/>with two lines");
    }

    #[test]
    fn test_first_surviving_block_is_header() {
        let blocks = translate("\n\n  \n\nFirst\n\nSecond\n\nThird");
        assert_eq!(
            roles(&blocks),
            vec![BlockRole::Header, BlockRole::Body, BlockRole::Body]
        );
        assert_eq!(blocks[0].text, "First");
    }

    #[test]
    fn test_classification_ignores_content() {
        let blocks = translate("plain text first\n\n**Jane Doe**\nphone");
        assert_eq!(blocks[0].role, BlockRole::Header);
        assert_eq!(blocks[1].role, BlockRole::Body);
        assert_eq!(blocks[1].text, "<b>Jane Doe</b><br/>phone");
    }

    #[test]
    fn test_block_order_preserved() {
        let blocks = translate("A\n\nB\n\nC\n\nD");
        let texts: Vec<&str> = blocks.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec!["A", "B", "C", "D"]);
    }

    // ── header special case ─────────────────────────────────────────────────

    #[test]
    fn test_header_example() {
        let blocks = translate("**Jane Doe**\nphone | email\nurl");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].role, BlockRole::Header);
        assert_eq!(blocks[0].text, "<b>Jane Doe</b><br/>phone | email<br/>url");
    }

    #[test]
    fn test_header_without_delimiters_falls_back() {
        let blocks = translate("Jane Doe\nphone");
        assert_eq!(blocks[0].text, "Jane Doe<br/>phone");
    }

    #[test]
    fn test_header_with_single_delimiter_falls_back_to_parity() {
        let blocks = translate("**Jane Doe\nphone");
        assert_eq!(blocks[0].text, "<b>Jane Doe<br/>phone</b>");
    }

    #[test]
    fn test_header_with_extra_pairs_leaves_no_delimiters() {
        let blocks = translate("**Jane Doe**\n**Staff Engineer**\nurl");
        assert_eq!(
            blocks[0].text,
            "<b>Jane Doe</b><br/><b>Staff Engineer</b><br/>url"
        );
    }

    #[test]
    fn test_header_keeps_text_before_name() {
        let blocks = translate("Dr. **Jane Doe**\nphone");
        assert_eq!(blocks[0].text, "Dr. <b>Jane Doe</b><br/>phone");
    }

    #[test]
    fn test_header_matches_generic_conversion() {
        for raw in ["**A**\nb", "x**A**y**B**", "**A", "none", "a**b**c**d"] {
            assert_eq!(
                header_markup(raw),
                emphasis_markup(&break_lines(raw)),
                "header/generic diverged for {raw:?}"
            );
        }
    }

    // ── parity rule ─────────────────────────────────────────────────────────

    #[test]
    fn test_paired_emphasis_bolds_odd_segments() {
        let blocks = translate("head\n\nI want **Rust** and **Go** work.");
        assert_eq!(blocks[1].text, "I want <b>Rust</b> and <b>Go</b> work.");
        assert!(!blocks[1].text.contains("**"));
        assert_eq!(blocks[1].text.matches(BOLD_OPEN).count(), 2);
    }

    #[test]
    fn test_odd_delimiters_bold_the_tail() {
        let blocks = translate("head\n\na**b**c**d");
        assert_eq!(blocks[1].text, "a<b>b</b>c<b>d</b>");
    }

    #[test]
    fn test_single_delimiter_bolds_rest_of_block() {
        assert_eq!(emphasis_markup("left**right"), "left<b>right</b>");
        assert_eq!(emphasis_markup("**"), "<b></b>");
    }

    #[test]
    fn test_emphasis_does_not_span_blocks() {
        let blocks = translate("head\n\nstart **open\n\nclose** end");
        assert_eq!(blocks[1].text, "start <b>open</b>");
        assert_eq!(blocks[2].text, "close<b> end</b>");
    }

    #[test]
    fn test_emphasis_across_line_break_inside_block() {
        let blocks = translate("head\n\n**bold\nstill bold** plain");
        assert_eq!(blocks[1].text, "<b>bold<br/>still bold</b> plain");
    }

    #[test]
    fn test_triple_asterisk() {
        // "***x***" splits into ["", "*x", "*"]
        assert_eq!(emphasis_markup("***x***"), "<b>*x</b>*");
    }

    // ── defensive collapse ──────────────────────────────────────────────────

    #[test]
    fn test_adjacent_empty_pairs_leave_no_doubled_markers() {
        let blocks = translate("head\n\nx****y");
        let text = &blocks[1].text;
        assert!(!text.contains("<b><b>"), "{text}");
        assert!(!text.contains("</b></b>"), "{text}");
        assert!(!text.contains("**"));
        assert!(text.starts_with('x') && text.ends_with('y'));
    }

    #[test]
    fn test_collapse_handles_literal_markers_in_user_text() {
        let blocks = translate("head\n\n<b><b><b>loud</b></b> **x**");
        assert_eq!(blocks[1].text, "<b>loud</b> <b>x</b>");
    }

    #[test]
    fn test_many_delimiters_never_panic() {
        let input = "*".repeat(101);
        let blocks = translate(&format!("h\n\n{input}"));
        assert_eq!(blocks.len(), 2);
        assert!(!blocks[1].text.contains("<b><b>"));
    }

    // ── round trip with the composer ────────────────────────────────────────

    #[test]
    fn test_composed_draft_translates_to_header_plus_body_paragraphs() {
        let request = LetterRequest {
            job_title: "Senior Data Scientist".to_string(),
            company: "Gemini Labs".to_string(),
            skills: vec!["Python".to_string(), "PyTorch".to_string()],
            experience: "Cut costs by 40%".to_string(),
            tone: Tone::CreativeForwardThinking,
            job_description: String::new(),
        };
        let blocks = translate(&compose(&request, &ContactDetails::default()));

        assert_eq!(blocks[0].role, BlockRole::Header);
        let body_count = blocks.iter().filter(|b| b.role == BlockRole::Body).count();
        assert!((3..=4).contains(&body_count), "got {body_count} body blocks");
        assert_eq!(blocks.len(), body_count + 1);
        assert_eq!(
            blocks[0].text,
            "<b>[Your Name]</b><br/>[Your Phone Number] | [Your Email Address]<br/>[Your LinkedIn/Portfolio URL]"
        );
        for block in &blocks {
            assert!(!block.text.contains("**"), "leftover delimiter in {:?}", block.text);
            assert_eq!(
                block.text.matches(BOLD_OPEN).count(),
                block.text.matches(BOLD_CLOSE).count()
            );
        }
        assert!(blocks[1].text.contains("<b>Senior Data Scientist</b>"));
        assert!(blocks[1].text.contains("<b>Gemini Labs</b>"));
    }
}
