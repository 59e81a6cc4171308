// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Instruction that keeps model output inside the text conventions the markup
/// translator understands: blank-line blocks and paired `**` emphasis.
pub const MARKUP_INSTRUCTION: &str = "\
    FORMAT: Respond with the letter text only, no preamble and no code fences. \
    Separate paragraphs with exactly one blank line. \
    Use **double asterisks** around emphasized phrases and ALWAYS close every pair \
    within the same paragraph. Do not use any other markdown.";
