// Markup Translator: letter text → renderer-ready styled blocks.
// Pure and total; the renderer never sees raw `**` delimiters.

pub mod handlers;
pub mod translator;

pub use translator::{translate, BlockRole, StyledBlock};
