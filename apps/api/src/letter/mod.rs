pub mod composer;
pub mod generator;
pub mod handlers;
pub mod naming;
pub mod prompts;
pub mod request;
pub mod tone;

pub use generator::{GenerationError, LetterGenerator, LlmGenerator, MockGenerator};
pub use request::{ContactDetails, LetterForm, LetterRequest};
pub use tone::Tone;
