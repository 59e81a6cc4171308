pub mod encoding;
pub mod font_metrics;
pub mod layout;
pub mod pdf;
pub mod runs;

use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};

use crate::markup::{translate, StyledBlock};

pub use pdf::PdfRenderer;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("The draft has no content to render")]
    Empty,

    #[error("Paragraph {paragraph} contains '{character}' (U+{code:04X}), which the PDF fonts cannot display")]
    UnsupportedCharacter {
        character: char,
        code: u32,
        paragraph: usize,
    },

    #[error("PDF generation failed: {0}")]
    Pdf(String),
}

/// Turns styled blocks into a finished document.
///
/// Implementations are synchronous and CPU-bound; callers off the request path
/// go through [`render_letter`], which moves the work onto the blocking pool.
pub trait DocumentRenderer: Send + Sync {
    fn render(&self, blocks: &[StyledBlock]) -> Result<Vec<u8>, RenderError>;
}

/// A rendered letter ready for download.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Bytes,
    pub file_name: String,
    pub rendered_at: DateTime<Utc>,
}

/// Translates a draft and renders it on the blocking thread pool.
pub async fn render_letter(
    renderer: Arc<dyn DocumentRenderer>,
    draft: String,
    file_name: String,
) -> Result<RenderedDocument, RenderError> {
    let result = tokio::task::spawn_blocking(move || {
        let blocks = translate(&draft);
        renderer.render(&blocks)
    })
    .await
    .map_err(|e| RenderError::Pdf(format!("render task failed: {e}")))?;

    match result {
        Ok(bytes) => {
            info!("Rendered {} ({} bytes)", file_name, bytes.len());
            Ok(RenderedDocument {
                bytes: Bytes::from(bytes),
                file_name,
                rendered_at: Utc::now(),
            })
        }
        Err(e) => {
            warn!("Render of {} failed: {}", file_name, e);
            Err(e)
        }
    }
}
