use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::letter::naming::{export_file_name, DEFAULT_FILE_NAME};
use crate::letter::LetterRequest;
use crate::render::{RenderError, RenderedDocument};

/// Everything one user session knows: the last request, the editable draft and
/// the document rendered from that draft.
///
/// Values are immutable once stored; every change produces a new value.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub id: Uuid,
    pub request: Option<LetterRequest>,
    pub draft: Option<String>,
    pub document: Option<RenderedDocument>,
    /// Set when the current draft could not be rendered.
    pub render_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionState {
    pub fn new(id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id,
            request: None,
            draft: None,
            document: None,
            render_error: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Download name derived from the last request.
    pub fn file_name(&self) -> String {
        self.request
            .as_ref()
            .map(export_file_name)
            .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string())
    }

    /// State after a successful generation. Replaces request, draft and document.
    pub fn generated(
        &self,
        request: LetterRequest,
        draft: String,
        render: Result<RenderedDocument, RenderError>,
    ) -> Self {
        let next = Self {
            request: Some(request),
            ..self.clone()
        };
        next.with_draft(draft, render)
    }

    /// State after the user edits the draft. The request is kept so the file
    /// name stays stable.
    ///
    /// The stored document is always named after this state's request, even
    /// if it was rendered while an older request was current.
    pub fn with_draft(&self, draft: String, render: Result<RenderedDocument, RenderError>) -> Self {
        let (document, render_error) = match render {
            Ok(document) => (
                Some(RenderedDocument {
                    file_name: self.file_name(),
                    ..document
                }),
                None,
            ),
            Err(e) => (None, Some(e.to_string())),
        };
        Self {
            id: self.id,
            request: self.request.clone(),
            draft: Some(draft),
            document,
            render_error,
            created_at: self.created_at,
            updated_at: Utc::now(),
        }
    }
}

/// Client-facing view of a session. PDF bytes are served separately.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub request: Option<LetterRequest>,
    pub draft: Option<String>,
    pub has_document: bool,
    pub file_name: String,
    pub document_url: Option<String>,
    pub rendered_at: Option<DateTime<Utc>>,
    pub render_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&SessionState> for SessionView {
    fn from(state: &SessionState) -> Self {
        let file_name = state
            .document
            .as_ref()
            .map(|doc| doc.file_name.clone())
            .unwrap_or_else(|| state.file_name());

        Self {
            id: state.id,
            request: state.request.clone(),
            draft: state.draft.clone(),
            has_document: state.document.is_some(),
            file_name,
            document_url: state
                .document
                .as_ref()
                .map(|_| format!("/api/v1/sessions/{}/document", state.id)),
            rendered_at: state.document.as_ref().map(|doc| doc.rendered_at),
            render_error: state.render_error.clone(),
            created_at: state.created_at,
            updated_at: state.updated_at,
        }
    }
}
