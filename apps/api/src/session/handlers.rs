use anyhow::anyhow;
use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::letter::naming::export_file_name;
use crate::letter::{GenerationError, LetterForm};
use crate::render::render_letter;
use crate::session::SessionView;
use crate::state::AppState;

/// POST /api/v1/sessions
pub async fn handle_create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionView>) {
    let session = state.sessions.create().await;
    info!("Session {} created", session.id);
    (StatusCode::CREATED, Json(SessionView::from(&*session)))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = state.sessions.get(id).await?;
    Ok(Json(SessionView::from(&*session)))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id).await?;
    info!("Session {id} deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/generate
///
/// Validates the form, drafts a letter and renders it. Generation runs in its
/// own task so that a newer request for the same session can abort it; the
/// caller whose request was superseded gets `409`.
pub async fn handle_generate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(form): Json<LetterForm>,
) -> Result<Json<SessionView>, AppError> {
    let request = form.validate()?;
    state.sessions.get(id).await?;

    let generator = state.generator.clone();
    let renderer = state.renderer.clone();
    let timeout = state.config.generation_timeout;
    let task_request = request.clone();

    let task = tokio::spawn(async move {
        let draft = tokio::time::timeout(timeout, generator.generate(&task_request))
            .await
            .map_err(|_| GenerationError::Timeout(timeout))??;
        let render = render_letter(renderer, draft.clone(), export_file_name(&task_request)).await;
        Ok::<_, GenerationError>((draft, render))
    });

    let ticket = match state.sessions.begin_generation(id, task.abort_handle()).await {
        Ok(ticket) => ticket,
        Err(e) => {
            task.abort();
            return Err(e.into());
        }
    };
    info!(
        "Session {id}: generation #{ticket} started ({} backend) for {} at {}",
        state.generator.name(),
        request.job_title,
        request.company
    );

    let outcome = match task.await {
        Ok(outcome) => outcome,
        Err(e) if e.is_cancelled() => {
            info!("Session {id}: generation #{ticket} was superseded");
            return Err(AppError::Superseded);
        }
        Err(e) => {
            state.sessions.release_generation(id, ticket).await?;
            return Err(AppError::Internal(anyhow!("generation task failed: {e}")));
        }
    };

    let (draft, render) = match outcome {
        Ok(result) => result,
        Err(e) => {
            warn!("Session {id}: generation #{ticket} failed: {e}");
            if !state.sessions.release_generation(id, ticket).await? {
                return Err(AppError::Superseded);
            }
            return Err(e.into());
        }
    };

    let updated = state
        .sessions
        .finish_generation(id, ticket, move |current| current.generated(request, draft, render))
        .await?
        .ok_or(AppError::Superseded)?;

    Ok(Json(SessionView::from(&*updated)))
}

#[derive(Debug, Deserialize)]
pub struct DraftEdit {
    pub text: String,
}

/// PUT /api/v1/sessions/:id/draft
///
/// Replaces the draft with the user's edit and re-renders it. An unchanged
/// draft is not re-rendered.
pub async fn handle_edit_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(edit): Json<DraftEdit>,
) -> Result<Json<SessionView>, AppError> {
    let current = state.sessions.get(id).await?;
    if current.draft.as_deref() == Some(edit.text.as_str()) {
        debug!("Session {id}: draft unchanged, skipping render");
        return Ok(Json(SessionView::from(&*current)));
    }

    let render = render_letter(state.renderer.clone(), edit.text.clone(), current.file_name()).await;
    let updated = state
        .sessions
        .update(id, move |session| session.with_draft(edit.text, render))
        .await?;

    Ok(Json(SessionView::from(&*updated)))
}

/// GET /api/v1/sessions/:id/document
pub async fn handle_download(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let session = state.sessions.get(id).await?;
    let Some(document) = session.document.as_ref() else {
        let message = match &session.render_error {
            Some(reason) => format!("No document for session {id}: {reason}"),
            None => format!("No document has been rendered for session {id}"),
        };
        return Err(AppError::NotFound(message));
    };

    let disposition = HeaderValue::from_str(&content_disposition(&document.file_name))
        .map_err(|e| AppError::Internal(anyhow!("invalid Content-Disposition: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document.bytes.clone(),
    )
        .into_response())
}

/// `attachment` disposition with an ASCII fallback name and, for non-ASCII
/// names, an RFC 5987 `filename*` parameter.
fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '_' })
        .collect();
    if fallback == file_name {
        return format!("attachment; filename=\"{file_name}\"");
    }

    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        urlencoding::encode(file_name)
    )
}
