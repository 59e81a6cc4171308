pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::letter::handlers as letter;
use crate::markup::handlers as markup;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/form", get(letter::handle_form))
        // Sessions
        .route("/api/v1/sessions", post(session::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(session::handle_get_session).delete(session::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/generate",
            post(session::handle_generate),
        )
        .route("/api/v1/sessions/:id/draft", put(session::handle_edit_draft))
        .route("/api/v1/sessions/:id/document", get(session::handle_download))
        // Stateless preview
        .route("/api/v1/markup/translate", post(markup::handle_translate))
        .with_state(state)
}
