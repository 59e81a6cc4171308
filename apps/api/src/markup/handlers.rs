//! Axum route handlers for stateless markup previews.

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::markup::{translate, StyledBlock};

#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    pub blocks: Vec<StyledBlock>,
}

/// POST /api/v1/markup/translate
///
/// Shows how a draft will be split and styled before it is rendered.
pub async fn handle_translate(Json(request): Json<TranslateRequest>) -> Json<TranslateResponse> {
    Json(TranslateResponse {
        blocks: translate(&request.text),
    })
}
