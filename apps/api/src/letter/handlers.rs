use axum::{extract::State, Json};
use serde::Serialize;

use crate::letter::request::{FormDefaults, FORM_DEFAULTS};
use crate::letter::Tone;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct FormResponse {
    /// Tone labels in display order.
    pub tones: Vec<&'static str>,
    pub defaults: FormDefaults,
    pub generator: &'static str,
}

/// GET /api/v1/form
pub async fn handle_form(State(state): State<AppState>) -> Json<FormResponse> {
    Json(FormResponse {
        tones: Tone::ALL.iter().map(|tone| tone.label()).collect(),
        defaults: FORM_DEFAULTS,
        generator: state.generator.name(),
    })
}
