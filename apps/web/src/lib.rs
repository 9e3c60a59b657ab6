//! Web front end for skimtube: a form that takes a YouTube URL and a window
//! length, and a result page listing one linked sentence per window.

use axum::{Router, routing::get};

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;
mod templates;

pub use config::AppConfig;
pub use error::{FlashKind, SubmitError};
pub use state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route(
            error::FORM_PATH,
            get(handlers::summarizer_form).post(handlers::summarizer_result),
        )
        .with_state(state)
}
