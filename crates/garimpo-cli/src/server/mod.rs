//! HTTP server exposing the pipeline.

mod app;
mod error;
mod handlers;

pub use app::{create_router, run_server};
pub use error::ApiError;

use std::sync::Arc;

use garimpo::Garimpo;

/// Shared state for request handlers.
#[derive(Clone)]
pub struct AppState {
    pub garimpo: Arc<Garimpo>,
}

impl AppState {
    pub fn new(garimpo: Garimpo) -> Self {
        Self {
            garimpo: Arc::new(garimpo),
        }
    }
}
