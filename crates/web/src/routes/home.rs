//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::filters;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub message: &'static str,
}

/// Display the home page: greeting, search box and enrollment form.
#[instrument]
pub async fn index() -> impl IntoResponse {
    IndexTemplate {
        message: "hola mundo",
    }
}
