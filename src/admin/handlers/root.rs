use axum::response::{Html, IntoResponse};

use crate::admin::render;

// axum handler for the landing page
pub async fn root() -> impl IntoResponse {
    Html(render::page(
        "Notify admin",
        "<h1>Notify admin</h1><p>Manage services, templates and team members.</p>",
    ))
}
