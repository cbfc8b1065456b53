use axum::{
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use intent_common::Error as CommonError;

use crate::handlers::error_response;

static INDEX_HTML: &str = include_str!("../templates/index.html");
static CHAT_HTML: &str = include_str!("../templates/chat.html");
static NOT_FOUND_HTML: &str = include_str!("../templates/404.html");

/// Home page
pub async fn homepage() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Chat window
pub async fn chat_window() -> Html<&'static str> {
    Html(CHAT_HTML)
}

/// HTML 404 page for unknown pages and missing static assets
pub async fn not_found_page() -> (StatusCode, Html<&'static str>) {
    (StatusCode::NOT_FOUND, Html(NOT_FOUND_HTML))
}

/// Router fallback: JSON errors under the API paths, the HTML page elsewhere
pub async fn fallback(uri: Uri) -> Response {
    if uri.path().starts_with("/create-entry") {
        let err = CommonError::NotFound(format!("No route for {}", uri.path()));
        return error_response(&err, None).into_response();
    }
    not_found_page().await.into_response()
}
