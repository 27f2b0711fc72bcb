#![forbid(unsafe_code)]

use axum::http::header;
use axum::response::IntoResponse;

pub(crate) const INDEX_JS: &str = include_str!("assets/index.js");
pub(crate) const STYLE_CSS: &str = include_str!("assets/style.css");

pub(crate) async fn index_js() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        INDEX_JS,
    )
}

pub(crate) async fn style_css() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLE_CSS)
}
