use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Serve the browser UI: file picker, drop zone and per-file previews.
pub async fn index_page() -> Html<&'static str> {
    Html(INDEX_HTML)
}
