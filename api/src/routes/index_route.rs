use axum::response::Html;

/// GET /: minimal page that uploads a PDF and asks questions about it.
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}
