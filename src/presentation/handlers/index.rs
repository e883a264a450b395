use axum::response::Html;

const INDEX_PAGE: &str = include_str!("../../../static/index.html");

pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_PAGE)
}
