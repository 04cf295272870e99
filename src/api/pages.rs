use poem::{handler, web::Html};

const INDEX_HTML: &str = include_str!("../../templates/index.html");
const RESIZED_HTML: &str = include_str!("../../templates/resized.html");

#[handler]
pub fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub fn resized(original_kb: u64, resized_kb: u64) -> Html<String> {
    Html(
        RESIZED_HTML
            .replace("{{original_kb}}", &original_kb.to_string())
            .replace("{{resized_kb}}", &resized_kb.to_string()),
    )
}
