//! Embedded static assets for the landing page

use axum::{
    extract::Path,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use rust_embed::Embed;

#[derive(Embed)]
#[folder = "ui"]
struct Assets;

/// Serve an embedded static file
pub async fn serve_static(Path(path): Path<String>) -> Response {
    match Assets::get(&path) {
        Some(content) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            (
                [(header::CONTENT_TYPE, mime.as_ref().to_string())],
                content.data.into_owned(),
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

/// Get an embedded text file
pub fn get_asset_text(path: &str) -> Option<String> {
    let content = Assets::get(path)?;
    String::from_utf8(content.data.into_owned()).ok()
}

pub fn get_index_html() -> Option<String> {
    get_asset_text("index.html")
}
