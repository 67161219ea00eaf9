//! Viewer page compiled into the server binary.
//!
//! Used when the configured static directory is missing, so the stub still
//! serves a working page from a bare binary.

use axum::{
    body::Body,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "public/"]
pub struct ViewerAssets;

/// Look up a compiled-in file. `/` maps to the viewer page; any other path
/// must name an embedded file exactly, so unknown routes get 404 just like the
/// on-disk static directory.
pub async fn serve_viewer_frontend(uri: Uri) -> Response {
    let path = match uri.path().trim_start_matches('/') {
        "" => "index.html",
        path => path,
    };

    match ViewerAssets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime.as_ref())],
                Body::from(content.data.into_owned()),
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_embedded() {
        assert!(ViewerAssets::get("index.html").is_some(), "index.html missing");
        assert!(ViewerAssets::get("style.css").is_some(), "style.css missing");
    }

    #[test]
    fn test_index_refreshes_frame_image() {
        let index = ViewerAssets::get("index.html").unwrap();
        let html = std::str::from_utf8(&index.data).unwrap();
        assert!(html.contains("getElementById('frameDisplay').src"));
    }

    #[tokio::test]
    async fn test_root_serves_index() {
        let response = serve_viewer_frontend(Uri::from_static("/")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/html"
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_404() {
        let response = serve_viewer_frontend(Uri::from_static("/missing.js")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_extensionless_path_is_404() {
        for path in ["/no/such/page", "/viewer", "/api/"] {
            let response = serve_viewer_frontend(Uri::from_static(path)).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{path}");
        }
    }

    #[tokio::test]
    async fn test_css_mime_type() {
        let response = serve_viewer_frontend(Uri::from_static("/style.css")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/css"
        );
    }
}
