//! Static asset and fixed page serving.
//!
//! Everything here reads whole files from the content root. Request paths
//! are sanitized before touching the filesystem: the single leading `/`
//! is stripped and `..` components are rejected so a crafted path cannot
//! escape the root.
//!
use axum::{
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use std::path::{Component, Path, PathBuf};

/// Fixed error document served with every 404
const ERROR_PAGE: &str = "error.html";

/// Serve one of the fixed HTML documents (root page, message form).
///
/// A read failure on a fixed page is fatal to that request.
pub(crate) async fn page(root: &Path, name: &str) -> Response {
    match tokio::fs::read(root.join(name)).await {
        Ok(bytes) => (StatusCode::OK, Html(bytes)).into_response(),
        Err(e) => {
            eprintln!("⚠️ Failed to read {}: {}", name, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Serve the fixed error document with a 404 status.
///
/// The status still goes out if the document itself cannot be read.
pub(crate) async fn error_page(root: &Path) -> Response {
    let body = tokio::fs::read(root.join(ERROR_PAGE)).await.unwrap_or_default();
    (StatusCode::NOT_FOUND, Html(body)).into_response()
}

/// Serve an arbitrary static asset under the content root.
///
/// Existence is checked first; a missing file is answered with the error
/// document, while a read failure on a file that was just verified is
/// fatal to that request.
pub(crate) async fn serve(root: &Path, request_path: &str) -> Response {
    let relative = match sanitize_path(request_path) {
        Some(p) => p,
        None => return error_page(root).await,
    };

    let full_path = root.join(relative);
    match tokio::fs::metadata(&full_path).await {
        Ok(meta) if meta.is_file() => match tokio::fs::read(&full_path).await {
            Ok(bytes) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime_type(&full_path))],
                bytes,
            )
                .into_response(),
            Err(e) => {
                eprintln!("⚠️ Failed to read {}: {}", full_path.display(), e);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        },
        _ => error_page(root).await,
    }
}

/// Strip the leading `/` and reject anything that could climb out of the
/// content root.
pub(crate) fn sanitize_path(path: &str) -> Option<PathBuf> {
    let path = path.trim_start_matches('/');

    let mut result = PathBuf::new();
    for component in Path::new(path).components() {
        match component {
            Component::Normal(c) => result.push(c),
            Component::CurDir => {}
            // ParentDir, RootDir, Prefix would escape the root
            _ => return None,
        }
    }

    if result.as_os_str().is_empty() {
        None
    } else {
        Some(result)
    }
}

/// Guess a content type from the file extension, `text/plain` when no
/// mapping is found.
pub(crate) fn mime_type(path: &Path) -> &'static str {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match ext.to_lowercase().as_str() {
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" | "mjs" => "text/javascript",
        "json" => "application/json",
        "xml" => "application/xml",
        "csv" => "text/csv",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "mp3" => "audio/mpeg",
        "mp4" => "video/mp4",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        _ => "text/plain",
    }
}
