//! Web server module for the guestbook front.
//!
//! Routes inbound HTTP requests: the fixed root and message-form pages,
//! static assets under the content root, and POST submissions, which are
//! relayed as one UDP datagram each to the companion listener before the
//! browser is redirected back to the root page.
//!
use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::get,
};
use guestproto::config::Config;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::{TcpListener, UdpSocket};

use crate::static_files;

/// Application state shared by all request handlers
pub(crate) struct AppState {
    /// Base directory for fixed pages and static assets
    pub(crate) content_root: PathBuf,
    /// Socket used for relay sends, bound once at startup
    pub(crate) relay: UdpSocket,
    /// Destination of relayed submissions
    pub(crate) relay_addr: SocketAddr,
}

/// Start the HTTP front
pub async fn run(cfg: Config) {
    let relay = UdpSocket::bind("0.0.0.0:0").await.unwrap();
    let state = Arc::new(AppState {
        content_root: cfg.content_root.clone(),
        relay,
        relay_addr: SocketAddr::from(([127, 0, 0, 1], cfg.relay_port)),
    });

    let app = router(state);

    let addr = format!("0.0.0.0:{}", cfg.http_port);
    let listener = TcpListener::bind(&addr).await.unwrap();
    println!("🌐 Guestbook UI at http://localhost:{}/", cfg.http_port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("🛑 HTTP listener released");
}

/// Build the application router.
///
/// POST is not path-discriminated: the explicit routes and the fallback
/// all relay the body the same way.
pub(crate) fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_page).post(relay_submit))
        .route("/message", get(message_page).post(relay_submit))
        .fallback(fallback)
        .with_state(state)
}

/// Resolves on Ctrl-C so the TCP listener is released on manual interrupt
async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.unwrap();
}

/// Serve the fixed root page
async fn index_page(State(state): State<Arc<AppState>>) -> Response {
    static_files::page(&state.content_root, "index.html").await
}

/// Serve the fixed message-form page
async fn message_page(State(state): State<Arc<AppState>>) -> Response {
    static_files::page(&state.content_root, "message.html").await
}

/// Relay a form submission and bounce the browser back to the root page
async fn relay_submit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    relay_and_redirect(&state, &headers, &body).await
}

/// Everything outside the fixed routes: static lookup on GET, relay on POST
async fn fallback(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if method == Method::GET {
        static_files::serve(&state.content_root, uri.path()).await
    } else if method == Method::POST {
        relay_and_redirect(&state, &headers, &body).await
    } else {
        static_files::error_page(&state.content_root).await
    }
}

/// Forward the raw body bytes to the relay listener, fire-and-forget.
///
/// The browser always gets the 302; a send failure is logged and never
/// surfaced to the client. A request without `Content-Length` is rejected
/// locally instead of tearing down the connection.
async fn relay_and_redirect(state: &AppState, headers: &HeaderMap, body: &[u8]) -> Response {
    if !headers.contains_key(header::CONTENT_LENGTH) {
        return StatusCode::BAD_REQUEST.into_response();
    }

    if let Err(e) = state.relay.send_to(body, state.relay_addr).await {
        eprintln!("⚠️ Relay send failed: {}", e);
    }

    (StatusCode::FOUND, [(header::LOCATION, "/")]).into_response()
}
