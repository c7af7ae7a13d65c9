//! guestweb crate entrypoint.
//!
//! Starts the Tokio runtime and launches the web server defined in the
//! `server` module. Keep this file minimal — most application logic lives
//! in `server` and `static_files`.
//!
/// HTTP server implementation and request handling
mod server;
/// Static asset and fixed page serving
mod static_files;

use guestproto::config::Config;

/// Entry point for the async Tokio runtime
#[tokio::main]
async fn main() {
    server::run(Config::from_env()).await;
}
