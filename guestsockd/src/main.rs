//! Relay listener binary entrypoint.
//!
//! Starts the listener process which connects to the message store, binds
//! the relay datagram socket, and persists qualifying submissions. The
//! actual receive logic lives in the `listener` module; this file keeps
//! the runtime setup and exit behavior minimal.
//!
mod listener;
mod store;

use guestproto::config::Config;

#[tokio::main]
async fn main() {
    let cfg = Config::from_env();

    // A startup or persistence failure is process-fatal: no retry path.
    if let Err(e) = listener::run(cfg).await {
        eprintln!("⚠️ Listener terminated: {}", e);
        std::process::exit(1);
    }
}
