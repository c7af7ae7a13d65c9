//! Relay listener runtime.
//!
//! Binds the well-known relay port and processes datagrams strictly one
//! at a time: decode, parse, qualify, timestamp, persist. A submission
//! missing a required field is discarded silently; a persistence failure
//! propagates and terminates the listener.
//!
use crate::store::MessageStore;
use chrono::Utc;
use guestproto::MAX_DATAGRAM_SIZE;
use guestproto::config::Config;
use guestproto::form::Submission;
use mongodb::bson::{self, Document};
use std::error::Error;
use tokio::net::UdpSocket;

/// Connect to the store, bind the relay socket, and run the receive loop
/// until the process is stopped.
///
/// # Arguments
/// * `cfg` - Runtime configuration (relay port and store URI are used)
pub async fn run(cfg: Config) -> Result<(), Box<dyn Error>> {
    // Startup preconditions, in order: reachable store, then free port.
    let store = MessageStore::connect(&cfg.store_uri).await?;
    let socket = UdpSocket::bind(("0.0.0.0", cfg.relay_port)).await?;
    println!("📡 Socket is bound and listening on port {}", cfg.relay_port);

    tokio::select! {
        res = receive_loop(&socket, &store) => res,
        _ = tokio::signal::ctrl_c() => {
            println!("🛑 Interrupted, releasing socket");
            Ok(())
        }
    }
}

/// Receive and persist datagrams forever, in arrival order.
///
/// One datagram is fully processed, blocking store write included, before
/// the next is read off the socket.
async fn receive_loop(
    socket: &UdpSocket,
    store: &MessageStore,
) -> Result<(), Box<dyn Error>> {
    // Payloads longer than the buffer are silently truncated
    let mut buf = [0u8; MAX_DATAGRAM_SIZE];

    loop {
        let (len, addr) = socket.recv_from(&mut buf).await?;
        let text = String::from_utf8_lossy(&buf[..len]).into_owned();
        println!("📨 Message \"{}\" from {}", text, addr);

        match build_record(&text) {
            Some(record) => store.insert(record).await?,
            None => println!("🗑 Discarded: required field missing"),
        }
    }
}

/// Decode one payload into the document to persist.
///
/// Returns `None` when a required field is absent — that submission is
/// dropped without error. The `date` field is the receipt instant.
fn build_record(payload: &str) -> Option<Document> {
    let submission = Submission::parse(payload);
    if !submission.is_complete() {
        return None;
    }

    let mut record = bson::to_document(&submission).ok()?;
    record.insert("date", Utc::now().to_rfc3339());
    Some(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use mongodb::bson::Bson;

    /// Round trip: form body -> persisted document shape
    #[test]
    fn build_record_round_trip() {
        let record = build_record("username=bob&message=hi+there").unwrap();
        assert_eq!(record.get_str("username").unwrap(), "bob");
        assert_eq!(record.get_str("message").unwrap(), "hi there");

        let date = record.get_str("date").unwrap();
        let parsed = DateTime::parse_from_rfc3339(date).unwrap();
        let delta = Utc::now().signed_duration_since(parsed);
        assert!(delta.num_seconds().abs() < 5, "date too far from now: {date}");
    }

    /// Exactly one date field is injected
    #[test]
    fn build_record_has_one_date() {
        let record = build_record("username=a&message=b&date=forged").unwrap();
        assert!(matches!(record.get("date"), Some(Bson::String(_))));
        assert_eq!(record.iter().filter(|(k, _)| *k == "date").count(), 1);
        // the forged submitted value is replaced by the receipt timestamp
        assert!(DateTime::parse_from_rfc3339(record.get_str("date").unwrap()).is_ok());
    }

    /// Submissions missing a required field are dropped
    #[test]
    fn incomplete_submissions_are_dropped() {
        assert!(build_record("username=alice").is_none());
        assert!(build_record("message=hello").is_none());
        assert!(build_record("").is_none());
        assert!(build_record("other=1&fields=2").is_none());
    }

    /// Blank values still qualify, key presence is what counts
    #[test]
    fn blank_values_still_persist() {
        let record = build_record("username=&message=").unwrap();
        assert_eq!(record.get_str("username").unwrap(), "");
        assert_eq!(record.get_str("message").unwrap(), "");
    }

    /// Duplicate keys persist as arrays
    #[test]
    fn duplicate_keys_become_arrays() {
        let record = build_record("username=a&message=b&tag=x&tag=y").unwrap();
        match record.get("tag") {
            Some(Bson::Array(values)) => {
                assert_eq!(values.len(), 2);
                assert_eq!(values[0], Bson::String("x".into()));
                assert_eq!(values[1], Bson::String("y".into()));
            }
            other => panic!("expected array, got {:?}", other),
        }
    }

    /// Two submissions build two independent documents
    #[test]
    fn each_submission_builds_its_own_document() {
        let first = build_record("username=a&message=one").unwrap();
        let second = build_record("username=a&message=two").unwrap();
        assert_ne!(
            first.get_str("message").unwrap(),
            second.get_str("message").unwrap()
        );
        assert!(first.get_str("date").is_ok());
        assert!(second.get_str("date").is_ok());
    }
}
