//! Guestbook protocol utilities crate.
//!
//! This crate contains the pieces shared by the guestbook web front and
//! the relay listener: the runtime configuration structure (`config`) and
//! the form-decoding types for relayed submissions (`form`). These modules
//! are intentionally minimal and focus on internal protocol needs rather
//! than being general-purpose libraries.
//!
/// Runtime configuration module
pub mod config;
/// Form decoding and submission types module
pub mod form;

/// Largest relay datagram the listener reads; longer payloads are
/// silently truncated by the transport.
pub const MAX_DATAGRAM_SIZE: usize = 1024;

#[cfg(test)]
mod tests {
    use crate::form::{REQUIRED_FIELDS, Submission, decode_plus};

    /// Test percent and plus decoding of form text
    #[test]
    fn decode_plus_works() {
        assert_eq!(decode_plus("hi+there"), "hi there");
        assert_eq!(decode_plus("caf%C3%A9"), "café");
        assert_eq!(decode_plus("a%3Db"), "a=b");
        // invalid escapes pass through untouched
        assert_eq!(decode_plus("100%"), "100%");
        assert_eq!(decode_plus("%zz"), "%zz");
    }

    /// Test parsing a plain two-field body
    #[test]
    fn parse_works() {
        let sub = Submission::parse("username=bob&message=hi+there");
        assert_eq!(sub.values("username"), Some(&["bob".to_string()][..]));
        assert_eq!(sub.values("message"), Some(&["hi there".to_string()][..]));
        assert!(sub.is_complete());
    }

    /// Test that duplicate keys append rather than overwrite
    #[test]
    fn duplicate_keys_append() {
        let sub = Submission::parse("tag=a&tag=b&tag=c");
        assert_eq!(
            sub.values("tag"),
            Some(&["a".to_string(), "b".to_string(), "c".to_string()][..])
        );
    }

    /// Test that blank values keep their key
    #[test]
    fn blank_values_are_kept() {
        let sub = Submission::parse("username=&message=hi");
        assert_eq!(sub.values("username"), Some(&[String::new()][..]));
        assert!(sub.is_complete());
    }

    /// Test qualification against the required field list
    #[test]
    fn missing_required_field_is_incomplete() {
        for field in REQUIRED_FIELDS {
            let sub = Submission::parse(&format!("{field}=x"));
            assert!(!sub.is_complete());
        }
        assert!(!Submission::parse("").is_complete());
        assert!(!Submission::parse("unrelated=1&other=2").is_complete());
    }

    /// Test first-seen key order is preserved
    #[test]
    fn key_order_is_preserved() {
        let sub = Submission::parse("b=1&a=2&b=3&c=4");
        let keys: Vec<&str> = sub.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    /// Test map serialization: scalars for single values, arrays for lists
    #[test]
    fn serializes_as_map() {
        let sub = Submission::parse("username=bob&message=hi+there&tag=a&tag=b");
        let value = serde_json::to_value(&sub).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "username": "bob",
                "message": "hi there",
                "tag": ["a", "b"],
            })
        );
    }
}
