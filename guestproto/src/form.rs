//! Decoding of relayed form submissions.
//!
//! A relayed payload is the raw body of an HTML form POST:
//! percent-encoded UTF-8 text with `+` standing for space. The payload is
//! decoded as a whole first and the result is then split into key/value
//! pairs, mirroring how the listener has always treated the wire format.
//! Duplicate keys append to the existing value list; blank values keep
//! their key.
//!
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Keys a submission must carry to be persisted.
pub const REQUIRED_FIELDS: [&str; 2] = ["username", "message"];

/// An ordered key -> list-of-values mapping decoded from a form body.
pub struct Submission {
    /// Pairs in first-seen key order
    fields: Vec<(String, Vec<String>)>,
}

impl Submission {
    /// Decode a raw form body into a submission.
    ///
    /// # Arguments
    /// * `raw` - Form-encoded payload text (e.g., "username=bob&message=hi+there")
    pub fn parse(raw: &str) -> Self {
        let decoded = decode_plus(raw);
        let mut fields: Vec<(String, Vec<String>)> = Vec::new();

        for pair in decoded.split('&') {
            if pair.is_empty() {
                continue;
            }
            // A pair without '=' counts as a key with a blank value
            let (key, value) = match pair.split_once('=') {
                Some((k, v)) => (decode_plus(k), decode_plus(v)),
                None => (decode_plus(pair), String::new()),
            };
            match fields.iter_mut().find(|(k, _)| *k == key) {
                Some((_, values)) => values.push(value),
                None => fields.push((key, vec![value])),
            }
        }

        Self { fields }
    }

    /// True if the submission carries the given key
    pub fn contains(&self, key: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == key)
    }

    /// All values submitted under a key, in submission order
    pub fn values(&self, key: &str) -> Option<&[String]> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
    }

    /// True if every required field is present (values may be blank)
    pub fn is_complete(&self) -> bool {
        REQUIRED_FIELDS.iter().all(|field| self.contains(field))
    }

    /// Iterate pairs in first-seen key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|(k, values)| (k.as_str(), values.as_slice()))
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if no pairs were decoded
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Serialized as a map: single-valued keys become scalars, keys submitted
/// more than once become arrays. This is the shape stored per record.
impl Serialize for Submission {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, values) in &self.fields {
            if let [single] = values.as_slice() {
                map.serialize_entry(key, single)?;
            } else {
                map.serialize_entry(key, values)?;
            }
        }
        map.end()
    }
}

/// Decode percent escapes and `+`-as-space in-place over the raw bytes.
///
/// Escapes are resolved at the byte level before the result is
/// reinterpreted as UTF-8, so multi-byte sequences like `%C3%A9` come out
/// as one character. Malformed escapes pass through untouched.
pub fn decode_plus(s: &str) -> String {
    let raw = s.as_bytes();
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;

    while i < raw.len() {
        match raw[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < raw.len() => match (hex_val(raw[i + 1]), hex_val(raw[i + 2])) {
                (Some(hi), Some(lo)) => {
                    out.push(hi << 4 | lo);
                    i += 3;
                }
                _ => {
                    out.push(b'%');
                    i += 1;
                }
            },
            byte => {
                out.push(byte);
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

/// Value of one hex digit, if it is one
fn hex_val(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
