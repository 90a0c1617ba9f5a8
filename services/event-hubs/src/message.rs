use bytes::Bytes;
use rand::Rng;
use serde::{Deserialize, Serialize};

use sasrelay_core::hash::hex_md5;
use sasrelay_core::time::{format_rfc3339, DateTime};
use sasrelay_core::{Error, Result};

/// JSON envelope for a single event.
///
/// ```json
/// {"id": "<md5(timestamp + msg)>", "timestamp": "2024-01-01T00:00:00Z", "msg": "..."}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Hex md5 of `timestamp` followed by `msg`.
    pub id: String,
    /// RFC3339 creation time.
    pub timestamp: String,
    /// Event payload.
    pub msg: String,
}

impl Message {
    /// Wrap `msg` in an envelope stamped with `now`.
    pub fn new(msg: impl Into<String>, now: DateTime) -> Self {
        let msg = msg.into();
        let timestamp = format_rfc3339(now);
        let id = hex_md5(format!("{timestamp}{msg}").as_bytes());

        Self { id, timestamp, msg }
    }

    /// Envelope with a random payload of 16 lowercase letters.
    pub fn random(now: DateTime) -> Self {
        let mut rng = rand::thread_rng();
        let msg: String = (0..16)
            .map(|_| char::from(rng.gen_range(b'a'..=b'z')))
            .collect();

        Self::new(msg, now)
    }

    /// Serialize to a request body.
    pub fn to_json(&self) -> Result<Bytes> {
        serde_json::to_vec(self)
            .map(Bytes::from)
            .map_err(|e| Error::unexpected("failed to serialize message").with_source(e))
    }
}
