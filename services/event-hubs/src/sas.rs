//! Shared access signature generation.
//!
//! A token covers exactly one `(resource_uri, expiry)` pair:
//!
//! ```text
//! string_to_sign = resource_uri + "\n" + expiry
//! sig            = percent_encode(base64(hmac_sha256(key_value, string_to_sign)))
//! ```
//!
//! and is rendered as
//!
//! ```text
//! SharedAccessSignature sig=<sig>&se=<expiry>&skn=<key_name>&sr=<resource_uri>
//! ```
//!
//! - [Authorize access with a shared access signature](https://learn.microsoft.com/en-us/azure/event-hubs/authenticate-shared-access-signature)

use std::fmt::{Debug, Display, Formatter};
use std::time::Duration;

use http::HeaderValue;
use percent_encoding::utf8_percent_encode;
use sasrelay_core::hash::base64_hmac_sha256;
use sasrelay_core::time::{unix_seconds, DateTime};
use sasrelay_core::utils::Redact;
use sasrelay_core::{Error, Result};

use crate::constants::{SAS_ENCODE_SET, SAS_SCHEME};
use crate::{Credential, ResourceIdentity};

/// A signed, time-bounded authorization for one resource URI.
#[derive(Clone, PartialEq, Eq)]
pub struct SasToken {
    signature: String,
    expiry: i64,
    key_name: String,
    resource_uri: String,
}

impl SasToken {
    /// Percent-encoded base64 HMAC.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Expiry in seconds since the unix epoch.
    pub fn expiry(&self) -> i64 {
        self.expiry
    }

    /// Shared access policy name.
    pub fn key_name(&self) -> &str {
        &self.key_name
    }

    /// Resource URI the signature covers.
    pub fn resource_uri(&self) -> &str {
        &self.resource_uri
    }

    /// Render the token as a sensitive `Authorization` header value.
    pub fn to_header_value(&self) -> Result<HeaderValue> {
        let mut value = HeaderValue::from_str(&self.to_string()).map_err(|e| {
            Error::request_invalid("token can't be used as header value").with_source(e)
        })?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl Display for SasToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{SAS_SCHEME} sig={}&se={}&skn={}&sr={}",
            self.signature, self.expiry, self.key_name, self.resource_uri
        )
    }
}

impl Debug for SasToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SasToken")
            .field("signature", &Redact::from(&self.signature))
            .field("expiry", &self.expiry)
            .field("key_name", &self.key_name)
            .field("resource_uri", &self.resource_uri)
            .finish()
    }
}

/// Construct string to sign.
///
/// Exactly two lines, no trailing newline.
pub fn string_to_sign(resource_uri: &str, expiry: i64) -> String {
    format!("{resource_uri}\n{expiry}")
}

/// Compute the encoded signature for `(resource_uri, expiry)`.
pub fn sign(key: &[u8], resource_uri: &str, expiry: i64) -> String {
    let digest = base64_hmac_sha256(key, string_to_sign(resource_uri, expiry).as_bytes());
    utf8_percent_encode(&digest, &SAS_ENCODE_SET).to_string()
}

/// Generate a token for `resource` that expires `ttl` after `now`.
///
/// Sub-second precision of `now` is dropped before adding `ttl`. The result
/// only depends on the inputs: the same arguments always produce the same
/// token.
pub fn generate(
    resource: &ResourceIdentity,
    cred: &Credential,
    now: DateTime,
    ttl: Duration,
) -> Result<SasToken> {
    if cred.key_value.is_empty() {
        return Err(Error::credential_invalid("shared access key is empty"));
    }
    if resource.namespace().is_empty() {
        return Err(Error::resource_invalid("namespace is empty"));
    }
    if ttl.as_secs() == 0 {
        return Err(Error::config_invalid(
            "token ttl must be at least one second",
        ));
    }

    let resource_uri = resource.resource_uri();
    let expiry = i64::try_from(ttl.as_secs())
        .ok()
        .and_then(|ttl| unix_seconds(now).checked_add(ttl))
        .ok_or_else(|| Error::config_invalid(format!("token ttl {ttl:?} is out of range")))?;

    Ok(SasToken {
        signature: sign(cred.key_value.as_bytes(), &resource_uri, expiry),
        expiry,
        key_name: cred.key_name.clone(),
        resource_uri,
    })
}
