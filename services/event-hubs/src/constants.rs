use std::time::Duration;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};

/// Domain appended to the lowercased namespace to form the signed resource URI.
pub const SERVICE_DOMAIN_SUFFIX: &str = "servicebus.windows.net";

/// Scheme prefix of the `Authorization` header value.
pub const SAS_SCHEME: &str = "SharedAccessSignature";

/// REST API version the send request is written against.
pub const API_VERSION: &str = "2014-01";

/// Media type the service expects for a single event entry.
pub const CONTENT_TYPE_ENTRY: &str = "application/atom+xml;type=entry;charset=utf-8";

/// Default validity window of a generated SAS token.
pub const DEFAULT_SAS_TTL: Duration = Duration::from_secs(300);

/// Default value of the `timeout` query parameter, enforced by the service.
pub const DEFAULT_SERVICE_TIMEOUT: Duration = Duration::from_secs(60);

/// Event hub used when none is configured.
pub const DEFAULT_EVENT_HUB: &str = "ingest";

/// Everything outside the unreserved set `A-Z a-z 0-9 - . _ ~` is escaped.
pub static SAS_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

// Env values used to configure the relay client.
pub const EH_PROXY_DNS: &str = "EH_PROXY_DNS";
pub const EH_PROXY_CERT: &str = "EH_PROXY_CERT";
pub const EH_NAME: &str = "EH_NAME";
pub const SB_NAMESPACE: &str = "SB_NAMESPACE";
pub const SB_KEYNAME: &str = "SB_KEYNAME";
pub const SB_KEYVAL: &str = "SB_KEYVAL";
pub const EH_SAS_TTL_SECONDS: &str = "EH_SAS_TTL_SECONDS";
pub const EH_SERVICE_TIMEOUT_SECONDS: &str = "EH_SERVICE_TIMEOUT_SECONDS";
pub const EH_REQUEST_TIMEOUT_SECONDS: &str = "EH_REQUEST_TIMEOUT_SECONDS";
