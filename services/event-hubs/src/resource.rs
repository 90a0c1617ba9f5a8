use std::fmt::{Debug, Formatter};

use http::uri::Authority;
use sasrelay_core::{Context, Error, Result};

use crate::constants::SERVICE_DOMAIN_SUFFIX;

/// The logical target of a request: the event hub the token is signed for
/// and the virtual host the relay must forward to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceIdentity {
    namespace: String,
    resource_name: String,
}

impl ResourceIdentity {
    /// Create a new resource identity.
    pub fn new(namespace: impl Into<String>, resource_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            resource_name: resource_name.into(),
        }
    }

    /// Service namespace as configured.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Event hub name.
    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    /// Canonical resource URI: `{namespace-lowercased}.servicebus.windows.net`.
    ///
    /// This is both the `sr` field of the token and the `Host` header value.
    pub fn resource_uri(&self) -> String {
        format!(
            "{}.{}",
            self.namespace.to_lowercase(),
            SERVICE_DOMAIN_SUFFIX
        )
    }

    /// Request path for sending a single event.
    pub fn messages_path(&self) -> String {
        format!("/{}/messages", self.resource_name)
    }

    /// Check that both parts are present and usable in a host name and path.
    ///
    /// Event hub names are limited to ASCII letters, digits, `.`, `-` and `_`
    /// so they can be placed in the request path without escaping.
    pub fn validate(&self) -> Result<()> {
        if self.namespace.is_empty() {
            return Err(Error::config_invalid("namespace is required"));
        }
        if self.resource_name.is_empty() {
            return Err(Error::config_invalid("event hub name is required"));
        }
        if !self
            .resource_name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b'_'))
        {
            return Err(Error::config_invalid(format!(
                "event hub name {:?} may only contain letters, digits, '.', '-' and '_'",
                self.resource_name
            )));
        }
        self.resource_uri()
            .parse::<Authority>()
            .map_err(|e| Error::config_invalid("namespace is not a valid host label").with_source(e))?;

        Ok(())
    }
}

/// Certificate the relay's TLS endpoint is verified against.
#[derive(Clone, PartialEq, Eq)]
pub enum TrustAnchor {
    /// Path to a PEM file, read through the context's file reader.
    Path(String),
    /// PEM bytes.
    Pem(Vec<u8>),
}

impl Debug for TrustAnchor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TrustAnchor::Path(path) => f.debug_tuple("TrustAnchor::Path").field(path).finish(),
            TrustAnchor::Pem(pem) => write!(f, "TrustAnchor::Pem({} bytes)", pem.len()),
        }
    }
}

impl TrustAnchor {
    /// Load the PEM bytes.
    pub async fn load(&self, ctx: &Context) -> Result<Vec<u8>> {
        match self {
            TrustAnchor::Path(path) => ctx.file_read(path).await,
            TrustAnchor::Pem(pem) => Ok(pem.clone()),
        }
    }
}

/// The connection target of a request: the relay that physically receives
/// it and terminates TLS.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProxyTarget {
    address: String,
    trust_anchor: Option<TrustAnchor>,
}

impl ProxyTarget {
    /// Create a proxy target from `host[:port]`.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            trust_anchor: None,
        }
    }

    /// Verify the relay's certificate against this anchor instead of the
    /// system roots.
    pub fn with_trust_anchor(mut self, trust_anchor: TrustAnchor) -> Self {
        self.trust_anchor = Some(trust_anchor);
        self
    }

    /// Relay address as `host[:port]`.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Configured trust anchor, if any.
    pub fn trust_anchor(&self) -> Option<&TrustAnchor> {
        self.trust_anchor.as_ref()
    }

    /// Replace a [`TrustAnchor::Path`] with the PEM bytes it points to.
    ///
    /// A file that can't be read is reported as `ConfigInvalid`.
    pub async fn resolve_trust_anchor(mut self, ctx: &Context) -> Result<Self> {
        if let Some(TrustAnchor::Path(path)) = &self.trust_anchor {
            let pem = ctx.file_read(path).await.map_err(|e| {
                Error::config_invalid(format!("failed to load trust anchor {path:?}"))
                    .with_source(e)
            })?;
            self.trust_anchor = Some(TrustAnchor::Pem(pem));
        }
        Ok(self)
    }

    /// Parsed relay authority.
    pub fn authority(&self) -> Result<Authority> {
        if self.address.is_empty() {
            return Err(Error::config_invalid("proxy address is required"));
        }

        self.address.parse::<Authority>().map_err(|e| {
            Error::config_invalid(format!(
                "proxy address {:?} must be host[:port]",
                self.address
            ))
            .with_source(e)
        })
    }

    /// Check that the address is a bare `host[:port]`.
    pub fn validate(&self) -> Result<()> {
        self.authority().map(|_| ())
    }
}
