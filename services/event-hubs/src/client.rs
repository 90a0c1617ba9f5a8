use std::time::Duration;

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, StatusCode};
use log::debug;
use sasrelay_core::time::DateTime;
use sasrelay_core::{Context, Error, Result, Signer};

use crate::constants::*;
use crate::provide_credential::StaticCredentialProvider;
use crate::{Config, Credential, ProxyTarget, RequestSigner, ResourceIdentity, TrustAnchor};

/// Outcome of a single send, whatever the status code.
///
/// Non-2xx responses are not errors: callers decide how to react to them.
#[derive(Debug, Clone)]
pub struct SendResult {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl SendResult {
    /// Status returned by the relay.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Status code as a plain number.
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Response body, unmodified.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Consume the result and return the body.
    pub fn into_body(self) -> Bytes {
        self.body
    }
}

/// ProxyRelayClient sends events to an event hub through a TLS relay.
///
/// Every request is physically sent to the [`ProxyTarget`], while its `Host`
/// header and shared access signature name the [`ResourceIdentity`]. A fresh
/// token is generated for each send.
///
/// The transport is whatever [`sasrelay_core::HttpSend`] the context carries.
/// It must honor the explicit `Host` header. When the target has a trust
/// anchor, the transport must report that it verifies the relay against it
/// (see [`sasrelay_core::HttpSend::verifies_with`]), otherwise the client is
/// refused.
#[derive(Debug, Clone)]
pub struct ProxyRelayClient {
    target: ProxyTarget,
    resource: ResourceIdentity,
    credential: Credential,
    signer: Signer<Credential>,
    sas_ttl: Duration,
    time: Option<DateTime>,
    service_timeout: Duration,
    api_version: String,
}

impl ProxyRelayClient {
    /// Create a new client.
    ///
    /// Only validates its inputs, nothing is sent until [`ProxyRelayClient::send`].
    /// A [`TrustAnchor::Path`] must be resolved first with
    /// [`ProxyTarget::resolve_trust_anchor`].
    pub fn new(
        ctx: Context,
        target: ProxyTarget,
        resource: ResourceIdentity,
        credential: Credential,
    ) -> Result<Self> {
        target.validate()?;
        resource.validate()?;
        if credential.key_name.is_empty() {
            return Err(Error::config_invalid("shared access key name is required"));
        }
        if credential.key_value.is_empty() {
            return Err(Error::config_invalid("shared access key is required"));
        }
        match target.trust_anchor() {
            None => {}
            Some(TrustAnchor::Pem(pem)) if ctx.http_verifies_with(pem) => {}
            Some(TrustAnchor::Pem(_)) => {
                return Err(Error::config_invalid(
                    "http client does not verify the relay against its trust anchor",
                ))
            }
            Some(TrustAnchor::Path(path)) => {
                return Err(Error::config_invalid(format!(
                    "trust anchor {path:?} must be resolved before use"
                )))
            }
        }

        let signer = Signer::new(
            ctx,
            StaticCredentialProvider::from_credential(credential.clone()),
            RequestSigner::new(resource.clone()).with_ttl(DEFAULT_SAS_TTL),
        );

        Ok(Self {
            target,
            resource,
            credential,
            signer,
            sas_ttl: DEFAULT_SAS_TTL,
            time: None,
            service_timeout: DEFAULT_SERVICE_TIMEOUT,
            api_version: API_VERSION.to_string(),
        })
    }

    /// Create a new client from a resolved [`Config`].
    ///
    /// The trust anchor file, if any, is read through the context.
    pub async fn from_config(ctx: Context, config: &Config) -> Result<Self> {
        let target = config.proxy_target()?.resolve_trust_anchor(&ctx).await?;
        let mut client = Self::new(ctx, target, config.resource()?, config.credential()?)?;
        if let Some(ttl) = config.sas_ttl {
            client = client.with_sas_ttl(ttl)?;
        }
        if let Some(timeout) = config.service_timeout {
            client = client.with_service_timeout(timeout);
        }
        Ok(client)
    }

    /// Set the validity window of generated tokens.
    pub fn with_sas_ttl(mut self, ttl: Duration) -> Result<Self> {
        if ttl.as_secs() == 0 {
            return Err(Error::config_invalid(
                "token ttl must be at least one second",
            ));
        }
        self.sas_ttl = ttl;
        self.rebuild_signer();
        Ok(self)
    }

    /// Set the `timeout` query parameter sent to the service.
    pub fn with_service_timeout(mut self, timeout: Duration) -> Self {
        self.service_timeout = timeout;
        self
    }

    /// Override the `api-version` query parameter.
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Sign every request as if the clock read `time`.
    ///
    /// # Note
    ///
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self.rebuild_signer();
        self
    }

    fn rebuild_signer(&mut self) {
        let mut signer = RequestSigner::new(self.resource.clone()).with_ttl(self.sas_ttl);
        if let Some(time) = self.time {
            signer = signer.with_time(time);
        }
        self.signer = Signer::new(
            self.signer.context().clone(),
            StaticCredentialProvider::from_credential(self.credential.clone()),
            signer,
        );
    }

    /// Connection target.
    pub fn target(&self) -> &ProxyTarget {
        &self.target
    }

    /// Logical target.
    pub fn resource(&self) -> &ResourceIdentity {
        &self.resource
    }

    fn uri(&self) -> String {
        format!(
            "https://{}{}?api-version={}&timeout={}",
            self.target.address(),
            self.resource.messages_path(),
            self.api_version,
            self.service_timeout.as_secs()
        )
    }

    /// Send one event body.
    ///
    /// The body is forwarded as is. Any response the relay returns, including
    /// 4xx and 5xx, is a [`SendResult`]; only failures to get a response at
    /// all are errors.
    pub async fn send(&self, body: impl Into<Bytes>) -> Result<SendResult> {
        let req = http::Request::post(self.uri())
            .header(CONTENT_TYPE, CONTENT_TYPE_ENTRY)
            .body(body.into())?;
        let (mut parts, body) = req.into_parts();

        self.signer.sign(&mut parts, None).await?;

        debug!(
            "sending {} bytes to {} for {}",
            body.len(),
            self.target.address(),
            self.resource.resource_uri()
        );
        let resp = self
            .signer
            .context()
            .http_send(http::Request::from_parts(parts, body))
            .await?;

        let (parts, body) = resp.into_parts();
        debug!("relay responded with {}", parts.status);

        Ok(SendResult {
            status: parts.status,
            headers: parts.headers,
            body,
        })
    }
}
