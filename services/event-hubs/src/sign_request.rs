use std::time::Duration;

use async_trait::async_trait;
use http::header::{AUTHORIZATION, HOST};
use http::request::Parts;
use http::HeaderValue;
use log::debug;
use sasrelay_core::time::{self, DateTime};
use sasrelay_core::{Context, Error, Result, SignRequest, SigningRequest};

use crate::constants::DEFAULT_SAS_TTL;
use crate::{sas, Credential, ResourceIdentity};

/// RequestSigner that implements Event Hubs shared access signature authorization.
///
/// The request keeps its authority: it's sent wherever its URI points (the
/// relay). The token and the `Host` header are derived from the resource
/// identity instead, so the relay can forward by virtual host.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    resource: ResourceIdentity,
    ttl: Duration,
    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new signer for the given resource.
    pub fn new(resource: ResourceIdentity) -> Self {
        Self {
            resource,
            ttl: DEFAULT_SAS_TTL,
            time: None,
        }
    }

    /// Set the default token validity window.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing or replaying a known request.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Resource this signer produces tokens for.
    pub fn resource(&self) -> &ResourceIdentity {
        &self.resource
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _: &Context,
        req: &mut Parts,
        credential: Option<&Self::Credential>,
        expires_in: Option<Duration>,
    ) -> Result<()> {
        let Some(cred) = credential else {
            return Err(Error::credential_invalid("credential is required"));
        };

        let now = self.time.unwrap_or_else(time::now);
        let token = sas::generate(&self.resource, cred, now, expires_in.unwrap_or(self.ttl))?;
        debug!(
            "signed request for {} with key {}, expires at {}",
            token.resource_uri(),
            token.key_name(),
            token.expiry()
        );

        let mut ctx = SigningRequest::build(req)?;
        ctx.headers.insert(AUTHORIZATION, token.to_header_value()?);
        ctx.headers
            .insert(HOST, HeaderValue::from_str(token.resource_uri())?);
        ctx.apply(req)
    }
}
