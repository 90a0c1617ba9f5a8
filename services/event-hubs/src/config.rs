use std::time::Duration;

use sasrelay_core::{Context, Error, Result};

use crate::constants::*;
use crate::credential::SecretKey;
use crate::{Credential, ProxyTarget, ResourceIdentity, TrustAnchor};

/// Config carries all the configuration for relaying events through a proxy.
#[derive(Clone, Default, Debug)]
pub struct Config {
    /// `proxy_address` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`EH_PROXY_DNS`]
    pub proxy_address: Option<String>,
    /// `namespace` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`SB_NAMESPACE`]
    pub namespace: Option<String>,
    /// `event_hub` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`EH_NAME`]
    /// - default: [`DEFAULT_EVENT_HUB`]
    pub event_hub: Option<String>,
    /// `key_name` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`SB_KEYNAME`]
    pub key_name: Option<String>,
    /// `key_value` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`SB_KEYVAL`]
    pub key_value: Option<SecretKey>,
    /// Path to a PEM file the proxy's certificate is verified against.
    ///
    /// - env value: [`EH_PROXY_CERT`]
    /// - system roots are used when unset
    pub trust_anchor: Option<String>,
    /// Validity window of each generated token.
    ///
    /// - env value: [`EH_SAS_TTL_SECONDS`]
    /// - default: [`DEFAULT_SAS_TTL`]
    pub sas_ttl: Option<Duration>,
    /// Value of the `timeout` query parameter, enforced by the service.
    ///
    /// - env value: [`EH_SERVICE_TIMEOUT_SECONDS`]
    /// - default: [`DEFAULT_SERVICE_TIMEOUT`]
    pub service_timeout: Option<Duration>,
    /// Client side timeout for the whole request.
    ///
    /// - env value: [`EH_REQUEST_TIMEOUT_SECONDS`]
    /// - no timeout when unset
    pub request_timeout: Option<Duration>,
}

impl Config {
    /// Load config from env.
    ///
    /// Fields that are already set are kept.
    pub fn from_env(mut self, ctx: &Context) -> Result<Self> {
        let var = |key: &str| ctx.env_var(key).filter(|v| !v.is_empty());

        if self.proxy_address.is_none() {
            self.proxy_address = var(EH_PROXY_DNS);
        }
        if self.namespace.is_none() {
            self.namespace = var(SB_NAMESPACE);
        }
        if self.event_hub.is_none() {
            self.event_hub = Some(var(EH_NAME).unwrap_or_else(|| DEFAULT_EVENT_HUB.to_string()));
        }
        if self.key_name.is_none() {
            self.key_name = var(SB_KEYNAME);
        }
        if self.key_value.is_none() {
            self.key_value = var(SB_KEYVAL).map(SecretKey::from);
        }
        if self.trust_anchor.is_none() {
            self.trust_anchor = var(EH_PROXY_CERT);
        }
        if self.sas_ttl.is_none() {
            self.sas_ttl = var(EH_SAS_TTL_SECONDS)
                .map(|v| parse_seconds(EH_SAS_TTL_SECONDS, &v))
                .transpose()?;
        }
        if self.service_timeout.is_none() {
            self.service_timeout = var(EH_SERVICE_TIMEOUT_SECONDS)
                .map(|v| parse_seconds(EH_SERVICE_TIMEOUT_SECONDS, &v))
                .transpose()?;
        }
        if self.request_timeout.is_none() {
            self.request_timeout = var(EH_REQUEST_TIMEOUT_SECONDS)
                .map(|v| parse_seconds(EH_REQUEST_TIMEOUT_SECONDS, &v))
                .transpose()?;
        }

        Ok(self)
    }

    /// Build the connection target.
    pub fn proxy_target(&self) -> Result<ProxyTarget> {
        let address = required(&self.proxy_address, EH_PROXY_DNS)?;

        let mut target = ProxyTarget::new(address);
        if let Some(path) = &self.trust_anchor {
            target = target.with_trust_anchor(TrustAnchor::Path(path.clone()));
        }
        target.validate()?;
        Ok(target)
    }

    /// Build the logical target.
    pub fn resource(&self) -> Result<ResourceIdentity> {
        let namespace = required(&self.namespace, SB_NAMESPACE)?;
        let event_hub = self.event_hub.as_deref().unwrap_or(DEFAULT_EVENT_HUB);

        let resource = ResourceIdentity::new(namespace, event_hub);
        resource.validate()?;
        Ok(resource)
    }

    /// Build the signing credential.
    pub fn credential(&self) -> Result<Credential> {
        let key_name = required(&self.key_name, SB_KEYNAME)?;
        let key_value = match &self.key_value {
            Some(v) if !v.is_empty() => v.clone(),
            _ => return Err(Error::config_invalid(format!("{SB_KEYVAL} is required"))),
        };

        Ok(Credential::new(key_name, key_value))
    }
}

fn required<'a>(value: &'a Option<String>, key: &str) -> Result<&'a str> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::config_invalid(format!("{key} is required"))),
    }
}

fn parse_seconds(key: &str, value: &str) -> Result<Duration> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| {
            Error::config_invalid(format!("{key} must be a number of seconds, got {value:?}"))
                .with_source(e)
        })
}
