use async_trait::async_trait;
use log::debug;
use sasrelay_core::{Context, ProvideCredential, Result};

use crate::constants::{SB_KEYNAME, SB_KEYVAL};
use crate::credential::Credential;

/// EnvCredentialProvider loads the shared access policy from `SB_KEYNAME`
/// and `SB_KEYVAL`.
///
/// Returns `None` unless both are set and non-empty.
#[derive(Clone, Debug, Default)]
pub struct EnvCredentialProvider {}

impl EnvCredentialProvider {
    /// Create a new env provider.
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let key_name = ctx.env_var(SB_KEYNAME).filter(|v| !v.is_empty());
        let key_value = ctx.env_var(SB_KEYVAL).filter(|v| !v.is_empty());

        match (key_name, key_value) {
            (Some(key_name), Some(key_value)) => Ok(Some(Credential::new(key_name, key_value))),
            _ => {
                debug!("{SB_KEYNAME} or {SB_KEYVAL} not set, skipping env credential");
                Ok(None)
            }
        }
    }
}
