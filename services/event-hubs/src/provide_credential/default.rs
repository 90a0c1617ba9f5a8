use async_trait::async_trait;
use sasrelay_core::{Context, ProvideCredential, ProvideCredentialChain, Result};

use crate::provide_credential::{EnvCredentialProvider, StaticCredentialProvider};
use crate::{Config, Credential};

/// Default loader that tries multiple credential sources in order.
///
/// 1. Static credential from [`Config`], if both key name and key value are set
/// 2. Environment (`SB_KEYNAME`, `SB_KEYVAL`)
#[derive(Debug)]
pub struct DefaultCredentialProvider {
    chain: ProvideCredentialChain<Credential>,
}

impl Default for DefaultCredentialProvider {
    fn default() -> Self {
        let chain = ProvideCredentialChain::new().push(EnvCredentialProvider::new());

        Self { chain }
    }
}

impl DefaultCredentialProvider {
    /// Create a new default loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefer the credential carried by `config` over the environment.
    pub fn from_config(config: &Config) -> Self {
        let mut chain = ProvideCredentialChain::new();

        if let (Some(key_name), Some(key_value)) = (&config.key_name, &config.key_value) {
            if !key_name.is_empty() && !key_value.is_empty() {
                chain = chain.push(StaticCredentialProvider::new(key_name, key_value.clone()));
            }
        }

        Self {
            chain: chain.push(EnvCredentialProvider::new()),
        }
    }
}

#[async_trait]
impl ProvideCredential for DefaultCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        self.chain.provide_credential(ctx).await
    }
}
