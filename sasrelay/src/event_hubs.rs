//! Event Hubs relay support with convenience APIs
//!
//! Everything from `sasrelay_event_hubs` is re-exported here, along with
//! [`connect`] which wires a [`Config`] to the default context.

pub use sasrelay_event_hubs::*;

#[cfg(feature = "default-context")]
use crate::{default_context, Result};
#[cfg(feature = "default-context")]
use sasrelay_http_send_reqwest::ReqwestHttpSend;

/// Create a relay client with standard configuration.
///
/// This function creates a client with:
/// - Default context (tokio file reader, OS environment)
/// - A reqwest transport that applies the configured request timeout and,
///   when a trust anchor is configured, trusts that anchor only
///
/// # Example
///
/// ```no_run
/// # async fn example() -> sasrelay::Result<()> {
/// use sasrelay::event_hubs::{connect, Config, Message};
///
/// let config = Config::default().from_env(&sasrelay::default_context())?;
/// let client = connect(&config).await?;
///
/// let resp = client
///     .send(Message::random(sasrelay::time::now()).to_json()?)
///     .await?;
/// println!("{} {:?}", resp.status(), resp.body());
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "default-context")]
pub async fn connect(config: &Config) -> Result<ProxyRelayClient> {
    let ctx = default_context();
    let target = config.proxy_target()?.resolve_trust_anchor(&ctx).await?;

    let mut http = ReqwestHttpSend::builder();
    if let Some(TrustAnchor::Pem(pem)) = target.trust_anchor() {
        http = http.add_root_certificate_pem(pem.clone());
    }
    if let Some(timeout) = config.request_timeout {
        http = http.timeout(timeout);
    }
    log::debug!("connecting to relay {}", target.address());

    ProxyRelayClient::from_config(ctx.with_http_send(http.build()?), config).await
}
