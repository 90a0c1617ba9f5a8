//! Event Hubs shared access signature relay client
//!
//! This crate sends events to an Azure Event Hub through a TLS relay that
//! forwards requests by virtual host:
//! - Shared access signature generation bound to the namespace resource URI
//! - A request signer that sets `Authorization` and `Host` for the service
//!   while the request itself is sent to the relay
//! - [`ProxyRelayClient`], which ties both together on top of [`sasrelay_core::Context`]
//!
//! When a trust anchor is configured, the context's transport must verify the
//! relay against it or the client is refused. `sasrelay::event_hubs::connect`
//! builds such a transport from the config.
//!
//! # Example
//!
//! ```rust,no_run
//! use sasrelay_core::{Context, Result};
//! use sasrelay_core::time::now;
//! use sasrelay_event_hubs::{Config, Message, ProxyRelayClient};
//!
//! async fn send(ctx: Context) -> Result<()> {
//!     let config = Config::default().from_env(&ctx)?;
//!     let client = ProxyRelayClient::from_config(ctx, &config).await?;
//!
//!     let resp = client.send(Message::random(now()).to_json()?).await?;
//!     println!("{}", resp.status());
//!     Ok(())
//! }
//! ```

pub mod constants;
pub mod sas;

mod credential;
pub use credential::{Credential, SecretKey};

mod resource;
pub use resource::{ProxyTarget, ResourceIdentity, TrustAnchor};

pub use sas::SasToken;

mod sign_request;
pub use sign_request::RequestSigner;

mod config;
pub use config::Config;

mod client;
pub use client::{ProxyRelayClient, SendResult};

mod message;
pub use message::Message;

mod provide_credential;
pub use provide_credential::*;
