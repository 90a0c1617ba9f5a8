// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Reqwest-based HTTP transport for sasrelay.
//!
//! This crate provides `ReqwestHttpSend`, which implements the `HttpSend`
//! trait from `sasrelay_core` on top of [`reqwest`].
//!
//! The client is pinned to HTTP/1.1 so that an explicit `Host` header reaches
//! the relay untouched, while the TCP/TLS connection still goes to the
//! authority in the request URI.
//!
//! Once a root certificate is added the built-in roots are disabled: the
//! server must chain to one of the given certificates.
//!
//! ## Example
//!
//! ```no_run
//! use sasrelay_core::Context;
//! use sasrelay_http_send_reqwest::ReqwestHttpSend;
//! use std::time::Duration;
//!
//! # fn example(pem: Vec<u8>) -> sasrelay_core::Result<()> {
//! let http = ReqwestHttpSend::builder()
//!     .timeout(Duration::from_secs(30))
//!     .add_root_certificate_pem(pem)
//!     .build()?;
//!
//! let ctx = Context::new().with_http_send(http);
//! # Ok(())
//! # }
//! ```

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::BodyExt;
use log::debug;
use reqwest::{Certificate, Client, Request};
use sasrelay_core::{Error, HttpSend, Result};

/// Reqwest-based implementation of the `HttpSend` trait.
#[derive(Default, Clone)]
pub struct ReqwestHttpSend {
    client: Client,
    root_certificates: Arc<Vec<Vec<u8>>>,
}

impl Debug for ReqwestHttpSend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestHttpSend")
            .field("client", &self.client)
            .field("root_certificates", &self.root_certificates.len())
            .finish()
    }
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    ///
    /// The client's trust configuration is opaque, so
    /// [`HttpSend::verifies_with`] always returns false. Use
    /// [`ReqwestHttpSend::builder`] to pin a trust anchor.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            root_certificates: Arc::default(),
        }
    }

    /// Start building a client with custom trust anchors and timeouts.
    pub fn builder() -> ReqwestHttpSendBuilder {
        ReqwestHttpSendBuilder::default()
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let req = Request::try_from(req)
            .map_err(|e| Error::request_invalid("failed to convert request").with_source(e))?;
        debug!("sending {} {}", req.method(), req.url());

        let resp: http::Response<_> = self
            .client
            .execute(req)
            .await
            .map_err(transport_error)?
            .into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(transport_error)?;
        Ok(http::Response::from_parts(parts, bs))
    }

    fn verifies_with(&self, pem: &[u8]) -> bool {
        self.root_certificates.iter().any(|v| v.as_slice() == pem)
    }
}

fn transport_error(err: reqwest::Error) -> Error {
    let message = if err.is_timeout() {
        "request timed out"
    } else if err.is_connect() {
        "failed to connect"
    } else {
        "failed to send request"
    };

    Error::transport(message).with_source(err)
}

/// Builder for [`ReqwestHttpSend`].
#[derive(Debug, Default)]
pub struct ReqwestHttpSendBuilder {
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    root_certificates: Vec<Vec<u8>>,
}

impl ReqwestHttpSendBuilder {
    /// Total timeout for a single request, from connect until the body is read.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Timeout for the connect phase only.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Trust the given PEM encoded certificate or bundle.
    ///
    /// As soon as one is added, the built-in system roots are no longer
    /// trusted by the built client.
    pub fn add_root_certificate_pem(mut self, pem: impl Into<Vec<u8>>) -> Self {
        self.root_certificates.push(pem.into());
        self
    }

    /// Build the transport.
    pub fn build(self) -> Result<ReqwestHttpSend> {
        let mut builder = Client::builder().http1_only();

        if !self.root_certificates.is_empty() {
            builder = builder.tls_built_in_root_certs(false);
        }
        for pem in &self.root_certificates {
            let certs = Certificate::from_pem_bundle(pem).map_err(|e| {
                Error::config_invalid("trust anchor is not a valid PEM certificate")
                    .with_source(e)
            })?;
            if certs.is_empty() {
                return Err(Error::config_invalid(
                    "trust anchor contains no PEM certificate",
                ));
            }
            for cert in certs {
                builder = builder.add_root_certificate(cert);
            }
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| Error::config_invalid("failed to build http client").with_source(e))?;
        Ok(ReqwestHttpSend {
            client,
            root_certificates: Arc::new(self.root_certificates),
        })
    }
}
