use sasrelay_core::{Context, OsEnv};
use sasrelay_file_read_tokio::TokioFileRead;
use sasrelay_http_send_reqwest::ReqwestHttpSend;

/// Create a context backed by tokio file reads, a default reqwest transport
/// and the process environment.
///
/// The transport trusts the system roots only. Use
/// [`crate::event_hubs::connect`] when the relay presents a certificate
/// signed by a private CA.
pub fn default_context() -> Context {
    Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv)
}
