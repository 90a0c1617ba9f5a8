use std::io::Write;
use std::time::Duration;

use http::header::{AUTHORIZATION, CONTENT_TYPE, HOST};
use http::StatusCode;
use pretty_assertions::assert_eq;
use sasrelay_core::time::from_unix_seconds;
use sasrelay_core::{Context, ErrorKind, StaticEnv};
use sasrelay_event_hubs::constants::*;
use sasrelay_event_hubs::{
    Config, Credential, Message, ProxyRelayClient, ProxyTarget, ResourceIdentity, TrustAnchor,
};
use sasrelay_file_read_tokio::TokioFileRead;
use test_case::test_case;

use crate::{
    init_logger, recording_context, static_env, RecordingHttpSend, UnreachableHttpSend,
};

const PROXY: &str = "proxy.example.com:8443";

fn client(ctx: Context, namespace: &str) -> ProxyRelayClient {
    ProxyRelayClient::new(
        ctx,
        ProxyTarget::new(PROXY),
        ResourceIdentity::new(namespace, "ingest"),
        Credential::new("send-policy", "testkey"),
    )
    .unwrap()
}

#[test_case("ns" ; "plain")]
#[test_case("Contoso-Events" ; "mixed case")]
#[test_case("a.b" ; "dotted")]
#[tokio::test]
async fn test_request_goes_to_proxy_and_names_resource(namespace: &str) {
    init_logger();
    let (ctx, http) = recording_context(StatusCode::CREATED, "");

    let resource = ResourceIdentity::new(namespace, "ingest");
    client(ctx, namespace).send("hello").await.unwrap();

    let reqs = http.requests();
    assert_eq!(reqs.len(), 1);
    let req = &reqs[0];

    assert_eq!(req.method, http::Method::POST);
    assert_eq!(req.uri.scheme_str(), Some("https"));
    assert_eq!(req.uri.authority().unwrap().as_str(), PROXY);
    assert_eq!(req.uri.path(), "/ingest/messages");
    assert_eq!(req.uri.query(), Some("api-version=2014-01&timeout=60"));
    assert_eq!(req.headers[HOST], resource.resource_uri().as_str());
    assert_eq!(req.headers[CONTENT_TYPE], CONTENT_TYPE_ENTRY);
    assert_eq!(req.body, "hello");

    let auth = req.headers[AUTHORIZATION].to_str().unwrap();
    assert!(auth.ends_with(&format!("&sr={}", resource.resource_uri())));
}

#[tokio::test]
async fn test_namespace_casing_does_not_change_signature() {
    let now = from_unix_seconds(1000).unwrap();

    let (upper_ctx, upper) = recording_context(StatusCode::CREATED, "");
    client(upper_ctx, "NS").with_time(now).send("a").await.unwrap();
    let (lower_ctx, lower) = recording_context(StatusCode::CREATED, "");
    client(lower_ctx, "ns").with_time(now).send("a").await.unwrap();

    let upper = upper.requests().remove(0);
    let lower = lower.requests().remove(0);
    assert_eq!(upper.headers[AUTHORIZATION], lower.headers[AUTHORIZATION]);
    assert_eq!(upper.headers[HOST], "ns.servicebus.windows.net");
    assert_eq!(lower.headers[HOST], "ns.servicebus.windows.net");
}

#[tokio::test]
async fn test_authorization_has_exactly_four_ordered_fields() {
    let (ctx, http) = recording_context(StatusCode::CREATED, "");
    client(ctx, "ns").send("hello").await.unwrap();

    let req = http.requests().remove(0);
    let auth = req.headers[AUTHORIZATION].to_str().unwrap().to_string();
    let fields = auth
        .strip_prefix("SharedAccessSignature ")
        .expect("must use the shared access signature scheme");

    let keys: Vec<&str> = fields
        .split('&')
        .map(|kv| kv.split_once('=').expect("must be key=value").0)
        .collect();
    assert_eq!(keys, vec!["sig", "se", "skn", "sr"]);
    assert!(req.headers[AUTHORIZATION].is_sensitive());
}

#[tokio::test]
async fn test_expired_clock_still_sends_well_formed_token() {
    let (ctx, http) = recording_context(StatusCode::UNAUTHORIZED, "ExpiredToken");

    let resp = client(ctx, "ns")
        .with_time(from_unix_seconds(1).unwrap())
        .send("hello")
        .await
        .unwrap();
    assert_eq!(resp.status_code(), 401);

    let req = http.requests().remove(0);
    assert_eq!(
        req.headers[AUTHORIZATION],
        "SharedAccessSignature sig=73R3HdTTDXAhVCbsizylwn%2B1VkA74IBYmlNvUr8HFwQ%3D&se=301&skn=send-policy&sr=ns.servicebus.windows.net"
    );
}

#[tokio::test]
async fn test_non_success_status_is_returned_verbatim() {
    let (ctx, _) = recording_context(StatusCode::UNAUTHORIZED, "<Error>InvalidSignature</Error>");

    let resp = client(ctx, "ns").send("hello").await.unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(!resp.is_success());
    assert_eq!(resp.headers()["x-relay"], "recorded");
    assert_eq!(resp.body().as_ref(), b"<Error>InvalidSignature</Error>");
    assert_eq!(resp.into_body(), "<Error>InvalidSignature</Error>");
}

#[tokio::test]
async fn test_transport_failure_is_an_error() {
    let ctx = Context::new().with_http_send(UnreachableHttpSend);

    let err = client(ctx, "ns").send("hello").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(!err.is_local());
}

#[tokio::test]
async fn test_each_send_signs_with_configured_ttl() {
    let (ctx, http) = recording_context(StatusCode::CREATED, "");
    let client = client(ctx, "ns")
        .with_time(from_unix_seconds(1000).unwrap())
        .with_sas_ttl(Duration::from_secs(3600))
        .unwrap()
        .with_service_timeout(Duration::from_secs(5));

    client.send("one").await.unwrap();
    client.send("two").await.unwrap();

    let reqs = http.requests();
    assert_eq!(reqs.len(), 2);
    for req in &reqs {
        assert!(req.headers[AUTHORIZATION]
            .to_str()
            .unwrap()
            .contains("&se=4600&"));
        assert_eq!(req.uri.query(), Some("api-version=2014-01&timeout=5"));
    }
    assert_eq!(reqs[0].body, "one");
    assert_eq!(reqs[1].body, "two");
}

#[tokio::test]
async fn test_message_body_is_sent_as_is() {
    let (ctx, http) = recording_context(StatusCode::CREATED, "");
    let msg = Message::new("hello", from_unix_seconds(1704067200).unwrap());
    let body = msg.to_json().unwrap();

    client(ctx, "ns").send(body.clone()).await.unwrap();

    let sent: Message = serde_json::from_slice(&http.requests()[0].body).unwrap();
    assert_eq!(sent, msg);
}

#[test_case(&[(SB_NAMESPACE, "ns"), (SB_KEYNAME, "p"), (SB_KEYVAL, "k")] ; "missing proxy")]
#[test_case(&[(EH_PROXY_DNS, PROXY), (SB_KEYNAME, "p"), (SB_KEYVAL, "k")] ; "missing namespace")]
#[test_case(&[(EH_PROXY_DNS, PROXY), (SB_NAMESPACE, "ns"), (SB_KEYNAME, "p")] ; "missing key")]
#[test_case(&[(EH_PROXY_DNS, PROXY), (SB_NAMESPACE, "ns"), (SB_KEYVAL, "k")] ; "missing key name")]
#[test_case(&[(EH_PROXY_DNS, PROXY), (SB_NAMESPACE, "ns"), (EH_NAME, "a%b"), (SB_KEYNAME, "p"), (SB_KEYVAL, "k")] ; "escaped event hub name")]
#[tokio::test]
async fn test_from_config_rejects_incomplete_config(envs: &[(&str, &str)]) {
    let (ctx, http) = recording_context(StatusCode::CREATED, "");
    let ctx = ctx.with_env(static_env(envs));

    let config = Config::default().from_env(&ctx).unwrap();
    let err = ProxyRelayClient::from_config(ctx, &config).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert!(http.requests().is_empty());
}

const PEM: &[u8] = b"-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----\n";

fn anchored_env(cert_path: &str) -> StaticEnv {
    static_env(&[
        (EH_PROXY_DNS, PROXY),
        (EH_PROXY_CERT, cert_path),
        (SB_NAMESPACE, "Contoso"),
        (EH_NAME, "telemetry"),
        (SB_KEYNAME, "send-policy"),
        (SB_KEYVAL, "testkey"),
        (EH_SERVICE_TIMEOUT_SECONDS, "30"),
    ])
}

#[tokio::test]
async fn test_anchored_config_never_reaches_ignoring_transport() {
    init_logger();
    let mut cert = tempfile::NamedTempFile::new().unwrap();
    cert.write_all(PEM).unwrap();

    let (ctx, http) = recording_context(StatusCode::CREATED, "");
    let ctx = ctx
        .with_file_read(TokioFileRead)
        .with_env(anchored_env(cert.path().to_str().unwrap()));

    let config = Config::default().from_env(&ctx).unwrap();
    let err = ProxyRelayClient::from_config(ctx, &config).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert!(http.requests().is_empty());
}

#[tokio::test]
async fn test_anchored_target_rejected_without_verifying_transport() {
    let (ctx, http) = recording_context(StatusCode::CREATED, "");
    let err = ProxyRelayClient::new(
        ctx,
        ProxyTarget::new(PROXY).with_trust_anchor(TrustAnchor::Pem(PEM.to_vec())),
        ResourceIdentity::new("ns", "ingest"),
        Credential::new("send-policy", "testkey"),
    )
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert!(http.requests().is_empty());
}

#[tokio::test]
async fn test_from_config_with_trust_anchor_file() {
    init_logger();
    let mut cert = tempfile::NamedTempFile::new().unwrap();
    cert.write_all(PEM).unwrap();

    let http = RecordingHttpSend::new(StatusCode::CREATED, "").trusting(PEM);
    let ctx = Context::new()
        .with_http_send(http.clone())
        .with_file_read(TokioFileRead)
        .with_env(anchored_env(cert.path().to_str().unwrap()));

    let config = Config::default().from_env(&ctx).unwrap();
    let client = ProxyRelayClient::from_config(ctx, &config).await.unwrap();

    assert_eq!(
        client.target().trust_anchor(),
        Some(&TrustAnchor::Pem(PEM.to_vec()))
    );

    client.send("hello").await.unwrap();
    let req = http.requests().remove(0);
    assert_eq!(req.uri.path(), "/telemetry/messages");
    assert_eq!(req.uri.query(), Some("api-version=2014-01&timeout=30"));
    assert_eq!(req.headers[HOST], "contoso.servicebus.windows.net");
}

#[tokio::test]
async fn test_trust_anchor_must_match_transport() {
    let http = RecordingHttpSend::new(StatusCode::CREATED, "").trusting(b"other");
    let err = ProxyRelayClient::new(
        Context::new().with_http_send(http.clone()),
        ProxyTarget::new(PROXY).with_trust_anchor(TrustAnchor::Pem(PEM.to_vec())),
        ResourceIdentity::new("ns", "ingest"),
        Credential::new("send-policy", "testkey"),
    )
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert!(http.requests().is_empty());
}
