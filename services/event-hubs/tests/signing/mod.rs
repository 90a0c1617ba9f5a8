use std::time::Duration;

use http::header::{AUTHORIZATION, HOST};
use pretty_assertions::{assert_eq, assert_ne};
use sasrelay_core::time::from_unix_seconds;
use sasrelay_core::{Context, Signer};
use sasrelay_event_hubs::sas::{self, string_to_sign};
use sasrelay_event_hubs::{Credential, DefaultCredentialProvider, RequestSigner, ResourceIdentity};

use crate::static_env;

fn cred(key: &str) -> Credential {
    Credential::new("send-policy", key)
}

#[test]
fn test_generate_is_deterministic() {
    let resource = ResourceIdentity::new("ns", "ingest");
    let now = from_unix_seconds(1_700_000_000).unwrap();

    let first = sas::generate(&resource, &cred("testkey"), now, Duration::from_secs(300)).unwrap();
    let second = sas::generate(&resource, &cred("testkey"), now, Duration::from_secs(300)).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.to_string(), second.to_string());
}

#[test]
fn test_signature_depends_on_every_input() {
    let now = from_unix_seconds(1000).unwrap();
    let ttl = Duration::from_secs(300);
    let base = sas::generate(&ResourceIdentity::new("ns", "ingest"), &cred("testkey"), now, ttl)
        .unwrap();

    let other_key =
        sas::generate(&ResourceIdentity::new("ns", "ingest"), &cred("otherkey"), now, ttl).unwrap();
    let other_namespace =
        sas::generate(&ResourceIdentity::new("ns2", "ingest"), &cred("testkey"), now, ttl).unwrap();
    let other_expiry = sas::generate(
        &ResourceIdentity::new("ns", "ingest"),
        &cred("testkey"),
        now,
        Duration::from_secs(301),
    )
    .unwrap();

    assert_ne!(base.signature(), other_key.signature());
    assert_ne!(base.signature(), other_namespace.signature());
    assert_ne!(base.signature(), other_expiry.signature());
}

#[test]
fn test_event_hub_name_is_not_signed() {
    let now = from_unix_seconds(1000).unwrap();
    let ttl = Duration::from_secs(300);

    let ingest = sas::generate(&ResourceIdentity::new("ns", "ingest"), &cred("k"), now, ttl).unwrap();
    let other = sas::generate(&ResourceIdentity::new("ns", "other"), &cred("k"), now, ttl).unwrap();

    assert_eq!(ingest, other);
}

#[test]
fn test_signature_is_url_safe() {
    let now = from_unix_seconds(1000).unwrap();
    for ttl in 1..64 {
        let token = sas::generate(
            &ResourceIdentity::new("ns", "ingest"),
            &cred("testkey"),
            now,
            Duration::from_secs(ttl),
        )
        .unwrap();

        assert!(token
            .signature()
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'%'));
        assert_eq!(
            string_to_sign(token.resource_uri(), token.expiry()),
            format!("ns.servicebus.windows.net\n{}", 1000 + ttl)
        );
    }
}

#[tokio::test]
async fn test_signer_with_default_provider() {
    let ctx = Context::new().with_env(static_env(&[
        ("SB_KEYNAME", "send-policy"),
        ("SB_KEYVAL", "testkey"),
    ]));
    let signer = Signer::new(
        ctx,
        DefaultCredentialProvider::new(),
        RequestSigner::new(ResourceIdentity::new("ns", "ingest"))
            .with_time(from_unix_seconds(1000).unwrap()),
    );

    let mut parts = http::Request::post("https://10.0.0.4:443/ingest/messages")
        .body(())
        .unwrap()
        .into_parts()
        .0;
    signer.sign(&mut parts, None).await.unwrap();

    assert_eq!(parts.uri.authority().unwrap().as_str(), "10.0.0.4:443");
    assert_eq!(parts.headers[HOST], "ns.servicebus.windows.net");
    assert_eq!(
        parts.headers[AUTHORIZATION],
        "SharedAccessSignature sig=FTAQAmnIQ2RTBBvDl0hjOgNuP99MUIpijnztxm6oMOU%3D&se=1300&skn=send-policy&sr=ns.servicebus.windows.net"
    );
}

#[test]
fn test_one_second_later_changes_token() {
    let resource = ResourceIdentity::new("ns", "ingest");
    let ttl = Duration::from_secs(300);

    let first = sas::generate(&resource, &cred("testkey"), from_unix_seconds(1000).unwrap(), ttl)
        .unwrap();
    let later = sas::generate(&resource, &cred("testkey"), from_unix_seconds(1001).unwrap(), ttl)
        .unwrap();

    assert_eq!(later.expiry(), first.expiry() + 1);
    assert_ne!(later.signature(), first.signature());
    for token in [&first, &later] {
        assert!(!token.signature().is_empty());
        assert!(!token.key_name().is_empty());
        assert!(!token.resource_uri().is_empty());
    }
}

#[test]
fn test_client_is_shareable_across_tasks() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<sasrelay_event_hubs::ProxyRelayClient>();
}
