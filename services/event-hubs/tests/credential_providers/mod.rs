use pretty_assertions::assert_eq;
use sasrelay_core::{Context, ErrorKind, ProvideCredential, Signer};
use sasrelay_event_hubs::{
    Config, DefaultCredentialProvider, EnvCredentialProvider, RequestSigner, ResourceIdentity,
    SecretKey,
};

use crate::static_env;

fn env_ctx() -> Context {
    Context::new().with_env(static_env(&[
        ("SB_KEYNAME", "env-policy"),
        ("SB_KEYVAL", "env-key"),
    ]))
}

#[tokio::test]
async fn test_default_provider_prefers_config() {
    let config = Config {
        key_name: Some("config-policy".to_string()),
        key_value: Some(SecretKey::from("config-key")),
        ..Default::default()
    };

    let cred = DefaultCredentialProvider::from_config(&config)
        .provide_credential(&env_ctx())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(cred.key_name, "config-policy");
    assert_eq!(cred.key_value.as_bytes(), b"config-key");
}

#[tokio::test]
async fn test_default_provider_falls_back_to_env() {
    let config = Config {
        key_name: Some("config-policy".to_string()),
        key_value: Some(SecretKey::from("")),
        ..Default::default()
    };

    let cred = DefaultCredentialProvider::from_config(&config)
        .provide_credential(&env_ctx())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(cred.key_name, "env-policy");
    assert_eq!(cred.key_value.as_bytes(), b"env-key");
}

#[tokio::test]
async fn test_no_credential_anywhere() {
    let ctx = Context::new();

    assert!(EnvCredentialProvider::new()
        .provide_credential(&ctx)
        .await
        .unwrap()
        .is_none());
    assert!(DefaultCredentialProvider::new()
        .provide_credential(&ctx)
        .await
        .unwrap()
        .is_none());

    let signer = Signer::new(
        ctx,
        DefaultCredentialProvider::new(),
        RequestSigner::new(ResourceIdentity::new("ns", "ingest")),
    );
    let mut parts = http::Request::post("https://proxy.example.com/ingest/messages")
        .body(())
        .unwrap()
        .into_parts()
        .0;

    let err = signer.sign(&mut parts, None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
}
