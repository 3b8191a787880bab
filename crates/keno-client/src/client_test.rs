use keno_core::ConfigError;

use super::*;

fn test_client(jurisdiction: &str) -> KenoClient {
    KenoClient::with_base_url(jurisdiction, ClientConfig::default(), "http://127.0.0.1:9")
        .expect("client construction should not fail")
}

#[test]
fn unknown_jurisdiction_fails_construction() {
    let err = KenoClient::new("XYZ").unwrap_err();
    assert!(
        matches!(err, KenoError::Config(ConfigError::UnknownJurisdiction(ref code)) if code == "XYZ"),
        "got: {err:?}"
    );
}

#[test]
fn redirected_jurisdiction_is_stored_resolved() {
    assert_eq!(test_client("wa").jurisdiction(), Jurisdiction::Nsw);
    assert_eq!(test_client("sa").jurisdiction(), Jurisdiction::Act);
    assert_eq!(test_client("QLD").jurisdiction(), Jurisdiction::Qld);
}

#[test]
fn production_client_targets_state_host() {
    let client = KenoClient::new("tas").unwrap();
    let url = client.url(endpoint::HOT_COLD_PATH, &[]);
    assert_eq!(
        url.as_str(),
        "https://api-info-act.keno.com.au/v2/info/hotCold?jurisdiction=ACT"
    );
}

#[test]
fn url_uses_resolved_code() {
    let client = test_client("nt");
    let url = client.url(endpoint::TRENDS_PATH, &[]);
    assert_eq!(
        url.as_str(),
        "http://127.0.0.1:9/v2/info/trends?jurisdiction=ACT"
    );
}

#[test]
fn invalid_config_fails_construction() {
    let config = ClientConfig {
        history: HistoryConfig {
            page_size: 0,
            ..HistoryConfig::default()
        },
        ..ClientConfig::default()
    };
    let err = KenoClient::with_base_url("ACT", config, "http://127.0.0.1:9").unwrap_err();
    assert!(
        matches!(
            err,
            KenoError::Config(ConfigError::InvalidSetting { setting: "page_size", .. })
        ),
        "got: {err:?}"
    );
}
