//! Tests for the API client plumbing

use super::*;
use medilink_core::ApiConfig;

#[test]
fn test_client_creation_from_default_config() {
    let client = ApiClient::new(ApiConfig::default());
    assert!(client.is_ok());
    assert_eq!(client.unwrap().base_url(), "http://localhost:8000");
}

#[test]
fn test_client_rejects_bad_user_agent() {
    let config = ApiConfig {
        user_agent: "bad\nagent".to_string(),
        ..ApiConfig::default()
    };
    assert!(ApiClient::new(config).is_err());
}

#[test]
fn test_url_joining_normalizes_slashes() {
    let config = ApiConfig {
        base_url: "http://localhost:8000/".to_string(),
        ..ApiConfig::default()
    };
    let client = ApiClient::new(config).unwrap();

    assert_eq!(client.url("doctors"), "http://localhost:8000/doctors");
    assert_eq!(client.url("/doctors"), "http://localhost:8000/doctors");
    assert_eq!(
        client.url("verify-token/abc.def.ghi"),
        "http://localhost:8000/verify-token/abc.def.ghi"
    );
}
