//! Integration tests for medilink-core infrastructure

use medilink_core::{
    config_error, not_found_error, token_error, validation_error, ApiConfig, ErrorContext,
    MedilinkConfig, MedilinkError, MeetingStatus, Role,
};

#[test]
fn test_error_creation_with_context() {
    let error = config_error!("Test config error", "test_component");

    match &error {
        MedilinkError::Config {
            message, context, ..
        } => {
            assert_eq!(message, "Test config error");
            assert_eq!(context.component, "test_component");
            assert!(!context.error_id.is_empty());
        }
        _ => panic!("Expected Config error"),
    }

    // Logging an error should not panic
    error.log();
}

#[test]
fn test_auth_errors_invalidate_session() {
    let auth_error = MedilinkError::Authentication {
        message: "Token rejected".to_string(),
        context: ErrorContext::new("test"),
    };
    assert!(auth_error.invalidates_session());

    let token_err = token_error!("Malformed payload", "test");
    assert!(token_err.invalidates_session());

    let network_error = MedilinkError::Network {
        message: "Connection refused".to_string(),
        source: None,
        context: ErrorContext::new("test"),
    };
    assert!(!network_error.invalidates_session());

    let missing = not_found_error!("meeting 42", "test");
    assert!(!missing.invalidates_session());
}

#[test]
fn test_api_error_user_message_is_verbatim() {
    let error = MedilinkError::Api {
        message: "Incorrect username or password".to_string(),
        status: Some(401),
        source: None,
        context: ErrorContext::new("api"),
    };
    assert_eq!(error.user_message(), "Incorrect username or password");

    let validation = validation_error!("bad field", "field", "test");
    assert!(validation.user_message().contains("bad field"));
}

#[test]
fn test_default_config_is_valid() {
    let config = MedilinkConfig::default();
    config.validate().expect("default config should validate");

    assert_eq!(config.api.base_url, "http://localhost:8000");
    assert_eq!(config.session.refresh_interval_secs, 60);
    assert_eq!(config.session.refresh_margin_secs, 60);
}

#[test]
fn test_config_validation_rejects_bad_base_url() {
    let mut config = MedilinkConfig::default();
    config.api = ApiConfig {
        base_url: "localhost:8000".to_string(),
        ..ApiConfig::default()
    };

    let result = config.validate();
    assert!(result.is_err());
    match result.unwrap_err() {
        MedilinkError::Validation { field, .. } => {
            assert_eq!(field.as_deref(), Some("api.base_url"));
        }
        other => panic!("Expected Validation error, got {:?}", other),
    }
}

#[test]
fn test_config_validation_rejects_zero_poll_interval() {
    let mut config = MedilinkConfig::default();
    config.session.storage_poll_secs = 0;

    match config.validate().unwrap_err() {
        MedilinkError::Validation { field, .. } => {
            assert_eq!(field.as_deref(), Some("session.storage_poll_secs"));
        }
        other => panic!("Expected Validation error, got {:?}", other),
    }
}

#[test]
fn test_config_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    let mut config = MedilinkConfig::default();
    config.api.base_url = "https://hospital.example.com".to_string();
    config.session.refresh_interval_secs = 30;
    config.save_to_file(&path).unwrap();

    let loaded = MedilinkConfig::from_file(&path).unwrap();
    assert_eq!(loaded.api.base_url, "https://hospital.example.com");
    assert_eq!(loaded.session.refresh_interval_secs, 30);
}

#[test]
fn test_load_or_default_without_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = MedilinkConfig::load_or_default(dir.path().join("missing.toml")).unwrap();
    assert_eq!(config.api.base_url, "http://localhost:8000");
}

#[test]
fn test_role_parsing() {
    assert_eq!("patient".parse::<Role>().unwrap(), Role::Patient);
    assert_eq!("Doctor".parse::<Role>().unwrap(), Role::Doctor);
    assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
    assert!("nurse".parse::<Role>().is_err());

    assert_eq!(Role::Patient.to_string(), "patient");
}

#[test]
fn test_meeting_status_path_segment() {
    // Status travels as a URL path segment on PATCH, so Display must be lowercase
    assert_eq!(MeetingStatus::Approved.to_string(), "approved");
    assert_eq!("rejected".parse::<MeetingStatus>().unwrap(), MeetingStatus::Rejected);
    assert!("unknown".parse::<MeetingStatus>().is_err());
}
