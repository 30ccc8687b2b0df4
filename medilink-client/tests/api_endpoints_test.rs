//! API client integration tests against the mock hospital API

mod common;

use chrono::NaiveDate;
use common::{mint_token, spawn_mock, MockHospital};
use medilink_client::ApiClient;
use medilink_core::{ApiConfig, MedilinkError, MeetingStatus, NewAppointment};

fn api_for(mock: &MockHospital) -> ApiClient {
    ApiClient::new(ApiConfig {
        base_url: mock.base_url.clone(),
        ..ApiConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn login_returns_a_decodable_token() {
    let mock = spawn_mock().await;
    let api = api_for(&mock);

    let response = api.login("alice", "secret").await.unwrap();
    let claims = medilink_client::decode_claims(&response.access_token).unwrap();
    assert_eq!(claims.sub, "alice");
    assert_eq!(claims.id, 7);
}

#[tokio::test]
async fn login_failure_preserves_server_detail() {
    let mock = spawn_mock().await;
    let api = api_for(&mock);

    let err = api.login("alice", "wrong").await.unwrap_err();
    assert!(matches!(err, MedilinkError::Authentication { .. }));
    assert_eq!(err.user_message(), "Incorrect username or password");
    assert!(err.invalidates_session());
}

#[tokio::test]
async fn list_doctors_requires_a_bearer_token() {
    let mock = spawn_mock().await;
    let api = api_for(&mock);
    let token = mint_token(7, "alice", "patient", 600);

    let doctors = api.list_doctors(&token).await.unwrap();
    assert_eq!(doctors.len(), 2);
    assert_eq!(doctors[0].display_name(), "Greta House");
    // A doctor with no name fields falls back to an id label
    assert_eq!(doctors[1].display_name(), "doctor #4");
}

#[tokio::test]
async fn patient_requests_parse_dates_and_status() {
    let mock = spawn_mock().await;
    let api = api_for(&mock);
    let token = mint_token(7, "alice", "patient", 600);

    let meetings = api.patient_requests(&token).await.unwrap();
    assert_eq!(meetings.len(), 1);
    assert_eq!(meetings[0].status, MeetingStatus::Pending);
    assert_eq!(
        meetings[0].scheduled_date.date(),
        NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()
    );
    assert!(meetings[0].medical_records.is_empty());
}

#[tokio::test]
async fn appointment_request_round_trips_the_slot() {
    let mock = spawn_mock().await;
    let api = api_for(&mock);
    let token = mint_token(7, "alice", "patient", 600);

    let slot = NaiveDate::from_ymd_opt(2026, 9, 15)
        .unwrap()
        .and_hms_opt(14, 0, 0)
        .unwrap();
    let meeting = api
        .request_appointment(&token, 7, 3, &NewAppointment { scheduled_date: slot })
        .await
        .unwrap();

    assert_eq!(meeting.patient_id, 7);
    assert_eq!(meeting.doctor_id, 3);
    assert_eq!(meeting.scheduled_date, slot);
    assert_eq!(meeting.status, MeetingStatus::Pending);
}

#[tokio::test]
async fn delete_meeting_maps_missing_ids_to_not_found() {
    let mock = spawn_mock().await;
    let api = api_for(&mock);
    let token = mint_token(7, "alice", "patient", 600);

    api.delete_meeting(&token, 1).await.unwrap();

    let err = api.delete_meeting(&token, 404).await.unwrap_err();
    assert!(matches!(err, MedilinkError::NotFound { .. }));
    assert_eq!(err.user_message(), "Appointment not found");
}
