//! Domain data types shared across the Medilink client stack
//!
//! These mirror the records the hospital API serves; the server remains the
//! authority on their semantics.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account role, as carried in the token payload and user records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Patient => write!(f, "patient"),
            Role::Doctor => write!(f, "doctor"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "patient" => Ok(Role::Patient),
            "doctor" => Ok(Role::Doctor),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// A user account record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub role: Role,
}

/// Payload for registering a new user or replacing an existing one
///
/// Self sign-up offers patient and doctor only; admin accounts are provisioned
/// server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub full_name: Option<String>,
}

/// A doctor profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    pub specialty: String,
    pub phone_number: String,
    pub address: String,
    pub is_confirmed: bool,
    pub user_id: i64,
    /// Display name fields, present on list responses
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub surname: Option<String>,
}

impl Doctor {
    /// Human-readable name for pick lists
    pub fn display_name(&self) -> String {
        match (&self.name, &self.surname) {
            (Some(name), Some(surname)) => format!("{} {}", name, surname),
            (Some(name), None) => name.clone(),
            _ => format!("doctor #{}", self.id),
        }
    }
}

/// A patient profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub phone_number: String,
    pub address: String,
    pub medical_history: Option<String>,
    pub user_id: i64,
}

/// Lifecycle state of a meeting request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
}

impl std::fmt::Display for MeetingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeetingStatus::Pending => write!(f, "pending"),
            MeetingStatus::Approved => write!(f, "approved"),
            MeetingStatus::Rejected => write!(f, "rejected"),
            MeetingStatus::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for MeetingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(MeetingStatus::Pending),
            "approved" => Ok(MeetingStatus::Approved),
            "rejected" => Ok(MeetingStatus::Rejected),
            "completed" => Ok(MeetingStatus::Completed),
            _ => Err(format!("Unknown meeting status: {}", s)),
        }
    }
}

/// A scheduled appointment request between a patient and a doctor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meeting {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub scheduled_date: NaiveDateTime,
    pub status: MeetingStatus,
    #[serde(default)]
    pub medical_records: Vec<MedicalRecord>,
}

/// Payload for requesting a new appointment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAppointment {
    pub scheduled_date: NaiveDateTime,
}

/// Payload for rescheduling an existing meeting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingUpdate {
    pub scheduled_date: NaiveDateTime,
}

/// A medical record attached to a meeting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalRecord {
    pub id: i64,
    pub meeting_id: i64,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub doctor_id: i64,
    #[serde(default)]
    pub medicines: Vec<Medicine>,
}

/// Payload for creating or replacing a medical record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMedicalRecord {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<i64>,
}

/// A prescribed medicine on a medical record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medicine {
    pub id: i64,
    pub medical_record_id: i64,
    pub name: String,
    pub dosage: f64,
    pub frequency: String,
}

/// Payload for adding or updating a medicine on a record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicineUpsert {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub medical_record_id: i64,
    pub name: String,
    pub dosage: f64,
    pub frequency: String,
}

/// Response body of the token, verify and refresh endpoints
///
/// The verify endpoint returns extra identity fields alongside the token; only
/// the token itself is trusted and the rest is re-derived by decoding it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}
