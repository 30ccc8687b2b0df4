//! Meeting (appointment request) endpoints

use super::ApiClient;
use medilink_core::{
    MedicalRecord, Meeting, MeetingStatus, MeetingUpdate, MedilinkResult, NewAppointment,
    NewMedicalRecord,
};
use reqwest::Method;

impl ApiClient {
    /// Meetings visible to the signed-in patient (GET `/patient_requests`)
    pub async fn patient_requests(&self, token: &str) -> MedilinkResult<Vec<Meeting>> {
        self.request_json::<Vec<Meeting>, ()>(Method::GET, "patient_requests", Some(token), None)
            .await
    }

    /// Meetings visible to the signed-in doctor (GET `/doctor_requests`)
    pub async fn doctor_requests(&self, token: &str) -> MedilinkResult<Vec<Meeting>> {
        self.request_json::<Vec<Meeting>, ()>(Method::GET, "doctor_requests", Some(token), None)
            .await
    }

    /// Request a new appointment with a doctor
    /// (POST `/patients/{patientId}/appointments/{doctorId}`)
    pub async fn request_appointment(
        &self,
        token: &str,
        patient_id: i64,
        doctor_id: i64,
        appointment: &NewAppointment,
    ) -> MedilinkResult<Meeting> {
        let path = format!("patients/{}/appointments/{}", patient_id, doctor_id);
        self.request_json(Method::POST, &path, Some(token), Some(appointment))
            .await
    }

    /// Reschedule a meeting (PUT `/meetings/{id}`)
    pub async fn update_meeting(
        &self,
        token: &str,
        id: i64,
        update: &MeetingUpdate,
    ) -> MedilinkResult<Meeting> {
        let path = format!("meetings/{}", id);
        self.request_json(Method::PUT, &path, Some(token), Some(update))
            .await
    }

    /// Cancel a meeting (DELETE `/meetings/{id}`)
    pub async fn delete_meeting(&self, token: &str, id: i64) -> MedilinkResult<()> {
        let path = format!("meetings/{}", id);
        self.request_unit::<()>(Method::DELETE, &path, Some(token), None)
            .await
    }

    /// Move a meeting through its review lifecycle (PATCH `/meetings/{id}/{status}`)
    pub async fn set_meeting_status(
        &self,
        token: &str,
        id: i64,
        status: MeetingStatus,
    ) -> MedilinkResult<Meeting> {
        let path = format!("meetings/{}/{}", id, status);
        self.request_json::<Meeting, ()>(Method::PATCH, &path, Some(token), None)
            .await
    }

    /// Attach a medical record to a meeting (POST `/meetings/{id}/records`)
    pub async fn attach_record(
        &self,
        token: &str,
        meeting_id: i64,
        record: &NewMedicalRecord,
    ) -> MedilinkResult<MedicalRecord> {
        let path = format!("meetings/{}/records", meeting_id);
        self.request_json(Method::POST, &path, Some(token), Some(record))
            .await
    }
}
