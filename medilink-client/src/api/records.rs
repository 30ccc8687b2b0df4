//! Medical record and medicine endpoints

use super::ApiClient;
use medilink_core::{MedicalRecord, MedicineUpsert, MedilinkResult, NewMedicalRecord};
use reqwest::Method;

impl ApiClient {
    /// List all medical records (GET `/medical_records`)
    pub async fn list_medical_records(&self, token: &str) -> MedilinkResult<Vec<MedicalRecord>> {
        self.request_json::<Vec<MedicalRecord>, ()>(
            Method::GET,
            "medical_records",
            Some(token),
            None,
        )
        .await
    }

    /// Fetch one medical record with its medicines (GET `/medical_records/{id}`)
    pub async fn get_medical_record(&self, token: &str, id: i64) -> MedilinkResult<MedicalRecord> {
        let path = format!("medical_records/{}", id);
        self.request_json::<MedicalRecord, ()>(Method::GET, &path, Some(token), None)
            .await
    }

    /// Create a standalone medical record (POST `/medical_records`)
    pub async fn create_medical_record(
        &self,
        token: &str,
        record: &NewMedicalRecord,
    ) -> MedilinkResult<MedicalRecord> {
        self.request_json(Method::POST, "medical_records", Some(token), Some(record))
            .await
    }

    /// Replace a medical record's description (PUT `/medical_records/{id}`)
    pub async fn update_medical_record(
        &self,
        token: &str,
        id: i64,
        record: &NewMedicalRecord,
    ) -> MedilinkResult<MedicalRecord> {
        let path = format!("medical_records/{}", id);
        self.request_json(Method::PUT, &path, Some(token), Some(record))
            .await
    }

    /// Delete a medical record (DELETE `/medical_records/{id}`)
    pub async fn delete_medical_record(&self, token: &str, id: i64) -> MedilinkResult<()> {
        let path = format!("medical_records/{}", id);
        self.request_unit::<()>(Method::DELETE, &path, Some(token), None)
            .await
    }

    /// Add a medicine to a record (POST `/medical_records/{id}/medicines`)
    ///
    /// The server responds with the updated record including its medicines.
    pub async fn add_medicine(
        &self,
        token: &str,
        record_id: i64,
        medicine: &MedicineUpsert,
    ) -> MedilinkResult<MedicalRecord> {
        let path = format!("medical_records/{}/medicines", record_id);
        self.request_json(Method::POST, &path, Some(token), Some(medicine))
            .await
    }

    /// Update a medicine (PUT `/medicines/{id}`)
    pub async fn update_medicine(
        &self,
        token: &str,
        id: i64,
        medicine: &MedicineUpsert,
    ) -> MedilinkResult<MedicalRecord> {
        let path = format!("medicines/{}", id);
        self.request_json(Method::PUT, &path, Some(token), Some(medicine))
            .await
    }

    /// Delete a medicine (DELETE `/medicines/{id}`)
    pub async fn delete_medicine(&self, token: &str, id: i64) -> MedilinkResult<()> {
        let path = format!("medicines/{}", id);
        self.request_unit::<()>(Method::DELETE, &path, Some(token), None)
            .await
    }
}
