//! Directory endpoints: doctors, patients and user accounts

use super::ApiClient;
use medilink_core::{Doctor, MedilinkResult, NewUser, Patient, User};
use reqwest::Method;

impl ApiClient {
    /// List all doctors (GET `/doctors`)
    pub async fn list_doctors(&self, token: &str) -> MedilinkResult<Vec<Doctor>> {
        self.request_json::<Vec<Doctor>, ()>(Method::GET, "doctors", Some(token), None)
            .await
    }

    /// List all patients (GET `/patients`)
    pub async fn list_patients(&self, token: &str) -> MedilinkResult<Vec<Patient>> {
        self.request_json::<Vec<Patient>, ()>(Method::GET, "patients", Some(token), None)
            .await
    }

    /// List all user accounts (GET `/users`, admin view)
    pub async fn list_users(&self, token: &str) -> MedilinkResult<Vec<User>> {
        self.request_json::<Vec<User>, ()>(Method::GET, "users", Some(token), None)
            .await
    }

    /// Replace a user account (PUT `/user/{id}`)
    pub async fn update_user(&self, token: &str, id: i64, user: &NewUser) -> MedilinkResult<User> {
        let path = format!("user/{}", id);
        self.request_json(Method::PUT, &path, Some(token), Some(user))
            .await
    }

    /// Delete a user account (DELETE `/user/{id}`)
    pub async fn delete_user(&self, token: &str, id: i64) -> MedilinkResult<()> {
        let path = format!("user/{}", id);
        self.request_unit::<()>(Method::DELETE, &path, Some(token), None)
            .await
    }
}
