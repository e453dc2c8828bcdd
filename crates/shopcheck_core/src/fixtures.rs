//! Actor profile fixtures.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Password of the generated default user.
pub const DEFAULT_PASSWORD: &str = "testpass1234";

/// Attributes of a registered application user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorProfile {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub address1: String,
    pub address2: String,
    pub zipcode: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub phone: String,
}

impl ActorProfile {
    /// The default test user with a fresh, unique email address.
    pub fn generated() -> Self {
        Self::with_credentials(&unique_email(), DEFAULT_PASSWORD)
    }

    /// The default test user with the given credentials.
    pub fn with_credentials(email: &str, password: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            address1: "123 Test St".to_string(),
            address2: "Apt 1".to_string(),
            zipcode: "12345".to_string(),
            city: "TestCity".to_string(),
            state: "TS".to_string(),
            country: "TestCountry".to_string(),
            phone: "1234567890".to_string(),
        }
    }

    /// Field names and values as the `/register` form expects them.
    pub fn registration_form(&self) -> Vec<(String, String)> {
        [
            ("email", &self.email),
            ("password", &self.password),
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("address1", &self.address1),
            ("address2", &self.address2),
            ("zipcode", &self.zipcode),
            ("city", &self.city),
            ("state", &self.state),
            ("country", &self.country),
            ("phone", &self.phone),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
    }
}

/// A fresh `testuser_<uuid>@example.com` address.
pub fn unique_email() -> String {
    format!("testuser_{}@example.com", Uuid::new_v4().simple())
}
