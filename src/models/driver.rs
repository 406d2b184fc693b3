use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::nullable;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    #[default]
    Active,
    Inactive,
}

impl DriverStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DriverStatus::Active => "active",
            DriverStatus::Inactive => "inactive",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: u64,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub license_number: String,
    pub vehicle_type: String,
    pub status: DriverStatus,
    pub location: Option<Location>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for a driver that has already passed request validation.
#[derive(Debug, Clone)]
pub struct NewDriver {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub license_number: String,
    pub vehicle_type: String,
    pub status: Option<DriverStatus>,
    pub location: Option<Location>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DriverPatch {
    /// Accepted so clients may echo a full record back; never applied.
    #[serde(default)]
    pub id: Option<u64>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub license_number: Option<String>,
    pub vehicle_type: Option<String>,
    pub status: Option<DriverStatus>,
    #[serde(default, deserialize_with = "nullable")]
    pub location: Option<Option<Location>>,
}

impl DriverPatch {
    pub fn apply_to(self, driver: &mut Driver) {
        if let Some(name) = self.name {
            driver.name = name;
        }
        if let Some(phone) = self.phone {
            driver.phone = phone;
        }
        if let Some(email) = self.email {
            driver.email = email;
        }
        if let Some(license_number) = self.license_number {
            driver.license_number = license_number;
        }
        if let Some(vehicle_type) = self.vehicle_type {
            driver.vehicle_type = vehicle_type;
        }
        if let Some(status) = self.status {
            driver.status = status;
        }
        if let Some(location) = self.location {
            driver.location = location;
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{DriverPatch, DriverStatus};

    #[test]
    fn status_uses_lowercase_wire_names() {
        assert_eq!(json!(DriverStatus::Inactive), json!("inactive"));
        assert_eq!(DriverStatus::default(), DriverStatus::Active);
    }

    #[test]
    fn patch_distinguishes_null_location_from_absent() {
        let cleared: DriverPatch = serde_json::from_value(json!({ "location": null })).unwrap();
        assert_eq!(cleared.location, Some(None));

        let untouched: DriverPatch = serde_json::from_value(json!({ "name": "Z" })).unwrap();
        assert!(untouched.location.is_none());
    }

    #[test]
    fn patch_rejects_unknown_keys() {
        let result = serde_json::from_value::<DriverPatch>(json!({ "createdAt": "2024-01-01" }));
        assert!(result.is_err());
    }
}
