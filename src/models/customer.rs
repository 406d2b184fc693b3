use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::nullable;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VehicleInfo {
    pub make: String,
    pub model: String,
    #[serde(default)]
    pub year: Option<u16>,
    #[serde(default)]
    pub color: Option<String>,
    pub license_plate: String,
}

/// Conventional progression is waiting -> assigned -> recovered, but any
/// patch may move a customer to any status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CustomerStatus {
    #[default]
    WaitingForRecovery,
    AssignedToDriver,
    Recovered,
}

impl CustomerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerStatus::WaitingForRecovery => "waiting_for_recovery",
            CustomerStatus::AssignedToDriver => "assigned_to_driver",
            CustomerStatus::Recovered => "recovered",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: u64,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: String,
    pub vehicle_info: VehicleInfo,
    pub assigned_driver_id: Option<u64>,
    pub status: CustomerStatus,
    pub requested_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: String,
    pub vehicle_info: VehicleInfo,
    pub status: Option<CustomerStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CustomerPatch {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: Option<String>,
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub email: Option<Option<String>>,
    pub address: Option<String>,
    pub vehicle_info: Option<VehicleInfo>,
    /// Not checked against the driver store; see `AssignmentCoordinator` for the validated path.
    #[serde(default, deserialize_with = "nullable")]
    pub assigned_driver_id: Option<Option<u64>>,
    pub status: Option<CustomerStatus>,
    #[serde(default, deserialize_with = "nullable")]
    pub completed_at: Option<Option<DateTime<Utc>>>,
}

impl CustomerPatch {
    pub fn assignment(driver_id: u64) -> Self {
        Self {
            assigned_driver_id: Some(Some(driver_id)),
            status: Some(CustomerStatus::AssignedToDriver),
            ..Self::default()
        }
    }

    pub fn apply_to(self, customer: &mut Customer) {
        if let Some(name) = self.name {
            customer.name = name;
        }
        if let Some(phone) = self.phone {
            customer.phone = phone;
        }
        if let Some(email) = self.email {
            customer.email = email;
        }
        if let Some(address) = self.address {
            customer.address = address;
        }
        if let Some(vehicle_info) = self.vehicle_info {
            customer.vehicle_info = vehicle_info;
        }
        if let Some(assigned_driver_id) = self.assigned_driver_id {
            customer.assigned_driver_id = assigned_driver_id;
        }
        if let Some(status) = self.status {
            customer.status = status;
        }
        if let Some(completed_at) = self.completed_at {
            customer.completed_at = completed_at;
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{CustomerPatch, CustomerStatus};

    #[test]
    fn status_wire_names_match_as_str() {
        for status in [
            CustomerStatus::WaitingForRecovery,
            CustomerStatus::AssignedToDriver,
            CustomerStatus::Recovered,
        ] {
            assert_eq!(json!(status), json!(status.as_str()));
        }
    }

    #[test]
    fn patch_can_clear_assignment() {
        let body = json!({ "assignedDriverId": null, "status": "waiting_for_recovery" });
        let patch: CustomerPatch = serde_json::from_value(body).unwrap();
        assert_eq!(patch.assigned_driver_id, Some(None));
        assert_eq!(patch.status, Some(CustomerStatus::WaitingForRecovery));
    }

    #[test]
    fn patch_accepts_and_carries_id_key() {
        let patch: CustomerPatch = serde_json::from_value(json!({ "id": 500 })).unwrap();
        assert_eq!(patch.id, Some(500));
    }
}
