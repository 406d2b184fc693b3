use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::customer::Customer;

/// Published on the event feed whenever a driver is bound to a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub customer_id: u64,
    pub driver_id: u64,
    pub driver_name: String,
    pub assigned_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct AssignmentOutcome {
    pub customer: Customer,
    pub driver_id: u64,
    pub driver_name: String,
}
