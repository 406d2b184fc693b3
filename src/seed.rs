//! Demo records for local runs.

use chrono::{TimeZone, Utc};
use tracing::info;

use crate::models::customer::{CustomerPatch, CustomerStatus, NewCustomer, VehicleInfo};
use crate::models::driver::{DriverStatus, Location, NewDriver};
use crate::state::AppState;

pub fn seed_demo_data(state: &AppState) {
    let john = state.drivers.create(NewDriver {
        name: "John Smith".to_string(),
        phone: "+1-555-0123".to_string(),
        email: "john.smith@example.com".to_string(),
        license_number: "DL123456789".to_string(),
        vehicle_type: "Tow Truck".to_string(),
        status: Some(DriverStatus::Active),
        location: Some(Location {
            latitude: 40.7128,
            longitude: -74.0060,
            address: Some("New York, NY".to_string()),
        }),
    });

    let sarah = state.drivers.create(NewDriver {
        name: "Sarah Johnson".to_string(),
        phone: "+1-555-0456".to_string(),
        email: "sarah.johnson@example.com".to_string(),
        license_number: "DL987654321".to_string(),
        vehicle_type: "Recovery Truck".to_string(),
        status: Some(DriverStatus::Active),
        location: Some(Location {
            latitude: 34.0522,
            longitude: -118.2437,
            address: Some("Los Angeles, CA".to_string()),
        }),
    });

    let mike = state.customers.create(NewCustomer {
        name: "Mike Wilson".to_string(),
        phone: "+1-555-0789".to_string(),
        email: Some("mike.wilson@example.com".to_string()),
        address: "123 Main St, New York, NY 10001".to_string(),
        vehicle_info: VehicleInfo {
            make: "Toyota".to_string(),
            model: "Camry".to_string(),
            year: Some(2020),
            color: Some("Blue".to_string()),
            license_plate: "ABC123".to_string(),
        },
        status: None,
    });
    // Driver already dispatched but not yet marked as en route.
    state.customers.update(
        mike.id,
        CustomerPatch {
            assigned_driver_id: Some(Some(john.id)),
            ..CustomerPatch::default()
        },
    );

    let lisa = state.customers.create(NewCustomer {
        name: "Lisa Brown".to_string(),
        phone: "+1-555-0321".to_string(),
        email: Some("lisa.brown@example.com".to_string()),
        address: "456 Oak Ave, Los Angeles, CA 90210".to_string(),
        vehicle_info: VehicleInfo {
            make: "Honda".to_string(),
            model: "Civic".to_string(),
            year: Some(2019),
            color: Some("Red".to_string()),
            license_plate: "XYZ789".to_string(),
        },
        status: None,
    });
    state.customers.update(
        lisa.id,
        CustomerPatch {
            assigned_driver_id: Some(Some(sarah.id)),
            status: Some(CustomerStatus::Recovered),
            completed_at: Some(Utc.with_ymd_and_hms(2024, 1, 14, 16, 45, 0).single()),
            ..CustomerPatch::default()
        },
    );

    info!(
        drivers = state.drivers.len(),
        customers = state.customers.len(),
        "demo data seeded"
    );
}

#[cfg(test)]
mod tests {
    use super::seed_demo_data;
    use crate::models::customer::CustomerStatus;
    use crate::state::AppState;

    #[test]
    fn seeds_two_drivers_and_two_customers() {
        let state = AppState::new(16);
        seed_demo_data(&state);

        assert_eq!(state.drivers.list_active().len(), 2);
        let customers = state.customers.list();
        assert_eq!(customers.len(), 2);
        assert_eq!(customers[0].assigned_driver_id, Some(1));
        assert_eq!(customers[0].status, CustomerStatus::WaitingForRecovery);
        assert_eq!(customers[1].status, CustomerStatus::Recovered);
        assert!(customers[1].completed_at.is_some());
    }
}
