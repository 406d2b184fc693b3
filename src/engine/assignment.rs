use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{info, warn};

use crate::error::AppError;
use crate::models::assignment::{Assignment, AssignmentOutcome};
use crate::models::id::parse_id;
use crate::state::AppState;
use crate::store::{CustomerStore, DriverStore};

/// Binds customers to drivers across the two stores.
///
/// The customer record is only mutated once the driver is known to exist, so
/// this path never produces a customer in `assigned_to_driver` pointing at a
/// missing driver. Direct store calls can.
#[derive(Clone)]
pub struct AssignmentCoordinator {
    drivers: Arc<dyn DriverStore>,
    customers: Arc<dyn CustomerStore>,
}

impl AssignmentCoordinator {
    pub fn new(drivers: Arc<dyn DriverStore>, customers: Arc<dyn CustomerStore>) -> Self {
        Self { drivers, customers }
    }

    /// Checks run in order: driver id present, customer exists, driver exists.
    /// A missing customer is reported as such whatever the driver id holds.
    pub fn assign_driver_to_customer(
        &self,
        customer_id: &str,
        driver_id: Option<&str>,
    ) -> Result<AssignmentOutcome, AppError> {
        let raw_driver_id = driver_id
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .ok_or_else(|| AppError::BadRequest("driver id is required".to_string()))?;

        let customer_not_found = || AppError::NotFound(format!("customer {customer_id} not found"));

        let customer_id = parse_id(customer_id).ok_or_else(customer_not_found)?;
        self.customers.get(customer_id).ok_or_else(customer_not_found)?;

        let driver = parse_id(raw_driver_id)
            .and_then(|id| self.drivers.get(id))
            .ok_or_else(|| AppError::UnknownDriver(format!("driver {raw_driver_id} not found")))?;

        let customer = self
            .customers
            .assign_driver(customer_id, driver.id)
            .ok_or_else(customer_not_found)?;

        Ok(AssignmentOutcome {
            customer,
            driver_id: driver.id,
            driver_name: driver.name,
        })
    }
}

/// Runs an assignment through the coordinator, recording metrics and
/// publishing the event on success.
pub fn assign_and_publish(
    state: &AppState,
    customer_id: &str,
    driver_id: Option<&str>,
) -> Result<AssignmentOutcome, AppError> {
    let start = Instant::now();
    let result = state
        .coordinator
        .assign_driver_to_customer(customer_id, driver_id);
    let elapsed = start.elapsed().as_secs_f64();

    match &result {
        Ok(outcome) => {
            state.metrics.observe_assignment("success", elapsed);

            let assignment = Assignment {
                customer_id: outcome.customer.id,
                driver_id: outcome.driver_id,
                driver_name: outcome.driver_name.clone(),
                assigned_at: Utc::now(),
            };
            let _ = state.assignment_events_tx.send(assignment);

            info!(
                customer_id = outcome.customer.id,
                driver_id = outcome.driver_id,
                driver_name = %outcome.driver_name,
                "driver assigned"
            );
        }
        Err(err) => {
            let outcome = match err {
                AppError::BadRequest(_) => "invalid",
                AppError::NotFound(_) => "customer_not_found",
                AppError::UnknownDriver(_) => "driver_not_found",
                AppError::Internal(_) => "error",
            };
            state.metrics.observe_assignment(outcome, elapsed);
            warn!(customer_id, error = %err, "driver assignment rejected");
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::AssignmentCoordinator;
    use crate::error::AppError;
    use crate::models::customer::{CustomerStatus, NewCustomer, VehicleInfo};
    use crate::models::driver::NewDriver;
    use crate::store::{CustomerStore, DriverStore, InMemoryCustomerStore, InMemoryDriverStore};

    struct Fixture {
        drivers: Arc<InMemoryDriverStore>,
        customers: Arc<InMemoryCustomerStore>,
        coordinator: AssignmentCoordinator,
    }

    fn fixture() -> Fixture {
        let drivers = Arc::new(InMemoryDriverStore::new());
        let customers = Arc::new(InMemoryCustomerStore::new());
        let coordinator = AssignmentCoordinator::new(drivers.clone(), customers.clone());
        Fixture {
            drivers,
            customers,
            coordinator,
        }
    }

    fn driver(name: &str) -> NewDriver {
        NewDriver {
            name: name.to_string(),
            phone: "1".to_string(),
            email: "a@x.com".to_string(),
            license_number: "L1".to_string(),
            vehicle_type: "Tow".to_string(),
            status: None,
            location: None,
        }
    }

    fn customer(name: &str) -> NewCustomer {
        NewCustomer {
            name: name.to_string(),
            phone: "2".to_string(),
            email: None,
            address: "addr".to_string(),
            vehicle_info: VehicleInfo {
                make: "M".to_string(),
                model: "C".to_string(),
                year: None,
                color: None,
                license_plate: "P1".to_string(),
            },
            status: None,
        }
    }

    #[test]
    fn assigns_existing_driver_to_existing_customer() {
        let f = fixture();
        let d = f.drivers.create(driver("A"));
        let c = f.customers.create(customer("B"));
        assert_eq!(c.status, CustomerStatus::WaitingForRecovery);

        let outcome = f
            .coordinator
            .assign_driver_to_customer(&c.id.to_string(), Some(&d.id.to_string()))
            .unwrap();

        assert_eq!(outcome.driver_name, "A");
        assert_eq!(outcome.driver_id, d.id);
        assert_eq!(outcome.customer.assigned_driver_id, Some(d.id));
        assert_eq!(outcome.customer.status, CustomerStatus::AssignedToDriver);
        assert_eq!(f.customers.get(c.id).unwrap(), outcome.customer);
    }

    #[test]
    fn unknown_driver_leaves_customer_untouched() {
        let f = fixture();
        let c = f.customers.create(customer("B"));

        let err = f
            .coordinator
            .assign_driver_to_customer(&c.id.to_string(), Some("99999"))
            .unwrap_err();

        assert!(matches!(err, AppError::UnknownDriver(_)));
        assert_eq!(f.customers.get(c.id).unwrap(), c);
    }

    #[test]
    fn non_numeric_driver_id_is_unknown_driver() {
        let f = fixture();
        let c = f.customers.create(customer("B"));

        let err = f
            .coordinator
            .assign_driver_to_customer(&c.id.to_string(), Some("abc"))
            .unwrap_err();

        assert!(matches!(err, AppError::UnknownDriver(_)));
    }

    #[test]
    fn missing_customer_wins_regardless_of_driver() {
        let f = fixture();
        let d = f.drivers.create(driver("A"));

        let with_valid_driver = f
            .coordinator
            .assign_driver_to_customer("42", Some(&d.id.to_string()))
            .unwrap_err();
        assert!(matches!(with_valid_driver, AppError::NotFound(_)));

        let with_unknown_driver = f
            .coordinator
            .assign_driver_to_customer("42", Some("99999"))
            .unwrap_err();
        assert!(matches!(with_unknown_driver, AppError::NotFound(_)));

        let with_garbage_customer = f
            .coordinator
            .assign_driver_to_customer("x", Some(&d.id.to_string()))
            .unwrap_err();
        assert!(matches!(with_garbage_customer, AppError::NotFound(_)));
    }

    #[test]
    fn absent_or_blank_driver_id_is_a_validation_error() {
        let f = fixture();
        let c = f.customers.create(customer("B"));

        for driver_id in [None, Some(""), Some("   ")] {
            let err = f
                .coordinator
                .assign_driver_to_customer(&c.id.to_string(), driver_id)
                .unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)));
        }
        assert_eq!(f.customers.get(c.id).unwrap(), c);
    }

    #[test]
    fn deleted_driver_reference_is_left_dangling() {
        let f = fixture();
        let d = f.drivers.create(driver("A"));
        let c = f.customers.create(customer("B"));
        f.coordinator
            .assign_driver_to_customer(&c.id.to_string(), Some(&d.id.to_string()))
            .unwrap();

        f.drivers.delete(d.id).unwrap();

        let orphan = f.customers.get(c.id).unwrap();
        assert_eq!(orphan.assigned_driver_id, Some(d.id));
        assert_eq!(f.customers.filter_by_driver_id(d.id).len(), 1);
    }
}
