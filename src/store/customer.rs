use chrono::Utc;
use tracing::{debug, info};

use crate::models::customer::{Customer, CustomerPatch, NewCustomer};
use crate::store::table::{Table, advance_timestamp};

/// Lifecycle operations over customer records.
pub trait CustomerStore: Send + Sync {
    fn list(&self) -> Vec<Customer>;

    fn get(&self, id: u64) -> Option<Customer>;

    /// Assigns the next id and stamps `requested_at` along with both
    /// bookkeeping timestamps.
    fn create(&self, new_customer: NewCustomer) -> Customer;

    fn update(&self, id: u64, patch: CustomerPatch) -> Option<Customer>;

    fn delete(&self, id: u64) -> Option<Customer>;

    fn filter_by_status(&self, status: &str) -> Vec<Customer>;

    fn filter_by_driver_id(&self, driver_id: u64) -> Vec<Customer>;

    /// Binds the customer to `driver_id` without checking that the driver
    /// exists. Calling this directly can leave a dangling reference.
    fn assign_driver(&self, customer_id: u64, driver_id: u64) -> Option<Customer> {
        self.get(customer_id)?;
        self.update(customer_id, CustomerPatch::assignment(driver_id))
    }

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Default)]
pub struct InMemoryCustomerStore {
    customers: Table<Customer>,
}

impl InMemoryCustomerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CustomerStore for InMemoryCustomerStore {
    fn list(&self) -> Vec<Customer> {
        self.customers.scan(|_| true)
    }

    fn get(&self, id: u64) -> Option<Customer> {
        self.customers.get(id)
    }

    fn create(&self, new_customer: NewCustomer) -> Customer {
        let now = Utc::now();
        let customer = self.customers.insert_with(|id| Customer {
            id,
            name: new_customer.name,
            phone: new_customer.phone,
            email: new_customer.email,
            address: new_customer.address,
            vehicle_info: new_customer.vehicle_info,
            assigned_driver_id: None,
            status: new_customer.status.unwrap_or_default(),
            requested_at: now,
            completed_at: None,
            created_at: now,
            updated_at: now,
        });

        info!(
            customer_id = customer.id,
            license_plate = %customer.vehicle_info.license_plate,
            "recovery requested"
        );
        customer
    }

    fn update(&self, id: u64, patch: CustomerPatch) -> Option<Customer> {
        if let Some(claimed) = patch.id.filter(|claimed| *claimed != id) {
            debug!(customer_id = id, claimed, "ignoring id in customer patch");
        }

        let customer = self.customers.modify(id, |customer| {
            patch.apply_to(customer);
            customer.updated_at = advance_timestamp(customer.updated_at);
        })?;

        info!(
            customer_id = id,
            status = customer.status.as_str(),
            "customer updated"
        );
        Some(customer)
    }

    fn delete(&self, id: u64) -> Option<Customer> {
        let customer = self.customers.remove(id)?;
        info!(customer_id = id, "customer deleted");
        Some(customer)
    }

    fn filter_by_status(&self, status: &str) -> Vec<Customer> {
        self.customers.scan(|customer| customer.status.as_str() == status)
    }

    fn filter_by_driver_id(&self, driver_id: u64) -> Vec<Customer> {
        self.customers.scan(|customer| customer.assigned_driver_id == Some(driver_id))
    }

    fn len(&self) -> usize {
        self.customers.len()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{CustomerStore, InMemoryCustomerStore};
    use crate::models::customer::{CustomerPatch, CustomerStatus, NewCustomer, VehicleInfo};

    fn new_customer(name: &str) -> NewCustomer {
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
    fn create_waits_for_recovery_and_stamps_request_time() {
        let store = InMemoryCustomerStore::new();
        let created = store.create(new_customer("B"));

        assert_eq!(created.status, CustomerStatus::WaitingForRecovery);
        assert_eq!(created.requested_at, created.created_at);
        assert!(created.assigned_driver_id.is_none());
        assert!(created.completed_at.is_none());
        assert_eq!(store.get(created.id).unwrap(), created);
    }

    #[test]
    fn any_status_may_follow_any_other() {
        let store = InMemoryCustomerStore::new();
        let created = store.create(new_customer("B"));

        let recovered = store
            .update(
                created.id,
                CustomerPatch {
                    status: Some(CustomerStatus::Recovered),
                    completed_at: Some(Some(Utc::now())),
                    ..CustomerPatch::default()
                },
            )
            .unwrap();
        assert_eq!(recovered.status, CustomerStatus::Recovered);
        assert!(recovered.completed_at.is_some());

        let reopened = store
            .update(
                created.id,
                CustomerPatch {
                    status: Some(CustomerStatus::WaitingForRecovery),
                    ..CustomerPatch::default()
                },
            )
            .unwrap();
        assert_eq!(reopened.status, CustomerStatus::WaitingForRecovery);
    }

    #[test]
    fn empty_patch_only_moves_update_timestamp() {
        let store = InMemoryCustomerStore::new();
        let created = store.create(new_customer("B"));

        let updated = store.update(created.id, CustomerPatch::default()).unwrap();

        assert!(updated.updated_at > created.updated_at);
        assert_eq!(updated.requested_at, created.requested_at);
        assert_eq!(updated.vehicle_info, created.vehicle_info);
        assert_eq!(updated.status, created.status);
    }

    #[test]
    fn patch_id_is_discarded() {
        let store = InMemoryCustomerStore::new();
        let created = store.create(new_customer("B"));

        let updated = store
            .update(
                created.id,
                CustomerPatch {
                    id: Some(created.id + 100),
                    ..CustomerPatch::default()
                },
            )
            .unwrap();
        assert_eq!(updated.id, created.id);
    }

    #[test]
    fn assign_driver_sets_reference_and_status() {
        let store = InMemoryCustomerStore::new();
        let created = store.create(new_customer("B"));

        let assigned = store.assign_driver(created.id, 4).unwrap();
        assert_eq!(assigned.assigned_driver_id, Some(4));
        assert_eq!(assigned.status, CustomerStatus::AssignedToDriver);

        assert!(store.assign_driver(created.id + 1, 4).is_none());
    }

    #[test]
    fn filter_by_driver_id_returns_assigned_customers_in_order() {
        let store = InMemoryCustomerStore::new();
        let a = store.create(new_customer("A"));
        let b = store.create(new_customer("B"));
        let c = store.create(new_customer("C"));
        store.assign_driver(c.id, 1);
        store.assign_driver(a.id, 1);
        store.assign_driver(b.id, 2);

        let ids: Vec<u64> = store.filter_by_driver_id(1).iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![a.id, c.id]);
        assert!(store.filter_by_driver_id(3).is_empty());
    }

    #[test]
    fn filter_by_status_preserves_order() {
        let store = InMemoryCustomerStore::new();
        let a = store.create(new_customer("A"));
        let b = store.create(new_customer("B"));
        let c = store.create(new_customer("C"));
        store.assign_driver(b.id, 1);

        let waiting: Vec<u64> = store
            .filter_by_status("waiting_for_recovery")
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(waiting, vec![a.id, c.id]);
        assert!(store.filter_by_status("recovered").is_empty());
        assert!(store.filter_by_status("bogus").is_empty());
    }

    #[test]
    fn deleted_customer_is_gone_and_id_not_reused() {
        let store = InMemoryCustomerStore::new();
        let a = store.create(new_customer("A"));
        store.delete(a.id).unwrap();

        assert!(store.get(a.id).is_none());
        assert!(store.list().is_empty());
        assert!(store.create(new_customer("B")).id > a.id);
    }
}
