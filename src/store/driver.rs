use chrono::Utc;
use tracing::{debug, info};

use crate::models::driver::{Driver, DriverPatch, DriverStatus, NewDriver};
use crate::store::table::{Table, advance_timestamp};

/// Lifecycle operations over driver records.
pub trait DriverStore: Send + Sync {
    /// All drivers in insertion order.
    fn list(&self) -> Vec<Driver>;

    fn get(&self, id: u64) -> Option<Driver>;

    /// Assigns the next id and stamps both timestamps. Field presence is the
    /// caller's concern.
    fn create(&self, new_driver: NewDriver) -> Driver;

    /// Merges `patch` into the stored driver. The id is never taken from the patch.
    fn update(&self, id: u64, patch: DriverPatch) -> Option<Driver>;

    fn delete(&self, id: u64) -> Option<Driver>;

    fn filter_by_status(&self, status: &str) -> Vec<Driver>;

    fn list_active(&self) -> Vec<Driver> {
        self.filter_by_status(DriverStatus::Active.as_str())
    }

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Default)]
pub struct InMemoryDriverStore {
    drivers: Table<Driver>,
}

impl InMemoryDriverStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DriverStore for InMemoryDriverStore {
    fn list(&self) -> Vec<Driver> {
        self.drivers.scan(|_| true)
    }

    fn get(&self, id: u64) -> Option<Driver> {
        self.drivers.get(id)
    }

    fn create(&self, new_driver: NewDriver) -> Driver {
        let now = Utc::now();
        let driver = self.drivers.insert_with(|id| Driver {
            id,
            name: new_driver.name,
            phone: new_driver.phone,
            email: new_driver.email,
            license_number: new_driver.license_number,
            vehicle_type: new_driver.vehicle_type,
            status: new_driver.status.unwrap_or_default(),
            location: new_driver.location,
            created_at: now,
            updated_at: now,
        });

        info!(driver_id = driver.id, name = %driver.name, "driver created");
        driver
    }

    fn update(&self, id: u64, patch: DriverPatch) -> Option<Driver> {
        if let Some(claimed) = patch.id.filter(|claimed| *claimed != id) {
            debug!(driver_id = id, claimed, "ignoring id in driver patch");
        }

        let driver = self.drivers.modify(id, |driver| {
            patch.apply_to(driver);
            driver.updated_at = advance_timestamp(driver.updated_at);
        })?;

        info!(driver_id = id, "driver updated");
        Some(driver)
    }

    fn delete(&self, id: u64) -> Option<Driver> {
        let driver = self.drivers.remove(id)?;
        info!(driver_id = id, "driver deleted");
        Some(driver)
    }

    fn filter_by_status(&self, status: &str) -> Vec<Driver> {
        self.drivers.scan(|driver| driver.status.as_str() == status)
    }

    fn len(&self) -> usize {
        self.drivers.len()
    }
}
