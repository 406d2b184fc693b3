use std::sync::Arc;

use tokio::sync::broadcast;

use crate::engine::assignment::AssignmentCoordinator;
use crate::models::assignment::Assignment;
use crate::observability::metrics::Metrics;
use crate::store::{CustomerStore, DriverStore, InMemoryCustomerStore, InMemoryDriverStore};

pub struct AppState {
    pub drivers: Arc<dyn DriverStore>,
    pub customers: Arc<dyn CustomerStore>,
    pub coordinator: AssignmentCoordinator,
    pub assignment_events_tx: broadcast::Sender<Assignment>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(event_buffer_size: usize) -> Self {
        Self::with_stores(
            Arc::new(InMemoryDriverStore::new()),
            Arc::new(InMemoryCustomerStore::new()),
            event_buffer_size,
        )
    }

    pub fn with_stores(
        drivers: Arc<dyn DriverStore>,
        customers: Arc<dyn CustomerStore>,
        event_buffer_size: usize,
    ) -> Self {
        let (assignment_events_tx, _unused_rx) = broadcast::channel(event_buffer_size);

        Self {
            coordinator: AssignmentCoordinator::new(drivers.clone(), customers.clone()),
            drivers,
            customers,
            assignment_events_tx,
            metrics: Metrics::new(),
        }
    }
}
