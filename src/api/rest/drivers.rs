use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use serde::{Deserialize, Serialize};

use crate::api::rest::RequiredFields;
use crate::error::AppError;
use crate::models::customer::Customer;
use crate::models::driver::{Driver, DriverPatch, DriverStatus, Location, NewDriver};
use crate::models::id::parse_id;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/drivers", get(list_drivers).post(create_driver))
        .route("/drivers/active", get(list_active_drivers))
        .route(
            "/drivers/:id",
            get(get_driver).put(update_driver).delete(delete_driver),
        )
        .route("/drivers/:id/customers", get(list_driver_customers))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDriverRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub license_number: Option<String>,
    pub vehicle_type: Option<String>,
    pub status: Option<DriverStatus>,
    pub location: Option<Location>,
}

impl CreateDriverRequest {
    fn validate(self) -> Result<NewDriver, AppError> {
        let mut required = RequiredFields::default();
        let new_driver = NewDriver {
            name: required.take("name", self.name),
            phone: required.take("phone", self.phone),
            email: required.take("email", self.email),
            license_number: required.take("licenseNumber", self.license_number),
            vehicle_type: required.take("vehicleType", self.vehicle_type),
            status: self.status,
            location: self.location,
        };
        required.finish()?;
        Ok(new_driver)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverCustomersResponse {
    pub driver: Driver,
    pub customers: Vec<Customer>,
    pub customer_count: usize,
}

fn driver_not_found(raw_id: &str) -> AppError {
    AppError::NotFound(format!("driver {raw_id} not found"))
}

async fn list_drivers(State(state): State<Arc<AppState>>) -> Json<Vec<Driver>> {
    Json(state.drivers.list())
}

async fn list_active_drivers(State(state): State<Arc<AppState>>) -> Json<Vec<Driver>> {
    Json(state.drivers.list_active())
}

async fn get_driver(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Driver>, AppError> {
    let driver = parse_id(&id)
        .and_then(|driver_id| state.drivers.get(driver_id))
        .ok_or_else(|| driver_not_found(&id))?;

    Ok(Json(driver))
}

async fn create_driver(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateDriverRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Driver>), AppError> {
    let Json(payload) = payload?;
    let new_driver = payload.validate()?;

    Ok((StatusCode::CREATED, Json(state.drivers.create(new_driver))))
}

async fn update_driver(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<DriverPatch>, JsonRejection>,
) -> Result<Json<Driver>, AppError> {
    let Json(patch) = payload?;
    let driver = parse_id(&id)
        .and_then(|driver_id| state.drivers.update(driver_id, patch))
        .ok_or_else(|| driver_not_found(&id))?;

    Ok(Json(driver))
}

async fn delete_driver(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Driver>, AppError> {
    let driver = parse_id(&id)
        .and_then(|driver_id| state.drivers.delete(driver_id))
        .ok_or_else(|| driver_not_found(&id))?;

    let orphaned = state.customers.filter_by_driver_id(driver.id).len();
    if orphaned > 0 {
        tracing::warn!(
            driver_id = driver.id,
            orphaned,
            "deleted driver is still referenced by customers"
        );
    }

    Ok(Json(driver))
}

async fn list_driver_customers(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DriverCustomersResponse>, AppError> {
    let driver = parse_id(&id)
        .and_then(|driver_id| state.drivers.get(driver_id))
        .ok_or_else(|| driver_not_found(&id))?;

    let customers = state.customers.filter_by_driver_id(driver.id);
    Ok(Json(DriverCustomersResponse {
        customer_count: customers.len(),
        driver,
        customers,
    }))
}
