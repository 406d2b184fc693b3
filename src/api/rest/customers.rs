use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use serde::{Deserialize, Serialize};

use crate::api::rest::RequiredFields;
use crate::engine::assignment::assign_and_publish;
use crate::error::AppError;
use crate::models::customer::{Customer, CustomerPatch, CustomerStatus, NewCustomer, VehicleInfo};
use crate::models::id::parse_id;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/customers", get(list_customers).post(create_customer))
        .route("/customers/status/:status", get(list_customers_by_status))
        .route(
            "/customers/:id",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
        .route("/customers/:id/assign-driver", put(assign_driver))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleInfoRequest {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<u16>,
    pub color: Option<String>,
    pub license_plate: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub vehicle_info: Option<VehicleInfoRequest>,
    pub status: Option<CustomerStatus>,
}

impl CreateCustomerRequest {
    fn validate(self) -> Result<NewCustomer, AppError> {
        let mut required = RequiredFields::default();
        let name = required.take("name", self.name);
        let phone = required.take("phone", self.phone);
        let address = required.take("address", self.address);

        let vehicle_info = match self.vehicle_info {
            Some(vehicle) => VehicleInfo {
                make: required.take("vehicleInfo.make", vehicle.make),
                model: required.take("vehicleInfo.model", vehicle.model),
                year: vehicle.year,
                color: vehicle.color,
                license_plate: required.take("vehicleInfo.licensePlate", vehicle.license_plate),
            },
            None => {
                required.mark_missing("vehicleInfo");
                VehicleInfo {
                    make: String::new(),
                    model: String::new(),
                    year: None,
                    color: None,
                    license_plate: String::new(),
                }
            }
        };
        required.finish()?;

        Ok(NewCustomer {
            name,
            phone,
            email: self.email,
            address,
            vehicle_info,
            status: self.status,
        })
    }
}

/// Driver id as sent by clients, usually `7` or `"7"`. Any other JSON value
/// is kept so id coercion can reject it as an unknown driver.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(u64),
    Text(String),
    Other(serde_json::Value),
}

impl RawId {
    fn into_text(self) -> String {
        match self {
            RawId::Number(id) => id.to_string(),
            RawId::Text(text) => text,
            RawId::Other(value) => value.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignDriverRequest {
    pub driver_id: Option<RawId>,
}

#[derive(Serialize)]
pub struct AssignDriverResponse {
    pub customer: Customer,
    pub message: String,
}

fn customer_not_found(raw_id: &str) -> AppError {
    AppError::NotFound(format!("customer {raw_id} not found"))
}

async fn list_customers(State(state): State<Arc<AppState>>) -> Json<Vec<Customer>> {
    Json(state.customers.list())
}

async fn list_customers_by_status(
    State(state): State<Arc<AppState>>,
    Path(status): Path<String>,
) -> Json<Vec<Customer>> {
    Json(state.customers.filter_by_status(&status))
}

async fn get_customer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Customer>, AppError> {
    let customer = parse_id(&id)
        .and_then(|customer_id| state.customers.get(customer_id))
        .ok_or_else(|| customer_not_found(&id))?;

    Ok(Json(customer))
}

async fn create_customer(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateCustomerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Customer>), AppError> {
    let Json(payload) = payload?;
    let new_customer = payload.validate()?;

    Ok((StatusCode::CREATED, Json(state.customers.create(new_customer))))
}

async fn update_customer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<CustomerPatch>, JsonRejection>,
) -> Result<Json<Customer>, AppError> {
    let Json(patch) = payload?;
    let customer = parse_id(&id)
        .and_then(|customer_id| state.customers.update(customer_id, patch))
        .ok_or_else(|| customer_not_found(&id))?;

    Ok(Json(customer))
}

async fn delete_customer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Customer>, AppError> {
    let customer = parse_id(&id)
        .and_then(|customer_id| state.customers.delete(customer_id))
        .ok_or_else(|| customer_not_found(&id))?;

    Ok(Json(customer))
}

async fn assign_driver(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<AssignDriverRequest>, JsonRejection>,
) -> Result<Json<AssignDriverResponse>, AppError> {
    let Json(payload) = payload?;
    let driver_id = payload.driver_id.map(RawId::into_text);

    let outcome = assign_and_publish(&state, &id, driver_id.as_deref())?;

    Ok(Json(AssignDriverResponse {
        message: format!(
            "Driver {} assigned to customer successfully",
            outcome.driver_name
        ),
        customer: outcome.customer,
    }))
}
