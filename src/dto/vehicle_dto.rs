use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::notification::Notification;
use crate::models::vehicle::{VehicleCategory, VehicleEntry};
use crate::services::ledger::{Ledgers, NewVehicle};
use crate::utils::validation::validate_not_blank;

// Request para registrar un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(custom = "validate_not_blank")]
    pub plate: String,
    #[validate(custom = "validate_not_blank")]
    pub model: String,
    #[serde(default)]
    pub color: String,
}

impl From<CreateVehicleRequest> for NewVehicle {
    fn from(request: CreateVehicleRequest) -> Self {
        NewVehicle::new(request.plate, request.model, request.color)
    }
}

// Query de búsqueda
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub term: String,
}

// Segundo paso de la confirmación de vaciado
#[derive(Debug, Deserialize)]
pub struct ClearAllRequest {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Serialize)]
pub struct ClearAllResponse {
    pub removed: usize,
}

// Los dos ledgers
#[derive(Debug, Serialize, Deserialize)]
pub struct VehicleListResponse {
    pub cars: Vec<VehicleEntry>,
    pub motorcycles: Vec<VehicleEntry>,
}

impl From<&Ledgers> for VehicleListResponse {
    fn from(ledgers: &Ledgers) -> Self {
        Self {
            cars: ledgers.cars.entries().to_vec(),
            motorcycles: ledgers.motorcycles.entries().to_vec(),
        }
    }
}

// Tarifas fijas por categoría
#[derive(Debug, Serialize)]
pub struct TariffsResponse {
    pub car: Decimal,
    pub motorcycle: Decimal,
}

impl TariffsResponse {
    pub fn current() -> Self {
        Self {
            car: VehicleCategory::Car.tariff(),
            motorcycle: VehicleCategory::Motorcycle.tariff(),
        }
    }
}

// Resultado de una revisión manual de pendientes
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaleCheckResponse {
    pub stale_count: usize,
    pub notifications: Vec<String>,
}

// Estado del servicio
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub online: bool,
    pub busy: bool,
}

#[derive(Debug, Deserialize)]
pub struct ConnectivityRequest {
    pub online: bool,
}

#[derive(Debug, Serialize)]
pub struct ConnectivityResponse {
    pub online: bool,
    pub notification: Option<Notification>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_vehicle_request_validation() {
        let valid: CreateVehicleRequest =
            serde_json::from_str(r#"{"plate":"ABC-1234","model":"Civic"}"#).unwrap();
        assert!(valid.validate().is_ok());
        assert_eq!(valid.color, "");

        let blank: CreateVehicleRequest =
            serde_json::from_str(r#"{"plate":"   ","model":"Civic","color":"Black"}"#).unwrap();
        let errors = blank.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("plate"));
    }

    #[test]
    fn test_long_fields_are_accepted() {
        let request = CreateVehicleRequest {
            plate: "X".repeat(64),
            model: "Volkswagen Transporter T6.1 California Ocean Edition ".repeat(3),
            color: "Azul metalizado con franjas blancas".to_string(),
        };
        assert!(request.validate().is_ok());

        let vehicle = NewVehicle::from(request);
        assert_eq!(vehicle.plate.len(), 64);
        assert!(vehicle.is_valid());
    }

    #[test]
    fn test_clear_all_requires_explicit_confirm() {
        let request: ClearAllRequest = serde_json::from_str("{}").unwrap();
        assert!(!request.confirm);
    }
}
