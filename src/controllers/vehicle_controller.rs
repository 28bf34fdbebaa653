use std::sync::Arc;

use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::vehicle_dto::{
    ClearAllRequest, ClearAllResponse, CreateVehicleRequest, StaleCheckResponse, VehicleListResponse,
};
use crate::models::vehicle::{Totals, VehicleCategory, VehicleEntry};
use crate::services::parking_service::{ParkingService, SearchResults};
use crate::utils::errors::{bad_request_error, not_found_error, AppError};

pub struct VehicleController {
    parking: Arc<ParkingService>,
}

impl VehicleController {
    pub fn new(parking: Arc<ParkingService>) -> Self {
        Self { parking }
    }

    pub async fn list_all(&self) -> VehicleListResponse {
        VehicleListResponse::from(&self.parking.snapshot().await)
    }

    pub async fn list(&self, category: VehicleCategory) -> Vec<VehicleEntry> {
        self.parking.ledger(category).await
    }

    pub async fn search(&self, term: &str) -> SearchResults {
        self.parking.search(term).await
    }

    pub async fn totals(&self) -> Totals {
        self.parking.totals().await
    }

    pub async fn create(
        &self,
        category: VehicleCategory,
        request: CreateVehicleRequest,
    ) -> Result<ApiResponse<VehicleEntry>, AppError> {
        // Validar campos
        request.validate()?;

        let entry = self
            .parking
            .add(category, request.into())
            .await?
            .ok_or_else(|| bad_request_error("La placa y el modelo son obligatorios"))?;

        Ok(ApiResponse::success_with_message(entry, "Vehículo añadido con éxito"))
    }

    pub async fn toggle_status(&self, category: VehicleCategory, id: i64) -> Result<ApiResponse<VehicleEntry>, AppError> {
        let entry = self
            .parking
            .toggle_status(id, category)
            .await?
            .ok_or_else(|| not_found_error("Vehículo", &id.to_string()))?;

        Ok(ApiResponse::success_with_message(entry, "Estado de pago actualizado"))
    }

    pub async fn remove(&self, category: VehicleCategory, id: i64) -> Result<ApiResponse<VehicleEntry>, AppError> {
        let entry = self
            .parking
            .remove(id, category)
            .await?
            .ok_or_else(|| not_found_error("Vehículo", &id.to_string()))?;

        Ok(ApiResponse::success_with_message(entry, "Vehículo eliminado"))
    }

    pub async fn clear_all(&self, request: ClearAllRequest) -> Result<ApiResponse<ClearAllResponse>, AppError> {
        if !request.confirm {
            return Err(bad_request_error("Se requiere confirmación para eliminar todos los vehículos"));
        }

        let removed = self.parking.clear_all().await?;
        Ok(ApiResponse::success_with_message(
            ClearAllResponse { removed },
            "Todos los vehículos fueron eliminados",
        ))
    }

    pub async fn stale_check(&self, threshold: chrono::Duration) -> StaleCheckResponse {
        let stale = self.parking.check_stale_pending(threshold).await;
        StaleCheckResponse {
            stale_count: stale.len(),
            notifications: stale.iter().map(|s| s.message()).collect(),
        }
    }
}
