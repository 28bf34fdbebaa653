//! Modelo de Vehicle
//!
//! Este módulo contiene la entrada de vehículo del estacionamiento, la
//! categoría (ledger al que pertenece) y los totales derivados.
//! El formato serde es el mismo que se persiste en el almacén local.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Tarifa fija de coche
pub const CAR_TARIFF: Decimal = Decimal::from_parts(1500, 0, 0, false, 2);

/// Tarifa fija de moto
pub const MOTORCYCLE_TARIFF: Decimal = Decimal::from_parts(800, 0, 0, false, 2);

/// Categoría de vehículo: cada una tiene su propio ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleCategory {
    Car,
    Motorcycle,
}

impl VehicleCategory {
    pub const ALL: [VehicleCategory; 2] = [VehicleCategory::Car, VehicleCategory::Motorcycle];

    /// Importe cobrado al marcar una entrada como pagada
    pub fn tariff(&self) -> Decimal {
        match self {
            VehicleCategory::Car => CAR_TARIFF,
            VehicleCategory::Motorcycle => MOTORCYCLE_TARIFF,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleCategory::Car => "car",
            VehicleCategory::Motorcycle => "motorcycle",
        }
    }

    /// Nombre del ledger en plural, usado en claves de almacenamiento
    pub fn ledger_name(&self) -> &'static str {
        match self {
            VehicleCategory::Car => "cars",
            VehicleCategory::Motorcycle => "motorcycles",
        }
    }
}

impl std::fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estado de pago de una entrada
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

/// Entrada de vehículo en un ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleEntry {
    pub id: i64,
    pub plate: String,
    pub model: String,
    #[serde(default)]
    pub color: String,
    pub paid: bool,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

impl VehicleEntry {
    /// Nueva entrada pendiente de pago
    pub fn new(id: i64, plate: String, model: String, color: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            plate,
            model,
            color,
            paid: false,
            amount: Decimal::ZERO,
            created_at,
        }
    }

    pub fn status(&self) -> PaymentStatus {
        if self.paid {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Pending
        }
    }

    /// Copia con el estado de pago invertido; el importe sigue al estado
    pub fn toggled(&self, category: VehicleCategory) -> Self {
        let paid = !self.paid;
        Self {
            paid,
            amount: if paid { category.tariff() } else { Decimal::ZERO },
            ..self.clone()
        }
    }

    /// El importe corresponde al estado de pago: la tarifa si está pagada, 0 si no
    pub fn is_consistent(&self, category: VehicleCategory) -> bool {
        if self.paid {
            self.amount == category.tariff()
        } else {
            self.amount.is_zero()
        }
    }

    /// Horas completas transcurridas desde la entrada
    pub fn hours_parked(&self, now: DateTime<Utc>) -> i64 {
        (now - self.created_at).num_hours()
    }
}

/// Totales derivados de ambos ledgers; nunca se cachean
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub cars_total: Decimal,
    pub motorcycles_total: Decimal,
    pub grand_total: Decimal,
    pub vehicle_count: usize,
    pub paid_count: usize,
}
