//! Transiciones puras del ledger
//!
//! Ninguna función de este módulo persiste ni notifica: reciben el estado
//! actual y devuelven el estado nuevo junto con la entrada afectada.
//! `ParkingService` aplica el resultado, guarda y notifica.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::models::vehicle::{Totals, VehicleCategory, VehicleEntry};
use crate::utils::validation::normalize_field;

/// Datos de un vehículo a registrar
#[derive(Debug, Clone, PartialEq)]
pub struct NewVehicle {
    pub plate: String,
    pub model: String,
    pub color: String,
}

impl NewVehicle {
    pub fn new(plate: impl Into<String>, model: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            plate: normalize_field(&plate.into()),
            model: normalize_field(&model.into()),
            color: normalize_field(&color.into()),
        }
    }

    /// Placa y modelo son obligatorios
    pub fn is_valid(&self) -> bool {
        !self.plate.is_empty() && !self.model.is_empty()
    }
}

/// Secuencia ordenada (orden de inserción) de entradas de una categoría
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    entries: Vec<VehicleEntry>,
}

impl Ledger {
    pub fn from_entries(entries: Vec<VehicleEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[VehicleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&VehicleEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Id basado en el instante de creación (ms), mayor que los existentes.
    /// Si ya existe `i64::MAX` se usa el menor id positivo libre.
    fn next_id(&self, now: DateTime<Utc>) -> i64 {
        let max_id = self.entries.iter().map(|e| e.id).max().unwrap_or(0);
        match max_id.checked_add(1) {
            Some(next) => now.timestamp_millis().max(next),
            None => {
                let mut id = 1;
                while self.get(id).is_some() {
                    id += 1;
                }
                id
            }
        }
    }

    /// Añade una entrada pendiente al final. `None` si faltan placa o modelo.
    pub fn with_added(&self, vehicle: &NewVehicle, now: DateTime<Utc>) -> Option<(Ledger, VehicleEntry)> {
        if !vehicle.is_valid() {
            return None;
        }

        let entry = VehicleEntry::new(
            self.next_id(now),
            vehicle.plate.clone(),
            vehicle.model.clone(),
            vehicle.color.clone(),
            now,
        );

        let mut entries = self.entries.clone();
        entries.push(entry.clone());
        Some((Ledger { entries }, entry))
    }

    /// Invierte el estado de pago. `None` si el id no existe.
    pub fn with_toggled(&self, id: i64, category: VehicleCategory) -> Option<(Ledger, VehicleEntry)> {
        let position = self.entries.iter().position(|e| e.id == id)?;
        let toggled = self.entries[position].toggled(category);

        let mut entries = self.entries.clone();
        entries[position] = toggled.clone();
        Some((Ledger { entries }, toggled))
    }

    /// Elimina la entrada. `None` si el id no existe.
    pub fn without(&self, id: i64) -> Option<(Ledger, VehicleEntry)> {
        let position = self.entries.iter().position(|e| e.id == id)?;

        let mut entries = self.entries.clone();
        let removed = entries.remove(position);
        Some((Ledger { entries }, removed))
    }

    /// Filtro sin distinguir mayúsculas sobre placa o modelo
    pub fn search(&self, term: &str) -> Vec<VehicleEntry> {
        let term = term.to_lowercase();
        self.entries
            .iter()
            .filter(|e| e.plate.to_lowercase().contains(&term) || e.model.to_lowercase().contains(&term))
            .cloned()
            .collect()
    }

    pub fn paid_total(&self) -> Decimal {
        self.entries.iter().filter(|e| e.paid).map(|e| e.amount).sum()
    }

    pub fn paid_count(&self) -> usize {
        self.entries.iter().filter(|e| e.paid).count()
    }

    /// Entradas sin pagar cuya antigüedad supera el umbral
    pub fn stale(&self, now: DateTime<Utc>, threshold: Duration) -> Vec<&VehicleEntry> {
        self.entries
            .iter()
            .filter(|e| !e.paid && now - e.created_at > threshold)
            .collect()
    }
}

/// Vehículo pendiente de pago desde hace demasiado tiempo
#[derive(Debug, Clone, PartialEq)]
pub struct StalePending {
    pub category: VehicleCategory,
    pub entry: VehicleEntry,
    pub hours: i64,
}

impl StalePending {
    pub fn message(&self) -> String {
        format!("Vehículo {} está pendiente desde hace {}h", self.entry.plate, self.hours)
    }
}

/// Los dos ledgers del estacionamiento
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledgers {
    pub cars: Ledger,
    pub motorcycles: Ledger,
}

impl Ledgers {
    pub fn get(&self, category: VehicleCategory) -> &Ledger {
        match category {
            VehicleCategory::Car => &self.cars,
            VehicleCategory::Motorcycle => &self.motorcycles,
        }
    }

    /// Copia con el ledger de `category` reemplazado
    pub fn with_ledger(&self, category: VehicleCategory, ledger: Ledger) -> Ledgers {
        match category {
            VehicleCategory::Car => Ledgers {
                cars: ledger,
                motorcycles: self.motorcycles.clone(),
            },
            VehicleCategory::Motorcycle => Ledgers {
                cars: self.cars.clone(),
                motorcycles: ledger,
            },
        }
    }

    pub fn totals(&self) -> Totals {
        let cars_total = self.cars.paid_total();
        let motorcycles_total = self.motorcycles.paid_total();
        Totals {
            cars_total,
            motorcycles_total,
            grand_total: cars_total + motorcycles_total,
            vehicle_count: self.cars.len() + self.motorcycles.len(),
            paid_count: self.cars.paid_count() + self.motorcycles.paid_count(),
        }
    }

    /// Revisión de pendientes en ambos ledgers (coches primero)
    pub fn stale_pending(&self, now: DateTime<Utc>, threshold: Duration) -> Vec<StalePending> {
        VehicleCategory::ALL
            .into_iter()
            .flat_map(|category| {
                self.get(category).stale(now, threshold).into_iter().map(move |entry| StalePending {
                    category,
                    entry: entry.clone(),
                    hours: entry.hours_parked(now),
                })
            })
            .collect()
    }
}
