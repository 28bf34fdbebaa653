//! Servicio de estacionamiento
//!
//! Dueño explícito del estado de los dos ledgers. Cada mutación sigue el
//! mismo ciclo: latencia simulada → transición pura → escritura en el
//! almacén (write-through) → notificación. El estado en memoria sólo
//! cambia si la escritura tuvo éxito. Las mutaciones se serializan
//! con el mutex del estado, así que sólo una está en curso a la vez.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Duration;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::models::notification::NotificationKind;
use crate::models::vehicle::{Totals, VehicleCategory, VehicleEntry};
use crate::repositories::LedgerRepository;
use crate::services::ledger::{Ledger, Ledgers, NewVehicle, StalePending};
use crate::services::notification_service::NotificationService;
use crate::utils::clock::SharedClock;
use crate::utils::errors::AppResult;
use crate::utils::latency::{LedgerOperation, SharedLatency};

/// Resultado de una búsqueda en ambos ledgers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults {
    pub cars: Vec<VehicleEntry>,
    pub motorcycles: Vec<VehicleEntry>,
}

/// Marca el servicio como ocupado mientras vive
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn new(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct ParkingService {
    state: Mutex<Ledgers>,
    repository: LedgerRepository,
    notifications: Arc<NotificationService>,
    clock: SharedClock,
    latency: SharedLatency,
    busy: AtomicBool,
}

impl ParkingService {
    /// Restaura los ledgers guardados. Si el almacén está vacío y
    /// `seed_demo` está activo, siembra los vehículos de demostración.
    pub async fn load(
        repository: LedgerRepository,
        notifications: Arc<NotificationService>,
        clock: SharedClock,
        latency: SharedLatency,
        seed_demo: bool,
    ) -> AppResult<Self> {
        let cars = repository.load(VehicleCategory::Car).await?;
        let motorcycles = repository.load(VehicleCategory::Motorcycle).await?;

        let ledgers = if cars.is_none() && motorcycles.is_none() && seed_demo {
            let seeded = demo_ledgers(&clock);
            for category in VehicleCategory::ALL {
                repository.save(category, seeded.get(category).entries()).await?;
            }
            info!("🌱 Ledgers sembrados con {} vehículos de demostración", seeded.totals().vehicle_count);
            seeded
        } else {
            Ledgers {
                cars: Ledger::from_entries(cars.unwrap_or_default()),
                motorcycles: Ledger::from_entries(motorcycles.unwrap_or_default()),
            }
        };

        info!(
            "🅿️ Ledgers restaurados: {} coches, {} motos",
            ledgers.cars.len(),
            ledgers.motorcycles.len()
        );

        Ok(Self {
            state: Mutex::new(ledgers),
            repository,
            notifications,
            clock,
            latency,
            busy: AtomicBool::new(false),
        })
    }

    /// Hay una mutación en curso
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    pub async fn snapshot(&self) -> Ledgers {
        self.state.lock().await.clone()
    }

    pub async fn ledger(&self, category: VehicleCategory) -> Vec<VehicleEntry> {
        self.state.lock().await.get(category).entries().to_vec()
    }

    /// Registrar un vehículo. `None` si faltan placa o modelo.
    pub async fn add(&self, category: VehicleCategory, vehicle: NewVehicle) -> AppResult<Option<VehicleEntry>> {
        if !vehicle.is_valid() {
            debug!("⏭️ Alta ignorada: placa o modelo vacíos");
            return Ok(None);
        }

        let mut state = self.state.lock().await;
        let _busy = BusyGuard::new(&self.busy);
        self.latency.pause(LedgerOperation::Add).await;

        let now = self.clock.now();
        let Some((ledger, entry)) = state.get(category).with_added(&vehicle, now) else {
            return Ok(None);
        };

        self.repository.save(category, ledger.entries()).await?;
        *state = state.with_ledger(category, ledger);

        info!("🚗 {} {} registrado (id {})", category, entry.plate, entry.id);
        self.notifications
            .push("Vehículo añadido con éxito", NotificationKind::Success)
            .await;
        Ok(Some(entry))
    }

    /// Alternar pagado/pendiente. `None` si el id no existe.
    pub async fn toggle_status(&self, id: i64, category: VehicleCategory) -> AppResult<Option<VehicleEntry>> {
        let mut state = self.state.lock().await;
        let _busy = BusyGuard::new(&self.busy);
        self.latency.pause(LedgerOperation::TogglePayment).await;

        let Some((ledger, entry)) = state.get(category).with_toggled(id, category) else {
            debug!("⏭️ Cambio de pago ignorado: {} {} no existe", category, id);
            return Ok(None);
        };

        self.repository.save(category, ledger.entries()).await?;
        *state = state.with_ledger(category, ledger);

        info!("💳 {} {} ahora {:?} ({})", category, entry.plate, entry.status(), entry.amount);
        self.notifications
            .push("Estado de pago actualizado", NotificationKind::Success)
            .await;
        Ok(Some(entry))
    }

    /// Eliminar un vehículo. `None` si el id no existe.
    pub async fn remove(&self, id: i64, category: VehicleCategory) -> AppResult<Option<VehicleEntry>> {
        let mut state = self.state.lock().await;
        let _busy = BusyGuard::new(&self.busy);
        self.latency.pause(LedgerOperation::Remove).await;

        let Some((ledger, entry)) = state.get(category).without(id) else {
            debug!("⏭️ Baja ignorada: {} {} no existe", category, id);
            return Ok(None);
        };

        self.repository.save(category, ledger.entries()).await?;
        *state = state.with_ledger(category, ledger);

        info!("🗑️ {} {} eliminado (id {})", category, entry.plate, entry.id);
        self.notifications.push("Vehículo eliminado", NotificationKind::Info).await;
        Ok(Some(entry))
    }

    /// Vaciar ambos ledgers; devuelve cuántas entradas se eliminaron
    pub async fn clear_all(&self) -> AppResult<usize> {
        let mut state = self.state.lock().await;
        let _busy = BusyGuard::new(&self.busy);
        self.latency.pause(LedgerOperation::ClearAll).await;

        let removed = state.cars.len() + state.motorcycles.len();
        for (index, category) in VehicleCategory::ALL.into_iter().enumerate() {
            if let Err(e) = self.repository.save(category, &[]).await {
                // restaurar las categorías ya vaciadas en el almacén
                for saved in VehicleCategory::ALL.into_iter().take(index) {
                    if let Err(restore) = self.repository.save(saved, state.get(saved).entries()).await {
                        warn!("⚠️ No se pudo restaurar {} tras un vaciado fallido: {}", saved, restore);
                    }
                }
                return Err(e.into());
            }
        }
        *state = Ledgers::default();

        warn!("🧹 Todos los vehículos eliminados ({})", removed);
        self.notifications
            .push("Todos los vehículos fueron eliminados", NotificationKind::Success)
            .await;
        Ok(removed)
    }

    pub async fn search(&self, term: &str) -> SearchResults {
        let state = self.state.lock().await;
        SearchResults {
            cars: state.cars.search(term),
            motorcycles: state.motorcycles.search(term),
        }
    }

    /// Totales recalculados en cada lectura
    pub async fn totals(&self) -> Totals {
        self.state.lock().await.totals()
    }

    /// Una notificación por cada vehículo pendiente más allá del umbral
    pub async fn check_stale_pending(&self, threshold: Duration) -> Vec<StalePending> {
        let now = self.clock.now();
        let stale = self.snapshot().await.stale_pending(now, threshold);

        for pending in &stale {
            self.notifications.push(pending.message(), NotificationKind::Warning).await;
        }

        debug!("⏰ Revisión de pendientes: {} vehículos fuera de plazo", stale.len());
        stale
    }
}

/// Vehículos de demostración con antigüedades de 1 a 4 horas
fn demo_ledgers(clock: &SharedClock) -> Ledgers {
    let now = clock.now();
    let seed = |ledger: Ledger, category: VehicleCategory, vehicle: NewVehicle, hours: i64, paid: bool| {
        let created_at = now - Duration::hours(hours);
        let Some((added, entry)) = ledger.with_added(&vehicle, created_at) else {
            return ledger;
        };
        if !paid {
            return added;
        }
        added.with_toggled(entry.id, category).map(|(toggled, _)| toggled).unwrap_or(added)
    };

    let cars = seed(
        Ledger::default(),
        VehicleCategory::Car,
        NewVehicle::new("ABC-1234", "Honda Civic", "Negro"),
        2,
        true,
    );
    let cars = seed(
        cars,
        VehicleCategory::Car,
        NewVehicle::new("XYZ-5678", "Toyota Corolla", "Blanco"),
        3,
        false,
    );
    let motorcycles = seed(
        Ledger::default(),
        VehicleCategory::Motorcycle,
        NewVehicle::new("MOT-1111", "Honda CB 600", "Azul"),
        1,
        true,
    );
    let motorcycles = seed(
        motorcycles,
        VehicleCategory::Motorcycle,
        NewVehicle::new("MOT-2222", "Yamaha YBR", "Rojo"),
        4,
        false,
    );

    Ledgers { cars, motorcycles }
}
