use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::{Duration, TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use parking_ledger::config::environment::EnvironmentConfig;
use parking_ledger::models::auth::{AuthOutcome, Credentials};
use parking_ledger::services::AuthGateway;
use parking_ledger::storage::{KeyValueStore, MemoryStore, SharedStore};
use parking_ledger::utils::clock::ManualClock;
use parking_ledger::utils::errors::{AppError, AppResult};
use parking_ledger::utils::latency::NoLatency;
use parking_ledger::{build_app, build_state};

/// Acepta sólo maria@parking.test / secret; "down@..." simula un endpoint caído
struct StubGateway;

#[async_trait]
impl AuthGateway for StubGateway {
    async fn authenticate(&self, credentials: &Credentials) -> AppResult<AuthOutcome> {
        if credentials.email.starts_with("down@") {
            return Err(AppError::ExternalApi("connection refused".to_string()));
        }
        if credentials.email == "maria@parking.test" && credentials.password == "secret" {
            Ok(AuthOutcome::granted("Maria"))
        } else {
            Ok(AuthOutcome::denied())
        }
    }
}

struct TestApp {
    router: Router,
    store: SharedStore,
    clock: Arc<ManualClock>,
}

impl TestApp {
    async fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()), false).await
    }

    async fn with_store(store: SharedStore, seed_demo_data: bool) -> Self {
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2025, 8, 18, 9, 0, 0).unwrap()));
        let config = EnvironmentConfig {
            seed_demo_data,
            ..EnvironmentConfig::default()
        };
        let state = build_state(config, store.clone(), Arc::new(StubGateway), clock.clone(), Arc::new(NoLatency))
            .await
            .unwrap();

        Self {
            router: build_app(state),
            store,
            clock,
        }
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    async fn add_car(&self, plate: &str, model: &str) -> Value {
        let (status, body) = self
            .send(Method::POST, "/api/vehicles/car", Some(json!({ "plate": plate, "model": model, "color": "Black" })))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["data"].clone()
    }
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "parking_ledger");
}

#[tokio::test]
async fn test_civic_scenario() {
    let app = TestApp::new().await;

    let added = app.add_car("ABC-1234", "Civic").await;
    assert_eq!(added["paid"], false);
    assert_eq!(added["amount"], "0");
    let id = added["id"].as_i64().unwrap();

    let (_, cars) = app.get("/api/vehicles/car").await;
    assert_eq!(cars.as_array().unwrap().len(), 1);

    let toggle = format!("/api/vehicles/car/{}/toggle", id);
    let (status, body) = app.send(Method::PUT, &toggle, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["paid"], true);
    assert_eq!(body["data"]["amount"], "15.00");

    let (_, body) = app.send(Method::PUT, &toggle, None).await;
    assert_eq!(body["data"]["paid"], false);
    assert_eq!(body["data"]["amount"], "0");

    let (status, _) = app.send(Method::DELETE, &format!("/api/vehicles/car/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, cars) = app.get("/api/vehicles/car").await;
    assert!(cars.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_add_with_blank_plate_is_rejected() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(Method::POST, "/api/vehicles/motorcycle", Some(json!({ "plate": "  ", "model": "CB 600" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (_, motorcycles) = app.get("/api/vehicles/motorcycle").await;
    assert!(motorcycles.as_array().unwrap().is_empty());

    let (_, notifications) = app.get("/api/notifications").await;
    assert!(notifications.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_lookup_miss_is_not_found_and_leaves_ledger_untouched() {
    let app = TestApp::new().await;
    let added = app.add_car("ABC-1234", "Civic").await;
    let id = added["id"].as_i64().unwrap();

    let (status, _) = app.send(Method::PUT, "/api/vehicles/car/42/toggle", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // el id existe, pero en el otro ledger
    let (status, _) = app
        .send(Method::DELETE, &format!("/api/vehicles/motorcycle/{}", id), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, cars) = app.get("/api/vehicles/car").await;
    assert_eq!(cars[0]["paid"], false);
}

#[tokio::test]
async fn test_unknown_category_is_rejected() {
    let app = TestApp::new().await;
    let (status, _) = app.get("/api/vehicles/truck").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_clear_all_requires_confirmation() {
    let app = TestApp::new().await;
    app.add_car("ABC-1234", "Civic").await;

    let (status, _) = app
        .send(Method::DELETE, "/api/vehicles", Some(json!({ "confirm": false })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, totals) = app.get("/api/vehicles/totals").await;
    assert_eq!(totals["vehicleCount"], 1);

    let (status, body) = app
        .send(Method::DELETE, "/api/vehicles", Some(json!({ "confirm": true })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["removed"], 1);

    let (_, all) = app.get("/api/vehicles").await;
    assert!(all["cars"].as_array().unwrap().is_empty());
    assert!(all["motorcycles"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_search_and_totals_over_demo_data() {
    let app = TestApp::with_store(Arc::new(MemoryStore::new()), true).await;

    let (_, all) = app.get("/api/vehicles/search").await;
    assert_eq!(all["cars"].as_array().unwrap().len(), 2);
    assert_eq!(all["motorcycles"].as_array().unwrap().len(), 2);

    let (_, found) = app.get("/api/vehicles/search?term=corolla").await;
    assert_eq!(found["cars"].as_array().unwrap().len(), 1);
    assert_eq!(found["cars"][0]["plate"], "XYZ-5678");
    assert!(found["motorcycles"].as_array().unwrap().is_empty());

    let (_, totals) = app.get("/api/vehicles/totals").await;
    assert_eq!(totals["carsTotal"], "15.00");
    assert_eq!(totals["motorcyclesTotal"], "8.00");
    assert_eq!(totals["grandTotal"], "23.00");
    assert_eq!(totals["paidCount"], 2);

    let (_, tariffs) = app.get("/api/vehicles/tariffs").await;
    assert_eq!(tariffs["car"], "15.00");
    assert_eq!(tariffs["motorcycle"], "8.00");
}

#[tokio::test]
async fn test_stale_check_reports_old_pending_entries() {
    let app = TestApp::new().await;
    app.add_car("ABC-1234", "Civic").await;
    app.clock.advance(Duration::hours(3));

    let (status, body) = app.send(Method::POST, "/api/vehicles/stale-check", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["staleCount"], 1);
    assert_eq!(body["notifications"][0], "Vehículo ABC-1234 está pendiente desde hace 3h");

    let (_, notifications) = app.get("/api/notifications").await;
    let notifications = notifications.as_array().unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0]["kind"], "warning");
}

#[tokio::test]
async fn test_notifications_expire() {
    let app = TestApp::new().await;
    app.add_car("ABC-1234", "Civic").await;

    let (_, notifications) = app.get("/api/notifications").await;
    assert_eq!(notifications[0]["message"], "Vehículo añadido con éxito");

    app.clock.advance(Duration::seconds(5));
    let (_, notifications) = app.get("/api/notifications").await;
    assert!(notifications.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_ledgers_survive_restart() {
    let store: SharedStore = Arc::new(MemoryStore::new());
    let app = TestApp::with_store(store.clone(), false).await;
    let added = app.add_car("ABC-1234", "Civic").await;
    app.send(Method::PUT, &format!("/api/vehicles/car/{}/toggle", added["id"]), None)
        .await;
    let (_, before) = app.get("/api/vehicles").await;

    let restarted = TestApp::with_store(store, true).await;
    let (_, after) = restarted.get("/api/vehicles").await;

    assert_eq!(before, after);
    assert_eq!(after["cars"][0]["createdAt"], added["createdAt"]);
}

#[tokio::test]
async fn test_corrupt_ledger_starts_empty() {
    let store: SharedStore = Arc::new(MemoryStore::new());
    store
        .set("parking_ledger:ledger:cars", "{not json".to_string())
        .await
        .unwrap();

    let app = TestApp::with_store(store, false).await;
    let (status, cars) = app.get("/api/vehicles/car").await;
    assert_eq!(status, StatusCode::OK);
    assert!(cars.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_connectivity_status() {
    let app = TestApp::new().await;

    let (_, status) = app.get("/api/status").await;
    assert_eq!(status, json!({ "online": true, "busy": false }));

    let (_, body) = app
        .send(Method::PUT, "/api/status/connectivity", Some(json!({ "online": false })))
        .await;
    assert_eq!(body["online"], false);
    assert_eq!(body["notification"]["message"], "Modo offline activado");

    // sin transición no hay notificación
    let (_, body) = app
        .send(Method::PUT, "/api/status/connectivity", Some(json!({ "online": false })))
        .await;
    assert!(body["notification"].is_null());

    // offline no bloquea mutaciones
    app.add_car("ABC-1234", "Civic").await;
}

#[tokio::test]
async fn test_login_logout_flow() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            Some(json!({ "email": "maria@parking.test", "password": "secret" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["name"], "Maria");
    assert_eq!(body["redirect"], "/dashboard");

    let stored = app.store.get("parking_ledger:session:user").await.unwrap();
    assert_eq!(stored.as_deref(), Some("Maria"));
    let (_, me) = app.get("/api/auth/me").await;
    assert_eq!(me["name"], "Maria");

    let (_, body) = app.send(Method::POST, "/api/auth/logout", None).await;
    assert_eq!(body["redirect"], "/");
    let (_, me) = app.get("/api/auth/me").await;
    assert!(me["name"].is_null());
}

#[tokio::test]
async fn test_failed_login_is_reported_inline() {
    let app = TestApp::new().await;

    for email in ["maria@parking.test", "down@parking.test"] {
        let (status, body) = app
            .send(Method::POST, "/api/auth/login", Some(json!({ "email": email, "password": "wrong" })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Login inválido");
    }

    let (_, me) = app.get("/api/auth/me").await;
    assert!(me["name"].is_null());
}
