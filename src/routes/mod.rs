pub mod auth_routes;
pub mod status_routes;
pub mod vehicle_routes;
