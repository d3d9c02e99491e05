//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (store ping)
//!
//! # Farmers
//! GET  /farmerList             - Farmer table (?textToSearch=)
//! GET  /api/farmers            - Same rows as JSON (?textToSearch=)
//! POST /saveFarmer             - Create farmer {personId, dropOut}
//! POST /dropOutFarmer          - Mark farmer as dropped out {personId}
//! POST /readFarmer             - Read farmer {personId}
//! POST /enrollFarmer           - Create person and farmer, redirect to detail
//! GET  /farmers/{person_id}    - Farmer detail
//! ```

pub mod farmers;
pub mod health;
pub mod home;

use axum::{
    Router,
    routing::{get, post},
};

use crate::db::FarmerStore;
use crate::state::AppState;

/// Create the farmer routes router.
pub fn farmer_routes<S: FarmerStore>() -> Router<AppState<S>> {
    Router::new()
        .route("/farmerList", get(farmers::list::<S>))
        .route("/api/farmers", get(farmers::api_list::<S>))
        .route("/saveFarmer", post(farmers::save::<S>))
        .route("/dropOutFarmer", post(farmers::drop_out::<S>))
        .route("/readFarmer", post(farmers::read::<S>))
        .route("/enrollFarmer", post(farmers::enroll::<S>))
        .route("/farmers/{person_id}", get(farmers::show::<S>))
}

/// Create the main router with all routes.
pub fn routes<S: FarmerStore>() -> Router<AppState<S>> {
    Router::new()
        .route("/", get(home::index))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness::<S>))
        .merge(farmer_routes())
}
