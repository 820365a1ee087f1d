//! API handlers for the server.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use parking_lot::Mutex;
use savanna_core::{Error, SimConfig};
use savanna_world::{SeededRandom, Simulation, Snapshot};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Shared handle to the one simulation. Handlers lock, mutate
/// synchronously, and release; the lock is never held across an await.
pub type SharedSimulation = Arc<Mutex<Option<Simulation>>>;

#[derive(Clone)]
pub struct AppState {
    pub sim: SharedSimulation,
    /// Fixed seed for reproducible runs; entropy-seeded when absent.
    pub seed: Option<u64>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn default_size() -> usize {
    SimConfig::default().size
}

#[derive(Debug, Deserialize)]
pub struct StartRequest {
    pub plants: u32,
    pub herbivores: u32,
    pub carnivores: u32,
    #[serde(default = "default_size")]
    pub size: usize,
}

/// Start (or restart) the simulation with the requested populations.
/// A rejected request leaves any running simulation untouched.
pub async fn start_simulation(
    State(state): State<AppState>,
    Json(req): Json<StartRequest>,
) -> Result<Json<Snapshot>, ApiError> {
    info!(
        plants = req.plants,
        herbivores = req.herbivores,
        carnivores = req.carnivores,
        size = req.size,
        "starting simulation"
    );

    let rng = match state.seed {
        Some(seed) => SeededRandom::seeded(seed),
        None => SeededRandom::from_entropy(),
    };
    let mut sim = Simulation::new(SimConfig::with_size(req.size), Box::new(rng));
    let snapshot = sim.initialize(req.plants, req.herbivores, req.carnivores)?;

    *state.sim.lock() = Some(sim);
    Ok(Json(snapshot))
}

/// Advance the simulation one tick and return the resulting grid.
pub async fn next_iteration(State(state): State<AppState>) -> Result<Json<Snapshot>, ApiError> {
    let mut guard = state.sim.lock();
    let sim = guard.as_mut().ok_or(ApiError::NotStarted)?;
    Ok(Json(sim.step()))
}

// Error handling
pub enum ApiError {
    BadRequest(String),
    NotStarted,
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotStarted => {
                (StatusCode::CONFLICT, "simulation not started".to_string())
            }
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, message).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::InvalidEntityCount { .. } => ApiError::BadRequest(err.to_string()),
            Error::PlacementExhausted { .. } => {
                error!("placement failed: {}", err);
                ApiError::Internal(err.to_string())
            }
        }
    }
}
