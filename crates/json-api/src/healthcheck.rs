//! Scoops JSON API Healthcheck Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::{extensions::*, state::State};

/// Healthcheck response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Whether the service can handle requests
    pub ok: bool,

    /// Database status, `up` or `down`
    pub db: String,
}

/// Healthcheck handler
///
/// Returns service health status, checking database connectivity.
#[endpoint(
    tags("health"),
    summary = "Health check endpoint",
    responses(
        (status_code = StatusCode::OK, description = "Service healthy"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Database unavailable"),
    ),
)]
pub(crate) async fn handler(
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<HealthResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    match state.app.health.check_database().await {
        Ok(()) => Ok(Json(HealthResponse {
            ok: true,
            db: "up".to_string(),
        })),
        Err(source) => {
            error!("database healthcheck failed: {source}");

            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

            Ok(Json(HealthResponse {
                ok: false,
                db: "down".to_string(),
            }))
        }
    }
}
