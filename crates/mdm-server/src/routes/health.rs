// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Health HTTP handler.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::api::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
	Healthy,
	Unhealthy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
	pub status: HealthStatus,
	pub version: String,
	pub database: HealthStatus,
	pub database_latency_ms: u64,
}

/// GET /health - liveness plus a database round trip. Public.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
	let start = Instant::now();
	let database = match sqlx::query("SELECT 1").execute(&state.pool).await {
		Ok(_) => HealthStatus::Healthy,
		Err(e) => {
			tracing::warn!(error = %e, "database health check failed");
			HealthStatus::Unhealthy
		}
	};

	let response = HealthResponse {
		status: database,
		version: env!("CARGO_PKG_VERSION").to_string(),
		database,
		database_latency_ms: start.elapsed().as_millis() as u64,
	};
	let status = match database {
		HealthStatus::Healthy => StatusCode::OK,
		HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
	};
	(status, Json(response))
}
