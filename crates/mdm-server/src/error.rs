// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Server error type and the uniform JSON error body.

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use chrono::{DateTime, Utc};
use mdm_server_auth::Denial;
use mdm_server_db::DbError;
use serde::{Deserialize, Serialize};

use crate::denial::forbidden_response;

/// Body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
	pub error: String,
	pub message: String,
	pub status: u16,
	pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
	pub fn new(status: StatusCode, error: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			error: error.into(),
			message: message.into(),
			status: status.as_u16(),
			timestamp: Utc::now(),
		}
	}

	pub fn into_response_with(self, status: StatusCode) -> Response {
		(status, Json(self)).into_response()
	}
}

/// Build a JSON error response with the status echoed in the body.
pub fn error_response(status: StatusCode, error: &str, message: &str) -> Response {
	ErrorResponse::new(status, error, message).into_response_with(status)
}

pub fn unauthorized_response() -> Response {
	error_response(StatusCode::UNAUTHORIZED, "unauthorized", "Authentication required")
}

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	#[error("unauthorized: {0}")]
	Unauthorized(String),

	#[error("access denied")]
	Forbidden(Denial),

	#[error("not found: {0}")]
	NotFound(String),

	#[error("bad request: {0}")]
	BadRequest(String),

	#[error("database error: {0}")]
	Db(#[from] DbError),
}

impl From<Denial> for ServerError {
	fn from(denial: Denial) -> Self {
		ServerError::Forbidden(denial)
	}
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		match self {
			ServerError::Unauthorized(reason) => {
				tracing::debug!(%reason, "request not authenticated");
				unauthorized_response()
			}
			ServerError::Forbidden(denial) => forbidden_response(denial),
			ServerError::NotFound(message) => error_response(StatusCode::NOT_FOUND, "not_found", &message),
			ServerError::BadRequest(message) => {
				error_response(StatusCode::BAD_REQUEST, "bad_request", &message)
			}
			ServerError::Db(e) => {
				tracing::error!(error = %e, "database error");
				error_response(
					StatusCode::INTERNAL_SERVER_ERROR,
					"internal_error",
					"Internal server error",
				)
			}
		}
	}
}
