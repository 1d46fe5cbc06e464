// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Person HTTP handlers.
//!
//! - `GET /api/persons`, `POST /api/persons`: guarded at route level by
//!   `{org_prefix}.Read.User` / `{org_prefix}.Write.User`
//! - `GET|PUT|DELETE /api/persons/{id}`: guarded in the handler by the
//!   resource-aware check, which requires e.g. `{org_prefix}.Write.Lecturer`
//!   for a lecturer
//!
//! A missing person is reported as 404 only after the check allowed the request,
//! which in practice means the caller holds a bypass role.

use axum::{
	extract::{rejection::JsonRejection, Path, Query, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use mdm_server_auth::Permission;
use mdm_server_db::{NewPerson, Person, PersonUpdate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
	api::AppState, auth_middleware::RequireAuth, error::ServerError,
	rbac_middleware::authorize_resource,
};

pub const DEFAULT_PAGE_SIZE: i64 = 50;
pub const MAX_PAGE_SIZE: i64 = 200;
const MAX_NAME_LENGTH: usize = 200;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
	pub limit: Option<i64>,
	pub offset: Option<i64>,
}

impl ListParams {
	pub fn limit(&self) -> i64 {
		self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
	}

	pub fn offset(&self) -> i64 {
		self.offset.unwrap_or(0).max(0)
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListPersonsResponse {
	pub persons: Vec<Person>,
	pub total: i64,
	pub limit: i64,
	pub offset: i64,
}

/// GET /api/persons
pub async fn list_persons(
	State(state): State<AppState>,
	Query(params): Query<ListParams>,
) -> Result<Json<ListPersonsResponse>, ServerError> {
	let (limit, offset) = (params.limit(), params.offset());
	let persons = state.persons.list_persons(limit, offset).await?;
	let total = state.persons.count_persons().await?;

	Ok(Json(ListPersonsResponse {
		persons,
		total,
		limit,
		offset,
	}))
}

/// POST /api/persons
pub async fn create_person(
	State(state): State<AppState>,
	Json(new): Json<NewPerson>,
) -> Result<impl IntoResponse, ServerError> {
	let new = NewPerson {
		kind: new.kind,
		given_name: validate_name("given_name", &new.given_name)?,
		family_name: validate_name("family_name", &new.family_name)?,
		email: validate_email(new.email)?,
	};
	let person = state.persons.create_person(&new).await?;
	tracing::info!(person_id = %person.id, kind = %person.kind, "person created");
	Ok((StatusCode::CREATED, Json(person)))
}

/// GET /api/persons/{id}
pub async fn get_person(
	RequireAuth(ctx): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<Person>, ServerError> {
	authorize_resource(&state.engine, &ctx, &id, Permission::Read).await?;
	let id = parse_person_id(&id)?;

	state
		.persons
		.get_person(id)
		.await?
		.map(Json)
		.ok_or_else(person_not_found)
}

/// PUT /api/persons/{id}
pub async fn update_person(
	RequireAuth(ctx): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
	body: Result<Json<PersonUpdate>, JsonRejection>,
) -> Result<Json<Person>, ServerError> {
	// The body is only inspected once the caller is known to be allowed.
	authorize_resource(&state.engine, &ctx, &id, Permission::Write).await?;
	let id = parse_person_id(&id)?;
	let Json(update) = body.map_err(|e| ServerError::BadRequest(e.body_text()))?;
	let update = PersonUpdate {
		given_name: validate_name("given_name", &update.given_name)?,
		family_name: validate_name("family_name", &update.family_name)?,
		email: validate_email(update.email)?,
	};

	let person = state
		.persons
		.update_person(id, &update)
		.await?
		.ok_or_else(person_not_found)?;
	tracing::info!(person_id = %id, username = %ctx.username(), "person updated");
	Ok(Json(person))
}

/// DELETE /api/persons/{id}
pub async fn delete_person(
	RequireAuth(ctx): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
	authorize_resource(&state.engine, &ctx, &id, Permission::Delete).await?;
	let id = parse_person_id(&id)?;

	if !state.persons.delete_person(id).await? {
		return Err(person_not_found());
	}
	tracing::info!(person_id = %id, username = %ctx.username(), "person deleted");
	Ok(StatusCode::NO_CONTENT)
}

fn person_not_found() -> ServerError {
	ServerError::NotFound("Person not found".to_string())
}

/// Only reachable for bypass holders; the resource check rejects malformed ids
/// for everyone else.
fn parse_person_id(raw: &str) -> Result<Uuid, ServerError> {
	Uuid::parse_str(raw).map_err(|_| ServerError::BadRequest("Invalid person id".to_string()))
}

fn validate_name(field: &str, value: &str) -> Result<String, ServerError> {
	let trimmed = value.trim();
	if trimmed.is_empty() {
		return Err(ServerError::BadRequest(format!("{field} must not be empty")));
	}
	if trimmed.chars().count() > MAX_NAME_LENGTH {
		return Err(ServerError::BadRequest(format!(
			"{field} must be at most {MAX_NAME_LENGTH} characters"
		)));
	}
	Ok(trimmed.to_string())
}

fn validate_email(email: Option<String>) -> Result<Option<String>, ServerError> {
	match email.map(|e| e.trim().to_string()) {
		None => Ok(None),
		Some(e) if e.is_empty() => Ok(None),
		Some(e) if e.contains('@') && !e.starts_with('@') && !e.ends_with('@') => Ok(Some(e)),
		Some(_) => Err(ServerError::BadRequest("email is not a valid address".to_string())),
	}
}
