// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Application state and router construction.

use axum::{
	middleware::{from_fn, from_fn_with_state},
	routing::{get, post},
	Router,
};
use mdm_server_auth::{ClaimsResolver, Permission, RbacEngine, RbacPolicy, TokenVerifier};
use mdm_server_config::{AuthConfig, ServerConfig};
use mdm_server_db::{PersonRepository, PersonStore};
use sqlx::sqlite::SqlitePool;
use std::sync::Arc;
use std::time::Duration;

use crate::{
	auth_middleware::auth_layer,
	denial::report_denials,
	rbac_middleware::RequireRole,
	routes::{health, me, persons},
};

/// Scope segment of the collection-wide person roles, e.g. `Area-3.Team-11.Read.User`.
pub const USER_SCOPE: &str = "User";

#[derive(Clone)]
pub struct AppState {
	pub pool: SqlitePool,
	pub persons: Arc<dyn PersonStore>,
	pub engine: RbacEngine,
	pub resolver: ClaimsResolver,
	/// `None` when no key set is configured; bearer tokens are then rejected.
	pub verifier: Option<Arc<dyn TokenVerifier>>,
	pub auth_config: AuthConfig,
}

pub fn create_app_state(
	pool: SqlitePool,
	config: &ServerConfig,
	verifier: Option<Arc<dyn TokenVerifier>>,
) -> AppState {
	let repo = PersonRepository::new(pool.clone());
	let policy = RbacPolicy::new(
		config.rbac.org_prefix.clone(),
		config.rbac.bypass_roles.iter().cloned(),
	);
	let engine = RbacEngine::new(policy, Arc::new(repo.clone()))
		.with_lookup_timeout(Duration::from_millis(config.rbac.lookup_timeout_ms));

	AppState {
		pool,
		persons: Arc::new(repo),
		engine,
		resolver: ClaimsResolver::new(config.rbac.client_id.clone()),
		verifier,
		auth_config: config.auth.clone(),
	}
}

pub fn create_router(state: AppState) -> Router {
	let read_users = RequireRole::scoped(&state.engine, Permission::Read, USER_SCOPE);
	let write_users = RequireRole::scoped(&state.engine, Permission::Write, USER_SCOPE);

	Router::new()
		.route("/health", get(health::health_check))
		.route("/api/me", get(me::get_me))
		.route(
			"/api/persons",
			get(persons::list_persons).route_layer(read_users),
		)
		.route(
			"/api/persons",
			post(persons::create_person).route_layer(write_users),
		)
		.route(
			"/api/persons/{id}",
			get(persons::get_person)
				.put(persons::update_person)
				.delete(persons::delete_person),
		)
		.layer(from_fn(report_denials))
		.layer(from_fn_with_state(state.clone(), auth_layer))
		.with_state(state)
}
