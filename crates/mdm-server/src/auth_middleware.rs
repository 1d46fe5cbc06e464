// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication middleware and extractors.
//!
//! [`auth_layer`] runs once per request, before any role check:
//!
//! ```text
//! Authorization: Bearer <jwt> → verify → resolve claims → AuthorizationContext
//! no credentials + dev mode   → fallback principal      → AuthorizationContext
//! no credentials              → unauthenticated (no context)
//! invalid token               → 401
//! ```
//!
//! Tokens and raw header values are never logged.

use axum::{
	extract::{FromRequestParts, Request, State},
	http::{header::AUTHORIZATION, request::Parts, HeaderMap},
	middleware::Next,
	response::Response,
};
use mdm_server_auth::{AuthorizationContext, Credential, Principal};

use crate::{
	api::AppState,
	error::{unauthorized_response, ServerError},
};

const BEARER_PREFIX: &str = "Bearer ";

/// Extract the bearer token, if the request carries one.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
	let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
	let prefix = value.get(..BEARER_PREFIX.len())?;
	if !prefix.eq_ignore_ascii_case(BEARER_PREFIX) {
		return None;
	}
	let token = value[BEARER_PREFIX.len()..].trim();
	(!token.is_empty()).then_some(token)
}

/// Resolve the caller and store an [`AuthorizationContext`] in the request.
pub async fn auth_layer(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
	let principal = match bearer_token(req.headers()) {
		Some(token) => match authenticate_bearer(&state, token) {
			Ok(principal) => Some(principal),
			Err(reason) => {
				tracing::debug!(%reason, "bearer token rejected");
				return unauthorized_response();
			}
		},
		None if state.auth_config.dev_mode => {
			tracing::debug!(username = %state.auth_config.dev_username, "using dev mode principal");
			Some(state.resolver.resolve(Credential::Named(&state.auth_config.dev_username)))
		}
		None => None,
	};

	if let Some(principal) = principal {
		tracing::debug!(
			username = %principal.username,
			role_count = principal.roles.len(),
			"request authenticated"
		);
		req.extensions_mut()
			.insert(AuthorizationContext::new(principal));
	}

	next.run(req).await
}

fn authenticate_bearer(state: &AppState, token: &str) -> Result<Principal, String> {
	let verifier = state
		.verifier
		.as_ref()
		.ok_or_else(|| "no token verifier configured".to_string())?;
	let claims = verifier.verify(token).map_err(|e| e.to_string())?;
	Ok(state.resolver.resolve(Credential::Token(&claims)))
}

/// Extractor requiring an authenticated caller.
///
/// Rejects with 401 if [`auth_layer`] did not resolve a principal.
pub struct RequireAuth(pub AuthorizationContext);

impl<S> FromRequestParts<S> for RequireAuth
where
	S: Send + Sync,
{
	type Rejection = ServerError;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		parts
			.extensions
			.get::<AuthorizationContext>()
			.cloned()
			.map(RequireAuth)
			.ok_or_else(|| ServerError::Unauthorized("no authenticated principal".to_string()))
	}
}
