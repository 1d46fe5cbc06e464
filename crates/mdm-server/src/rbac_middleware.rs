// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! RBAC route-level layers and handler-level helpers.
//!
//! Authorization uses two tiers:
//!
//! 1. **Route-level** ([`RequireRole`]): static checks against a fixed role set,
//!    used by listing and create endpoints.
//! 2. **Handler-level** ([`authorize_resource`]): resource-aware checks that look
//!    up the person's type before deciding.
//!
//! Unauthenticated requests get 401. Denials get the uniform 403 from
//! [`forbidden_response`], which the denial reporter logs.
//!
//! # Example
//!
//! ```ignore
//! Router::new()
//!     .route("/api/persons", get(list_persons))
//!     .route_layer(RequireRole::scoped(&engine, Permission::Read, "User"));
//! ```

use axum::{body::Body, http::Request, response::Response};
use mdm_server_auth::{AuthorizationContext, Decision, Permission, RbacEngine};
use pin_project_lite::pin_project;
use std::{
	future::Future,
	pin::Pin,
	sync::Arc,
	task::{Context, Poll},
};
use tower::{Layer, Service};

use crate::{denial::forbidden_response, error::unauthorized_response, error::ServerError};

/// Route layer requiring any of a fixed set of roles, or a bypass role.
#[derive(Clone)]
pub struct RequireRole {
	engine: RbacEngine,
	required: Arc<[String]>,
}

impl RequireRole {
	pub fn any_of<I, S>(engine: &RbacEngine, roles: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			engine: engine.clone(),
			required: roles.into_iter().map(Into::into).collect(),
		}
	}

	/// Require `{org_prefix}.{permission}.{scope}`.
	pub fn scoped(engine: &RbacEngine, permission: Permission, scope: &str) -> Self {
		let role = engine.policy().scoped_role(permission, scope);
		Self::any_of(engine, [role])
	}

	pub fn required(&self) -> &[String] {
		&self.required
	}
}

impl<S> Layer<S> for RequireRole {
	type Service = RequireRoleService<S>;

	fn layer(&self, inner: S) -> Self::Service {
		RequireRoleService {
			inner,
			engine: self.engine.clone(),
			required: Arc::clone(&self.required),
		}
	}
}

/// Service wrapper for [`RequireRole`] layer.
#[derive(Clone)]
pub struct RequireRoleService<S> {
	inner: S,
	engine: RbacEngine,
	required: Arc<[String]>,
}

impl<S> Service<Request<Body>> for RequireRoleService<S>
where
	S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
	S::Future: Send,
{
	type Response = Response;
	type Error = S::Error;
	type Future = RequireRoleFuture<S::Future>;

	fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		self.inner.poll_ready(cx)
	}

	fn call(&mut self, req: Request<Body>) -> Self::Future {
		let Some(ctx) = req.extensions().get::<AuthorizationContext>().cloned() else {
			tracing::debug!(required = ?self.required, "role check denied: not authenticated");
			return RequireRoleFuture::Rejected {
				resp: Some(unauthorized_response()),
			};
		};

		match self.engine.check_static(&ctx, &self.required) {
			Decision::Allow { .. } => RequireRoleFuture::Inner {
				fut: self.inner.call(req),
			},
			Decision::Deny(denial) => RequireRoleFuture::Rejected {
				resp: Some(forbidden_response(denial)),
			},
		}
	}
}

pin_project! {
	/// Future for [`RequireRoleService`].
	#[project = RequireRoleFutureProj]
	pub enum RequireRoleFuture<F> {
		Inner { #[pin] fut: F },
		Rejected { resp: Option<Response> },
	}
}

impl<F, E> Future for RequireRoleFuture<F>
where
	F: Future<Output = Result<Response, E>>,
{
	type Output = Result<Response, E>;

	fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		match self.project() {
			RequireRoleFutureProj::Inner { fut } => fut.poll(cx),
			RequireRoleFutureProj::Rejected { resp } => match resp.take() {
				Some(resp) => Poll::Ready(Ok(resp)),
				None => Poll::Pending,
			},
		}
	}
}

/// Resource-aware check for use inside handlers.
///
/// ```ignore
/// authorize_resource(&state.engine, &ctx, &id, Permission::Read).await?;
/// ```
pub async fn authorize_resource(
	engine: &RbacEngine,
	ctx: &AuthorizationContext,
	raw_id: &str,
	permission: Permission,
) -> Result<(), ServerError> {
	engine
		.check_resource(ctx, raw_id, permission)
		.await
		.into_result()
		.map_err(ServerError::from)
}
