// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Denial reporting.
//!
//! Role layers and handlers never log denials themselves. They return
//! [`forbidden_response`], which attaches the typed [`Denial`] to the response
//! extensions. [`report_denials`] wraps the router, logs one warn line per denied
//! request and strips the extension before the response leaves the server.
//!
//! The client only ever sees the generic 403 body; role names stay in the logs.

use axum::{
	extract::Request,
	http::{Method, StatusCode},
	middleware::Next,
	response::Response,
};
use mdm_server_auth::{AuthorizationContext, Denial};

use crate::error::error_response;

pub const ACCESS_DENIED_MESSAGE: &str = "Access denied";

/// The uniform 403 response, carrying `denial` for [`report_denials`].
pub fn forbidden_response(denial: Denial) -> Response {
	let mut response = error_response(StatusCode::FORBIDDEN, "forbidden", ACCESS_DENIED_MESSAGE);
	response.extensions_mut().insert(denial);
	response
}

/// Middleware logging every denial produced further down the stack.
///
/// Must run inside the authentication middleware so the request's
/// [`AuthorizationContext`] is visible.
pub async fn report_denials(req: Request, next: Next) -> Response {
	let method = req.method().clone();
	let path = req.uri().path().to_string();
	let ctx = req.extensions().get::<AuthorizationContext>().cloned();

	let mut response = next.run(req).await;

	if let Some(denial) = response.extensions_mut().remove::<Denial>() {
		log_denial(ctx.as_ref(), &denial, &method, &path);
	}
	response
}

fn log_denial(ctx: Option<&AuthorizationContext>, denial: &Denial, method: &Method, path: &str) {
	let (username, roles) = match ctx {
		Some(ctx) => (ctx.username(), ctx.roles()),
		None => ("anonymous", Vec::new()),
	};

	tracing::warn!(
		username,
		roles = ?roles,
		expected = %denial.expected_description(),
		reason = %denial.reason,
		method = %method,
		path,
		"access denied"
	);
}
