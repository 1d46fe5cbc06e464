// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! GET /api/me - the principal resolved for the current request.

use axum::Json;
use mdm_server_auth::Principal;

use crate::auth_middleware::RequireAuth;

pub async fn get_me(RequireAuth(ctx): RequireAuth) -> Json<Principal> {
	Json(ctx.principal().clone())
}
