// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! MDM person master data server.
//!
//! This crate provides the HTTP surface over the person store, guarded by
//! bearer token authentication and role-based access control.

pub mod api;
pub mod auth_middleware;
pub mod denial;
pub mod error;
pub mod rbac_middleware;
pub mod routes;

pub use api::{create_app_state, create_router, AppState};
pub use auth_middleware::RequireAuth;
pub use error::{ErrorResponse, ServerError};
pub use mdm_server_config::ServerConfig;
pub use rbac_middleware::{authorize_resource, RequireRole};
