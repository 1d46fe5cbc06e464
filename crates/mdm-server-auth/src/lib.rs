// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication and authorization for the MDM server.
//!
//! This crate provides:
//! - Bearer token verification against a JSON Web Key Set ([`token`])
//! - Claims resolution into a request [`Principal`] ([`claims`])
//! - The request-scoped [`AuthorizationContext`] answering role questions
//! - The RBAC decision engine for static and resource-aware checks ([`rbac`])
//!
//! It has no HTTP dependency; the server crate wires these pieces into axum
//! middleware and extractors.

pub mod claims;
pub mod context;
pub mod error;
pub mod principal;
pub mod rbac;
pub mod token;

pub use claims::{ClaimSet, ClaimsResolver, Credential, RoleSource};
pub use context::AuthorizationContext;
pub use error::{AuthError, TokenError};
pub use principal::Principal;
pub use rbac::{
	Classification, Decision, Denial, DenyReason, LookupError, Permission, RbacEngine, RbacPolicy,
	ResourceType, ResourceTypeLookup,
};
pub use token::{JwksVerifier, TokenVerifier};
