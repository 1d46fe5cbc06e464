// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request-scoped role authority.
//!
//! An [`AuthorizationContext`] is created once per request after claims resolution
//! and travels with that request (as a request extension in the HTTP server). Any
//! code holding the request can ask it role questions without threading the
//! [`Principal`] through every call. It is never shared between requests.

use std::sync::Arc;

use crate::principal::Principal;

/// Role-membership queries against the principal resolved for the current request.
///
/// The role set is a snapshot taken when the request was authenticated; later
/// changes to the caller's grants are not observed until the next request.
#[derive(Debug, Clone)]
pub struct AuthorizationContext {
	principal: Arc<Principal>,
}

impl AuthorizationContext {
	pub fn new(principal: Principal) -> Self {
		Self {
			principal: Arc::new(principal),
		}
	}

	pub fn principal(&self) -> &Principal {
		&self.principal
	}

	pub fn username(&self) -> &str {
		&self.principal.username
	}

	/// Exact, case-sensitive membership test.
	pub fn has_role(&self, candidate: &str) -> bool {
		self.principal.roles.contains(candidate)
	}

	/// Returns the first of `candidates` the caller holds.
	pub fn first_held<'r, I>(&self, candidates: I) -> Option<&'r str>
	where
		I: IntoIterator<Item = &'r String>,
	{
		candidates
			.into_iter()
			.find(|role| self.has_role(role))
			.map(String::as_str)
	}

	/// True if the caller holds at least one of `candidates`.
	pub fn has_any_role<'r, I>(&self, candidates: I) -> bool
	where
		I: IntoIterator<Item = &'r String>,
	{
		self.first_held(candidates).is_some()
	}

	/// All resolved roles, sorted, for logging.
	pub fn roles(&self) -> Vec<&str> {
		self.principal.roles.iter().map(String::as_str).collect()
	}
}
