// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Claims resolution: turning a verified token payload into a [`Principal`].
//!
//! Roles are collected from three claim locations and unioned:
//!
//! ```text
//! groups                               ["Area-3.Team-11.Read.Student", ...]
//! realm_access.roles                   ["sau-admin", ...]
//! resource_access.<client_id>.roles    ["Area-3.Team-11.Write.Employee", ...]
//! ```
//!
//! A missing or mistyped claim never fails resolution; it contributes nothing.

use serde_json::{Map, Value};
use std::collections::BTreeSet;
use tracing::instrument;

use crate::principal::Principal;

/// A verified token payload.
pub type ClaimSet = Map<String, Value>;

pub const CLAIM_SUBJECT: &str = "sub";
pub const CLAIM_USERNAME: &str = "preferred_username";
pub const CLAIM_EMAIL: &str = "email";
pub const CLAIM_GIVEN_NAME: &str = "given_name";
pub const CLAIM_FAMILY_NAME: &str = "family_name";
pub const CLAIM_GROUPS: &str = "groups";
pub const CLAIM_REALM_ACCESS: &str = "realm_access";
pub const CLAIM_RESOURCE_ACCESS: &str = "resource_access";
const CLAIM_ROLES: &str = "roles";

/// Where a role claim was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleSource {
	/// Flat `groups` list.
	Groups,
	/// `realm_access.roles`.
	Realm,
	/// `resource_access.<client_id>.roles`.
	Client,
}

impl RoleSource {
	/// Fixed extraction order.
	pub const ALL: [RoleSource; 3] = [RoleSource::Groups, RoleSource::Realm, RoleSource::Client];
}

/// How the caller authenticated.
#[derive(Debug, Clone, Copy)]
pub enum Credential<'a> {
	/// A verified token payload.
	Token(&'a ClaimSet),
	/// A credential scheme without a payload; only the username is known.
	Named(&'a str),
}

/// Builds a [`Principal`] from claims.
///
/// Holds only this service's client id, so it is cheap to clone and safe to share
/// across concurrent requests.
#[derive(Debug, Clone)]
pub struct ClaimsResolver {
	client_id: String,
}

impl ClaimsResolver {
	pub fn new(client_id: impl Into<String>) -> Self {
		Self {
			client_id: client_id.into(),
		}
	}

	/// Resolve a principal from whichever credential the request carried.
	pub fn resolve(&self, credential: Credential<'_>) -> Principal {
		match credential {
			Credential::Token(claims) => self.resolve_claims(claims),
			Credential::Named(username) => Self::resolve_fallback(username),
		}
	}

	/// Resolve a principal from a verified token payload.
	#[instrument(level = "debug", skip_all, fields(username = tracing::field::Empty, role_count = tracing::field::Empty))]
	pub fn resolve_claims(&self, claims: &ClaimSet) -> Principal {
		let subject = string_claim(claims, CLAIM_SUBJECT);
		let username = string_claim(claims, CLAIM_USERNAME)
			.or_else(|| subject.clone())
			.unwrap_or_default();
		let roles = self.extract_roles(claims);

		let span = tracing::Span::current();
		span.record("username", username.as_str());
		span.record("role_count", roles.len());

		Principal {
			subject,
			username,
			email: string_claim(claims, CLAIM_EMAIL),
			given_name: string_claim(claims, CLAIM_GIVEN_NAME),
			family_name: string_claim(claims, CLAIM_FAMILY_NAME),
			roles,
		}
	}

	/// Principal for a request authenticated without a token payload.
	pub fn resolve_fallback(username: &str) -> Principal {
		Principal::named(username)
	}

	/// Union of the roles found in every [`RoleSource`].
	pub fn extract_roles(&self, claims: &ClaimSet) -> BTreeSet<String> {
		RoleSource::ALL
			.iter()
			.flat_map(|source| self.roles_from(claims, *source))
			.map(str::to_string)
			.collect()
	}

	/// Roles present in a single source. Absent or malformed sources yield nothing.
	pub fn roles_from<'c>(&self, claims: &'c ClaimSet, source: RoleSource) -> Vec<&'c str> {
		let list = match source {
			RoleSource::Groups => claims.get(CLAIM_GROUPS),
			RoleSource::Realm => claims
				.get(CLAIM_REALM_ACCESS)
				.and_then(|realm| realm.get(CLAIM_ROLES)),
			RoleSource::Client => claims
				.get(CLAIM_RESOURCE_ACCESS)
				.and_then(|access| access.get(&self.client_id))
				.and_then(|client| client.get(CLAIM_ROLES)),
		};

		list
			.and_then(Value::as_array)
			.map(|values| values.iter().filter_map(Value::as_str).collect())
			.unwrap_or_default()
	}
}

/// Read a string claim, treating missing, non-string and empty values as absent.
pub fn string_claim(claims: &ClaimSet, key: &str) -> Option<String> {
	claims
		.get(key)
		.and_then(Value::as_str)
		.filter(|s| !s.is_empty())
		.map(str::to_string)
}
