// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Token verification settings (remote key set, issuer, audience).

use serde::Deserialize;

/// Bearer-token verification settings.
///
/// Without a `jwks_url` no bearer token can be verified and every bearer request
/// is rejected as unauthenticated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OidcConfig {
	pub jwks_url: Option<String>,
	pub issuer: Option<String>,
	pub audience: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OidcConfigLayer {
	#[serde(default)]
	pub jwks_url: Option<String>,
	#[serde(default)]
	pub issuer: Option<String>,
	#[serde(default)]
	pub audience: Option<String>,
}

impl OidcConfigLayer {
	pub fn merge(&mut self, other: OidcConfigLayer) {
		if other.jwks_url.is_some() {
			self.jwks_url = other.jwks_url;
		}
		if other.issuer.is_some() {
			self.issuer = other.issuer;
		}
		if other.audience.is_some() {
			self.audience = other.audience;
		}
	}

	pub fn finalize(self) -> OidcConfig {
		OidcConfig {
			jwks_url: self.jwks_url,
			issuer: self.issuer,
			audience: self.audience,
		}
	}
}
