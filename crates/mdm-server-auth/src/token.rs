// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Bearer token verification against a JSON Web Key Set.
//!
//! The key set is fetched once at startup. Each token's header `kid` selects the
//! key; the header algorithm must belong to that key's family. Expiry is always
//! validated, issuer and audience only when configured.

use jsonwebtoken::jwk::{AlgorithmParameters, Jwk, JwkSet};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use tracing::instrument;

use crate::claims::ClaimSet;
use crate::error::{AuthError, Result, TokenError};

/// Verifies a raw bearer token and returns its claims.
pub trait TokenVerifier: Send + Sync {
	fn verify(&self, token: &str) -> std::result::Result<ClaimSet, TokenError>;
}

#[derive(Clone)]
pub struct JwksVerifier {
	keys: JwkSet,
	issuer: Option<String>,
	audience: Option<String>,
}

impl std::fmt::Debug for JwksVerifier {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("JwksVerifier")
			.field("key_count", &self.keys.keys.len())
			.field("issuer", &self.issuer)
			.field("audience", &self.audience)
			.finish()
	}
}

impl JwksVerifier {
	pub fn new(keys: JwkSet, issuer: Option<String>, audience: Option<String>) -> Result<Self> {
		if keys.keys.is_empty() {
			return Err(AuthError::EmptyKeySet);
		}
		Ok(Self {
			keys,
			issuer,
			audience,
		})
	}

	/// Download the key set from `url` and build a verifier.
	#[instrument(skip(client, issuer, audience))]
	pub async fn fetch(
		client: &reqwest::Client,
		url: &str,
		issuer: Option<String>,
		audience: Option<String>,
	) -> Result<Self> {
		let keys: JwkSet = client
			.get(url)
			.send()
			.await?
			.error_for_status()?
			.json()
			.await?;
		tracing::info!(key_count = keys.keys.len(), "loaded signing keys");
		Self::new(keys, issuer, audience)
	}

	fn select_key(&self, kid: Option<&str>) -> std::result::Result<&Jwk, TokenError> {
		let found = match kid {
			Some(kid) => self.keys.find(kid),
			None if self.keys.keys.len() == 1 => self.keys.keys.first(),
			None => None,
		};
		found.ok_or_else(|| TokenError::UnknownKey(kid.map(str::to_string)))
	}

	fn validation(&self, alg: Algorithm) -> Validation {
		let mut validation = Validation::new(alg);
		if let Some(issuer) = &self.issuer {
			validation.set_issuer(&[issuer]);
		}
		match &self.audience {
			Some(audience) => validation.set_audience(&[audience]),
			None => validation.validate_aud = false,
		}
		validation
	}
}

/// True if `alg` is usable with a key of this type.
fn algorithm_matches_key(alg: Algorithm, params: &AlgorithmParameters) -> bool {
	use Algorithm::*;
	match params {
		AlgorithmParameters::OctetKey(_) => matches!(alg, HS256 | HS384 | HS512),
		AlgorithmParameters::RSA(_) => matches!(alg, RS256 | RS384 | RS512 | PS256 | PS384 | PS512),
		AlgorithmParameters::EllipticCurve(_) => matches!(alg, ES256 | ES384),
		AlgorithmParameters::OctetKeyPair(_) => matches!(alg, EdDSA),
	}
}

impl TokenVerifier for JwksVerifier {
	fn verify(&self, token: &str) -> std::result::Result<ClaimSet, TokenError> {
		let header = decode_header(token).map_err(TokenError::MalformedHeader)?;
		let jwk = self.select_key(header.kid.as_deref())?;
		if !algorithm_matches_key(header.alg, &jwk.algorithm) {
			return Err(TokenError::AlgorithmMismatch { alg: header.alg });
		}
		let key = DecodingKey::from_jwk(jwk).map_err(TokenError::InvalidKey)?;

		decode::<ClaimSet>(token, &key, &self.validation(header.alg))
			.map(|data| data.claims)
			.map_err(TokenError::Rejected)
	}
}
