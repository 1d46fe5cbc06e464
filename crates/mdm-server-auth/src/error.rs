// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use thiserror::Error;

/// Reasons a bearer token failed verification.
///
/// None of these variants carry the token itself.
#[derive(Debug, Error)]
pub enum TokenError {
	#[error("token header could not be decoded")]
	MalformedHeader(#[source] jsonwebtoken::errors::Error),

	#[error("no signing key matches kid {0:?}")]
	UnknownKey(Option<String>),

	#[error("token algorithm {alg:?} does not match the key type")]
	AlgorithmMismatch { alg: jsonwebtoken::Algorithm },

	#[error("signing key is unusable: {0}")]
	InvalidKey(#[source] jsonwebtoken::errors::Error),

	#[error("token rejected: {0}")]
	Rejected(#[source] jsonwebtoken::errors::Error),
}

#[derive(Debug, Error)]
pub enum AuthError {
	#[error("token verification failed: {0}")]
	Token(#[from] TokenError),

	#[error("failed to fetch signing keys: {0}")]
	KeySetFetch(#[from] reqwest::Error),

	#[error("signing key set is empty")]
	EmptyKeySet,
}

pub type Result<T> = std::result::Result<T, AuthError>;
