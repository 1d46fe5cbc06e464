// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SQLite persistence for the MDM server.
//!
//! [`PersonRepository`] stores the typed person resources and implements
//! [`mdm_server_auth::ResourceTypeLookup`] so the RBAC engine can classify them.

pub mod error;
pub mod person;
pub mod pool;
pub mod testing;

pub use error::DbError;
pub use person::{NewPerson, Person, PersonRepository, PersonStore, PersonUpdate};
pub use pool::{create_pool, run_migrations};
