// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Role-based access control for person resources.
//!
//! # Overview
//!
//! Access to a single person is gated by a role synthesized from the organization
//! prefix, the requested [`Permission`] and the person's runtime [`ResourceType`]:
//!
//! | Permission | Student                         | Lecturer                         |
//! |------------|---------------------------------|----------------------------------|
//! | Read       | `Area-3.Team-11.Read.Student`   | `Area-3.Team-11.Read.Lecturer`   |
//! | Write      | `Area-3.Team-11.Write.Student`  | `Area-3.Team-11.Write.Lecturer`  |
//! | Delete     | `Area-3.Team-11.Delete.Student` | `Area-3.Team-11.Delete.Lecturer` |
//!
//! Holders of a bypass role (default `sau-admin`) are allowed everything.
//!
//! # Example
//!
//! ```ignore
//! use mdm_server_auth::rbac::{Permission, RbacEngine, RbacPolicy};
//!
//! let engine = RbacEngine::new(RbacPolicy::new("Area-3.Team-11", ["sau-admin"]), lookup);
//! let decision = engine.check_resource(&ctx, &raw_id, Permission::Read).await;
//! ```

pub mod engine;
pub mod lookup;
pub mod types;

pub use engine::{RbacEngine, RbacPolicy, DEFAULT_LOOKUP_TIMEOUT};
pub use lookup::{Classification, LookupError, ResourceTypeLookup};
pub use types::{
	required_role, scoped_role, Decision, Denial, DenyReason, Permission, ResourceType,
	UnknownResourceType,
};
