//! # statreg-authz — Roles, Permissions, and the Permission Gate
//!
//! Authorization for the register stack. A user carries a set of roles;
//! each role resolves to a [`RoleTier`] and a set of [`Permission`] codes.
//! The [`PermissionGate`] runs before every mutation handler and either
//! lets the request through or rejects it with a structured error.
//!
//! Role capability is decided here, once — legacy role labels such as
//! `"Super Admin"` and `"Super Administrator"` are normalized to
//! [`RoleTier::SuperAdmin`] at parse time, so no downstream code ever
//! compares role strings.

pub mod gate;
pub mod role;

pub use gate::{AuthzError, PermissionGate};
pub use role::{Permission, Role, RoleTier, User};
