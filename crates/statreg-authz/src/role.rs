//! # Role and Permission Model
//!
//! Users hold roles; roles resolve to a tier and a permission set.
//! The tier is an enum decided once at construction — the legacy data
//! this system replaces carried free-form labels (`"Super Admin"`,
//! `"Super Administrator"`, `"Administrator"`) compared ad hoc per route,
//! which is exactly the defect class the enum removes.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use statreg_core::{CompanyId, UserId};

/// The capability tier a role grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RoleTier {
    /// Ordinary member: permissions apply only within the assigned company.
    Member,
    /// Administrator: permissions apply across companies.
    Admin,
    /// Unconditional access to every operation.
    SuperAdmin,
}

impl RoleTier {
    /// Normalize a legacy role label to a tier.
    ///
    /// The historical data uses several spellings for the same capability;
    /// all of them resolve here and nowhere else.
    pub fn from_label(label: &str) -> Self {
        let normalized = label.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "super admin" | "super administrator" | "superadmin" => Self::SuperAdmin,
            "admin" | "administrator" => Self::Admin,
            _ => Self::Member,
        }
    }

    /// Whether this tier may act on companies other than its own.
    pub fn crosses_companies(&self) -> bool {
        matches!(self, Self::Admin | Self::SuperAdmin)
    }
}

/// A permission code guarding a group of operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Read statutory registers.
    RegistersRead,
    /// Create, update, and status-change statutory register records.
    RegistersWrite,
    /// Read the activity log and its statistics.
    ActivityRead,
    /// Run the bulk import pipeline.
    ImportWrite,
    /// Create and manage companies.
    CompaniesManage,
}

impl Permission {
    /// The stable wire code for this permission.
    pub fn as_code(&self) -> &'static str {
        match self {
            Self::RegistersRead => "registers.read",
            Self::RegistersWrite => "registers.write",
            Self::ActivityRead => "activity.read",
            Self::ImportWrite => "import.write",
            Self::CompaniesManage => "companies.manage",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_code())
    }
}

/// A named role: a tier plus the permission codes it grants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    /// Display name of the role.
    pub name: String,
    /// Capability tier, normalized from the name or set explicitly.
    pub tier: RoleTier,
    /// Permission codes this role grants.
    pub permissions: BTreeSet<Permission>,
}

impl Role {
    /// Build a role from a legacy label, normalizing its tier.
    pub fn from_label(name: &str, permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            name: name.trim().to_string(),
            tier: RoleTier::from_label(name),
            permissions: permissions.into_iter().collect(),
        }
    }
}

/// An authenticated user as the identity provider hands it to us.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Roles assigned to this user.
    pub roles: Vec<Role>,
    /// The company this user belongs to, if company-bound.
    pub company_id: Option<CompanyId>,
}

impl User {
    /// The highest tier across this user's roles.
    pub fn tier(&self) -> RoleTier {
        self.roles
            .iter()
            .map(|r| r.tier)
            .max()
            .unwrap_or(RoleTier::Member)
    }

    /// Whether any role grants the given permission.
    pub fn holds(&self, permission: Permission) -> bool {
        self.roles.iter().any(|r| r.permissions.contains(&permission))
    }

    /// The actor label recorded in activity entries.
    pub fn actor_label(&self) -> String {
        self.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_labels_normalize() {
        assert_eq!(RoleTier::from_label("Super Admin"), RoleTier::SuperAdmin);
        assert_eq!(
            RoleTier::from_label("Super Administrator"),
            RoleTier::SuperAdmin
        );
        assert_eq!(RoleTier::from_label("  administrator "), RoleTier::Admin);
        assert_eq!(RoleTier::from_label("Company Secretary"), RoleTier::Member);
    }

    #[test]
    fn test_tier_ordering_prefers_super_admin() {
        let user = User {
            id: UserId::new(),
            name: "ada".into(),
            roles: vec![
                Role::from_label("Member", [Permission::RegistersRead]),
                Role::from_label("Super Admin", []),
            ],
            company_id: None,
        };
        assert_eq!(user.tier(), RoleTier::SuperAdmin);
    }

    #[test]
    fn test_holds_checks_every_role() {
        let user = User {
            id: UserId::new(),
            name: "grace".into(),
            roles: vec![
                Role::from_label("Reader", [Permission::RegistersRead]),
                Role::from_label("Importer", [Permission::ImportWrite]),
            ],
            company_id: None,
        };
        assert!(user.holds(Permission::ImportWrite));
        assert!(user.holds(Permission::RegistersRead));
        assert!(!user.holds(Permission::RegistersWrite));
    }

    #[test]
    fn test_permission_codes_are_stable() {
        assert_eq!(Permission::RegistersWrite.as_code(), "registers.write");
        assert_eq!(Permission::ActivityRead.to_string(), "activity.read");
    }
}
