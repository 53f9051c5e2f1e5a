//! # Permission Gate
//!
//! The pre-handler authorization check. Given the authenticated user, an
//! optional required permission, and an optional target company, the gate
//! either lets the request proceed or rejects it. Read-only: the gate
//! never mutates anything.

use thiserror::Error;

use statreg_core::CompanyId;

use crate::role::{Permission, User};

/// Authorization failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthzError {
    /// No valid identity on the request.
    #[error("no valid identity on the request")]
    Unauthorized,

    /// Valid identity, but the required permission is not held.
    #[error("permission '{required}' is not held")]
    Forbidden {
        /// The permission code that was required.
        required: String,
    },

    /// Valid identity, but the user is bound to a different company.
    #[error("user is not assigned to company {company}")]
    CompanyMismatch {
        /// The company the request targeted.
        company: CompanyId,
    },
}

/// The pre-handler permission check.
///
/// A route with no declared permission is open to any authenticated user.
/// Company-scoped routes additionally require the acting user's assigned
/// company to match the target unless the user carries an admin-tier role.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissionGate;

impl PermissionGate {
    /// Authorize `user` for an operation requiring `required` (if any)
    /// against `company` (if company-scoped).
    pub fn authorize(
        &self,
        user: &User,
        required: Option<Permission>,
        company: Option<CompanyId>,
    ) -> Result<(), AuthzError> {
        // Super admins are granted unconditionally.
        if user.tier() == crate::role::RoleTier::SuperAdmin {
            return Ok(());
        }

        if let Some(required) = required {
            if !user.holds(required) {
                return Err(AuthzError::Forbidden {
                    required: required.as_code().to_string(),
                });
            }
        }

        if let Some(company) = company {
            if !user.tier().crosses_companies() && user.company_id != Some(company) {
                return Err(AuthzError::CompanyMismatch { company });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::{Role, RoleTier};
    use statreg_core::UserId;

    fn member(permissions: Vec<Permission>, company: Option<CompanyId>) -> User {
        User {
            id: UserId::new(),
            name: "member".into(),
            roles: vec![Role::from_label("Company Secretary", permissions)],
            company_id: company,
        }
    }

    fn super_admin() -> User {
        User {
            id: UserId::new(),
            name: "root".into(),
            roles: vec![Role::from_label("Super Administrator", [])],
            company_id: None,
        }
    }

    #[test]
    fn test_super_admin_granted_regardless_of_permission() {
        let gate = PermissionGate;
        let company = CompanyId::new();
        assert!(gate
            .authorize(
                &super_admin(),
                Some(Permission::RegistersWrite),
                Some(company)
            )
            .is_ok());
    }

    #[test]
    fn test_member_with_permission_and_matching_company() {
        let gate = PermissionGate;
        let company = CompanyId::new();
        let user = member(vec![Permission::RegistersWrite], Some(company));
        assert!(gate
            .authorize(&user, Some(Permission::RegistersWrite), Some(company))
            .is_ok());
    }

    #[test]
    fn test_member_without_permission_is_forbidden() {
        let gate = PermissionGate;
        let user = member(vec![Permission::RegistersRead], None);
        let err = gate
            .authorize(&user, Some(Permission::RegistersWrite), None)
            .unwrap_err();
        assert!(matches!(err, AuthzError::Forbidden { .. }));
    }

    #[test]
    fn test_member_cannot_cross_companies() {
        let gate = PermissionGate;
        let own = CompanyId::new();
        let other = CompanyId::new();
        let user = member(vec![Permission::RegistersWrite], Some(own));
        let err = gate
            .authorize(&user, Some(Permission::RegistersWrite), Some(other))
            .unwrap_err();
        assert!(matches!(err, AuthzError::CompanyMismatch { .. }));
    }

    #[test]
    fn test_admin_tier_crosses_companies() {
        let gate = PermissionGate;
        let user = User {
            id: UserId::new(),
            name: "ops".into(),
            roles: vec![Role::from_label(
                "Administrator",
                [Permission::RegistersWrite],
            )],
            company_id: Some(CompanyId::new()),
        };
        assert_eq!(user.tier(), RoleTier::Admin);
        assert!(gate
            .authorize(
                &user,
                Some(Permission::RegistersWrite),
                Some(CompanyId::new())
            )
            .is_ok());
    }

    #[test]
    fn test_open_route_allows_any_authenticated_user() {
        let gate = PermissionGate;
        let user = member(vec![], None);
        assert!(gate.authorize(&user, None, None).is_ok());
    }
}
