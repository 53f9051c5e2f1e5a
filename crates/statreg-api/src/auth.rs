//! # Authentication Middleware
//!
//! Bearer-token authentication resolving each request to a [`CurrentUser`]
//! carried in request extensions. The identity provider this stands in
//! for hands us a user with roles and an assigned company; handlers run
//! the permission gate against it before mutating anything.
//!
//! With no tokens registered the server runs **open** (development
//! mode): every request acts as a built-in super administrator, the same
//! arrangement the test suites use.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use parking_lot::RwLock;

use statreg_authz::{Permission, Role, User};
use statreg_core::UserId;

use crate::error::AppError;
use crate::state::AppState;

/// The authenticated user riding request extensions.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Arc<User>);

impl CurrentUser {
    /// The underlying user.
    pub fn user(&self) -> &User {
        &self.0
    }

    /// The actor label recorded in activity entries.
    pub fn actor_label(&self) -> String {
        self.0.actor_label()
    }
}

/// Token → user resolution.
///
/// Stands in for the external identity provider: tokens are opaque
/// strings, each mapping to one user with roles and an optional assigned
/// company.
#[derive(Debug)]
pub struct UserDirectory {
    tokens: RwLock<HashMap<String, Arc<User>>>,
    /// The one stable identity requests act as in open mode. Stable so
    /// that the two calls of the import protocol resolve to the same
    /// staging key.
    open_mode_user: Arc<User>,
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl UserDirectory {
    /// Create an empty directory (open mode until tokens are added).
    pub fn new() -> Self {
        Self {
            tokens: RwLock::new(HashMap::new()),
            open_mode_user: Arc::new(User {
                id: UserId::new(),
                name: "system".into(),
                roles: vec![Role::from_label("Super Admin", [Permission::RegistersWrite])],
                company_id: None,
            }),
        }
    }

    /// Register a token for a user.
    pub fn register(&self, token: &str, user: User) {
        self.tokens.write().insert(token.to_string(), Arc::new(user));
    }

    /// Register the built-in administrator under `token`.
    pub fn register_admin_token(&self, token: &str) {
        self.register(
            token,
            User {
                id: UserId::new(),
                name: "admin".into(),
                roles: vec![Role::from_label("Super Administrator", [])],
                company_id: None,
            },
        );
    }

    /// Resolve a token to its user.
    pub fn resolve(&self, token: &str) -> Option<Arc<User>> {
        self.tokens.read().get(token).cloned()
    }

    /// Whether any token is registered (false means open mode).
    pub fn has_tokens(&self) -> bool {
        !self.tokens.read().is_empty()
    }

    /// The stable synthetic identity requests act as in open mode.
    pub fn open_mode_user(&self) -> Arc<User> {
        Arc::clone(&self.open_mode_user)
    }
}

/// Resolve the request's identity and stash it in extensions.
///
/// Missing or unknown credentials are rejected here, before any handler
/// runs; the permission gate inside handlers only ever sees a resolved
/// identity.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    if !state.users.has_tokens() {
        req.extensions_mut()
            .insert(CurrentUser(state.users.open_mode_user()));
        return next.run(req).await;
    }

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let Some(token) = token else {
        return AppError::Unauthorized("missing bearer token".to_string()).into_response();
    };

    match state.users.resolve(token) {
        Some(user) => {
            req.extensions_mut().insert(CurrentUser(user));
            next.run(req).await
        }
        None => AppError::Unauthorized("unknown bearer token".to_string()).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use statreg_authz::RoleTier;

    #[test]
    fn test_directory_resolves_registered_tokens() {
        let directory = UserDirectory::new();
        assert!(!directory.has_tokens());

        directory.register_admin_token("secret");
        assert!(directory.has_tokens());

        let user = directory.resolve("secret").unwrap();
        assert_eq!(user.tier(), RoleTier::SuperAdmin);
        assert!(directory.resolve("wrong").is_none());
    }

    #[test]
    fn test_open_mode_user_is_super_admin_and_stable() {
        let directory = UserDirectory::new();
        let user = directory.open_mode_user();
        assert_eq!(user.tier(), RoleTier::SuperAdmin);
        // Same identity on every request, so import staging keys match
        // between preview and confirm.
        assert_eq!(directory.open_mode_user().id, user.id);
    }
}
