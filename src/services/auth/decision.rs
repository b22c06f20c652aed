//! Access decision engine.
//!
//! Every role/ownership check in the service goes through [`decide`].
//!
//! Precedence (first match wins):
//! 1. admin                                   -> allowed
//! 2. caller owns the target AND policy allows `user` -> allowed
//! 3. caller's role is in the allowed roles   -> allowed (skipped for owner-required policies)
//! 4. denied
//!
//! Rule 1 runs before rule 2 so an admin acting on another subject's resource
//! is never caught by the narrower self-access rule.

use std::collections::BTreeSet;

use crate::services::auth::identity::{Identity, Role};

/// Whether the role list alone can grant access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ownership {
    /// Roles in the allow-list grant access to any target.
    #[default]
    Any,
    /// Non-admins are only allowed on their own resources.
    Required,
}

/// Roles permitted for one protected operation. Fixed at route registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    allowed_roles: BTreeSet<Role>,
    ownership: Ownership,
}

impl AccessPolicy {
    pub fn new(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            allowed_roles: roles.into_iter().collect(),
            ownership: Ownership::Any,
        }
    }

    /// Any authenticated subject.
    pub fn authenticated() -> Self {
        Self::new([Role::User, Role::Admin])
    }

    pub fn admin_only() -> Self {
        Self::new([Role::Admin])
    }

    /// Subjects with one of `roles` acting on their own resource, or admins.
    pub fn owner_or_admin(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            allowed_roles: roles.into_iter().collect(),
            ownership: Ownership::Required,
        }
    }

    pub fn allows(&self, role: Role) -> bool {
        self.allowed_roles.contains(&role)
    }

    pub fn allowed_roles(&self) -> &BTreeSet<Role> {
        &self.allowed_roles
    }

    pub fn ownership(&self) -> Ownership {
        self.ownership
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied(String),
}

pub fn decide(identity: &Identity, target_owner: Option<&str>, policy: &AccessPolicy) -> Decision {
    if identity.is_admin() {
        return Decision::Allowed;
    }

    let owns_target = target_owner.is_some_and(|owner| owner == identity.subject_id);
    if owns_target && policy.allows(Role::User) {
        return Decision::Allowed;
    }

    if policy.ownership() == Ownership::Any && policy.allows(identity.role) {
        return Decision::Allowed;
    }

    Decision::Denied(denial_reason(identity.role, policy))
}

// Names only the roles involved; never the target or other subjects.
fn denial_reason(actual: Role, policy: &AccessPolicy) -> String {
    let required = if policy.allowed_roles().is_empty() {
        "none".to_string()
    } else {
        policy
            .allowed_roles()
            .iter()
            .map(Role::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };

    match policy.ownership() {
        Ownership::Any => format!("required: {required}; actual: {actual}"),
        Ownership::Required => format!("required: {required} (own resource) or admin; actual: {actual}"),
    }
}
