//! Navigation guard evaluation.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every navigation is checked against the target route's metadata and the
//! current session before the page renders. The guard is a pure function of
//! those two inputs, so it runs identically in the browser and in tests.
//!
//! Unauthenticated access and a role mismatch both redirect to `/login`.
//! The deny reason is kept only for logging.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use crate::state::session::Session;

/// Where every denied navigation lands.
pub const LOGIN_PATH: &str = "/login";

/// Role a route demands of the current user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoleRequirement {
    Exactly(String),
    AnyOf(Vec<String>),
}

impl RoleRequirement {
    /// Whether `role` satisfies this requirement.
    #[must_use]
    pub fn admits(&self, role: Option<&str>) -> bool {
        let Some(role) = role else {
            return false;
        };
        match self {
            Self::Exactly(required) => required == role,
            Self::AnyOf(allowed) => allowed.iter().any(|r| r == role),
        }
    }
}

/// Guard metadata attached to a route.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouteMeta {
    pub requires_auth: bool,
    pub role: Option<RoleRequirement>,
}

impl RouteMeta {
    /// Open to everyone.
    #[must_use]
    pub fn public() -> Self {
        Self::default()
    }

    /// Any logged-in user.
    #[must_use]
    pub fn authenticated() -> Self {
        Self {
            requires_auth: true,
            role: None,
        }
    }

    /// Logged-in user with exactly `role`. An empty role imposes no role check.
    #[must_use]
    pub fn role(role: &str) -> Self {
        let role = (!role.is_empty()).then(|| RoleRequirement::Exactly(role.to_owned()));
        Self {
            requires_auth: true,
            role,
        }
    }

    /// Logged-in user holding one of `roles`. An empty list admits nobody.
    #[must_use]
    pub fn any_role(roles: &[&str]) -> Self {
        let roles = roles.iter().map(|r| (*r).to_owned()).collect();
        Self {
            requires_auth: true,
            role: Some(RoleRequirement::AnyOf(roles)),
        }
    }
}

/// Why a navigation was denied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DenyReason {
    Unauthenticated,
    RoleMismatch,
}

/// Outcome of evaluating the guard for one navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect {
        to: &'static str,
        reason: DenyReason,
    },
}

impl GuardDecision {
    #[must_use]
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }

    fn deny(reason: DenyReason) -> Self {
        Self::Redirect {
            to: LOGIN_PATH,
            reason,
        }
    }
}

/// Decide whether `session` may enter a route carrying `meta`.
#[must_use]
pub fn evaluate(meta: &RouteMeta, session: &Session) -> GuardDecision {
    if !meta.requires_auth {
        return GuardDecision::Allow;
    }
    if !session.is_authenticated() {
        return GuardDecision::deny(DenyReason::Unauthenticated);
    }
    match &meta.role {
        Some(required) if !required.admits(session.user_role()) => {
            GuardDecision::deny(DenyReason::RoleMismatch)
        }
        _ => GuardDecision::Allow,
    }
}
