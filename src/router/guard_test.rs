use std::rc::Rc;

use super::*;
use crate::state::session::SessionStore;
use crate::util::storage::{ACCESS_TOKEN_KEY, MemoryStore};

fn logged_out() -> Session {
    SessionStore::new(Rc::new(MemoryStore::new())).snapshot()
}

fn logged_in_as(role: &str) -> Session {
    let store = SessionStore::new(Rc::new(MemoryStore::new()));
    store.set_auth("opaque", role);
    store.snapshot()
}

fn logged_in_without_role() -> Session {
    let storage = MemoryStore::with_entries([(ACCESS_TOKEN_KEY, "opaque")]);
    SessionStore::new(Rc::new(storage)).snapshot()
}

fn redirect(reason: DenyReason) -> GuardDecision {
    GuardDecision::Redirect {
        to: "/login",
        reason,
    }
}

// =============================================================
// Public routes
// =============================================================

#[test]
fn public_route_allows_everyone() {
    let meta = RouteMeta::public();
    let teacher = logged_in_as("teacher");
    assert_eq!(evaluate(&meta, &logged_out()), GuardDecision::Allow);
    assert_eq!(evaluate(&meta, &teacher), GuardDecision::Allow);
}

#[test]
fn role_without_requires_auth_is_ignored() {
    let meta = RouteMeta {
        requires_auth: false,
        role: Some(RoleRequirement::Exactly("admin".into())),
    };
    assert_eq!(evaluate(&meta, &logged_out()), GuardDecision::Allow);
}

// =============================================================
// Scalar role
// =============================================================

#[test]
fn admin_route_redirects_unauthenticated() {
    let meta = RouteMeta::role("admin");
    let decision = evaluate(&meta, &logged_out());
    assert_eq!(decision, redirect(DenyReason::Unauthenticated));
}

#[test]
fn admin_route_redirects_parent() {
    let meta = RouteMeta::role("admin");
    let decision = evaluate(&meta, &logged_in_as("parent"));
    assert_eq!(decision, redirect(DenyReason::RoleMismatch));
}

#[test]
fn admin_route_allows_admin() {
    let meta = RouteMeta::role("admin");
    let decision = evaluate(&meta, &logged_in_as("admin"));
    assert_eq!(decision, GuardDecision::Allow);
}

#[test]
fn both_denials_share_the_login_target() {
    let meta = RouteMeta::role("admin");
    let targets: Vec<_> = [logged_out(), logged_in_as("parent")]
        .iter()
        .map(|s| match evaluate(&meta, s) {
            GuardDecision::Redirect { to, .. } => to,
            GuardDecision::Allow => "allowed",
        })
        .collect();
    assert_eq!(targets, vec![LOGIN_PATH, LOGIN_PATH]);
}

#[test]
fn scalar_role_comparison_is_case_sensitive() {
    let meta = RouteMeta::role("admin");
    assert!(!evaluate(&meta, &logged_in_as("Admin")).is_allowed());
}

#[test]
fn empty_scalar_role_means_any_authenticated_user() {
    let meta = RouteMeta::role("");
    assert_eq!(meta.role, None);
    assert!(evaluate(&meta, &logged_in_as("parent")).is_allowed());
    assert!(!evaluate(&meta, &logged_out()).is_allowed());
}

// =============================================================
// Role lists
// =============================================================

#[test]
fn parent_route_allows_class_rep() {
    let meta = RouteMeta::any_role(&["parent", "class_rep"]);
    let decision = evaluate(&meta, &logged_in_as("class_rep"));
    assert_eq!(decision, GuardDecision::Allow);
}

#[test]
fn parent_route_redirects_teacher() {
    let meta = RouteMeta::any_role(&["parent", "class_rep"]);
    let decision = evaluate(&meta, &logged_in_as("teacher"));
    assert_eq!(decision, redirect(DenyReason::RoleMismatch));
}

#[test]
fn empty_role_list_admits_nobody() {
    let meta = RouteMeta::any_role(&[]);
    assert!(!evaluate(&meta, &logged_in_as("admin")).is_allowed());
}

// =============================================================
// Sessions without a role
// =============================================================

#[test]
fn authenticated_route_allows_session_without_role() {
    let meta = RouteMeta::authenticated();
    assert!(evaluate(&meta, &logged_in_without_role()).is_allowed());
}

#[test]
fn role_route_redirects_session_without_role() {
    let meta = RouteMeta::any_role(&["teacher"]);
    let decision = evaluate(&meta, &logged_in_without_role());
    assert_eq!(decision, redirect(DenyReason::RoleMismatch));
}

#[test]
fn admits_rejects_missing_role() {
    assert!(!RoleRequirement::Exactly("admin".into()).admits(None));
    assert!(!RoleRequirement::AnyOf(vec!["admin".into()]).admits(None));
}
