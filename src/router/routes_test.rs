use std::rc::Rc;

use super::*;
use crate::state::session::SessionStore;
use crate::util::storage::MemoryStore;

fn logged_out() -> Session {
    SessionStore::new(Rc::new(MemoryStore::new())).snapshot()
}

fn logged_in_as(role: &str) -> Session {
    let store = SessionStore::new(Rc::new(MemoryStore::new()));
    store.set_auth("opaque", role);
    store.snapshot()
}

// =============================================================
// normalize_path
// =============================================================

#[test]
fn normalize_path_strips_query_fragment_and_trailing_slash() {
    assert_eq!(normalize_path("/teacher/?tab=1#top"), "/teacher");
    assert_eq!(normalize_path("/admin#x"), "/admin");
    assert_eq!(normalize_path("login"), "/login");
}

#[test]
fn normalize_path_keeps_root() {
    assert_eq!(normalize_path("/"), "/");
    assert_eq!(normalize_path(""), "/");
    assert_eq!(normalize_path("///"), "/");
}

// =============================================================
// Standard table
// =============================================================

#[test]
fn standard_table_declares_guard_metadata() {
    let table = RouteTable::standard();
    let meta = |path: &str| table.resolve(path).map(|r| r.meta.clone());
    assert_eq!(meta("/login"), Some(RouteMeta::public()));
    assert_eq!(meta("/register"), Some(RouteMeta::public()));
    assert_eq!(meta("/teacher"), Some(RouteMeta::role("teacher")));
    let parents = RouteMeta::any_role(&["parent", "class_rep"]);
    assert_eq!(meta("/parent"), Some(parents));
    assert_eq!(meta("/admin"), Some(RouteMeta::role("admin")));
    let assistants = RouteMeta::any_role(&["teacher", "admin", "class_rep"]);
    assert_eq!(meta("/ai-assistant"), Some(assistants));
}

#[test]
fn resolve_ignores_case_and_trailing_slash() {
    let table = RouteTable::standard();
    assert_eq!(table.resolve("/Teacher/").map(|r| r.path), Some("/teacher"));
}

#[test]
fn path_of_finds_page_routes() {
    let table = RouteTable::standard();
    assert_eq!(table.path_of(Page::AdminDashboard), Some("/admin"));
    assert_eq!(table.path_of(Page::NotFound), None);
}

// =============================================================
// navigate
// =============================================================

#[test]
fn root_redirects_to_login() {
    let nav = RouteTable::standard().navigate("/", &logged_out()).unwrap();
    assert_eq!(nav.page, Page::Login);
    assert_eq!(nav.path, "/login");
    assert_eq!(nav.requested, "/");
    assert!(nav.redirected);
}

#[test]
fn unknown_path_renders_not_found() {
    let table = RouteTable::standard();
    let nav = table.navigate("/nope/deeper?x=1", &logged_out()).unwrap();
    assert_eq!(nav.page, Page::NotFound);
    assert_eq!(nav.path, "/nope/deeper");
    assert!(!nav.redirected);
}

#[test]
fn protected_page_without_session_lands_on_login() {
    let table = RouteTable::standard();
    let nav = table.navigate("/admin", &logged_out()).unwrap();
    assert_eq!(nav.page, Page::Login);
    assert!(nav.redirected);
}

#[test]
fn wrong_role_lands_on_login() {
    let table = RouteTable::standard();
    let nav = table.navigate("/teacher", &logged_in_as("parent")).unwrap();
    assert_eq!(nav.page, Page::Login);
}

#[test]
fn matching_role_renders_page_without_redirect() {
    let table = RouteTable::standard();
    let nav = table.navigate("/parent", &logged_in_as("class_rep")).unwrap();
    assert_eq!(nav.page, Page::ParentDashboard);
    assert_eq!(nav.path, "/parent");
    assert!(!nav.redirected);
}

#[test]
fn ai_assistant_allows_teacher_but_not_parent() {
    let table = RouteTable::standard();
    let teacher = table.navigate("/ai-assistant", &logged_in_as("teacher"));
    assert_eq!(teacher.unwrap().page, Page::AiAssistant);
    let parent = table.navigate("/ai-assistant", &logged_in_as("parent"));
    assert_eq!(parent.unwrap().page, Page::Login);
}

#[test]
fn redirect_cycle_is_reported() {
    let routes = vec![Route::redirect("/a", "/b"), Route::redirect("/b", "/a")];
    let table = RouteTable::new(routes, Page::NotFound);
    let err = table.navigate("/a", &logged_out()).unwrap_err();
    assert_eq!(err, NavigationError::RedirectLoop { path: "/a".into() });
}

#[test]
fn guard_redirect_to_protected_login_is_reported() {
    let login = Route::page(LOGIN_PATH, Page::Login, RouteMeta::authenticated());
    let table = RouteTable::new(vec![login], Page::NotFound);
    assert!(table.navigate("/login", &logged_out()).is_err());
}

// =============================================================
// home_path_for_role
// =============================================================

#[test]
fn home_path_for_each_role() {
    assert_eq!(home_path_for_role(Some("teacher")), "/teacher");
    assert_eq!(home_path_for_role(Some("parent")), "/parent");
    assert_eq!(home_path_for_role(Some("class_rep")), "/parent");
    assert_eq!(home_path_for_role(Some("admin")), "/admin");
    assert_eq!(home_path_for_role(Some("janitor")), "/login");
    assert_eq!(home_path_for_role(None), "/login");
}

#[test]
fn every_home_path_admits_its_role() {
    let table = RouteTable::standard();
    for role in ["teacher", "parent", "class_rep", "admin"] {
        let home = home_path_for_role(Some(role));
        let nav = table.navigate(home, &logged_in_as(role)).unwrap();
        assert!(!nav.redirected, "{role} bounced from its home page");
    }
}
