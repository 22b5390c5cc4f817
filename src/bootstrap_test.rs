use std::cell::RefCell;

use super::*;
use crate::router::routes::Page;
use crate::util::jwt::unsigned_token;
use crate::util::storage::{
    ACCESS_TOKEN_KEY, DARK_MODE_KEY, KeyValueStore, MemoryStore, USER_ROLE_KEY,
};
use serde_json::json;

struct Harness {
    storage: Rc<MemoryStore>,
    dark_calls: Rc<RefCell<Vec<bool>>>,
    ctx: AppContext,
}

fn boot(storage: MemoryStore) -> Harness {
    let storage = Rc::new(storage);
    let dark_calls = Rc::new(RefCell::new(Vec::new()));
    let sink = dark_calls.clone();
    let ctx = AppContext::bootstrap(ClientConfig::default(), storage.clone(), move |on| {
        sink.borrow_mut().push(on);
    });
    Harness {
        storage,
        dark_calls,
        ctx,
    }
}

// =============================================================
// Startup
// =============================================================

#[test]
fn fresh_start_is_logged_out_without_header() {
    let h = boot(MemoryStore::new());
    assert!(!h.ctx.session.is_authenticated());
    assert_eq!(h.ctx.http.authorization(), None);
    assert_eq!(h.ctx.http.base_url(), "http://localhost:8000");
}

#[test]
fn reload_restores_session_and_header() {
    let token = unsigned_token(&json!({"role": "admin", "user_id": 1}));
    let h = boot(MemoryStore::with_entries([
        (ACCESS_TOKEN_KEY, token.as_str()),
        (USER_ROLE_KEY, "admin"),
    ]));
    assert!(h.ctx.session.is_authenticated());
    assert_eq!(h.ctx.http.authorization(), Some(format!("Bearer {token}")));
    assert_eq!(h.ctx.navigate("/admin").unwrap().page, Page::AdminDashboard);
}

#[test]
fn reload_with_orphan_token_keeps_storage_and_header() {
    let h = boot(MemoryStore::with_entries([(ACCESS_TOKEN_KEY, "orphan")]));
    assert!(!h.ctx.session.is_authenticated());
    assert_eq!(h.ctx.http.authorization().as_deref(), Some("Bearer orphan"));
    assert_eq!(h.storage.get(ACCESS_TOKEN_KEY).as_deref(), Some("orphan"));
}

#[test]
fn later_rehydrate_leaves_header_and_storage_alone() {
    let h = boot(MemoryStore::new());
    h.ctx.session.login("t-1", "teacher");
    h.storage.remove(USER_ROLE_KEY);
    h.ctx.session.rehydrate_auth();
    assert!(!h.ctx.session.is_authenticated());
    assert_eq!(h.ctx.http.authorization().as_deref(), Some("Bearer t-1"));
    assert_eq!(h.storage.get(ACCESS_TOKEN_KEY).as_deref(), Some("t-1"));
}

#[test]
fn dark_mode_applied_immediately_from_storage() {
    let h = boot(MemoryStore::with_entries([(DARK_MODE_KEY, "true")]));
    assert_eq!(*h.dark_calls.borrow(), vec![true]);
}

// =============================================================
// Synchronization after startup
// =============================================================

#[test]
fn login_sets_header_and_logout_removes_it() {
    let h = boot(MemoryStore::new());
    h.ctx.session.login("t-1", "teacher");
    assert_eq!(h.ctx.http.authorization().as_deref(), Some("Bearer t-1"));
    h.ctx.session.logout();
    assert_eq!(h.ctx.http.authorization(), None);
    assert_eq!(h.storage.get(ACCESS_TOKEN_KEY), None);
}

#[test]
fn dark_mode_changes_reach_document_applier() {
    let h = boot(MemoryStore::new());
    h.ctx.session.toggle_dark_mode();
    h.ctx.session.set_dark_mode(false);
    assert_eq!(*h.dark_calls.borrow(), vec![false, true, false]);
}

#[test]
fn auth_changes_do_not_reapply_dark_mode() {
    let h = boot(MemoryStore::new());
    h.ctx.session.login("t-1", "teacher");
    h.ctx.session.logout();
    assert_eq!(*h.dark_calls.borrow(), vec![false]);
}

#[test]
fn navigate_matches_browser_path_variants() {
    let h = boot(MemoryStore::new());
    h.ctx.session.login("t-1", "teacher");
    for path in [
        "/Teacher",
        "/TEACHER/",
        "/teacher?tab=classes",
        "/teacher#top",
    ] {
        let nav = h.ctx.navigate(path).unwrap();
        assert_eq!(nav.page, Page::TeacherDashboard, "{path}");
        assert_eq!(nav.path, "/teacher");
        assert!(!nav.redirected);
    }
    assert_eq!(h.ctx.navigate("/Admin").unwrap().path, "/login");
    assert_eq!(
        h.ctx.navigate("/no/such/page").unwrap().page,
        Page::NotFound
    );
}

#[test]
fn navigate_uses_live_session() {
    let h = boot(MemoryStore::new());
    assert_eq!(h.ctx.navigate("/teacher").unwrap().page, Page::Login);
    h.ctx.session.login("t-1", "teacher");
    assert_eq!(
        h.ctx.navigate("/teacher").unwrap().page,
        Page::TeacherDashboard
    );
}

#[test]
fn clones_share_session_and_headers() {
    let h = boot(MemoryStore::new());
    let page_ctx = h.ctx.clone();
    page_ctx.session.login("t-2", "parent");
    assert!(h.ctx.session.is_authenticated());
    assert_eq!(h.ctx.http.authorization().as_deref(), Some("Bearer t-2"));
}
