//! Static route table and navigation resolution.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages render whatever [`RouteTable::navigate`] settles on. Resolution
//! follows record redirects (`/` → `/login`) and guard redirects until an
//! allowed page is reached.
//!
//! Matching ignores query string, fragment, a trailing slash, and ASCII
//! case. Unknown paths render the not-found page, which is public.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use super::guard::{self, GuardDecision, LOGIN_PATH, RouteMeta};
use crate::state::session::Session;

/// Upper bound on redirects followed for one navigation.
pub const MAX_REDIRECTS: usize = 10;

/// Pages the application can render.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Page {
    Login,
    Register,
    TeacherDashboard,
    ParentDashboard,
    AdminDashboard,
    AiAssistant,
    NotFound,
}

impl Page {
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Login => "Sign in",
            Self::Register => "Create account",
            Self::TeacherDashboard => "Teacher dashboard",
            Self::ParentDashboard => "Parent dashboard",
            Self::AdminDashboard => "Admin dashboard",
            Self::AiAssistant => "AI assistant",
            Self::NotFound => "Page not found",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteTarget {
    Page(Page),
    Redirect(&'static str),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub target: RouteTarget,
    pub meta: RouteMeta,
}

impl Route {
    #[must_use]
    pub fn page(path: &'static str, page: Page, meta: RouteMeta) -> Self {
        Self {
            path,
            target: RouteTarget::Page(page),
            meta,
        }
    }

    #[must_use]
    pub fn redirect(path: &'static str, to: &'static str) -> Self {
        Self {
            path,
            target: RouteTarget::Redirect(to),
            meta: RouteMeta::public(),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("navigation to {path} exceeded the redirect limit")]
    RedirectLoop { path: String },
}

/// Where a navigation ended up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Navigation {
    /// Path that was asked for, as given.
    pub requested: String,
    /// Path of the page that will render.
    pub path: String,
    pub page: Page,
    pub redirected: bool,
}

/// Ordered list of routes plus the page used when nothing matches.
#[derive(Clone, Debug)]
pub struct RouteTable {
    routes: Vec<Route>,
    fallback: Page,
}

impl RouteTable {
    #[must_use]
    pub fn new(routes: Vec<Route>, fallback: Page) -> Self {
        Self { routes, fallback }
    }

    /// The application's route table.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(
            vec![
                Route::redirect("/", LOGIN_PATH),
                Route::page(LOGIN_PATH, Page::Login, RouteMeta::public()),
                Route::page("/register", Page::Register, RouteMeta::public()),
                Route::page(
                    "/teacher",
                    Page::TeacherDashboard,
                    RouteMeta::role("teacher"),
                ),
                Route::page(
                    "/parent",
                    Page::ParentDashboard,
                    RouteMeta::any_role(&["parent", "class_rep"]),
                ),
                Route::page("/admin", Page::AdminDashboard, RouteMeta::role("admin")),
                Route::page(
                    "/ai-assistant",
                    Page::AiAssistant,
                    RouteMeta::any_role(&["teacher", "admin", "class_rep"]),
                ),
            ],
            Page::NotFound,
        )
    }

    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Route record matching `path`, if any.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<&Route> {
        let path = normalize_path(path);
        self.routes
            .iter()
            .find(|r| r.path.eq_ignore_ascii_case(&path))
    }

    /// Path of the route rendering `page`.
    #[must_use]
    pub fn path_of(&self, page: Page) -> Option<&'static str> {
        self.routes
            .iter()
            .find(|r| r.target == RouteTarget::Page(page))
            .map(|r| r.path)
    }

    /// Resolve `path` for `session`, following record and guard redirects.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::RedirectLoop`] when redirects do not settle
    /// within [`MAX_REDIRECTS`] hops.
    pub fn navigate(&self, path: &str, session: &Session) -> Result<Navigation, NavigationError> {
        let not_found_meta = RouteMeta::public();
        let mut current = normalize_path(path);
        let mut redirected = false;

        for _ in 0..=MAX_REDIRECTS {
            let (target, meta, canonical) = match self.resolve(&current) {
                Some(route) => (route.target.clone(), &route.meta, route.path.to_owned()),
                None => (
                    RouteTarget::Page(self.fallback),
                    &not_found_meta,
                    current.clone(),
                ),
            };
            match target {
                RouteTarget::Redirect(to) => {
                    current = normalize_path(to);
                    redirected = true;
                }
                RouteTarget::Page(page) => match guard::evaluate(meta, session) {
                    GuardDecision::Allow => {
                        return Ok(Navigation {
                            requested: path.to_owned(),
                            path: canonical,
                            page,
                            redirected,
                        });
                    }
                    GuardDecision::Redirect { to, reason } => {
                        log::debug!("guard denied {canonical} ({reason:?}); redirecting to {to}");
                        current = to.to_owned();
                        redirected = true;
                    }
                },
            }
        }

        log::warn!("redirect loop resolving {path}");
        Err(NavigationError::RedirectLoop {
            path: path.to_owned(),
        })
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Landing page for a freshly logged-in user.
#[must_use]
pub fn home_path_for_role(role: Option<&str>) -> &'static str {
    match role {
        Some("teacher") => "/teacher",
        Some("parent" | "class_rep") => "/parent",
        Some("admin") => "/admin",
        _ => LOGIN_PATH,
    }
}

/// Strip query and fragment, ensure a leading slash, drop a trailing slash.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let trimmed = path[..end].trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_owned()
    } else {
        format!("/{trimmed}")
    }
}
