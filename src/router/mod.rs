//! Client-side routing: the route table and the navigation guard.
//!
//! SYSTEM CONTEXT
//! ==============
//! `routes` owns the static table and redirect resolution; `guard` decides
//! allow/redirect for a single route against the current session.

pub mod guard;
pub mod routes;

pub use guard::{GuardDecision, LOGIN_PATH, RouteMeta};
pub use routes::{Navigation, Page, RouteTable};
