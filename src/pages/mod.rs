//! Routed pages.
//!
//! Pages read the application wiring from context (`AppHandle`) and the
//! session snapshot signal; none of them talk to storage directly.

pub mod dashboard;
pub mod login;
pub mod not_found;
pub mod register;
