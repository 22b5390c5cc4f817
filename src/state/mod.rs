//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! The session is owned explicitly and injected into the router, HTTP
//! client wiring, and pages instead of living in a global.

pub mod session;
