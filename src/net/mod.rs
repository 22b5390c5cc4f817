//! Networking modules for the backend REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `http` owns the shared client and its headers, `api` wraps individual
//! endpoints, and `types` defines the wire schema.

pub mod api;
pub mod http;
pub mod types;
