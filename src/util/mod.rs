//! Utility helpers shared across client modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns (storage, document
//! classes) and token parsing from state and page logic.

pub mod dark_mode;
pub mod jwt;
pub mod storage;
