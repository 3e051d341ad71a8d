//! Central module for organizing the application's main API endpoints.
//!
//! Task and user endpoints live here; the authentication routes are
//! handled separately in [`crate::auth`].

pub mod task;
pub mod user;
