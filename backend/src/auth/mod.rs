//! Authentication module for managing user accounts, sessions, and access control.
//!
//! [`token`] signs and verifies the two token kinds, [`service`] issues and
//! rotates token pairs, [`middleware`] guards protected routes, and
//! [`handlers`]/[`routes`] expose the register, login, and refresh
//! endpoints.

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;
pub mod token;
