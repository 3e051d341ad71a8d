//! User listing endpoints, distinct from the authentication flow itself.

pub mod handlers;
pub mod routes;
