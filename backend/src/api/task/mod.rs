//! Task CRUD endpoints.

pub mod handlers;
pub mod routes;
