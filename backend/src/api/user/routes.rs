//! User routes: manager-only listing behind the authentication guard.

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

use super::handlers;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_users))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            crate::auth::middleware::authenticate,
        ))
}
