use axum::routing::{get, post};
use axum::Router;

use crate::handlers::role;
use crate::state::AppState;

/// Routes mounted at `/roles`.
///
/// ```text
/// POST   /              -> create_role
/// GET    /              -> find_all_roles
/// DELETE /?ids=1,2,3    -> delete_roles_by_ids
/// POST   /ids           -> find_roles_by_ids
/// GET    /{id}          -> get_role
/// DELETE /{id}          -> delete_role
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(role::create_role)
                .get(role::find_all_roles)
                .delete(role::delete_roles_by_ids),
        )
        .route("/ids", post(role::find_roles_by_ids))
        .route("/{id}", get(role::get_role).delete(role::delete_role))
}
