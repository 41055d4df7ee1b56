pub mod employee;
pub mod internal;
pub mod role;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /employees                    create (admin), list (reader), bulk delete ?ids= (admin)
/// /employees/ids                lookup by id set (reader)
/// /employees/{id}               get (reader), delete (admin)
///
/// /roles                        create (admin), list (reader), bulk delete ?ids= (admin)
/// /roles/ids                    lookup by id set (reader)
/// /roles/{id}                   get (reader), delete (admin)
/// ```
///
/// Authentication is applied to the whole group by the router builder.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/employees", employee::router())
        .nest("/roles", role::router())
}
