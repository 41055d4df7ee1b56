use axum::routing::{get, post};
use axum::Router;

use crate::handlers::employee;
use crate::state::AppState;

/// Routes mounted at `/employees`.
///
/// ```text
/// POST   /              -> create_employee
/// GET    /              -> find_all_employees
/// DELETE /?ids=1,2,3    -> delete_employees_by_ids
/// POST   /ids           -> find_employees_by_ids
/// GET    /{id}          -> get_employee
/// DELETE /{id}          -> delete_employee
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(employee::create_employee)
                .get(employee::find_all_employees)
                .delete(employee::delete_employees_by_ids),
        )
        .route("/ids", post(employee::find_employees_by_ids))
        .route(
            "/{id}",
            get(employee::get_employee).delete(employee::delete_employee),
        )
}
