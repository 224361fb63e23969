use axum::Router;
use domain_users::handlers;

pub fn router(state: &crate::state::AppState) -> Router {
    handlers::router(state.service.clone())
}
