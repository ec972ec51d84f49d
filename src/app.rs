use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};
use tower_http::services::ServeDir;

pub fn router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.static_dir);
    Router::new()
        .route("/", get(handlers::home))
        .route("/api/users/:user", get(handlers::user_json))
        .route("/:user", get(handlers::user_page))
        .route("/:user/increment", post(handlers::increment))
        .route("/:user/decrement", post(handlers::decrement))
        .route("/:user/increment_by/:amount", post(handlers::increment_by))
        .nest_service("/static", static_files)
        .with_state(state)
}
