use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, Extension, Router};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{
        auth::auth_handler, categories::categories_handler, posts::posts_handler,
        user::users_handler,
    },
    AppState,
};

pub fn create_routes(app_state: Arc<AppState>) -> Router {
    let api_route = Router::new()
        .nest("/auth", auth_handler())
        .nest("/users", users_handler())
        .nest("/posts", posts_handler())
        .nest("/categories", categories_handler())
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state.clone()))
        .layer(DefaultBodyLimit::max(app_state.config.max_upload_size));

    Router::new()
        .nest("/api", api_route)
        .nest_service("/uploads", ServeDir::new(&app_state.config.upload_dir))
}
