use axum::{middleware, response::IntoResponse, routing::get, Extension, Json, Router};

use crate::{
    middleware::{auth, AuthenticatedUser},
    models::{response::ApiResponse, users::FilterUserDto},
    Result,
};

pub fn users_handler() -> Router {
    Router::new()
        .route("/me", get(get_me))
        .layer(middleware::from_fn(auth))
}

async fn get_me(Extension(authenticated): Extension<AuthenticatedUser>) -> Result<impl IntoResponse> {
    let filtered_user = FilterUserDto::filter_user(&authenticated.user);

    Ok(Json(ApiResponse::new(filtered_user)))
}
