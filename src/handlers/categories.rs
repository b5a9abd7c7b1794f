use std::sync::Arc;

use axum::{
    extract::Path,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    middleware::{auth, role_check},
    models::{categories::CategoryPayload, response::ApiResponse, users::UserRole},
    AppState, Result,
};

pub fn categories_handler() -> Router {
    Router::new()
        .route("/", get(get_categories))
        .route("/{id}", get(get_category))
        .route(
            "/",
            post(create_category)
                .layer(middleware::from_fn(|req, next| {
                    role_check(req, next, vec![UserRole::Admin, UserRole::User])
                }))
                .layer(middleware::from_fn(auth)),
        )
        .route(
            "/{id}",
            put(update_category)
                .delete(delete_category)
                .layer(middleware::from_fn(|req, next| {
                    role_check(req, next, vec![UserRole::Admin])
                }))
                .layer(middleware::from_fn(auth)),
        )
}

async fn get_categories(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse> {
    let categories = app_state.categories_service.list().await?;
    let count = categories.len();

    Ok(Json(ApiResponse::counted(categories, count)))
}

async fn get_category(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(category_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let category = app_state.categories_service.get(category_id).await?;

    Ok(Json(ApiResponse::new(category)))
}

async fn create_category(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(payload): Json<CategoryPayload>,
) -> Result<impl IntoResponse> {
    let category = app_state.categories_service.create(payload).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(category))))
}

async fn update_category(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(category_id): Path<Uuid>,
    Json(payload): Json<CategoryPayload>,
) -> Result<impl IntoResponse> {
    let category = app_state
        .categories_service
        .update(category_id, payload)
        .await?;

    Ok(Json(ApiResponse::new(category)))
}

async fn delete_category(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(category_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    app_state.categories_service.delete(category_id).await?;

    Ok(Json(ApiResponse::new(json!({}))))
}
