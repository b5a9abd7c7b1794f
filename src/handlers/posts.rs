use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    middleware::{auth, role_check, AuthenticatedUser},
    models::{
        posts::{CommentPayload, PostListQuery, PostPayload},
        response::ApiResponse,
        users::UserRole,
    },
    AppState, Result,
};

pub fn posts_handler() -> Router {
    Router::new()
        .route("/", get(get_posts))
        .route("/{id}", get(get_post))
        .route(
            "/",
            post(create_post)
                .layer(middleware::from_fn(|req, next| {
                    role_check(req, next, vec![UserRole::Admin, UserRole::User])
                }))
                .layer(middleware::from_fn(auth)),
        )
        .route(
            "/{id}",
            put(update_post)
                .delete(delete_post)
                .layer(middleware::from_fn(|req, next| {
                    role_check(req, next, vec![UserRole::Admin, UserRole::User])
                }))
                .layer(middleware::from_fn(auth)),
        )
        .route(
            "/{id}/comments",
            post(add_comment).layer(middleware::from_fn(auth)),
        )
}

async fn get_posts(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<PostListQuery>,
) -> Result<impl IntoResponse> {
    let listing = app_state.posts_service.list(&query).await?;

    Ok(Json(ApiResponse::page(
        listing.posts,
        listing.count,
        listing.pagination,
    )))
}

async fn get_post(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(post_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let post = app_state.posts_service.detail(post_id).await?;

    Ok(Json(ApiResponse::new(post)))
}

async fn create_post(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(authenticated): Extension<AuthenticatedUser>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let (payload, image) = read_post_form(multipart).await?;

    let post = app_state
        .posts_service
        .create(&authenticated.user, payload, image)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(post))))
}

async fn update_post(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(authenticated): Extension<AuthenticatedUser>,
    Path(post_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let (payload, image) = read_post_form(multipart).await?;

    let post = app_state
        .posts_service
        .update(&authenticated.user, post_id, payload, image)
        .await?;

    Ok(Json(ApiResponse::new(post)))
}

async fn delete_post(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(authenticated): Extension<AuthenticatedUser>,
    Path(post_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    app_state
        .posts_service
        .delete(&authenticated.user, post_id)
        .await?;

    Ok(Json(ApiResponse::new(json!({}))))
}

async fn add_comment(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(authenticated): Extension<AuthenticatedUser>,
    Path(post_id): Path<Uuid>,
    Json(payload): Json<CommentPayload>,
) -> Result<impl IntoResponse> {
    let post = app_state
        .posts_service
        .add_comment(&authenticated.user, post_id, payload)
        .await?;

    Ok(Json(ApiResponse::new(post)))
}

/// Pulls the text fields and the optional image out of the multipart form.
/// Unknown fields are skipped; a category that is not a uuid stays `None`
/// and surfaces as a field error during validation.
async fn read_post_form(mut multipart: Multipart) -> Result<(PostPayload, Option<Vec<u8>>)> {
    let mut payload = PostPayload::default();
    let mut image = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("title") => payload.title = field.text().await?,
            Some("content") => payload.content = field.text().await?,
            Some("category") => {
                payload.category = Uuid::parse_str(field.text().await?.trim()).ok();
            }
            Some("isPublished") => {
                payload.is_published = field.text().await?.trim().parse().ok();
            }
            Some("featuredImage") => image = Some(field.bytes().await?.to_vec()),
            _ => {}
        }
    }

    Ok((payload, image))
}
