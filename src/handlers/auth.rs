use std::sync::Arc;

use axum::{
    http::{header, HeaderMap, Method, StatusCode},
    response::IntoResponse,
    routing::post,
    Extension, Json, Router,
};
use tower_cookies::Cookie;
use tower_http::cors::{Any, CorsLayer};
use validator::Validate;

use crate::{
    models::{
        response::ApiResponse,
        users::{FilterUserDto, LoginResponseDto, LoginUserDto, RegisterUserDto},
    },
    AppState, Result,
};

pub fn auth_handler() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

pub fn configure_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

fn token_cookie(token: &str, max_age: time::Duration) -> Cookie<'static> {
    Cookie::build(("token", token.to_string()))
        .path("/")
        .max_age(max_age)
        .http_only(true)
        .build()
}

pub async fn register(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(new_user): Json<RegisterUserDto>,
) -> Result<impl IntoResponse> {
    new_user.validate()?;

    let user = app_state
        .auth_service
        .register(&new_user.name, &new_user.email, &new_user.password)
        .await?;

    let token = app_state.auth_service.issue_token(user.id)?;

    let cookie_duration = time::Duration::minutes(app_state.config.jwt_maxage);
    let cookie = token_cookie(&token, cookie_duration);

    let mut headers = HeaderMap::new();
    headers.append(
        header::SET_COOKIE,
        cookie
            .to_string()
            .parse()
            .map_err(|_| crate::Error::InternalServerError)?,
    );

    let mut response = (
        StatusCode::CREATED,
        Json(ApiResponse::new(FilterUserDto::filter_user(&user))),
    )
        .into_response();
    response.headers_mut().extend(headers);

    Ok(response)
}

pub async fn login(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(credentials): Json<LoginUserDto>,
) -> Result<impl IntoResponse> {
    credentials.validate()?;

    let (_user, token) = app_state
        .auth_service
        .login(&credentials.email, &credentials.password)
        .await?;

    let cookie_duration = time::Duration::minutes(app_state.config.jwt_maxage);
    let cookie = token_cookie(&token, cookie_duration);

    let mut headers = HeaderMap::new();
    headers.append(
        header::SET_COOKIE,
        cookie
            .to_string()
            .parse()
            .map_err(|_| crate::Error::InternalServerError)?,
    );

    let response = Json(LoginResponseDto {
        success: true,
        token,
    });

    let mut response = response.into_response();
    response.headers_mut().extend(headers);

    Ok(response)
}

pub async fn logout() -> Result<impl IntoResponse> {
    let cookie = token_cookie("", time::Duration::seconds(0));

    let mut headers = HeaderMap::new();
    headers.append(
        header::SET_COOKIE,
        cookie
            .to_string()
            .parse()
            .map_err(|_| crate::Error::InternalServerError)?,
    );

    let mut response = Json(ApiResponse::new(serde_json::json!({}))).into_response();
    response.headers_mut().extend(headers);

    Ok(response)
}
