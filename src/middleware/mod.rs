use std::sync::Arc;

use axum::{
    extract::Request, http::header, middleware::Next, response::IntoResponse, response::Response,
};
use axum_extra::extract::CookieJar;

use crate::{
    models::users::{User, UserRole},
    AppState, Error, Result,
};

/// The authenticated identity, inserted into request extensions by `auth`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
}

pub async fn auth(mut req: Request, next: Next) -> Result<impl IntoResponse> {
    let app_state = req
        .extensions()
        .get::<Arc<AppState>>()
        .ok_or(Error::InternalServerError)?
        .clone();

    let cookies = CookieJar::from_headers(req.headers());

    let token = cookies
        .get("token")
        .map(|c| c.value().to_string())
        .or_else(|| {
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|auth_header| auth_header.to_str().ok())
                .and_then(|auth_value| {
                    auth_value
                        .strip_prefix("Bearer ")
                        .map(|stripped| stripped.to_string())
                })
        })
        .ok_or(Error::Unauthorized)?;

    let user_id = app_state
        .users_service
        .decode_token(token)
        .map_err(|_| Error::Unauthorized)?;

    let user = app_state
        .users_service
        .get_user(user_id)
        .await
        .map_err(|_| Error::Unauthorized)?;

    req.extensions_mut().insert(AuthenticatedUser { user });

    Ok(next.run(req).await)
}

pub async fn role_check(
    req: Request,
    next: Next,
    required_roles: Vec<UserRole>,
) -> Result<Response> {
    let authenticated = req
        .extensions()
        .get::<AuthenticatedUser>()
        .ok_or(Error::Unauthorized)?;

    if !required_roles.contains(&authenticated.user.role) {
        return Err(Error::Forbidden);
    }

    Ok(next.run(req).await)
}
