use std::fmt;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::categories::Category;
use crate::models::posts::{PostDetail, PostPayload, PostWithRefs};
use crate::models::response::Pagination;
use crate::models::users::{FilterUserDto, LoginUserDto, RegisterUserDto};

pub type ApiResult<T> = core::result::Result<T, ApiError>;

/// A failed transport call. `message` carries the server-provided error text
/// when the response had one; callers fall back to their own wording
/// otherwise.
#[derive(Debug, Clone, Default)]
pub struct ApiError {
    pub message: Option<String>,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.message.as_deref().unwrap_or(fallback)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message.as_deref().unwrap_or("request failed"))
    }
}

impl std::error::Error for ApiError {}

/// One window of the post listing.
#[derive(Debug, Clone)]
pub struct PostPage {
    pub posts: Vec<PostWithRefs>,
    pub count: usize,
    pub pagination: Pagination,
}

/// Transport behind the state containers, mirroring the REST surface. The
/// binary in this crate serves the routes; a UI shell supplies the HTTP
/// implementation of this trait.
#[async_trait]
pub trait BlogApi: Send + Sync {
    async fn list_posts(
        &self,
        page: i64,
        limit: i64,
        category: Option<Uuid>,
        search: Option<&str>,
    ) -> ApiResult<PostPage>;
    async fn fetch_post(&self, post_id: Uuid) -> ApiResult<PostDetail>;
    /// Returns the stored post with author and category names resolved.
    async fn create_post(
        &self,
        payload: &PostPayload,
        image: Option<Vec<u8>>,
    ) -> ApiResult<PostWithRefs>;
    async fn update_post(
        &self,
        post_id: Uuid,
        payload: &PostPayload,
        image: Option<Vec<u8>>,
    ) -> ApiResult<PostWithRefs>;
    async fn delete_post(&self, post_id: Uuid) -> ApiResult<()>;
    /// Returns the post re-fetched with the new comment in place.
    async fn add_comment(&self, post_id: Uuid, content: &str) -> ApiResult<PostDetail>;
    async fn list_categories(&self) -> ApiResult<Vec<Category>>;
    async fn register(&self, new_user: &RegisterUserDto) -> ApiResult<FilterUserDto>;
    /// Returns the session token; the identity behind it comes from `me`.
    async fn login(&self, credentials: &LoginUserDto) -> ApiResult<String>;
    async fn logout(&self) -> ApiResult<()>;
    async fn me(&self) -> ApiResult<FilterUserDto>;
}
