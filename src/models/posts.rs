use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(rename = "authorId")]
    pub author_id: Uuid,
    #[serde(rename = "categoryId")]
    pub category_id: Uuid,
    #[serde(rename = "featuredImage")]
    pub featured_image: Option<String>,
    #[serde(rename = "isPublished")]
    pub is_published: bool,
    #[serde(rename = "viewCount")]
    pub view_count: i32,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// A post with its author and category references resolved to display names.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct PostWithRefs {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(rename = "authorId")]
    pub author_id: Uuid,
    #[serde(rename = "authorName")]
    pub author_name: String,
    #[serde(rename = "categoryId")]
    pub category_id: Uuid,
    #[serde(rename = "categoryName")]
    pub category_name: String,
    #[serde(rename = "categorySlug")]
    pub category_slug: String,
    #[serde(rename = "featuredImage")]
    pub featured_image: Option<String>,
    #[serde(rename = "isPublished")]
    pub is_published: bool,
    #[serde(rename = "viewCount")]
    pub view_count: i32,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct CommentWithAuthor {
    pub id: Uuid,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    #[serde(rename = "userName")]
    pub user_name: String,
    pub content: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PostDetail {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(rename = "authorId")]
    pub author_id: Uuid,
    #[serde(rename = "authorName")]
    pub author_name: String,
    #[serde(rename = "categoryId")]
    pub category_id: Uuid,
    #[serde(rename = "categoryName")]
    pub category_name: String,
    #[serde(rename = "categorySlug")]
    pub category_slug: String,
    #[serde(rename = "featuredImage")]
    pub featured_image: Option<String>,
    #[serde(rename = "isPublished")]
    pub is_published: bool,
    #[serde(rename = "viewCount")]
    pub view_count: i32,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    pub comments: Vec<CommentWithAuthor>,
}

impl PostDetail {
    pub fn from_parts(post: PostWithRefs, comments: Vec<CommentWithAuthor>) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            author_id: post.author_id,
            author_name: post.author_name,
            category_id: post.category_id,
            category_name: post.category_name,
            category_slug: post.category_slug,
            featured_image: post.featured_image,
            is_published: post.is_published,
            view_count: post.view_count,
            created_at: post.created_at,
            comments,
        }
    }
}

/// Text fields of the multipart post form. The category arrives as an opaque
/// string and only survives as `Some` when it parses to a uuid; the service
/// reports it as a field error otherwise.
#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct PostPayload {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Title must be between 1 and 100 characters"
    ))]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    pub category: Option<Uuid>,
    #[serde(rename = "isPublished")]
    pub is_published: Option<bool>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct CommentPayload {
    #[validate(length(
        min = 1,
        max = 500,
        message = "Comment must be between 1 and 500 characters"
    ))]
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PostListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
}
