use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    models::posts::{CommentWithAuthor, Post, PostDetail, PostWithRefs},
    Result,
};

use super::PostgresRepo;

const POST_WITH_REFS_COLUMNS: &str = r#"
    p.id, p.title, p.content,
    p.author_id, u.name AS author_name,
    p.category_id, c.name AS category_name, c.slug AS category_slug,
    p.featured_image, p.is_published, p.view_count, p.created_at
"#;

#[async_trait]
pub trait PostsRepository: Send + Sync {
    async fn list_published(
        &self,
        category: Option<Uuid>,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostWithRefs>>;
    async fn count_published(&self, category: Option<Uuid>, search: Option<&str>) -> Result<i64>;
    async fn find_post(&self, post_id: Uuid) -> Result<Option<Post>>;
    async fn find_detail(&self, post_id: Uuid) -> Result<Option<PostDetail>>;
    /// Returns false when no post with that id exists.
    async fn increment_view_count(&self, post_id: Uuid) -> Result<bool>;
    async fn create_post(
        &self,
        author_id: Uuid,
        title: &str,
        content: &str,
        category_id: Uuid,
        featured_image: Option<&str>,
        is_published: bool,
    ) -> Result<Post>;
    async fn update_post(
        &self,
        post_id: Uuid,
        title: &str,
        content: &str,
        category_id: Uuid,
        featured_image: Option<&str>,
        is_published: Option<bool>,
    ) -> Result<Post>;
    async fn delete_post(&self, post_id: Uuid) -> Result<()>;
    async fn add_comment(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        content: &str,
    ) -> Result<CommentWithAuthor>;
}

/// Quotes LIKE wildcards so a search term is matched as a literal substring.
pub fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn search_pattern(search: Option<&str>) -> Option<String> {
    search.map(|term| format!("%{}%", escape_like(term)))
}

#[async_trait]
impl PostsRepository for PostgresRepo {
    async fn list_published(
        &self,
        category: Option<Uuid>,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostWithRefs>> {
        let sql = format!(
            r#"
            SELECT {POST_WITH_REFS_COLUMNS}
            FROM posts p
            JOIN users u ON u.id = p.author_id
            JOIN categories c ON c.id = p.category_id
            WHERE p.is_published = TRUE
              AND ($1::uuid IS NULL OR p.category_id = $1)
              AND ($2::text IS NULL OR p.title ILIKE $2 OR p.content ILIKE $2)
            ORDER BY p.created_at DESC
            LIMIT $3 OFFSET $4
            "#
        );

        let posts = sqlx::query_as::<_, PostWithRefs>(&sql)
            .bind(category)
            .bind(search_pattern(search))
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(posts)
    }

    async fn count_published(&self, category: Option<Uuid>, search: Option<&str>) -> Result<i64> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM posts p
            WHERE p.is_published = TRUE
              AND ($1::uuid IS NULL OR p.category_id = $1)
              AND ($2::text IS NULL OR p.title ILIKE $2 OR p.content ILIKE $2)
            "#,
        )
        .bind(category)
        .bind(search_pattern(search))
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    async fn find_post(&self, post_id: Uuid) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, content, author_id, category_id, featured_image,
                   is_published, view_count, created_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn find_detail(&self, post_id: Uuid) -> Result<Option<PostDetail>> {
        let sql = format!(
            r#"
            SELECT {POST_WITH_REFS_COLUMNS}
            FROM posts p
            JOIN users u ON u.id = p.author_id
            JOIN categories c ON c.id = p.category_id
            WHERE p.id = $1
            "#
        );

        let Some(post) = sqlx::query_as::<_, PostWithRefs>(&sql)
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let comments = sqlx::query_as::<_, CommentWithAuthor>(
            r#"
            SELECT pc.id, pc.user_id, u.name AS user_name, pc.content, pc.created_at
            FROM post_comments pc
            JOIN users u ON u.id = pc.user_id
            WHERE pc.post_id = $1
            ORDER BY pc.created_at ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(PostDetail::from_parts(post, comments)))
    }

    async fn increment_view_count(&self, post_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET view_count = view_count + 1
            WHERE id = $1
            "#,
        )
        .bind(post_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn create_post(
        &self,
        author_id: Uuid,
        title: &str,
        content: &str,
        category_id: Uuid,
        featured_image: Option<&str>,
        is_published: bool,
    ) -> Result<Post> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (id, title, content, author_id, category_id, featured_image, is_published)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, title, content, author_id, category_id, featured_image,
                      is_published, view_count, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(title)
        .bind(content)
        .bind(author_id)
        .bind(category_id)
        .bind(featured_image)
        .bind(is_published)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    async fn update_post(
        &self,
        post_id: Uuid,
        title: &str,
        content: &str,
        category_id: Uuid,
        featured_image: Option<&str>,
        is_published: Option<bool>,
    ) -> Result<Post> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET title = $2,
                content = $3,
                category_id = $4,
                featured_image = COALESCE($5, featured_image),
                is_published = COALESCE($6, is_published)
            WHERE id = $1
            RETURNING id, title, content, author_id, category_id, featured_image,
                      is_published, view_count, created_at
            "#,
        )
        .bind(post_id)
        .bind(title)
        .bind(content)
        .bind(category_id)
        .bind(featured_image)
        .bind(is_published)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    async fn delete_post(&self, post_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            DELETE FROM posts WHERE id = $1
            "#,
        )
        .bind(post_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn add_comment(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        content: &str,
    ) -> Result<CommentWithAuthor> {
        let comment = sqlx::query_as::<_, CommentWithAuthor>(
            r#"
            WITH inserted AS (
                INSERT INTO post_comments (id, post_id, user_id, content)
                VALUES ($1, $2, $3, $4)
                RETURNING id, user_id, content, created_at
            )
            SELECT i.id, i.user_id, u.name AS user_name, i.content, i.created_at
            FROM inserted i
            JOIN users u ON u.id = i.user_id
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(post_id)
        .bind(user_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }
}
