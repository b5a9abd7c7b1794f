use std::sync::Arc;

use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::posts::{
    CommentPayload, Post, PostDetail, PostListQuery, PostPayload, PostWithRefs,
};
use crate::models::response::{paginate, Pagination};
use crate::models::users::{User, UserRole};
use crate::repositories::{categories_repo::CategoriesRepository, posts_repo::PostsRepository};
use crate::services::uploads::ImageStore;
use crate::{Error, Result};

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 10;

#[derive(Clone)]
pub struct PostsService {
    repo: Arc<dyn PostsRepository>,
    categories: Arc<dyn CategoriesRepository>,
    images: ImageStore,
}

#[derive(Debug)]
pub struct PostListing {
    pub posts: Vec<PostWithRefs>,
    pub count: usize,
    pub pagination: Pagination,
}

/// Page and limit arrive as raw strings; anything that is not a positive
/// integer falls back to the default.
fn parse_positive(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|v| v.parse::<i64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

fn authorize_author(actor: &User, post: &Post) -> Result<()> {
    if post.author_id != actor.id && actor.role != UserRole::Admin {
        return Err(Error::Unauthorized);
    }
    Ok(())
}

impl PostsService {
    pub fn new(
        repo: Arc<dyn PostsRepository>,
        categories: Arc<dyn CategoriesRepository>,
        images: ImageStore,
    ) -> Self {
        Self {
            repo,
            categories,
            images,
        }
    }

    pub async fn list(&self, query: &PostListQuery) -> Result<PostListing> {
        let page = parse_positive(query.page.as_deref(), DEFAULT_PAGE);
        let limit = parse_positive(query.limit.as_deref(), DEFAULT_LIMIT);
        let category = match query.category.as_deref().filter(|c| !c.is_empty()) {
            Some(raw) => Some(
                Uuid::parse_str(raw)
                    .map_err(|_| Error::BadRequest("Invalid category id".to_string()))?,
            ),
            None => None,
        };
        let search = query.search.as_deref().filter(|s| !s.is_empty());

        let total = self.repo.count_published(category, search).await?;
        let posts = self
            .repo
            .list_published(category, search, limit, (page - 1) * limit)
            .await?;

        Ok(PostListing {
            count: posts.len(),
            pagination: paginate(page, limit, total),
            posts,
        })
    }

    /// Every successful fetch bumps the view counter, with no dedup by
    /// viewer. The increment is a single UPDATE, so sequential fetches
    /// count exactly.
    pub async fn detail(&self, post_id: Uuid) -> Result<PostDetail> {
        if !self.repo.increment_view_count(post_id).await? {
            return Err(Error::NotFound);
        }
        self.repo.find_detail(post_id).await?.ok_or(Error::NotFound)
    }

    pub async fn create(
        &self,
        author: &User,
        payload: PostPayload,
        image: Option<Vec<u8>>,
    ) -> Result<Post> {
        let category_id = self.validate_payload(&payload).await?;
        let featured_image = self.store_image(image).await?;

        self.repo
            .create_post(
                author.id,
                &payload.title,
                &payload.content,
                category_id,
                featured_image.as_deref(),
                payload.is_published.unwrap_or(true),
            )
            .await
    }

    pub async fn update(
        &self,
        actor: &User,
        post_id: Uuid,
        payload: PostPayload,
        image: Option<Vec<u8>>,
    ) -> Result<Post> {
        let category_id = self.validate_payload(&payload).await?;

        let post = self.repo.find_post(post_id).await?.ok_or(Error::NotFound)?;
        authorize_author(actor, &post)?;

        let featured_image = self.store_image(image).await?;

        self.repo
            .update_post(
                post_id,
                &payload.title,
                &payload.content,
                category_id,
                featured_image.as_deref(),
                payload.is_published,
            )
            .await
    }

    pub async fn delete(&self, actor: &User, post_id: Uuid) -> Result<()> {
        let post = self.repo.find_post(post_id).await?.ok_or(Error::NotFound)?;
        authorize_author(actor, &post)?;

        self.repo.delete_post(post_id).await
    }

    pub async fn add_comment(
        &self,
        actor: &User,
        post_id: Uuid,
        payload: CommentPayload,
    ) -> Result<PostDetail> {
        payload.validate()?;

        if self.repo.find_post(post_id).await?.is_none() {
            return Err(Error::NotFound);
        }

        self.repo
            .add_comment(post_id, actor.id, &payload.content)
            .await?;

        self.repo.find_detail(post_id).await?.ok_or(Error::NotFound)
    }

    async fn store_image(&self, image: Option<Vec<u8>>) -> Result<Option<String>> {
        match image {
            Some(data) => Ok(Some(self.images.save(&data).await?)),
            None => Ok(None),
        }
    }

    /// Collects every field error before giving up, so the client sees the
    /// whole list at once. The category reference must resolve to an
    /// existing row.
    async fn validate_payload(&self, payload: &PostPayload) -> Result<Uuid> {
        let mut errors = payload
            .validate()
            .err()
            .unwrap_or_else(ValidationErrors::new);

        let category = match payload.category {
            Some(id) if self.categories.category_exists(id).await? => Some(id),
            _ => {
                let mut error = ValidationError::new("category");
                error.message = Some("Valid category ID is required".into());
                errors.add("category".into(), error);
                None
            }
        };

        match category {
            Some(id) if errors.is_empty() => Ok(id),
            _ => Err(Error::ValidationFailed(errors)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;

    use super::*;
    use crate::models::posts::CommentWithAuthor;
    use crate::models::categories::Category;

    #[derive(Default)]
    struct FakePostsRepo {
        posts: Mutex<Vec<Post>>,
        comments: Mutex<Vec<(Uuid, CommentWithAuthor)>>,
        last_window: Mutex<Option<(i64, i64)>>,
    }

    fn matches(post: &Post, category: Option<Uuid>, search: Option<&str>) -> bool {
        post.is_published
            && category.map_or(true, |c| post.category_id == c)
            && search.map_or(true, |term| {
                let term = term.to_lowercase();
                post.title.to_lowercase().contains(&term)
                    || post.content.to_lowercase().contains(&term)
            })
    }

    fn with_refs(post: &Post) -> PostWithRefs {
        PostWithRefs {
            id: post.id,
            title: post.title.clone(),
            content: post.content.clone(),
            author_id: post.author_id,
            author_name: "Author".to_string(),
            category_id: post.category_id,
            category_name: "General".to_string(),
            category_slug: "general".to_string(),
            featured_image: post.featured_image.clone(),
            is_published: post.is_published,
            view_count: post.view_count,
            created_at: post.created_at,
        }
    }

    #[async_trait]
    impl PostsRepository for FakePostsRepo {
        async fn list_published(
            &self,
            category: Option<Uuid>,
            search: Option<&str>,
            limit: i64,
            offset: i64,
        ) -> Result<Vec<PostWithRefs>> {
            *self.last_window.lock().unwrap() = Some((limit, offset));
            let posts = self.posts.lock().unwrap();
            Ok(posts
                .iter()
                .filter(|p| matches(p, category, search))
                .skip(offset as usize)
                .take(limit as usize)
                .map(with_refs)
                .collect())
        }

        async fn count_published(
            &self,
            category: Option<Uuid>,
            search: Option<&str>,
        ) -> Result<i64> {
            let posts = self.posts.lock().unwrap();
            Ok(posts.iter().filter(|p| matches(p, category, search)).count() as i64)
        }

        async fn find_post(&self, post_id: Uuid) -> Result<Option<Post>> {
            Ok(self
                .posts
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.id == post_id)
                .cloned())
        }

        async fn find_detail(&self, post_id: Uuid) -> Result<Option<PostDetail>> {
            let Some(post) = self.find_post(post_id).await? else {
                return Ok(None);
            };
            let comments = self
                .comments
                .lock()
                .unwrap()
                .iter()
                .filter(|(id, _)| *id == post_id)
                .map(|(_, c)| c.clone())
                .collect();
            Ok(Some(PostDetail::from_parts(with_refs(&post), comments)))
        }

        async fn increment_view_count(&self, post_id: Uuid) -> Result<bool> {
            let mut posts = self.posts.lock().unwrap();
            match posts.iter_mut().find(|p| p.id == post_id) {
                Some(post) => {
                    post.view_count += 1;
                    Ok(true)
                }
                None => Ok(false),
            }
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
            let post = Post {
                id: Uuid::now_v7(),
                title: title.to_string(),
                content: content.to_string(),
                author_id,
                category_id,
                featured_image: featured_image.map(str::to_string),
                is_published,
                view_count: 0,
                created_at: Utc::now(),
            };
            self.posts.lock().unwrap().push(post.clone());
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
            let mut posts = self.posts.lock().unwrap();
            let post = posts
                .iter_mut()
                .find(|p| p.id == post_id)
                .ok_or(Error::NotFound)?;
            post.title = title.to_string();
            post.content = content.to_string();
            post.category_id = category_id;
            if let Some(image) = featured_image {
                post.featured_image = Some(image.to_string());
            }
            if let Some(published) = is_published {
                post.is_published = published;
            }
            Ok(post.clone())
        }

        async fn delete_post(&self, post_id: Uuid) -> Result<()> {
            self.posts.lock().unwrap().retain(|p| p.id != post_id);
            Ok(())
        }

        async fn add_comment(
            &self,
            post_id: Uuid,
            user_id: Uuid,
            content: &str,
        ) -> Result<CommentWithAuthor> {
            let comment = CommentWithAuthor {
                id: Uuid::now_v7(),
                user_id,
                user_name: "Commenter".to_string(),
                content: content.to_string(),
                created_at: Utc::now(),
            };
            self.comments
                .lock()
                .unwrap()
                .push((post_id, comment.clone()));
            Ok(comment)
        }
    }

    struct FakeCategoriesRepo {
        exists: bool,
    }

    #[async_trait]
    impl CategoriesRepository for FakeCategoriesRepo {
        async fn list_active(&self) -> Result<Vec<Category>> {
            unimplemented!()
        }

        async fn find_category(&self, _category_id: Uuid) -> Result<Option<Category>> {
            unimplemented!()
        }

        async fn find_by_name(&self, _name: &str) -> Result<Option<Category>> {
            unimplemented!()
        }

        async fn category_exists(&self, _category_id: Uuid) -> Result<bool> {
            Ok(self.exists)
        }

        async fn create_category(
            &self,
            _name: &str,
            _slug: &str,
            _description: Option<&str>,
            _is_active: bool,
        ) -> Result<Category> {
            unimplemented!()
        }

        async fn update_category(
            &self,
            _category_id: Uuid,
            _name: &str,
            _slug: &str,
            _description: Option<&str>,
            _is_active: Option<bool>,
        ) -> Result<Category> {
            unimplemented!()
        }

        async fn delete_category(&self, _category_id: Uuid) -> Result<()> {
            unimplemented!()
        }
    }

    fn user(role: UserRole) -> User {
        User {
            id: Uuid::now_v7(),
            name: "John Doe".to_string(),
            email: format!("{}@example.com", Uuid::now_v7()),
            password: "hashed".to_string(),
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn payload(category: Option<Uuid>) -> PostPayload {
        PostPayload {
            title: "Hello World".to_string(),
            content: "Body text".to_string(),
            category,
            is_published: None,
        }
    }

    fn service_with(repo: Arc<FakePostsRepo>, category_exists: bool) -> PostsService {
        PostsService::new(
            repo,
            Arc::new(FakeCategoriesRepo {
                exists: category_exists,
            }),
            ImageStore::new(std::env::temp_dir()),
        )
    }

    async fn seed_posts(service: &PostsService, author: &User, count: usize, published: bool) {
        let category = Uuid::now_v7();
        for i in 0..count {
            let mut p = payload(Some(category));
            p.title = format!("Post {i}");
            p.is_published = Some(published);
            service.create(author, p, None).await.unwrap();
        }
    }

    #[tokio::test]
    async fn list_falls_back_to_defaults_on_malformed_paging() {
        let repo = Arc::new(FakePostsRepo::default());
        let service = service_with(repo.clone(), true);

        let query = PostListQuery {
            page: Some("abc".to_string()),
            limit: Some("-5".to_string()),
            ..Default::default()
        };
        service.list(&query).await.unwrap();

        assert_eq!(*repo.last_window.lock().unwrap(), Some((10, 0)));
    }

    #[tokio::test]
    async fn list_windows_results_and_builds_pagination() {
        let repo = Arc::new(FakePostsRepo::default());
        let service = service_with(repo, true);
        let author = user(UserRole::User);
        seed_posts(&service, &author, 25, true).await;

        let query = PostListQuery {
            page: Some("2".to_string()),
            ..Default::default()
        };
        let listing = service.list(&query).await.unwrap();
        assert_eq!(listing.count, 10);
        assert!(listing.posts.len() <= 10);
        assert_eq!(listing.pagination.prev.map(|p| p.page), Some(1));
        assert_eq!(listing.pagination.next.map(|p| p.page), Some(3));

        let query = PostListQuery {
            page: Some("3".to_string()),
            ..Default::default()
        };
        let listing = service.list(&query).await.unwrap();
        assert_eq!(listing.count, 5);
        assert_eq!(listing.pagination.next, None);
        assert_eq!(listing.pagination.prev.map(|p| p.page), Some(2));
    }

    #[tokio::test]
    async fn list_never_returns_unpublished_posts() {
        let repo = Arc::new(FakePostsRepo::default());
        let service = service_with(repo, true);
        let author = user(UserRole::User);
        seed_posts(&service, &author, 3, true).await;
        seed_posts(&service, &author, 4, false).await;

        let listing = service.list(&PostListQuery::default()).await.unwrap();
        assert_eq!(listing.count, 3);
        assert!(listing.posts.iter().all(|p| p.is_published));
        assert_eq!(listing.pagination, Default::default());
    }

    #[tokio::test]
    async fn list_search_is_a_case_insensitive_substring_match() {
        let repo = Arc::new(FakePostsRepo::default());
        let service = service_with(repo, true);
        let author = user(UserRole::User);
        let category = Uuid::now_v7();

        let mut hello = payload(Some(category));
        hello.title = "Saying Hello World".to_string();
        service.create(&author, hello, None).await.unwrap();

        let mut other = payload(Some(category));
        other.title = "Completely unrelated".to_string();
        other.content = "No greetings here".to_string();
        service.create(&author, other, None).await.unwrap();

        let query = PostListQuery {
            search: Some("hello".to_string()),
            ..Default::default()
        };
        let listing = service.list(&query).await.unwrap();
        assert_eq!(listing.count, 1);
        assert_eq!(listing.posts[0].title, "Saying Hello World");
    }

    #[tokio::test]
    async fn list_rejects_a_malformed_category_id() {
        let repo = Arc::new(FakePostsRepo::default());
        let service = service_with(repo, true);

        let query = PostListQuery {
            category: Some("not-a-uuid".to_string()),
            ..Default::default()
        };
        let err = service.list(&query).await.unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
    }

    #[tokio::test]
    async fn detail_increments_the_view_count_once_per_fetch() {
        let repo = Arc::new(FakePostsRepo::default());
        let service = service_with(repo, true);
        let author = user(UserRole::User);
        let post = service
            .create(&author, payload(Some(Uuid::now_v7())), None)
            .await
            .unwrap();
        assert_eq!(post.view_count, 0);

        for expected in 1..=3 {
            let detail = service.detail(post.id).await.unwrap();
            assert_eq!(detail.view_count, expected);
        }
    }

    #[tokio::test]
    async fn detail_of_an_unknown_post_is_not_found() {
        let repo = Arc::new(FakePostsRepo::default());
        let service = service_with(repo, true);

        let err = service.detail(Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, Error::NotFound));
    }

    #[tokio::test]
    async fn create_binds_the_caller_as_author() {
        let repo = Arc::new(FakePostsRepo::default());
        let service = service_with(repo, true);
        let author = user(UserRole::User);

        let post = service
            .create(&author, payload(Some(Uuid::now_v7())), None)
            .await
            .unwrap();

        assert_eq!(post.author_id, author.id);
        assert_eq!(post.view_count, 0);
        assert!(post.is_published);
    }

    #[tokio::test]
    async fn create_collects_every_field_error() {
        let repo = Arc::new(FakePostsRepo::default());
        let service = service_with(repo.clone(), true);
        let author = user(UserRole::User);

        let bad = PostPayload {
            title: "x".repeat(101),
            content: String::new(),
            category: None,
            is_published: None,
        };
        let err = service.create(&author, bad, None).await.unwrap_err();

        let Error::ValidationFailed(errors) = err else {
            panic!("expected a validation failure");
        };
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("content"));
        assert!(fields.contains_key("category"));
        assert!(repo.posts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_requires_an_existing_category() {
        let repo = Arc::new(FakePostsRepo::default());
        let service = service_with(repo.clone(), false);
        let author = user(UserRole::User);

        let err = service
            .create(&author, payload(Some(Uuid::now_v7())), None)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::ValidationFailed(_)));
        assert!(repo.posts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_is_refused_for_a_stranger() {
        let repo = Arc::new(FakePostsRepo::default());
        let service = service_with(repo, true);
        let author = user(UserRole::User);
        let stranger = user(UserRole::User);
        let post = service
            .create(&author, payload(Some(Uuid::now_v7())), None)
            .await
            .unwrap();

        let err = service
            .update(&stranger, post.id, payload(Some(post.category_id)), None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unauthorized));

        let err = service.delete(&stranger, post.id).await.unwrap_err();
        assert!(matches!(err, Error::Unauthorized));
    }

    #[tokio::test]
    async fn author_and_admin_may_update_and_delete() {
        let repo = Arc::new(FakePostsRepo::default());
        let service = service_with(repo.clone(), true);
        let author = user(UserRole::User);
        let admin = user(UserRole::Admin);
        let post = service
            .create(&author, payload(Some(Uuid::now_v7())), None)
            .await
            .unwrap();

        let mut renamed = payload(Some(post.category_id));
        renamed.title = "Renamed by author".to_string();
        let updated = service
            .update(&author, post.id, renamed, None)
            .await
            .unwrap();
        assert_eq!(updated.title, "Renamed by author");

        let mut renamed = payload(Some(post.category_id));
        renamed.title = "Renamed by admin".to_string();
        let updated = service.update(&admin, post.id, renamed, None).await.unwrap();
        assert_eq!(updated.title, "Renamed by admin");

        service.delete(&admin, post.id).await.unwrap();
        assert!(repo.posts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn comment_length_is_validated_before_any_append() {
        let repo = Arc::new(FakePostsRepo::default());
        let service = service_with(repo.clone(), true);
        let author = user(UserRole::User);
        let post = service
            .create(&author, payload(Some(Uuid::now_v7())), None)
            .await
            .unwrap();

        for content in [String::new(), "x".repeat(501)] {
            let err = service
                .add_comment(&author, post.id, CommentPayload { content })
                .await
                .unwrap_err();
            assert!(matches!(err, Error::ValidationFailed(_)));
        }
        assert!(repo.comments.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn any_authenticated_user_may_comment() {
        let repo = Arc::new(FakePostsRepo::default());
        let service = service_with(repo, true);
        let author = user(UserRole::User);
        let commenter = user(UserRole::User);
        let post = service
            .create(&author, payload(Some(Uuid::now_v7())), None)
            .await
            .unwrap();

        let detail = service
            .add_comment(
                &commenter,
                post.id,
                CommentPayload {
                    content: "Nice write-up".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(detail.comments.len(), 1);
        assert_eq!(detail.comments[0].content, "Nice write-up");
        assert_eq!(detail.comments[0].user_id, commenter.id);
    }

    #[test]
    fn parse_positive_accepts_only_positive_integers() {
        assert_eq!(parse_positive(Some("3"), 1), 3);
        assert_eq!(parse_positive(Some("0"), 1), 1);
        assert_eq!(parse_positive(Some("-2"), 1), 1);
        assert_eq!(parse_positive(Some("abc"), 1), 1);
        assert_eq!(parse_positive(None, 10), 10);
    }
}
