use std::sync::Arc;

use uuid::Uuid;

use crate::models::categories::Category;
use crate::models::posts::{PostDetail, PostPayload, PostWithRefs};
use crate::models::response::Pagination;
use crate::store::api::{ApiResult, BlogApi};
use crate::store::notify::Notifier;

/// In-memory mirror of the post and category collections, the currently
/// viewed post, and the last pagination descriptor. Mutating actions patch
/// the local collections in place instead of re-fetching the page; they
/// notify on failure and hand the error back so a form can keep its own
/// submitting state accurate. Read actions notify and leave the previous
/// state in place.
pub struct PostStore {
    api: Arc<dyn BlogApi>,
    notifier: Arc<dyn Notifier>,
    posts: Vec<PostWithRefs>,
    categories: Vec<Category>,
    current_post: Option<PostDetail>,
    pagination: Pagination,
    loading: bool,
}

impl PostStore {
    pub fn new(api: Arc<dyn BlogApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            posts: Vec::new(),
            categories: Vec::new(),
            current_post: None,
            pagination: Pagination::default(),
            loading: false,
        }
    }

    pub fn posts(&self) -> &[PostWithRefs] {
        &self.posts
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn current_post(&self) -> Option<&PostDetail> {
        self.current_post.as_ref()
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub async fn fetch_posts(&mut self, page: i64, limit: i64, category: Option<Uuid>) {
        self.load_page(page, limit, category, None, "Failed to fetch posts")
            .await;
    }

    pub async fn search_posts(&mut self, query: &str) {
        self.load_page(1, 10, None, Some(query), "Failed to search posts")
            .await;
    }

    async fn load_page(
        &mut self,
        page: i64,
        limit: i64,
        category: Option<Uuid>,
        search: Option<&str>,
        failure: &str,
    ) {
        self.loading = true;
        match self.api.list_posts(page, limit, category, search).await {
            Ok(listing) => {
                self.posts = listing.posts;
                self.pagination = listing.pagination;
            }
            Err(_) => self.notifier.error(failure),
        }
        self.loading = false;
    }

    pub async fn fetch_post(&mut self, post_id: Uuid) -> ApiResult<PostDetail> {
        self.loading = true;
        let result = self.api.fetch_post(post_id).await;
        self.loading = false;

        match result {
            Ok(post) => {
                self.current_post = Some(post.clone());
                Ok(post)
            }
            Err(err) => {
                self.notifier.error("Failed to fetch post");
                Err(err)
            }
        }
    }

    pub async fn create_post(
        &mut self,
        payload: &PostPayload,
        image: Option<Vec<u8>>,
    ) -> ApiResult<PostWithRefs> {
        match self.api.create_post(payload, image).await {
            Ok(post) => {
                self.posts.insert(0, post.clone());
                self.notifier.success("Post created successfully!");
                Ok(post)
            }
            Err(err) => {
                self.notifier.error(err.message_or("Failed to create post"));
                Err(err)
            }
        }
    }

    pub async fn update_post(
        &mut self,
        post_id: Uuid,
        payload: &PostPayload,
        image: Option<Vec<u8>>,
    ) -> ApiResult<PostWithRefs> {
        match self.api.update_post(post_id, payload, image).await {
            Ok(post) => {
                if let Some(slot) = self.posts.iter_mut().find(|p| p.id == post_id) {
                    *slot = post.clone();
                }
                // an update never touches the comment sequence
                if let Some(current) = self.current_post.take() {
                    self.current_post = Some(if current.id == post_id {
                        PostDetail::from_parts(post.clone(), current.comments)
                    } else {
                        current
                    });
                }
                self.notifier.success("Post updated successfully!");
                Ok(post)
            }
            Err(err) => {
                self.notifier.error(err.message_or("Failed to update post"));
                Err(err)
            }
        }
    }

    pub async fn delete_post(&mut self, post_id: Uuid) -> ApiResult<()> {
        match self.api.delete_post(post_id).await {
            Ok(()) => {
                self.posts.retain(|p| p.id != post_id);
                if self.current_post.as_ref().is_some_and(|p| p.id == post_id) {
                    self.current_post = None;
                }
                self.notifier.success("Post deleted successfully!");
                Ok(())
            }
            Err(err) => {
                self.notifier.error(err.message_or("Failed to delete post"));
                Err(err)
            }
        }
    }

    pub async fn add_comment(&mut self, post_id: Uuid, content: &str) -> ApiResult<PostDetail> {
        match self.api.add_comment(post_id, content).await {
            Ok(post) => {
                if self.current_post.as_ref().is_some_and(|p| p.id == post_id) {
                    self.current_post = Some(post.clone());
                }
                self.notifier.success("Comment added successfully!");
                Ok(post)
            }
            Err(err) => {
                self.notifier.error(err.message_or("Failed to add comment"));
                Err(err)
            }
        }
    }

    /// Category fetch failures are logged and otherwise silent.
    pub async fn fetch_categories(&mut self) {
        match self.api.list_categories().await {
            Ok(categories) => self.categories = categories,
            Err(err) => tracing::error!("Error fetching categories: {err}"),
        }
    }
}
