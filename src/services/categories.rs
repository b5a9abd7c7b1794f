use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::models::categories::{Category, CategoryPayload};
use crate::repositories::categories_repo::CategoriesRepository;
use crate::{Error, Result};

#[derive(Clone)]
pub struct CategoriesService {
    repo: Arc<dyn CategoriesRepository>,
}

/// Lowercases the name and collapses every run of non-alphanumeric
/// characters into a single dash.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

impl CategoriesService {
    pub fn new(repo: Arc<dyn CategoriesRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Category>> {
        self.repo.list_active().await
    }

    pub async fn get(&self, category_id: Uuid) -> Result<Category> {
        self.repo
            .find_category(category_id)
            .await?
            .ok_or(Error::NotFound)
    }

    pub async fn create(&self, payload: CategoryPayload) -> Result<Category> {
        payload.validate()?;

        if self.repo.find_by_name(&payload.name).await?.is_some() {
            return Err(Error::BadRequest(
                "Category name already in use".to_string(),
            ));
        }

        self.repo
            .create_category(
                &payload.name,
                &slugify(&payload.name),
                payload.description.as_deref(),
                payload.is_active.unwrap_or(true),
            )
            .await
    }

    pub async fn update(&self, category_id: Uuid, payload: CategoryPayload) -> Result<Category> {
        payload.validate()?;

        if self.repo.find_category(category_id).await?.is_none() {
            return Err(Error::NotFound);
        }

        if let Some(existing) = self.repo.find_by_name(&payload.name).await? {
            if existing.id != category_id {
                return Err(Error::BadRequest(
                    "Category name already in use".to_string(),
                ));
            }
        }

        self.repo
            .update_category(
                category_id,
                &payload.name,
                &slugify(&payload.name),
                payload.description.as_deref(),
                payload.is_active,
            )
            .await
    }

    pub async fn delete(&self, category_id: Uuid) -> Result<()> {
        if self.repo.find_category(category_id).await?.is_none() {
            return Err(Error::NotFound);
        }

        self.repo.delete_category(category_id).await
    }
}
