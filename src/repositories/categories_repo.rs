use async_trait::async_trait;
use uuid::Uuid;

use crate::{models::categories::Category, Result};

use super::PostgresRepo;

#[async_trait]
pub trait CategoriesRepository: Send + Sync {
    async fn list_active(&self) -> Result<Vec<Category>>;
    async fn find_category(&self, category_id: Uuid) -> Result<Option<Category>>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Category>>;
    async fn category_exists(&self, category_id: Uuid) -> Result<bool>;
    async fn create_category(
        &self,
        name: &str,
        slug: &str,
        description: Option<&str>,
        is_active: bool,
    ) -> Result<Category>;
    async fn update_category(
        &self,
        category_id: Uuid,
        name: &str,
        slug: &str,
        description: Option<&str>,
        is_active: Option<bool>,
    ) -> Result<Category>;
    async fn delete_category(&self, category_id: Uuid) -> Result<()>;
}

#[async_trait]
impl CategoriesRepository for PostgresRepo {
    async fn list_active(&self) -> Result<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, slug, description, is_active, created_at
            FROM categories
            WHERE is_active = TRUE
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    async fn find_category(&self, category_id: Uuid) -> Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, slug, description, is_active, created_at
            FROM categories
            WHERE id = $1
            "#,
        )
        .bind(category_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, slug, description, is_active, created_at
            FROM categories
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    async fn category_exists(&self, category_id: Uuid) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (SELECT 1 FROM categories WHERE id = $1)
            "#,
        )
        .bind(category_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn create_category(
        &self,
        name: &str,
        slug: &str,
        description: Option<&str>,
        is_active: bool,
    ) -> Result<Category> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (id, name, slug, description, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, slug, description, is_active, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(name)
        .bind(slug)
        .bind(description)
        .bind(is_active)
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    async fn update_category(
        &self,
        category_id: Uuid,
        name: &str,
        slug: &str,
        description: Option<&str>,
        is_active: Option<bool>,
    ) -> Result<Category> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = $2,
                slug = $3,
                description = COALESCE($4, description),
                is_active = COALESCE($5, is_active)
            WHERE id = $1
            RETURNING id, name, slug, description, is_active, created_at
            "#,
        )
        .bind(category_id)
        .bind(name)
        .bind(slug)
        .bind(description)
        .bind(is_active)
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    async fn delete_category(&self, category_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            DELETE FROM categories WHERE id = $1
            "#,
        )
        .bind(category_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
