use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::repositories::{
    categories_repo::CategoriesRepository, posts_repo::PostsRepository,
    users_repo::UsersRepository, PostgresRepo,
};
use crate::services::{
    auth::AuthService, categories::CategoriesService, posts::PostsService, uploads::ImageStore,
    users::UserService,
};

pub use self::errors::{Error, Result};

pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod store;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub users_service: UserService,
    pub posts_service: PostsService,
    pub categories_service: CategoriesService,
}

impl AppState {
    pub fn new(config: Config, db_pool: PgPool) -> Self {
        let repo = PostgresRepo::new(db_pool.clone());
        let users_repo: Arc<dyn UsersRepository> = Arc::new(repo.clone());
        let posts_repo: Arc<dyn PostsRepository> = Arc::new(repo.clone());
        let categories_repo: Arc<dyn CategoriesRepository> = Arc::new(repo);
        let image_store = ImageStore::new(&config.upload_dir);

        Self {
            auth_service: AuthService::new(
                users_repo.clone(),
                config.jwt_secret.clone(),
                config.jwt_maxage,
            ),
            users_service: UserService::new(users_repo, config.jwt_secret.clone()),
            posts_service: PostsService::new(posts_repo, categories_repo.clone(), image_store),
            categories_service: CategoriesService::new(categories_repo),
            config,
            db_pool,
        }
    }
}
