use sqlx::PgPool;

pub mod categories_repo;
pub mod posts_repo;
pub mod users_repo;

#[derive(Clone)]
pub struct PostgresRepo {
    pool: PgPool,
}

impl PostgresRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}
