use std::sync::Arc;

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{models::users::User, repositories::users_repo::UsersRepository, Error, Result};

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UsersRepository>,
    jwt_secret: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: usize,
    exp: usize,
}

impl UserService {
    pub fn new(users: Arc<dyn UsersRepository>, jwt_secret: String) -> Self {
        Self { users, jwt_secret }
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<User> {
        let user = self.users.find_by_id(user_id).await?;
        user.ok_or(Error::NotFound)
    }

    pub fn decode_token<T: Into<String>>(&self, token: T) -> Result<Uuid> {
        let decoded = decode::<Claims>(
            &token.into(),
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|_| Error::Unauthorized)?;

        Uuid::parse_str(&decoded.claims.sub).map_err(|_| Error::Unauthorized)
    }
}
