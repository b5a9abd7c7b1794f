use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2, PasswordHash, PasswordVerifier,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{models::users::User, repositories::users_repo::UsersRepository, Error, Result};

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UsersRepository>,
    jwt_secret: String,
    jwt_maxage: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: usize,
    exp: usize,
}

impl AuthService {
    pub fn new(users: Arc<dyn UsersRepository>, jwt_secret: String, jwt_maxage: i64) -> Self {
        Self {
            users,
            jwt_secret,
            jwt_maxage,
        }
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(Error::BadRequest("Email already exists".to_string()));
        }

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|_| Error::InternalServerError)?
            .to_string();

        self.users.create_user(name, email, &password_hash).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String)> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(Error::Unauthorized)?;

        let argon2 = Argon2::default();
        let parsed_hash =
            PasswordHash::new(&user.password).map_err(|_| Error::InternalServerError)?;
        argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| Error::Unauthorized)?;

        let token = self.issue_token(user.id)?;
        Ok((user, token))
    }

    pub fn issue_token(&self, user_id: Uuid) -> Result<String> {
        let now = Utc::now();
        let exp = (now + Duration::minutes(self.jwt_maxage)).timestamp() as usize;
        let iat = now.timestamp() as usize;
        let claims = Claims {
            sub: user_id.to_string(),
            iat,
            exp,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|_| Error::InternalServerError)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::models::users::UserRole;
    use crate::services::users::UserService;

    #[derive(Default)]
    struct FakeUsersRepo {
        users: Mutex<Vec<User>>,
    }

    #[async_trait]
    impl UsersRepository for FakeUsersRepo {
        async fn create_user(&self, name: &str, email: &str, password_hash: &str) -> Result<User> {
            let user = User {
                id: Uuid::now_v7(),
                name: name.to_string(),
                email: email.to_string(),
                password: password_hash.to_string(),
                role: UserRole::User,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };
            self.users.lock().unwrap().push(user.clone());
            Ok(user)
        }

        async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.id == user_id)
                .cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.email == email)
                .cloned())
        }
    }

    fn service() -> AuthService {
        AuthService::new(Arc::new(FakeUsersRepo::default()), "secret".to_string(), 60)
    }

    #[tokio::test]
    async fn register_hashes_the_password() {
        let auth = service();
        let user = auth
            .register("John Doe", "john@example.com", "123456")
            .await
            .unwrap();

        assert_ne!(user.password, "123456");
        assert!(user.password.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() {
        let auth = service();
        auth.register("John Doe", "john@example.com", "123456")
            .await
            .unwrap();

        let err = auth
            .register("Jane Doe", "john@example.com", "654321")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
    }

    #[tokio::test]
    async fn login_issues_a_decodable_token() {
        let users: Arc<dyn UsersRepository> = Arc::new(FakeUsersRepo::default());
        let auth = AuthService::new(users.clone(), "secret".to_string(), 60);
        let registered = auth
            .register("John Doe", "john@example.com", "123456")
            .await
            .unwrap();

        let (user, token) = auth.login("john@example.com", "123456").await.unwrap();
        assert_eq!(user.id, registered.id);

        let user_service = UserService::new(users, "secret".to_string());
        assert_eq!(user_service.decode_token(token).unwrap(), registered.id);
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_unauthorized() {
        let auth = service();
        auth.register("John Doe", "john@example.com", "123456")
            .await
            .unwrap();

        let err = auth
            .login("john@example.com", "wrong-password")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unauthorized));
    }
}
