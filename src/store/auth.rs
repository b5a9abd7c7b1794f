use std::sync::Arc;

use crate::models::users::{FilterUserDto, LoginUserDto, RegisterUserDto};
use crate::store::api::{ApiResult, BlogApi};
use crate::store::notify::Notifier;

/// Holds the authenticated identity and the session token. Login and
/// register notify on failure and hand the error back; logout always clears
/// the local identity, even when the server call fails.
pub struct AuthStore {
    api: Arc<dyn BlogApi>,
    notifier: Arc<dyn Notifier>,
    user: Option<FilterUserDto>,
    token: Option<String>,
}

impl AuthStore {
    pub fn new(api: Arc<dyn BlogApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            user: None,
            token: None,
        }
    }

    pub fn user(&self) -> Option<&FilterUserDto> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub async fn login(&mut self, credentials: &LoginUserDto) -> ApiResult<FilterUserDto> {
        match self.exchange_credentials(credentials).await {
            Ok(user) => {
                self.notifier.success("Logged in successfully!");
                Ok(user)
            }
            Err(err) => {
                self.notifier.error(err.message_or("Login failed"));
                Err(err)
            }
        }
    }

    async fn exchange_credentials(
        &mut self,
        credentials: &LoginUserDto,
    ) -> ApiResult<FilterUserDto> {
        let token = self.api.login(credentials).await?;
        let user = self.api.me().await?;
        self.token = Some(token);
        self.user = Some(user.clone());
        Ok(user)
    }

    pub async fn register(&mut self, new_user: &RegisterUserDto) -> ApiResult<FilterUserDto> {
        match self.api.register(new_user).await {
            Ok(user) => {
                // registering also opens a session
                self.user = Some(user.clone());
                self.notifier.success("Registered successfully!");
                Ok(user)
            }
            Err(err) => {
                self.notifier.error(err.message_or("Registration failed"));
                Err(err)
            }
        }
    }

    pub async fn logout(&mut self) {
        if let Err(err) = self.api.logout().await {
            tracing::error!("Error clearing the server session: {err}");
        }
        self.user = None;
        self.token = None;
    }
}
