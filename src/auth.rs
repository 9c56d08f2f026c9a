use tracing::{info, warn};

use crate::api::QuizApi;
use crate::error::{ApiError, InputError};
use crate::model::{Credentials, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

/// Holds at most one logged-in user for the life of the process.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    pub user: Option<User>,
    pub error: Option<String>,
    pub loading: bool,
}

impl AuthContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().map(|u| u.is_admin).unwrap_or(false)
    }

    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.name.as_str())
    }

    /// Check the form and mark a request in flight.
    pub fn begin(&mut self, username: &str, password: &str) -> Option<Credentials> {
        if self.loading {
            return None;
        }
        if username.trim().is_empty() || password.is_empty() {
            self.error = Some(InputError::MissingCredentials.to_string());
            return None;
        }
        self.error = None;
        self.loading = true;
        Some(Credentials {
            username: username.trim().to_string(),
            password: password.to_string(),
        })
    }

    pub fn finish_login(&mut self, result: Result<Option<User>, ApiError>) -> bool {
        self.loading = false;
        match result {
            Ok(Some(user)) => self.accept(user),
            Ok(None) => {
                self.error = Some("Invalid credentials.".to_string());
                false
            }
            Err(e) => {
                warn!("login failed: {}", e);
                self.error = Some("Login failed. Check server connection.".to_string());
                false
            }
        }
    }

    pub fn finish_register(&mut self, result: Result<User, ApiError>) -> bool {
        self.loading = false;
        match result {
            Ok(user) => self.accept(user),
            Err(ApiError::Conflict) => {
                self.error = Some(ApiError::Conflict.to_string());
                false
            }
            Err(e) => {
                warn!("registration failed: {}", e);
                self.error = Some("Registration failed".to_string());
                false
            }
        }
    }

    fn accept(&mut self, user: User) -> bool {
        info!(user = %user.name, admin = user.is_admin, "logged in");
        self.error = None;
        self.user = Some(user);
        true
    }

    pub async fn login<A: QuizApi>(&mut self, api: &A, username: &str, password: &str) -> bool {
        let Some(credentials) = self.begin(username, password) else {
            return false;
        };
        let result = api.login(&credentials).await;
        self.finish_login(result)
    }

    pub async fn register<A: QuizApi>(&mut self, api: &A, username: &str, password: &str) -> bool {
        let Some(credentials) = self.begin(username, password) else {
            return false;
        };
        let result = api.register(&credentials).await;
        self.finish_register(result)
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            info!(user = %user.name, "logged out");
        }
        self.error = None;
    }
}
