use ladle_core::{
    AuthResponse, ChangePasswordRequest, LoginRequest, MessageResponse, RegisterRequest,
    UpdateProfileRequest, User,
};

use crate::client::{json_body, Auth, LadleClient};
use crate::error::ApiError;
use crate::transport::{Method, RequestBody};

/// Result of signing in: who, and which page to land on.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginOutcome {
    pub user: User,
    pub redirect: &'static str,
}

impl LoginOutcome {
    fn from_user(user: User) -> Self {
        let redirect = user.role.landing_path();
        Self { user, redirect }
    }
}

impl LadleClient {
    fn start_session(&self, auth: AuthResponse) -> LoginOutcome {
        self.session().set(auth.token, Some(auth.user.clone()));
        tracing::info!(user_id = %auth.user.id, role = %auth.user.role, "signed in");
        LoginOutcome::from_user(auth.user)
    }

    /// `POST /api/auth/login`
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, ApiError> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let auth: AuthResponse = self
            .send_json(Method::Post, "/api/auth/login", &request, Auth::Optional)
            .await?;
        Ok(self.start_session(auth))
    }

    /// `POST /api/auth/register`, signing in as the new account.
    pub async fn register(&self, request: &RegisterRequest) -> Result<LoginOutcome, ApiError> {
        let auth: AuthResponse = self
            .send_json(Method::Post, "/api/auth/register", request, Auth::Optional)
            .await?;
        Ok(self.start_session(auth))
    }

    /// `POST /api/auth/logout`. The local session is cleared even when the
    /// server cannot be reached.
    pub async fn logout(&self) -> Result<(), ApiError> {
        if !self.session().is_authenticated() {
            return Ok(());
        }
        let result = self
            .call_empty(Method::Post, "/api/auth/logout", RequestBody::Empty, Auth::Required)
            .await;
        self.session().clear();
        match result {
            Ok(()) | Err(ApiError::Unauthorized(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// `GET /api/auth/me`, refreshing the cached user.
    pub async fn me(&self) -> Result<User, ApiError> {
        let user: User = self.get("/api/auth/me", Auth::Required).await?;
        self.session().set_user(user.clone());
        Ok(user)
    }

    /// `PUT /api/auth/profile`
    pub async fn update_profile(&self, request: &UpdateProfileRequest) -> Result<User, ApiError> {
        let user: User = self
            .send_json(Method::Put, "/api/auth/profile", request, Auth::Required)
            .await?;
        self.session().set_user(user.clone());
        Ok(user)
    }

    /// `PUT /api/auth/change-password`
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<String, ApiError> {
        let body = json_body(&ChangePasswordRequest {
            current_password: current_password.to_string(),
            new_password: new_password.to_string(),
        })?;
        let response: MessageResponse = self
            .call(Method::Put, "/api/auth/change-password", body, Auth::Required)
            .await?;
        Ok(response.message)
    }
}
