use ladle_core::{AdminStats, Role, UpdateRoleRequest, User};
use uuid::Uuid;

use crate::client::{json_body, Auth, LadleClient};
use crate::error::ApiError;
use crate::transport::{Method, RequestBody};

impl LadleClient {
    pub async fn admin_stats(&self) -> Result<AdminStats, ApiError> {
        self.get("/api/admin/stats", Auth::Required).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.get("/api/admin/users", Auth::Required).await
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User, ApiError> {
        self.get(&format!("/api/admin/users/{}", id), Auth::Required)
            .await
    }

    /// Refuse to act on the signed-in account itself.
    async fn guard_not_self(&self, target: Uuid, action: &str) -> Result<(), ApiError> {
        let me = match self.session().user() {
            Some(user) => user,
            None => self.me().await?,
        };
        if me.id == target {
            return Err(ApiError::SelfModification(format!(
                "You cannot {} your own account",
                action
            )));
        }
        Ok(())
    }

    pub async fn update_user_role(&self, id: Uuid, role: Role) -> Result<User, ApiError> {
        self.guard_not_self(id, "change the role of").await?;
        let body = json_body(&UpdateRoleRequest { role })?;
        self.call(
            Method::Put,
            &format!("/api/admin/users/{}", id),
            body,
            Auth::Required,
        )
        .await
    }

    pub async fn delete_user(&self, id: Uuid) -> Result<(), ApiError> {
        self.guard_not_self(id, "delete").await?;
        self.call_empty(
            Method::Delete,
            &format!("/api/admin/users/{}", id),
            RequestBody::Empty,
            Auth::Required,
        )
        .await
    }
}
