use ladle_core::{FavoriteCheckResponse, RecipeSummary};
use uuid::Uuid;

use crate::client::{Auth, LadleClient};
use crate::error::ApiError;
use crate::transport::{Method, RequestBody};

/// Favorite state of one recipe as shown to the user.
///
/// A toggle shows the new state right away ([`FavoriteToggle::Pending`]) and
/// settles on what the server confirmed, or rolls back when the request
/// fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteToggle {
    Committed(bool),
    Pending { previous: bool },
    Failed { current: bool },
}

impl FavoriteToggle {
    /// What to render: a pending toggle shows the flipped state.
    pub fn is_favorite(&self) -> bool {
        match *self {
            FavoriteToggle::Committed(state) => state,
            FavoriteToggle::Pending { previous } => !previous,
            FavoriteToggle::Failed { current } => current,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, FavoriteToggle::Pending { .. })
    }
}

impl Default for FavoriteToggle {
    fn default() -> Self {
        FavoriteToggle::Committed(false)
    }
}

impl LadleClient {
    /// The signed-in user's favorite recipes, newest favorite first.
    pub async fn list_favorites(&self) -> Result<Vec<RecipeSummary>, ApiError> {
        self.get("/api/favorites", Auth::Required).await
    }

    pub async fn add_favorite(&self, recipe_id: Uuid) -> Result<(), ApiError> {
        self.call_empty(
            Method::Post,
            &format!("/api/favorites/{}", recipe_id),
            RequestBody::Empty,
            Auth::Required,
        )
        .await
    }

    pub async fn remove_favorite(&self, recipe_id: Uuid) -> Result<(), ApiError> {
        self.call_empty(
            Method::Delete,
            &format!("/api/favorites/{}", recipe_id),
            RequestBody::Empty,
            Auth::Required,
        )
        .await
    }

    pub async fn is_favorite(&self, recipe_id: Uuid) -> Result<bool, ApiError> {
        let response: FavoriteCheckResponse = self
            .get(&format!("/api/favorites/check/{}", recipe_id), Auth::Required)
            .await?;
        Ok(response.is_favorite)
    }

    /// Flip the favorite state of a recipe. `state` passes through
    /// `Pending` while the request is in flight and ends `Committed` with the
    /// new value, or `Failed` with the value from before the toggle.
    pub async fn toggle_favorite(
        &self,
        recipe_id: Uuid,
        state: &mut FavoriteToggle,
    ) -> Result<bool, ApiError> {
        let previous = state.is_favorite();
        *state = FavoriteToggle::Pending { previous };

        let result = if previous {
            self.remove_favorite(recipe_id).await
        } else {
            self.add_favorite(recipe_id).await
        };

        match result {
            Ok(()) => {
                *state = FavoriteToggle::Committed(!previous);
                Ok(!previous)
            }
            Err(e) => {
                tracing::debug!(%recipe_id, error = %e, "favorite toggle rolled back");
                *state = FavoriteToggle::Failed { current: previous };
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_shows_flipped_state() {
        assert!(FavoriteToggle::Pending { previous: false }.is_favorite());
        assert!(!FavoriteToggle::Pending { previous: true }.is_favorite());
        assert!(!FavoriteToggle::default().is_favorite());
        assert!(FavoriteToggle::Failed { current: true }.is_favorite());
    }
}
