//! Users service.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::Result;
use crate::models::{ItemList, User, UserCreate};

use super::super::http::HttpClient;

/// Service for managing users.
///
/// Listing, creating and deleting users requires the owner role.
#[derive(Clone)]
pub struct UsersService {
    http: Arc<HttpClient>,
}

impl UsersService {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Returns the user the API key belongs to.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use argilla_sdk::ArgillaClient;
    /// # async fn example(client: ArgillaClient) -> Result<(), argilla_sdk::Error> {
    /// let me = client.users().me().await?;
    /// println!("{} ({})", me.username, me.role);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn me(&self) -> Result<User> {
        self.http.get("/api/v1/me").await
    }

    /// Lists all users.
    pub async fn list(&self) -> Result<Vec<User>> {
        let list: ItemList<User> = self.http.get("/api/v1/users").await?;
        Ok(list.into_inner())
    }

    /// Gets a user by id.
    pub async fn get(&self, id: Uuid) -> Result<User> {
        self.http.get(&format!("/api/v1/users/{id}")).await
    }

    /// Creates a user.
    pub async fn create(&self, request: &UserCreate) -> Result<User> {
        self.http.post("/api/v1/users", request).await
    }

    /// Deletes a user.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.http.delete(&format!("/api/v1/users/{id}")).await
    }
}

impl std::fmt::Debug for UsersService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsersService").finish_non_exhaustive()
    }
}
