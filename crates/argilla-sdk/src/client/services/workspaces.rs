//! Workspaces service.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{ItemList, User, Workspace, WorkspaceCreate};

use super::super::http::HttpClient;

/// Service for managing workspaces and their members.
#[derive(Clone)]
pub struct WorkspacesService {
    http: Arc<HttpClient>,
}

impl WorkspacesService {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Lists the workspaces the current user belongs to.
    pub async fn list(&self) -> Result<Vec<Workspace>> {
        let list: ItemList<Workspace> = self.http.get("/api/v1/me/workspaces").await?;
        Ok(list.into_inner())
    }

    /// Gets a workspace by id.
    pub async fn get(&self, id: Uuid) -> Result<Workspace> {
        self.http.get(&format!("/api/v1/workspaces/{id}")).await
    }

    /// Finds a workspace of the current user by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no such workspace is visible.
    pub async fn get_by_name(&self, name: &str) -> Result<Workspace> {
        self.list()
            .await?
            .into_iter()
            .find(|workspace| workspace.name == name)
            .ok_or_else(|| Error::not_found("workspace", name))
    }

    /// Creates a workspace.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use argilla_sdk::{ArgillaClient, models::WorkspaceCreate};
    /// # async fn example(client: ArgillaClient) -> Result<(), argilla_sdk::Error> {
    /// let workspace = client.workspaces().create(&WorkspaceCreate::new("support")).await?;
    /// let me = client.users().me().await?;
    /// client.workspaces().add_user(workspace.id, me.id).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create(&self, request: &WorkspaceCreate) -> Result<Workspace> {
        self.http.post("/api/v1/workspaces", request).await
    }

    /// Deletes a workspace. The server refuses while it still has datasets.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.http.delete(&format!("/api/v1/workspaces/{id}")).await
    }

    /// Lists the members of a workspace.
    pub async fn list_users(&self, id: Uuid) -> Result<Vec<User>> {
        let list: ItemList<User> = self
            .http
            .get(&format!("/api/v1/workspaces/{id}/users"))
            .await?;
        Ok(list.into_inner())
    }

    /// Adds a user to a workspace.
    pub async fn add_user(&self, id: Uuid, user_id: Uuid) -> Result<User> {
        #[derive(Serialize)]
        struct AddUser {
            user_id: Uuid,
        }

        self.http
            .post(&format!("/api/v1/workspaces/{id}/users"), &AddUser { user_id })
            .await
    }

    /// Removes a user from a workspace.
    pub async fn remove_user(&self, id: Uuid, user_id: Uuid) -> Result<()> {
        self.http
            .delete(&format!("/api/v1/workspaces/{id}/users/{user_id}"))
            .await
    }
}

impl std::fmt::Debug for WorkspacesService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkspacesService").finish_non_exhaustive()
    }
}
