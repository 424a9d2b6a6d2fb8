use async_trait::async_trait;

use crate::contract::error::UsersAdminError;
use crate::contract::model::{ListQuery, ListResult, User, UserId, UserPatch, UserStats};

/// Remote data gateway for the users collection.
#[async_trait]
pub trait UsersAdminApi: Send + Sync {
    /// Filtered, paginated list of users.
    async fn list_users(&self, query: &ListQuery) -> Result<ListResult, UsersAdminError>;

    /// Aggregate counters over the whole collection.
    async fn user_stats(&self) -> Result<UserStats, UsersAdminError>;

    /// Update a user with partial data.
    async fn update_user(&self, id: &UserId, patch: UserPatch) -> Result<User, UsersAdminError>;

    /// Delete a user by ID.
    async fn delete_user(&self, id: &UserId) -> Result<(), UsersAdminError>;
}
