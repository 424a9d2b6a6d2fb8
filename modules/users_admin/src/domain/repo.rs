use crate::contract::model::{ListQuery, ListResult, User, UserId};
use async_trait::async_trait;

/// Port for the domain layer: persistence operations the domain needs.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Load a user by id.
    async fn find_by_id(&self, id: &UserId) -> anyhow::Result<Option<User>>;
    /// Filter with `query`, then cut the requested page out of the filtered set.
    async fn list_page(&self, query: &ListQuery) -> anyhow::Result<ListResult>;
    /// Every stored user, in storage order.
    async fn all(&self) -> anyhow::Result<Vec<User>>;
    /// Replace an existing user (by `u.id`). Returns false if it does not exist.
    async fn update(&self, u: User) -> anyhow::Result<bool>;
    /// Delete by id. Returns true if a user was deleted.
    async fn delete(&self, id: &UserId) -> anyhow::Result<bool>;
}
