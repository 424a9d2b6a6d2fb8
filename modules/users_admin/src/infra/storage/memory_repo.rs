//! In-memory repository backing the mock users API.
//!
//! Users live in a `Vec` behind a `parking_lot::RwLock`; storage order is
//! insertion order and is what list pages are cut from. The lock is never
//! held across an await point.

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::contract::model::{ListQuery, ListResult, User, UserId};
use crate::domain::repo::UsersRepository;
use crate::infra::storage::seed;

#[derive(Default)]
pub struct InMemoryUsersRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUsersRepository {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: RwLock::new(users),
        }
    }

    /// Repository pre-filled with `count` deterministic demo users.
    pub fn seeded(count: usize) -> Self {
        Self::new(seed::demo_users(count))
    }

    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }
}

#[async_trait]
impl UsersRepository for InMemoryUsersRepository {
    async fn find_by_id(&self, id: &UserId) -> anyhow::Result<Option<User>> {
        Ok(self.users.read().iter().find(|u| &u.id == id).cloned())
    }

    async fn list_page(&self, query: &ListQuery) -> anyhow::Result<ListResult> {
        let users = self.users.read();
        let filtered: Vec<&User> = users.iter().filter(|u| query.matches(u)).collect();

        let items = filtered
            .iter()
            .skip(query.offset())
            .take(query.page_size.max(1) as usize)
            .map(|u| (*u).clone())
            .collect();

        Ok(ListResult {
            items,
            total_count: filtered.len() as u64,
        })
    }

    async fn all(&self) -> anyhow::Result<Vec<User>> {
        Ok(self.users.read().clone())
    }

    async fn update(&self, u: User) -> anyhow::Result<bool> {
        let mut users = self.users.write();
        match users.iter_mut().find(|existing| existing.id == u.id) {
            Some(slot) => {
                *slot = u;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &UserId) -> anyhow::Result<bool> {
        let mut users = self.users.write();
        let before = users.len();
        users.retain(|u| &u.id != id);
        Ok(users.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::model::StatusFilter;

    #[tokio::test]
    async fn pages_are_cut_after_filtering() {
        let repo = InMemoryUsersRepository::seeded(12);

        let first = repo.list_page(&ListQuery::new(5)).await.unwrap();
        assert_eq!(first.items.len(), 5);
        assert_eq!(first.total_count, 12);
        assert_eq!(first.items[0].id.as_str(), "user-1");

        let last = repo.list_page(&ListQuery::new(5).with_page(3)).await.unwrap();
        assert_eq!(last.items.len(), 2);
        assert_eq!(last.total_count, 12);

        let beyond = repo.list_page(&ListQuery::new(5).with_page(9)).await.unwrap();
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total_count, 12);
    }

    #[tokio::test]
    async fn total_count_reflects_filtered_set() {
        let repo = InMemoryUsersRepository::seeded(12);
        let all = repo.all().await.unwrap();
        let expected = all.iter().filter(|u| StatusFilter::Active.matches(u.status)).count();

        let page = repo
            .list_page(&ListQuery::new(2).with_status(StatusFilter::Active))
            .await
            .unwrap();
        assert_eq!(page.total_count, expected as u64);
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_ids() {
        let repo = InMemoryUsersRepository::seeded(3);
        let mut ghost = repo.all().await.unwrap()[0].clone();
        ghost.id = UserId::from("does-not-exist");

        assert!(!repo.update(ghost).await.unwrap());
        assert!(!repo.delete(&UserId::from("does-not-exist")).await.unwrap());
        assert!(repo.delete(&UserId::from("user-2")).await.unwrap());
        assert_eq!(repo.len(), 2);
    }
}
