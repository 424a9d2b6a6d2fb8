use async_trait::async_trait;
use std::sync::Arc;

use crate::contract::{
    client::UsersAdminApi,
    error::UsersAdminError,
    model::{ListQuery, ListResult, User, UserId, UserPatch, UserStats},
};
use crate::domain::{error::DomainError, service::Service};

/// In-process implementation of [`UsersAdminApi`] that delegates to the domain service
pub struct LocalUsersClient {
    service: Arc<Service>,
}

impl LocalUsersClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl UsersAdminApi for LocalUsersClient {
    async fn list_users(&self, query: &ListQuery) -> Result<ListResult, UsersAdminError> {
        self.service
            .list_users(query.clone())
            .await
            .map_err(map_domain_error)
    }

    async fn user_stats(&self) -> Result<UserStats, UsersAdminError> {
        self.service.user_stats().await.map_err(map_domain_error)
    }

    async fn update_user(&self, id: &UserId, patch: UserPatch) -> Result<User, UsersAdminError> {
        self.service
            .update_user(id, patch)
            .await
            .map_err(map_domain_error)
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), UsersAdminError> {
        self.service.delete_user(id).await.map_err(map_domain_error)
    }
}

/// Map domain errors to contract errors
fn map_domain_error(domain_error: DomainError) -> UsersAdminError {
    match domain_error {
        DomainError::UserNotFound { id } => UsersAdminError::not_found(id),
        e @ (DomainError::InvalidEmail { .. }
        | DomainError::EmptyName
        | DomainError::NameTooLong { .. }
        | DomainError::Validation { .. }) => UsersAdminError::validation(e.to_string()),
        DomainError::Storage { message } => UsersAdminError::server(500, message),
    }
}
