use std::sync::Arc;
use std::time::Duration;

use crate::config::UsersAdminConfig;
use crate::contract::model::{ListQuery, ListResult, User, UserId, UserPatch, UserStats};
use crate::domain::error::DomainError;
use crate::domain::repo::UsersRepository;
use tracing::{debug, info, instrument};

const LIST_LATENCY: Duration = Duration::from_millis(500);
const MUTATION_LATENCY: Duration = Duration::from_millis(300);

/// Domain service with business rules for user administration.
/// Depends only on the repository port, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn UsersRepository>,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub max_name_length: usize,
    pub max_email_length: usize,
    pub default_page_size: u32,
    pub max_page_size: u32,
    pub simulate_latency: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_name_length: 100,
            max_email_length: 254,
            default_page_size: 10,
            max_page_size: 100,
            simulate_latency: false,
        }
    }
}

impl From<&UsersAdminConfig> for ServiceConfig {
    fn from(cfg: &UsersAdminConfig) -> Self {
        Self {
            default_page_size: cfg.default_page_size,
            max_page_size: cfg.max_page_size,
            simulate_latency: cfg.simulate_latency,
            ..Default::default()
        }
    }
}

impl Service {
    pub fn new(repo: Arc<dyn UsersRepository>, config: ServiceConfig) -> Self {
        Self { repo, config }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    async fn simulate(&self, delay: Duration) {
        if self.config.simulate_latency {
            tokio::time::sleep(delay).await;
        }
    }

    /// Clamp paging inputs into the supported range.
    pub fn normalize_query(&self, mut query: ListQuery) -> ListQuery {
        query.page = query.page.max(1);
        query.page_size = query.page_size.clamp(1, self.config.max_page_size.max(1));
        query
    }

    #[instrument(
        name = "users_admin.service.list_users",
        skip(self, query),
        fields(page = query.page, page_size = query.page_size, status = %query.status_filter)
    )]
    pub async fn list_users(&self, query: ListQuery) -> Result<ListResult, DomainError> {
        debug!("Listing users");
        self.simulate(LIST_LATENCY).await;

        let query = self.normalize_query(query);
        let page = self
            .repo
            .list_page(&query)
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?;

        debug!(
            "Listed {} users (total_count={})",
            page.items.len(),
            page.total_count
        );
        Ok(page)
    }

    #[instrument(name = "users_admin.service.user_stats", skip(self))]
    pub async fn user_stats(&self) -> Result<UserStats, DomainError> {
        self.simulate(MUTATION_LATENCY).await;

        let users = self
            .repo
            .all()
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?;
        Ok(UserStats::from_users(&users))
    }

    #[instrument(name = "users_admin.service.get_user", skip(self), fields(user_id = %id))]
    pub async fn get_user(&self, id: &UserId) -> Result<User, DomainError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?
            .ok_or_else(|| DomainError::user_not_found(id.clone()))
    }

    #[instrument(
        name = "users_admin.service.update_user",
        skip(self, patch),
        fields(user_id = %id)
    )]
    pub async fn update_user(&self, id: &UserId, patch: UserPatch) -> Result<User, DomainError> {
        info!("Updating user");
        self.simulate(MUTATION_LATENCY).await;

        self.validate_patch(&patch)?;

        let mut current = self.get_user(id).await?;
        patch.apply_to(&mut current);

        let stored = self
            .repo
            .update(current.clone())
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?;
        if !stored {
            // deleted between load and write
            return Err(DomainError::user_not_found(id.clone()));
        }

        info!("Successfully updated user");
        Ok(current)
    }

    #[instrument(name = "users_admin.service.delete_user", skip(self), fields(user_id = %id))]
    pub async fn delete_user(&self, id: &UserId) -> Result<(), DomainError> {
        info!("Deleting user");
        self.simulate(MUTATION_LATENCY).await;

        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?;

        if !deleted {
            return Err(DomainError::user_not_found(id.clone()));
        }

        info!("Successfully deleted user");
        Ok(())
    }

    // --- validation helpers ---

    fn validate_patch(&self, patch: &UserPatch) -> Result<(), DomainError> {
        if let Some(ref email) = patch.email {
            self.validate_email(email)?;
        }
        if let Some(ref name) = patch.name {
            self.validate_name(name)?;
        }
        Ok(())
    }

    fn validate_email(&self, email: &str) -> Result<(), DomainError> {
        if email.is_empty() || !email.contains('@') || !email.contains('.') {
            return Err(DomainError::invalid_email(email.to_string()));
        }
        let len = email.chars().count();
        if len > self.config.max_email_length {
            return Err(DomainError::validation(
                "email",
                format!(
                    "{len} characters exceeds the limit of {}",
                    self.config.max_email_length
                ),
            ));
        }
        Ok(())
    }

    fn validate_name(&self, name: &str) -> Result<(), DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::empty_name());
        }
        let len = name.chars().count();
        if len > self.config.max_name_length {
            return Err(DomainError::name_too_long(len, self.config.max_name_length));
        }
        Ok(())
    }
}
