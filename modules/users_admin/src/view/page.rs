use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::config::UsersAdminConfig;
use crate::contract::{error::UsersAdminError, model::UserStats};
use crate::view::cache::QueryCache;
use crate::view::list_state::{ListController, LoadOutcome};
use crate::view::location::Location;
use crate::view::model::ListView;
use crate::view::workflow::ActionWorkflow;

/// The users page: list controller and action workflow sharing one location,
/// one cache and one cancellation scope.
pub struct UsersPage {
    pub list: ListController,
    pub actions: ActionWorkflow,
    cache: Arc<QueryCache>,
    scope: CancellationToken,
}

impl UsersPage {
    pub fn mount(location: Location, cache: Arc<QueryCache>, config: &UsersAdminConfig) -> Self {
        let scope = CancellationToken::new();
        let list = ListController::mount(
            location.clone(),
            Arc::clone(&cache),
            config,
            scope.child_token(),
        );
        let actions = ActionWorkflow::new(location, Arc::clone(&cache), scope.child_token());
        Self {
            list,
            actions,
            cache,
            scope,
        }
    }

    /// Reload the list, then reopen a deep-linked modal if the page holds its user.
    pub async fn refresh(&mut self) -> LoadOutcome {
        let outcome = self.list.reload().await;
        if let Some(page) = self.list.last_result() {
            self.actions.rehydrate(page);
        }
        outcome
    }

    pub async fn stats(&self) -> Result<UserStats, UsersAdminError> {
        self.cache.stats().await
    }

    pub fn view(&self) -> ListView {
        self.list.view()
    }

    pub fn is_mounted(&self) -> bool {
        !self.scope.is_cancelled()
    }

    pub fn teardown(&mut self) {
        self.scope.cancel();
        self.list.teardown();
    }
}
