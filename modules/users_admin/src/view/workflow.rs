//! View / edit / delete modal over a single user.
//!
//! Opening copies the user into a draft; edits touch only the draft until a
//! save succeeds. The open modal is mirrored into the location as `userId` and
//! `action`, which also lets a deep link reopen it once the page is loaded.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::contract::{
    error::UsersAdminError,
    model::{ListResult, Role, User, UserId, UserPatch, UserStatus},
};
use crate::view::cache::QueryCache;
use crate::view::location::{keys, Location};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalMode {
    View,
    Edit,
    Delete,
}

impl ModalMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ModalMode::View => "view",
            ModalMode::Edit => "edit",
            ModalMode::Delete => "delete",
        }
    }
}

impl fmt::Display for ModalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModalMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "view" => Ok(ModalMode::View),
            "edit" => Ok(ModalMode::Edit),
            "delete" => Ok(ModalMode::Delete),
            other => Err(format!("unknown modal action '{other}'")),
        }
    }
}

/// The draft is the target: its `id` is the id the modal acts on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    None,
    Open { mode: ModalMode, draft: User },
}

impl ModalState {
    pub fn is_open(&self) -> bool {
        matches!(self, ModalState::Open { .. })
    }

    pub fn mode(&self) -> Option<ModalMode> {
        match self {
            ModalState::None => None,
            ModalState::Open { mode, .. } => Some(*mode),
        }
    }

    pub fn target_id(&self) -> Option<&UserId> {
        self.draft().map(|d| &d.id)
    }

    pub fn draft(&self) -> Option<&User> {
        match self {
            ModalState::None => None,
            ModalState::Open { draft, .. } => Some(draft),
        }
    }
}

/// Single-field edit applied to the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserField {
    Name(String),
    Email(String),
    Role(Role),
    Status(UserStatus),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("a modal is already open")]
    AlreadyOpen,
    #[error("no modal is open")]
    NotOpen,
    #[error("'{action}' is not allowed in {mode} mode")]
    InvalidTransition {
        action: &'static str,
        mode: ModalMode,
    },
    #[error("the page has been torn down")]
    TornDown,
    #[error(transparent)]
    Api(#[from] UsersAdminError),
}

pub struct ActionWorkflow {
    location: Location,
    cache: Arc<QueryCache>,
    scope: CancellationToken,
    state: ModalState,
    last_error: Option<UsersAdminError>,
}

impl ActionWorkflow {
    pub fn new(location: Location, cache: Arc<QueryCache>, scope: CancellationToken) -> Self {
        Self {
            location,
            cache,
            scope,
            state: ModalState::None,
            last_error: None,
        }
    }

    pub fn state(&self) -> &ModalState {
        &self.state
    }

    /// Error of the last failed save or delete, shown inside the modal.
    pub fn last_error(&self) -> Option<&UsersAdminError> {
        self.last_error.as_ref()
    }

    fn ensure_mounted(&self) -> Result<(), WorkflowError> {
        if self.scope.is_cancelled() {
            return Err(WorkflowError::TornDown);
        }
        Ok(())
    }

    fn draft_in(
        &mut self,
        action: &'static str,
        wanted: ModalMode,
    ) -> Result<&mut User, WorkflowError> {
        match &mut self.state {
            ModalState::None => Err(WorkflowError::NotOpen),
            ModalState::Open { mode, draft } if *mode == wanted => Ok(draft),
            ModalState::Open { mode, .. } => Err(WorkflowError::InvalidTransition {
                action,
                mode: *mode,
            }),
        }
    }

    pub fn open(&mut self, user: &User, mode: ModalMode) -> Result<(), WorkflowError> {
        self.ensure_mounted()?;
        if self.state.is_open() {
            return Err(WorkflowError::AlreadyOpen);
        }
        debug!(user_id = %user.id, %mode, "opening modal");
        self.state = ModalState::Open {
            mode,
            draft: user.clone(),
        };
        self.last_error = None;
        self.location.update(|p| {
            p.set(keys::USER_ID, user.id.as_str());
            p.set(keys::ACTION, mode.as_str());
        });
        Ok(())
    }

    pub fn edit_field(&mut self, field: UserField) -> Result<(), WorkflowError> {
        self.ensure_mounted()?;
        let draft = self.draft_in("edit_field", ModalMode::Edit)?;
        match field {
            UserField::Name(name) => draft.name = name,
            UserField::Email(email) => draft.email = email,
            UserField::Role(role) => draft.role = role,
            UserField::Status(status) => draft.status = status,
        }
        Ok(())
    }

    /// Send the draft's editable fields. Closes on success; stays open with
    /// [`last_error`](Self::last_error) set on failure.
    pub async fn confirm_save(&mut self) -> Result<User, WorkflowError> {
        self.ensure_mounted()?;
        let draft = self.draft_in("confirm_save", ModalMode::Edit)?;
        let id = draft.id.clone();
        let patch = UserPatch::from_user(draft);

        let result = self.cache.update_user(&id, patch).await;
        if self.scope.is_cancelled() {
            debug!(user_id = %id, "ignoring save result after teardown");
            return Err(WorkflowError::TornDown);
        }

        match result {
            Ok(user) => {
                info!(user_id = %id, "user saved");
                self.close();
                Ok(user)
            }
            Err(e) => {
                warn!(user_id = %id, error = %e, "saving user failed");
                self.last_error = Some(e.clone());
                Err(e.into())
            }
        }
    }

    /// Delete the target. Closes on success; stays open with the error on failure.
    pub async fn confirm_delete(&mut self) -> Result<(), WorkflowError> {
        self.ensure_mounted()?;
        let id = self.draft_in("confirm_delete", ModalMode::Delete)?.id.clone();

        let result = self.cache.delete_user(&id).await;
        if self.scope.is_cancelled() {
            debug!(user_id = %id, "ignoring delete result after teardown");
            return Err(WorkflowError::TornDown);
        }

        match result {
            Ok(()) => {
                info!(user_id = %id, "user deleted");
                self.close();
                Ok(())
            }
            Err(e) => {
                warn!(user_id = %id, error = %e, "deleting user failed");
                self.last_error = Some(e.clone());
                Err(e.into())
            }
        }
    }

    /// Drop the draft and remove `userId`/`action` from the location,
    /// keeping every other parameter.
    pub fn close(&mut self) {
        self.state = ModalState::None;
        self.last_error = None;
        if self.scope.is_cancelled() {
            return;
        }
        self.location.update(|p| {
            p.remove(keys::USER_ID);
            p.remove(keys::ACTION);
        });
    }

    /// Reopen a modal named by the location once `page` is loaded. Only
    /// users present on the page can be reopened. Does not write the location.
    pub fn rehydrate(&mut self, page: &ListResult) -> bool {
        if self.scope.is_cancelled() || self.state.is_open() {
            return false;
        }
        let (Some(user_id), Some(action)) = (
            self.location.get(keys::USER_ID),
            self.location.get(keys::ACTION),
        ) else {
            return false;
        };
        let Ok(mode) = action.parse::<ModalMode>() else {
            return false;
        };
        let Some(user) = page.find(&UserId::from(user_id)) else {
            debug!(%action, "deep-linked user is not on the loaded page");
            return false;
        };

        debug!(user_id = %user.id, %mode, "rehydrating modal from location");
        self.state = ModalState::Open {
            mode,
            draft: user.clone(),
        };
        true
    }
}
