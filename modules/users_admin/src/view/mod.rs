//! Client-side core of the users page: request cache, list state, modal
//! workflow and the derived view model. Everything here is UI-framework
//! agnostic and driven from a single task.

pub mod cache;
pub mod debounce;
pub mod list_state;
pub mod location;
pub mod model;
pub mod page;
pub mod workflow;

pub use cache::{CacheConfig, Namespace, QueryCache, QuerySnapshot};
pub use list_state::{ListController, LoadOutcome, LoadTicket};
pub use location::Location;
pub use model::{ListView, PlaceholderRow, UserRow};
pub use page::UsersPage;
pub use workflow::{ActionWorkflow, ModalMode, ModalState, UserField, WorkflowError};
