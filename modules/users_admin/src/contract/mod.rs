pub mod client;
pub mod error;
pub mod model;

pub use client::UsersAdminApi;
pub use error::UsersAdminError;
pub use model::{
    ListQuery, ListResult, Role, StatusFilter, User, UserId, UserPatch, UserStats, UserStatus,
};
