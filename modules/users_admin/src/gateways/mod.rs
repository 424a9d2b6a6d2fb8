pub mod http;
pub mod local;

pub use http::HttpUsersClient;
pub use local::LocalUsersClient;
