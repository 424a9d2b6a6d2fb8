pub mod memory_repo;
pub mod seed;

pub use memory_repo::InMemoryUsersRepository;
