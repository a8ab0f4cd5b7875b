pub mod memory;
pub mod postgres;
mod repository;

pub use memory::InMemoryAuthDatasource;
pub use postgres::PostgresAuthDatasource;
pub use repository::AuthRepositoryImpl;

// Messages shared by the datasources for the domain errors they raise
pub(crate) const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub(crate) const USER_ALREADY_EXISTS: &str = "User already exists";
pub(crate) const USER_NOT_FOUND: &str = "User not found";
