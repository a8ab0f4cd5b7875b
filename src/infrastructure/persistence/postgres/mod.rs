pub mod auth_datasource;

pub use auth_datasource::PostgresAuthDatasource;
