//! MongoDB backend for the [`DocumentStore`](crate::dao::document_store::DocumentStore) trait.

mod config;
mod connection;
mod error;
mod models;
mod store;

pub use config::MongoConfig;
pub use error::{MongoDaoError, MongoResult};
pub use store::MongoDocumentStore;
