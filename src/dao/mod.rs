/// Document store abstraction and backends.
pub mod document_store;
/// Persisted entity definitions shared across layers.
pub mod models;
/// Storage abstraction layer for database operations.
pub mod storage;
