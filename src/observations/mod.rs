pub mod error;
pub mod loader;
pub mod normalizer;
pub mod table_cache;
