pub mod error;
pub mod xlsx;
