pub mod access;
pub mod error;
pub mod taxonomy;
pub mod types;
