pub mod capability;
pub mod error;
pub mod pagination;
pub mod query;
