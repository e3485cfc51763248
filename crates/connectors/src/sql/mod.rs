pub mod executor;
pub mod table;
