pub mod cursor;
pub mod mode;
pub mod page;
