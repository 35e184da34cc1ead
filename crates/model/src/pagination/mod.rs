pub mod config;
pub mod cursor;
pub mod link;
pub mod page;
