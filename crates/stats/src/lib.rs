pub mod clock;
pub mod error;
pub mod resolution;
pub mod resolver;
