pub mod codec;
pub mod error;
pub mod link;
pub mod memory;
pub mod paginator;
pub mod provider;
pub mod request;
