pub mod rollup;
pub mod window;
