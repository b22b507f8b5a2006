pub mod cache;
pub mod http;
