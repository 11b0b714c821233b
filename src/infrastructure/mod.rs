pub mod cleanup;
pub mod config;
pub mod http;
pub mod middleware;
pub mod repositories;
