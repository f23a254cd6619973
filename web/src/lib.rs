pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod session;
pub mod state;
pub mod utils;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;
