pub mod cache;
pub mod config;
pub mod devices;
pub mod docs;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod refresh;
pub mod registry;
pub mod routes;

#[cfg(test)]
mod testing;
