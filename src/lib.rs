pub mod config;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod scheduling;
pub mod state;
pub mod store;
pub mod utils;
