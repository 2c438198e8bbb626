pub mod app_state;
pub mod authentication;
pub mod configuration;
pub mod deletion;
pub mod domain;
pub mod export;
pub mod filter;
pub mod listing;
pub mod pagination;
pub mod routes;
pub mod session_state;
pub mod startup;
pub mod store;
pub mod telemetry;
pub mod utils;
