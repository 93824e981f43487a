pub mod app;
pub mod config;
pub mod errors;
pub mod external;
pub mod logging;
pub mod models;
pub mod render;
mod routes;
pub mod services;
pub mod state;
